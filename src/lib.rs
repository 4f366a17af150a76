//! checkbell watches GitHub pull requests and sends one ntfy push
//! notification per commit once its check runs finish.
//!
//! A repository URL watches every open pull request; a pull request URL
//! watches just that one until it closes. The monitors in [`monitor`] drive
//! the polling loop, [`checks`] reduces check runs to a status, [`github`]
//! talks to the REST API through Octocrab, and [`notify`] delivers messages.
//!
//! ```
//! use checkbell::{RepositoryLocator, WatchTarget};
//!
//! let target = WatchTarget::parse("https://github.com/octo/repo.git", None)
//!     .expect("repository URL should parse");
//! let locator: &RepositoryLocator = target.repository();
//! assert_eq!(locator.full_name(), "octo/repo");
//! assert_eq!(locator.api_base().as_str(), "https://api.github.com/");
//! ```

pub mod checks;
pub mod config;
pub mod github;
pub mod monitor;
pub mod notify;

pub use config::CheckbellConfig;
pub use github::{
    CommitSha, OctocrabGateway, PersonalAccessToken, PullRequestLocator, PullRequestNumber,
    RepositoryLocator, WatchError, WatchTarget,
};
pub use notify::{Notification, Notifier, NtfyNotifier, RetryPolicy};
