//! GitHub access: target URL parsing, REST models, and Octocrab gateways.
//!
//! Errors are mapped into [`WatchError`] variants so the monitors can tell a
//! deleted pull request apart from a transient failure without inspecting
//! Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;

pub use error::WatchError;
pub use gateway::{CheckRunGateway, OctocrabGateway, PullRequestGateway};
pub use locator::{
    PersonalAccessToken, PullRequestLocator, PullRequestNumber, RepositoryLocator, RepositoryName,
    RepositoryOwner, WatchTarget,
};
pub use models::{
    CheckConclusion, CheckRun, CheckRunSet, CheckRunStatus, CommitSha, PullRequestSnapshot,
    PullRequestState,
};

#[cfg(test)]
pub use gateway::{MockCheckRunGateway, MockPullRequestGateway};

#[cfg(test)]
mod tests;
