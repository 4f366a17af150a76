//! Gateways for reading pull requests and check runs through Octocrab.
//!
//! The traits are the seam between the monitors and GitHub. Monitors hold
//! them as trait objects, so tests substitute mocks or scripted fakes while
//! [`OctocrabGateway`] performs the real HTTP requests.

mod client;
mod error_mapping;
mod rest;

pub use rest::OctocrabGateway;

use async_trait::async_trait;

use crate::github::error::WatchError;
use crate::github::locator::{PullRequestLocator, RepositoryLocator};
use crate::github::models::{CheckRunSet, CommitSha, PullRequestSnapshot};

/// Gateway that can load pull request snapshots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// Fetch the current snapshot of one pull request.
    async fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestSnapshot, WatchError>;

    /// Fetch every open pull request of the repository, across all pages.
    async fn open_pull_requests(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<PullRequestSnapshot>, WatchError>;
}

/// Gateway that can load the check runs of a commit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckRunGateway: Send + Sync {
    /// Fetch the check runs GitHub reports for `sha`.
    async fn check_runs(
        &self,
        locator: &RepositoryLocator,
        sha: &CommitSha,
    ) -> Result<CheckRunSet, WatchError>;
}
