//! Octocrab implementation of the pull request and check run gateways.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};

use crate::github::error::WatchError;
use crate::github::locator::{PersonalAccessToken, PullRequestLocator, RepositoryLocator};
use crate::github::models::{
    ApiCheckRunList, ApiPullRequest, CheckRun, CheckRunSet, CommitSha, PullRequestSnapshot,
};

use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;
use super::{CheckRunGateway, PullRequestGateway};

const PER_PAGE: &str = "100";

/// Octocrab-backed gateway.
pub struct OctocrabGateway {
    client: Octocrab,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token, pointed at the API base
    /// of `locator`.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::InvalidUrl` when the base URI cannot be parsed or
    /// `WatchError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &RepositoryLocator,
    ) -> Result<Self, WatchError> {
        let octocrab = build_octocrab_client(token, locator.api_base().as_str())?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl PullRequestGateway for OctocrabGateway {
    async fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestSnapshot, WatchError> {
        self.client
            .get::<ApiPullRequest, _, _>(locator.pull_request_path(), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("pull request", &error))
            .and_then(PullRequestSnapshot::try_from)
    }

    async fn open_pull_requests(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<PullRequestSnapshot>, WatchError> {
        let query_params = [("state", "open"), ("per_page", PER_PAGE)];
        let first_page: Page<ApiPullRequest> = self
            .client
            .get(locator.pulls_path(), Some(&query_params))
            .await
            .map_err(|error| map_octocrab_error("list pulls", &error))?;

        self.client
            .all_pages(first_page)
            .await
            .map_err(|error| map_octocrab_error("list pulls", &error))?
            .into_iter()
            .map(PullRequestSnapshot::try_from)
            .collect()
    }
}

#[async_trait]
impl CheckRunGateway for OctocrabGateway {
    async fn check_runs(
        &self,
        locator: &RepositoryLocator,
        sha: &CommitSha,
    ) -> Result<CheckRunSet, WatchError> {
        let path = locator.check_runs_path(sha.as_str());
        let mut set = CheckRunSet::default();
        let mut page: u32 = 0;

        // An empty page ends the walk even if `total_count` was overstated.
        loop {
            page = page.saturating_add(1);
            let page_str = page.to_string();
            let query_params = [("per_page", PER_PAGE), ("page", page_str.as_str())];
            let listing: ApiCheckRunList = self
                .client
                .get(&path, Some(&query_params))
                .await
                .map_err(|error| map_octocrab_error("check runs", &error))?;

            set.total_count = listing.total_count;
            let fetched = listing.check_runs.len();
            set.runs
                .extend(listing.check_runs.into_iter().map(CheckRun::from));

            let collected = u64::try_from(set.runs.len()).unwrap_or(u64::MAX);
            if fetched == 0 || collected >= set.total_count {
                break;
            }
        }

        Ok(set)
    }
}
