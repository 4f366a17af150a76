//! Data models for pull request snapshots and check runs.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into the public domain types used by the evaluator and monitors.

use std::fmt;

use serde::Deserialize;

use super::error::WatchError;
use super::locator::PullRequestNumber;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Length of the abbreviated commit identifier shown in logs.
const SHORT_SHA_LEN: usize = 7;

/// Opaque head commit identifier; changes on every push.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitSha(String);

impl CommitSha {
    /// Wraps a commit identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the full identifier.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Abbreviated identifier for display.
    #[must_use]
    pub fn short(&self) -> String {
        self.0.chars().take(SHORT_SHA_LEN).collect()
    }
}

impl fmt::Display for CommitSha {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.short())
    }
}

/// Open or closed state of a pull request. Merged pull requests are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestState {
    /// Still accepting pushes.
    Open,
    /// Closed or merged.
    Closed,
}

impl PullRequestState {
    fn from_api(value: Option<&str>) -> Self {
        match value {
            Some(state) if state.eq_ignore_ascii_case("open") => Self::Open,
            _ => Self::Closed,
        }
    }
}

/// Read-only view of a pull request taken on one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestSnapshot {
    /// Pull request number.
    pub number: PullRequestNumber,
    /// Title at the time of the poll.
    pub title: String,
    /// Head commit of the source branch.
    pub head_sha: CommitSha,
    /// Open or closed.
    pub state: PullRequestState,
}

impl PullRequestSnapshot {
    /// Returns true while the pull request is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == PullRequestState::Open
    }
}

/// Lifecycle status of a check run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckRunStatus {
    /// Waiting to be picked up.
    Queued,
    /// Running.
    InProgress,
    /// Finished; a conclusion is available.
    Completed,
    /// Any other status GitHub reports (`waiting`, `requested`, `pending`).
    Other(String),
}

impl CheckRunStatus {
    fn from_api(value: &str) -> Self {
        match value {
            "queued" => Self::Queued,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// Final outcome of a completed check run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckConclusion {
    /// The check passed.
    Success,
    /// The check failed.
    Failure,
    /// The check finished without a verdict.
    Neutral,
    /// The check was skipped.
    Skipped,
    /// The check was cancelled.
    Cancelled,
    /// The check timed out.
    TimedOut,
    /// The check requires manual action.
    ActionRequired,
    /// Any other conclusion, such as `stale`.
    Other(String),
}

impl CheckConclusion {
    fn from_api(value: &str) -> Self {
        match value {
            "success" => Self::Success,
            "failure" => Self::Failure,
            "neutral" => Self::Neutral,
            "skipped" => Self::Skipped,
            "cancelled" => Self::Cancelled,
            "timed_out" => Self::TimedOut,
            "action_required" => Self::ActionRequired,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Conclusions that do not fail a commit.
    #[must_use]
    pub const fn is_passing(&self) -> bool {
        matches!(self, Self::Success | Self::Skipped | Self::Neutral)
    }
}

/// One named CI task reported for a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRun {
    /// Display name of the check.
    pub name: String,
    /// Lifecycle status.
    pub status: CheckRunStatus,
    /// Outcome, present once the run completed.
    pub conclusion: Option<CheckConclusion>,
}

impl CheckRun {
    /// Returns true when the run reached the completed lifecycle state.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == CheckRunStatus::Completed
    }
}

/// Check runs reported for one commit at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckRunSet {
    /// Number of runs GitHub reports for the commit.
    pub total_count: u64,
    /// Runs retrieved so far; may be shorter than `total_count`.
    pub runs: Vec<CheckRun>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) title: Option<String>,
    pub(super) state: Option<String>,
    pub(super) head: ApiCommitRef,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommitRef {
    pub(super) sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCheckRunList {
    #[serde(default)]
    pub(super) total_count: u64,
    #[serde(default)]
    pub(super) check_runs: Vec<ApiCheckRun>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCheckRun {
    pub(super) name: String,
    pub(super) status: String,
    pub(super) conclusion: Option<String>,
}

impl TryFrom<ApiPullRequest> for PullRequestSnapshot {
    type Error = WatchError;

    fn try_from(value: ApiPullRequest) -> Result<Self, Self::Error> {
        let number = PullRequestNumber::new(value.number).map_err(|_| WatchError::Api {
            message: "GitHub returned a pull request numbered 0".to_owned(),
        })?;

        Ok(Self {
            number,
            title: value.title.unwrap_or_default(),
            head_sha: CommitSha::new(value.head.sha),
            state: PullRequestState::from_api(value.state.as_deref()),
        })
    }
}

impl From<ApiCheckRun> for CheckRun {
    fn from(value: ApiCheckRun) -> Self {
        Self {
            name: value.name,
            status: CheckRunStatus::from_api(&value.status),
            conclusion: value.conclusion.as_deref().map(CheckConclusion::from_api),
        }
    }
}
