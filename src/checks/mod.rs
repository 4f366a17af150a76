//! Reduces the check runs of a commit to a single status.
//!
//! [`evaluate_check_runs`] is a pure function of one [`CheckRunSet`]
//! snapshot; [`CheckEvaluator`] pairs it with a fresh fetch through a
//! [`CheckRunGateway`]. Neither keeps state between calls, so a commit can be
//! evaluated any number of times and the caller alone decides whether to act
//! on the result.

use crate::github::{CheckRunGateway, CheckRunSet, CommitSha, RepositoryLocator, WatchError};

/// Aggregate status of every check run on a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// No check runs have been reported yet.
    Pending,
    /// At least one check run has not completed.
    InProgress,
    /// Every run completed and none failed.
    Success,
    /// Every run completed and at least one failed.
    Failure,
}

impl CheckStatus {
    /// Returns true for the two terminal statuses.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }

    /// Capitalised label used in notification titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Success => "Success",
            Self::Failure => "Failure",
        }
    }
}

/// Result of evaluating the check runs of one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckEvaluation {
    /// Aggregate status.
    pub status: CheckStatus,
    /// Human readable outcome, present once the checks completed.
    pub message: Option<String>,
}

impl CheckEvaluation {
    const fn unfinished(status: CheckStatus) -> Self {
        Self {
            status,
            message: None,
        }
    }

    /// Returns true when the checks reached a final outcome.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}

/// Reduces a check run snapshot to a [`CheckEvaluation`].
///
/// Zero reported runs is `Pending`: CI that has not registered its checks yet
/// looks the same as a repository without CI. Fewer completed runs than the
/// reported total is `InProgress`, whatever conclusions are already present.
///
/// # Example
///
/// ```
/// use checkbell::checks::{CheckStatus, evaluate_check_runs};
/// use checkbell::github::CheckRunSet;
///
/// let evaluation = evaluate_check_runs(&CheckRunSet::default());
/// assert_eq!(evaluation.status, CheckStatus::Pending);
/// assert!(!evaluation.is_completed());
/// ```
#[must_use]
pub fn evaluate_check_runs(set: &CheckRunSet) -> CheckEvaluation {
    let total = set.total_count;
    if total == 0 {
        return CheckEvaluation::unfinished(CheckStatus::Pending);
    }

    let completed = set.runs.iter().filter(|run| run.is_completed()).count();
    if u64::try_from(completed).unwrap_or(u64::MAX) < total {
        return CheckEvaluation::unfinished(CheckStatus::InProgress);
    }

    let failing: Vec<String> = set
        .runs
        .iter()
        .filter(|run| {
            run.is_completed()
                && !run
                    .conclusion
                    .as_ref()
                    .is_some_and(|conclusion| conclusion.is_passing())
        })
        .map(|run| format!("\"{}\"", run.name))
        .collect();

    if failing.is_empty() {
        CheckEvaluation {
            status: CheckStatus::Success,
            message: Some(format!("All {total} checks passed!")),
        }
    } else {
        CheckEvaluation {
            status: CheckStatus::Failure,
            message: Some(format!("Checks failed: {}", failing.join(", "))),
        }
    }
}

/// Fetches and evaluates the check runs of a commit.
pub struct CheckEvaluator<'client, Gateway>
where
    Gateway: CheckRunGateway + ?Sized,
{
    client: &'client Gateway,
}

impl<'client, Gateway> CheckEvaluator<'client, Gateway>
where
    Gateway: CheckRunGateway + ?Sized,
{
    /// Create an evaluator reading through `client`.
    #[must_use]
    pub const fn new(client: &'client Gateway) -> Self {
        Self { client }
    }

    /// Evaluate the check runs currently reported for `sha`.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures unchanged: `NotFound` when the commit or
    /// repository is inaccessible, `Network`/`Api` for transient failures.
    pub async fn evaluate(
        &self,
        locator: &RepositoryLocator,
        sha: &CommitSha,
    ) -> Result<CheckEvaluation, WatchError> {
        let set = self.client.check_runs(locator, sha).await?;
        Ok(evaluate_check_runs(&set))
    }
}
