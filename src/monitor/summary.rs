//! Start-up digest of a repository's open pull requests.

use futures::stream::{self, StreamExt};

use crate::checks::{CheckEvaluation, CheckEvaluator, CheckStatus};
use crate::github::{CheckRunGateway, PullRequestSnapshot, RepositoryLocator, WatchError};
use crate::notify::{Notification, NotificationTag};

/// Check run requests kept in flight at once while building the digest.
pub const MAX_CONCURRENT_EVALUATIONS: usize = 8;

/// Evaluates every pull request's head commit concurrently, with at most
/// [`MAX_CONCURRENT_EVALUATIONS`] requests in flight.
///
/// Results are returned in the order of `pulls`.
pub async fn evaluate_all(
    checks: &dyn CheckRunGateway,
    locator: &RepositoryLocator,
    pulls: &[PullRequestSnapshot],
) -> Vec<Result<CheckEvaluation, WatchError>> {
    let evaluator = CheckEvaluator::new(checks);
    stream::iter(
        pulls
            .iter()
            .map(|pull| evaluator.evaluate(locator, &pull.head_sha)),
    )
    .buffered(MAX_CONCURRENT_EVALUATIONS)
    .collect()
    .await
}

/// Counts of open pull requests by check outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySummary {
    /// Open pull requests considered.
    pub total: usize,
    /// Checks passed.
    pub passed: usize,
    /// Checks failed.
    pub failed: usize,
    /// Checks pending or running.
    pub running: usize,
    /// Evaluation failed.
    pub unavailable: usize,
    /// `#n title` of each failing pull request.
    pub failing: Vec<String>,
}

impl RepositorySummary {
    /// Partitions evaluations by outcome; `evaluations` pairs with `pulls`.
    #[must_use]
    pub fn tally(
        pulls: &[PullRequestSnapshot],
        evaluations: &[Result<CheckEvaluation, WatchError>],
    ) -> Self {
        let mut summary = Self {
            total: pulls.len(),
            ..Self::default()
        };

        for (pull, evaluation) in pulls.iter().zip(evaluations) {
            match evaluation.as_ref().map(|result| result.status) {
                Ok(CheckStatus::Success) => summary.passed += 1,
                Ok(CheckStatus::Failure) => {
                    summary.failed += 1;
                    summary
                        .failing
                        .push(format!("#{} {}", pull.number, pull.title));
                }
                Ok(CheckStatus::Pending | CheckStatus::InProgress) => summary.running += 1,
                Err(_) => summary.unavailable += 1,
            }
        }

        summary
    }

    /// Renders the digest for `repository` (`owner/name`).
    #[must_use]
    pub fn notification(&self, repository: &str) -> Notification {
        if self.total == 0 {
            return Notification {
                title: format!("{repository}: no open pull requests"),
                message: "Nothing to watch yet. New pull requests are picked up on the next poll."
                    .to_owned(),
                tag: NotificationTag::Idle,
            };
        }

        let mut lines = vec![
            format!("Passed: {}", self.passed),
            format!("Failed: {}", self.failed),
            format!("Still running: {}", self.running),
        ];
        if self.unavailable > 0 {
            lines.push(format!("Unavailable: {}", self.unavailable));
        }
        if !self.failing.is_empty() {
            lines.push(String::new());
            lines.push("Failing pull requests:".to_owned());
            lines.extend(self.failing.iter().cloned());
        }

        Notification {
            title: format!("{repository}: {} open pull requests", self.total),
            message: lines.join("\n"),
            tag: NotificationTag::Summary,
        }
    }
}
