//! Watches one pull request until it closes.

use std::collections::HashSet;

use crate::checks::CheckEvaluator;
use crate::github::{CommitSha, PullRequestLocator, WatchError};

use super::{MonitorContext, dispatch_completion};

/// How a single pull request watch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorExit {
    /// The pull request was closed or merged.
    Closed,
    /// The pull request (or its repository) is gone.
    NotFound,
    /// Any other API failure; the watch does not retry.
    Aborted(WatchError),
}

/// Result of one polling cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Sleep and poll again.
    Continue,
    /// Stop watching.
    Finished(MonitorExit),
}

/// Single pull request monitor.
///
/// Remembers every commit it has announced, so a force-push back to an
/// earlier commit stays silent.
pub struct PullRequestMonitor<'deps> {
    context: MonitorContext<'deps>,
    locator: PullRequestLocator,
    last_sha: Option<CommitSha>,
    notified: HashSet<CommitSha>,
}

impl<'deps> PullRequestMonitor<'deps> {
    /// Creates a monitor that has not polled yet.
    #[must_use]
    pub fn new(context: MonitorContext<'deps>, locator: PullRequestLocator) -> Self {
        Self {
            context,
            locator,
            last_sha: None,
            notified: HashSet::new(),
        }
    }

    /// Head commit seen on the latest poll.
    #[must_use]
    pub const fn last_sha(&self) -> Option<&CommitSha> {
        self.last_sha.as_ref()
    }

    /// True when a completion notification was delivered for `sha`.
    #[must_use]
    pub fn has_notified(&self, sha: &CommitSha) -> bool {
        self.notified.contains(sha)
    }

    /// Polls until the pull request closes, disappears, or an API call fails.
    pub async fn run(&mut self) -> MonitorExit {
        tracing::info!(
            pr = self.locator.number().get(),
            repository = %self.locator.repository().full_name(),
            interval_secs = self.context.poll_interval.as_secs(),
            "watching pull request"
        );

        loop {
            if let CycleOutcome::Finished(exit) = self.poll_once().await {
                return exit;
            }
            tokio::time::sleep(self.context.poll_interval).await;
        }
    }

    /// Runs one cycle: fetch, detect pushes, evaluate, notify.
    pub async fn poll_once(&mut self) -> CycleOutcome {
        let pr = self.locator.number().get();

        let snapshot = match self.context.pulls.pull_request(&self.locator).await {
            Ok(snapshot) => snapshot,
            Err(error) => return Self::stop_on(pr, error),
        };

        if !snapshot.is_open() {
            tracing::info!(pr, "pull request closed; stopping");
            return CycleOutcome::Finished(MonitorExit::Closed);
        }

        let sha = snapshot.head_sha;
        if self.last_sha.as_ref() != Some(&sha) {
            match &self.last_sha {
                Some(previous) => {
                    tracing::info!(pr, previous = %previous, sha = %sha, "new commit pushed");
                }
                None => tracing::info!(pr, sha = %sha, title = %snapshot.title, "tracking head commit"),
            }
            self.last_sha = Some(sha.clone());
        }

        if self.notified.contains(&sha) {
            tracing::debug!(pr, sha = %sha, "commit already announced");
            return CycleOutcome::Continue;
        }

        let evaluation = match CheckEvaluator::new(self.context.checks)
            .evaluate(self.locator.repository(), &sha)
            .await
        {
            Ok(evaluation) => evaluation,
            Err(error) => return Self::stop_on(pr, error),
        };

        if !evaluation.is_completed() {
            tracing::debug!(pr, sha = %sha, status = evaluation.status.label(), "checks not finished");
            return CycleOutcome::Continue;
        }

        if dispatch_completion(self.context.notifier, snapshot.number, &snapshot.title, &evaluation)
            .await
        {
            self.notified.insert(sha);
        }
        CycleOutcome::Continue
    }

    fn stop_on(pr: u64, error: WatchError) -> CycleOutcome {
        if error.is_not_found() {
            tracing::info!(pr, %error, "pull request not found; stopping");
            CycleOutcome::Finished(MonitorExit::NotFound)
        } else {
            tracing::error!(pr, %error, "GitHub request failed; stopping");
            CycleOutcome::Finished(MonitorExit::Aborted(error))
        }
    }
}
