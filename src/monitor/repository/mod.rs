//! Watches every open pull request of a repository.

use std::collections::BTreeSet;

use crate::checks::{CheckEvaluation, CheckEvaluator};
use crate::github::{PullRequestNumber, PullRequestSnapshot, RepositoryLocator, WatchError};

use super::summary::{RepositorySummary, evaluate_all};
use super::tracked::{TrackedPullRequests, TrackingEvent};
use super::{MonitorContext, dispatch_completion};

/// Repository-wide monitor.
///
/// The first cycle records what is already finished without notifying; later
/// cycles announce each head commit whose checks complete. Errors never end
/// the watch: a failed listing skips the cycle and a failed evaluation skips
/// that pull request.
pub struct RepositoryMonitor<'deps> {
    context: MonitorContext<'deps>,
    locator: RepositoryLocator,
    allow_list: Option<BTreeSet<PullRequestNumber>>,
    initial_summary: bool,
    tracked: TrackedPullRequests,
    baselined: bool,
}

impl<'deps> RepositoryMonitor<'deps> {
    /// Creates a monitor watching every open pull request.
    #[must_use]
    pub fn new(context: MonitorContext<'deps>, locator: RepositoryLocator) -> Self {
        Self {
            context,
            locator,
            allow_list: None,
            initial_summary: false,
            tracked: TrackedPullRequests::new(),
            baselined: false,
        }
    }

    /// Restricts tracking to the given pull request numbers.
    #[must_use]
    pub fn with_allow_list(mut self, allow_list: Option<BTreeSet<PullRequestNumber>>) -> Self {
        self.allow_list = allow_list;
        self
    }

    /// Sends a digest of the repository on the first cycle.
    ///
    /// Ignored while an allow-list is active.
    #[must_use]
    pub const fn with_initial_summary(mut self, enabled: bool) -> Self {
        self.initial_summary = enabled;
        self
    }

    /// Current tracking state.
    #[must_use]
    pub const fn tracked(&self) -> &TrackedPullRequests {
        &self.tracked
    }

    /// Polls forever.
    pub async fn run(&mut self) {
        let allow_list: Option<Vec<u64>> = self
            .allow_list
            .as_ref()
            .map(|numbers| numbers.iter().map(|number| number.get()).collect());
        tracing::info!(
            repository = %self.locator.full_name(),
            interval_secs = self.context.poll_interval.as_secs(),
            ?allow_list,
            "watching repository"
        );

        loop {
            self.poll_once().await;
            tokio::time::sleep(self.context.poll_interval).await;
        }
    }

    /// Runs one cycle: baseline on the first call, otherwise reconcile and
    /// announce finished commits.
    pub async fn poll_once(&mut self) {
        let open = match self.context.pulls.open_pull_requests(&self.locator).await {
            Ok(open) => open,
            Err(error) => {
                tracing::warn!(%error, "failed to list open pull requests; retrying next cycle");
                return;
            }
        };

        let watched: Vec<PullRequestSnapshot> = open
            .into_iter()
            .filter(|pull| self.is_watched(pull.number))
            .collect();

        if self.baselined {
            self.reconcile(&watched);
            self.announce_completed().await;
        } else {
            self.baseline(&watched).await;
            self.baselined = true;
        }
    }

    fn is_watched(&self, number: PullRequestNumber) -> bool {
        self.allow_list
            .as_ref()
            .is_none_or(|numbers| numbers.contains(&number))
    }

    async fn baseline(&mut self, watched: &[PullRequestSnapshot]) {
        let evaluations = if self.initial_summary && self.allow_list.is_none() {
            let concurrent = evaluate_all(self.context.checks, &self.locator, watched).await;
            self.send_summary(watched, &concurrent).await;
            concurrent
        } else {
            self.evaluate_each(watched).await
        };

        for (pull, evaluation) in watched.iter().zip(&evaluations) {
            let already_complete = match evaluation {
                Ok(result) => result.is_completed(),
                Err(error) => {
                    tracing::warn!(
                        pr = pull.number.get(),
                        %error,
                        "could not evaluate checks during baseline"
                    );
                    false
                }
            };
            self.tracked.baseline(pull, already_complete);
        }

        tracing::info!(
            tracked = self.tracked.len(),
            "baseline recorded; finished checks will not be announced"
        );
    }

    async fn evaluate_each(
        &self,
        pulls: &[PullRequestSnapshot],
    ) -> Vec<Result<CheckEvaluation, WatchError>> {
        let evaluator = CheckEvaluator::new(self.context.checks);
        let mut evaluations = Vec::with_capacity(pulls.len());
        for pull in pulls {
            evaluations.push(evaluator.evaluate(&self.locator, &pull.head_sha).await);
        }
        evaluations
    }

    async fn send_summary(
        &self,
        pulls: &[PullRequestSnapshot],
        evaluations: &[Result<CheckEvaluation, WatchError>],
    ) {
        let notification =
            RepositorySummary::tally(pulls, evaluations).notification(&self.locator.full_name());
        match self.context.notifier.send(&notification).await {
            Ok(()) => tracing::info!(title = %notification.title, "sent repository summary"),
            Err(error) => tracing::warn!(%error, "failed to deliver repository summary"),
        }
    }

    fn reconcile(&mut self, watched: &[PullRequestSnapshot]) {
        for event in self.tracked.reconcile(watched) {
            match event {
                TrackingEvent::Added { number, title } => {
                    tracing::info!(pr = number.get(), %title, "new pull request detected");
                }
                TrackingEvent::NewCommit {
                    number,
                    previous,
                    current,
                } => {
                    tracing::info!(
                        pr = number.get(),
                        previous = %previous,
                        sha = %current,
                        "new commit pushed; resetting"
                    );
                }
                TrackingEvent::Removed { number } => {
                    tracing::info!(pr = number.get(), "pull request closed or merged; dropping");
                }
            }
        }
    }

    async fn announce_completed(&mut self) {
        let pending = self.tracked.pending();
        tracing::debug!(
            tracked = self.tracked.len(),
            pending = pending.len(),
            "checking pull requests"
        );

        let evaluator = CheckEvaluator::new(self.context.checks);
        for check in pending {
            let pr = check.number.get();
            let evaluation = match evaluator.evaluate(&self.locator, &check.head_sha).await {
                Ok(evaluation) => evaluation,
                Err(error) => {
                    tracing::warn!(pr, %error, "failed to evaluate checks; retrying next cycle");
                    continue;
                }
            };

            if !evaluation.is_completed() {
                tracing::debug!(pr, status = evaluation.status.label(), "checks not finished");
                continue;
            }

            if dispatch_completion(self.context.notifier, check.number, &check.title, &evaluation)
                .await
            {
                self.tracked.mark_notified(check.number, &check.head_sha);
            }
        }
    }
}
