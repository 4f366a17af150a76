//! Polling monitors that turn finished check runs into notifications.
//!
//! [`PullRequestMonitor`] follows one pull request until it closes;
//! [`RepositoryMonitor`] follows every open pull request of a repository
//! indefinitely. Both run one cycle at a time on the calling task and share
//! [`MonitorContext`] for their collaborators.

mod repository;
mod single;
pub mod summary;
pub mod tracked;

use std::time::Duration;

pub use repository::RepositoryMonitor;
pub use single::{CycleOutcome, MonitorExit, PullRequestMonitor};

use crate::checks::CheckEvaluation;
use crate::github::{CheckRunGateway, PullRequestGateway, PullRequestNumber};
use crate::notify::{Notification, Notifier};

/// Collaborators and pacing shared by both monitors.
#[derive(Clone, Copy)]
pub struct MonitorContext<'deps> {
    /// Pull request reads.
    pub pulls: &'deps dyn PullRequestGateway,
    /// Check run reads.
    pub checks: &'deps dyn CheckRunGateway,
    /// Notification delivery.
    pub notifier: &'deps dyn Notifier,
    /// Sleep between cycles.
    pub poll_interval: Duration,
}

/// Announces a finished commit; returns true only when delivery succeeded.
///
/// Failures are logged and swallowed so the caller can retry on its next
/// cycle without marking the commit notified.
async fn dispatch_completion(
    notifier: &dyn Notifier,
    number: PullRequestNumber,
    title: &str,
    evaluation: &CheckEvaluation,
) -> bool {
    let notification = Notification::check_completed(number, title, evaluation);
    tracing::info!(
        pr = number.get(),
        status = evaluation.status.label(),
        "checks finished"
    );

    match notifier.send(&notification).await {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(
                pr = number.get(),
                %error,
                "failed to deliver notification; will retry next cycle"
            );
            false
        }
    }
}

#[cfg(test)]
mod test_support;
