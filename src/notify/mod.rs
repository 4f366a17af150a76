//! Push notifications for finished check runs.
//!
//! Monitors build a [`Notification`] and hand it to a [`Notifier`]. Delivery
//! is fire-and-forget from the monitor's point of view: the notifier retries
//! on its own and reports the final outcome, which the monitor only logs.

mod ntfy;
mod retry;

pub use ntfy::NtfyNotifier;
pub use retry::{DEFAULT_MAX_DELAY, MAX_ATTEMPTS_CEILING, RetryPolicy};

use async_trait::async_trait;

use crate::checks::{CheckEvaluation, CheckStatus};
use crate::github::{PullRequestNumber, WatchError};

/// Tag selecting the glyph shown on the receiving device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationTag {
    /// Checks passed.
    Success,
    /// Checks failed.
    Failure,
    /// Start-up summary of a repository.
    Summary,
    /// Start-up summary of a repository without open pull requests.
    Idle,
}

impl NotificationTag {
    /// The ntfy tag name; ntfy renders known emoji short codes as glyphs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "tada",
            Self::Failure => "x",
            Self::Summary => "clipboard",
            Self::Idle => "zzz",
        }
    }
}

/// A titled, tagged plain-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Title line.
    pub title: String,
    /// Plain-text body.
    pub message: String,
    /// Glyph selector.
    pub tag: NotificationTag,
}

impl Notification {
    /// Announces the final check outcome of a pull request's head commit.
    ///
    /// # Example
    ///
    /// ```
    /// use checkbell::checks::{CheckEvaluation, CheckStatus};
    /// use checkbell::github::PullRequestNumber;
    /// use checkbell::notify::{Notification, NotificationTag};
    ///
    /// let number = PullRequestNumber::new(2).expect("valid number");
    /// let evaluation = CheckEvaluation {
    ///     status: CheckStatus::Failure,
    ///     message: Some("Checks failed: \"lint\"".to_owned()),
    /// };
    /// let notification = Notification::check_completed(number, "Add parser", &evaluation);
    /// assert_eq!(notification.title, "PR #2 Add parser Check: Failure");
    /// assert_eq!(notification.tag, NotificationTag::Failure);
    /// ```
    #[must_use]
    pub fn check_completed(
        number: PullRequestNumber,
        pull_request_title: &str,
        evaluation: &CheckEvaluation,
    ) -> Self {
        let tag = if evaluation.status == CheckStatus::Success {
            NotificationTag::Success
        } else {
            NotificationTag::Failure
        };

        Self {
            title: format!(
                "PR #{number} {pull_request_title} Check: {label}",
                label = evaluation.status.label()
            ),
            message: evaluation.message.clone().unwrap_or_default(),
            tag,
        }
    }
}

/// Delivers notifications to a push service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification, retrying as the implementation sees fit.
    async fn send(&self, notification: &Notification) -> Result<(), WatchError>;
}
