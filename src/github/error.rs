//! Error types shared by the GitHub, notification, and monitor layers.

use thiserror::Error;

/// Errors surfaced while parsing input, talking to GitHub, or delivering
/// notifications.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WatchError {
    /// No repository or pull request URL was configured.
    #[error("a repository or pull request URL is required")]
    MissingTargetUrl,

    /// The provided URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// The URL path does not name a repository or pull request.
    #[error("URL must match /owner/repo or /owner/repo/pull/<number>")]
    MissingPathSegments,

    /// The pull request number is not a valid integer.
    #[error("pull request number must be a positive integer")]
    InvalidPullRequestNumber,

    /// An entry of the pull request allow-list is not a positive integer.
    #[error("pull request allow-list entry is invalid: {value}")]
    InvalidAllowList {
        /// The offending entry as written by the user.
        value: String,
    },

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The ntfy topic was missing.
    #[error("notification topic is required")]
    MissingNotificationTopic,

    /// GitHub answered 404 for the requested resource.
    #[error("not found: {message}")]
    NotFound {
        /// Description of the missing resource.
        message: String,
    },

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A notification could not be delivered.
    #[error("notification delivery failed: {message}")]
    Notification {
        /// Details about the last delivery attempt.
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl WatchError {
    /// Returns true when the error means the resource no longer exists.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
