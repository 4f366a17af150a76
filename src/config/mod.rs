//! Application configuration loaded from CLI, environment, and files.
//!
//! # Precedence
//!
//! Values are merged with the following precedence (lowest to highest):
//!
//! 1. **Defaults** – built-in values (`https://ntfy.sh`, 60 second polls)
//! 2. **Configuration file** – `.checkbell.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `CHECKBELL_URL`, `CHECKBELL_TOKEN`, ...
//! 4. **Command-line arguments** – `--url`/`-u`, `--token`/`-t`, ...
//!
//! The unprefixed variables `REPO_URL`, `GITHUB_TOKEN`, `NTFY_TOPIC` and
//! `GITHUB_ENTERPRISE_URL` are still honoured when no layer sets the
//! corresponding field.
//!
//! # Configuration File
//!
//! ```toml
//! url = "https://github.com/owner/repo"
//! token = "ghp_example"
//! ntfy_topic = "my-ci-alerts"
//! poll_interval_seconds = 30
//! pr_numbers = "12,15"
//! ```

use std::collections::BTreeSet;
use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::{PersonalAccessToken, PullRequestNumber, WatchError, WatchTarget};
use crate::notify::RetryPolicy;

const DEFAULT_NTFY_SERVER: &str = "https://ntfy.sh";
const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 60;
const DEFAULT_NOTIFY_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_NOTIFY_BACKOFF_MILLIS: u64 = 1_000;

/// Pull request numbers a repository watch is restricted to.
pub type AllowList = BTreeSet<PullRequestNumber>;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use checkbell::CheckbellConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = CheckbellConfig::load().expect("failed to load configuration");
/// let target = config.watch_target().expect("target URL required");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "CHECKBELL",
    discovery(
        dotfile_name = ".checkbell.toml",
        config_file_name = "checkbell.toml",
        app_name = "checkbell"
    )
)]
pub struct CheckbellConfig {
    /// Repository or pull request URL to watch.
    ///
    /// A URL containing `/pull/<number>` watches that pull request only.
    ///
    /// Can be provided via:
    /// - CLI: `--url <URL>` or `-u <URL>`
    /// - Environment: `CHECKBELL_URL` or `REPO_URL` (legacy)
    /// - Config file: `url = "..."`
    #[ortho_config(cli_short = 'u')]
    pub url: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `CHECKBELL_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// ntfy topic notifications are published to.
    ///
    /// Can be provided via:
    /// - CLI: `--ntfy-topic <TOPIC>`
    /// - Environment: `CHECKBELL_NTFY_TOPIC` or `NTFY_TOPIC` (legacy)
    /// - Config file: `ntfy_topic = "..."`
    #[ortho_config()]
    pub ntfy_topic: Option<String>,

    /// ntfy server base URL. Defaults to `https://ntfy.sh`.
    #[ortho_config()]
    pub ntfy_server: String,

    /// Base URL of a GitHub Enterprise instance; the API is served from
    /// `{url}/api/v3`.
    ///
    /// Can be provided via:
    /// - CLI: `--enterprise-url <URL>` or `-e <URL>`
    /// - Environment: `CHECKBELL_ENTERPRISE_URL` or `GITHUB_ENTERPRISE_URL`
    ///   (legacy)
    #[ortho_config(cli_short = 'e')]
    pub enterprise_url: Option<String>,

    /// Seconds to sleep between polls. Defaults to 60; values below 1 are
    /// raised to 1.
    ///
    /// Can be provided via:
    /// - CLI: `--poll-interval-seconds 30` or `-i 30`
    /// - Environment: `CHECKBELL_POLL_INTERVAL_SECONDS`
    #[ortho_config(cli_short = 'i')]
    pub poll_interval_seconds: u64,

    /// Comma-separated pull request numbers to watch in repository mode.
    ///
    /// Can be provided via:
    /// - CLI: `--pr-numbers 12,15` or `-p 12,15`
    /// - Environment: `CHECKBELL_PR_NUMBERS`
    /// - Config file: `pr_numbers = "12,15"`
    #[ortho_config(cli_short = 'p')]
    pub pr_numbers: Option<String>,

    /// Sends a digest of the repository's open pull requests at start-up.
    ///
    /// Only applies to repository mode without an allow-list.
    ///
    /// Can be provided via:
    /// - CLI: `--initial-summary` / `-s`
    /// - Config file: `initial_summary = true`
    ///
    /// Note: `CHECKBELL_INITIAL_SUMMARY` is not supported because
    /// `ortho_config` does not load boolean values from the environment.
    #[ortho_config(cli_short = 's')]
    pub initial_summary: bool,

    /// Delivery attempts per notification, including the first. Clamped to
    /// between 1 and 10.
    #[ortho_config()]
    pub notify_max_attempts: u32,

    /// Delay before the first delivery retry, in milliseconds; doubles on
    /// every further retry.
    #[ortho_config()]
    pub notify_backoff_millis: u64,
}

impl Default for CheckbellConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            ntfy_topic: None,
            ntfy_server: DEFAULT_NTFY_SERVER.to_owned(),
            enterprise_url: None,
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECONDS,
            pr_numbers: None,
            initial_summary: false,
            notify_max_attempts: DEFAULT_NOTIFY_MAX_ATTEMPTS,
            notify_backoff_millis: DEFAULT_NOTIFY_BACKOFF_MILLIS,
        }
    }
}

/// Configured value, else the non-blank legacy environment variable.
fn configured_or_legacy(value: Option<&str>, legacy_var: &str) -> Option<String> {
    value
        .map(str::trim)
        .filter(|configured| !configured.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            env::var(legacy_var)
                .ok()
                .map(|raw| raw.trim().to_owned())
                .filter(|fallback| !fallback.is_empty())
        })
}

impl CheckbellConfig {
    /// Returns the repository or pull request URL.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::MissingTargetUrl`] when neither the configuration
    /// nor `REPO_URL` provides one.
    pub fn require_target_url(&self) -> Result<String, WatchError> {
        configured_or_legacy(self.url.as_deref(), "REPO_URL").ok_or(WatchError::MissingTargetUrl)
    }

    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, WatchError> {
        let raw = configured_or_legacy(self.token.as_deref(), "GITHUB_TOKEN")
            .ok_or(WatchError::MissingToken)?;
        PersonalAccessToken::new(raw)
    }

    /// Returns the ntfy topic.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::MissingNotificationTopic`] when neither the
    /// configuration nor `NTFY_TOPIC` provides one.
    pub fn require_ntfy_topic(&self) -> Result<String, WatchError> {
        configured_or_legacy(self.ntfy_topic.as_deref(), "NTFY_TOPIC")
            .ok_or(WatchError::MissingNotificationTopic)
    }

    /// GitHub Enterprise base URL, when configured.
    #[must_use]
    pub fn resolve_enterprise_url(&self) -> Option<String> {
        configured_or_legacy(self.enterprise_url.as_deref(), "GITHUB_ENTERPRISE_URL")
    }

    /// Sleep between polling cycles; never shorter than one second.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds.max(1))
    }

    /// Parses `pr_numbers` into the repository allow-list.
    ///
    /// Blank entries are ignored; a list with no entries left means no
    /// restriction.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidAllowList`] for an entry that is not a
    /// positive integer.
    pub fn allow_list(&self) -> Result<Option<AllowList>, WatchError> {
        let Some(raw) = self.pr_numbers.as_deref() else {
            return Ok(None);
        };

        let numbers = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                entry
                    .parse::<u64>()
                    .ok()
                    .and_then(|value| PullRequestNumber::new(value).ok())
                    .ok_or_else(|| WatchError::InvalidAllowList {
                        value: entry.to_owned(),
                    })
            })
            .collect::<Result<AllowList, WatchError>>()?;

        Ok((!numbers.is_empty()).then_some(numbers))
    }

    /// Retry policy for notification delivery.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.notify_max_attempts,
            Duration::from_millis(self.notify_backoff_millis),
        )
    }

    /// Resolves the URL into a repository or pull request target.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::MissingTargetUrl`] when no URL is configured and
    /// the locator parse errors for a malformed one.
    pub fn watch_target(&self) -> Result<WatchTarget, WatchError> {
        let url = self.require_target_url()?;
        WatchTarget::parse(&url, self.resolve_enterprise_url().as_deref())
    }

    /// Validates that the configured values are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Configuration`] when an allow-list is combined
    /// with a pull request URL, and propagates target and allow-list parse
    /// errors.
    pub fn validate(&self) -> Result<(), WatchError> {
        let target = self.watch_target()?;
        let allow_list = self.allow_list()?;

        if allow_list.is_some() && matches!(target, WatchTarget::PullRequest(_)) {
            return Err(WatchError::Configuration {
                message: "--pr-numbers only applies when watching a repository URL".to_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
