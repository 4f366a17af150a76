//! ntfy push delivery over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use http::{HeaderValue, StatusCode};
use url::Url;

use super::{Notification, Notifier, RetryPolicy};
use crate::github::WatchError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

enum DeliveryFailure {
    Retryable(String),
    Permanent(String),
}

/// Publishes notifications to one ntfy topic.
#[derive(Debug, Clone)]
pub struct NtfyNotifier {
    client: reqwest::Client,
    endpoint: Url,
    retry: RetryPolicy,
}

impl NtfyNotifier {
    /// Creates a notifier posting to `{server}/{topic}`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::MissingNotificationTopic`] when the topic is
    /// blank, [`WatchError::InvalidUrl`] when the server and topic do not form
    /// a URL, and [`WatchError::Notification`] when the HTTP client cannot be
    /// built.
    pub fn new(server: &str, topic: &str, retry: RetryPolicy) -> Result<Self, WatchError> {
        let topic_segment = topic.trim().trim_matches('/');
        if topic_segment.is_empty() {
            return Err(WatchError::MissingNotificationTopic);
        }

        let raw = format!("{}/{topic_segment}", server.trim().trim_end_matches('/'));
        let endpoint = Url::parse(&raw).map_err(|error| WatchError::InvalidUrl(error.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| WatchError::Notification {
                message: format!("failed to build HTTP client: {error}"),
            })?;

        Ok(Self {
            client,
            endpoint,
            retry,
        })
    }

    /// The URL notifications are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post_once(&self, notification: &Notification) -> Result<(), DeliveryFailure> {
        let title = header_text(&notification.title)?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Title", title)
            .header("Priority", "high")
            .header("Tags", notification.tag.as_str())
            .body(notification.message.clone())
            .send()
            .await
            .map_err(|error| DeliveryFailure::Retryable(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = format!("ntfy responded with {status}");
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Err(DeliveryFailure::Retryable(detail))
        } else {
            Err(DeliveryFailure::Permanent(detail))
        }
    }
}

/// Header value for free text; control characters become spaces.
fn header_text(text: &str) -> Result<HeaderValue, DeliveryFailure> {
    let cleaned: String = text
        .chars()
        .map(|character| if character.is_control() { ' ' } else { character })
        .collect();
    HeaderValue::from_bytes(cleaned.as_bytes())
        .map_err(|error| DeliveryFailure::Permanent(format!("invalid title header: {error}")))
}

#[async_trait]
impl Notifier for NtfyNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), WatchError> {
        let mut attempt = 1;
        loop {
            match self.post_once(notification).await {
                Ok(()) => {
                    tracing::debug!(title = %notification.title, attempt, "notification delivered");
                    return Ok(());
                }
                Err(DeliveryFailure::Permanent(message)) => {
                    return Err(WatchError::Notification { message });
                }
                Err(DeliveryFailure::Retryable(message)) => {
                    if attempt >= self.retry.max_attempts() {
                        return Err(WatchError::Notification {
                            message: format!("{message} (gave up after {attempt} attempts)"),
                        });
                    }
                    let delay = self.retry.delay_after(attempt);
                    tracing::debug!(
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %message,
                        "notification delivery failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
