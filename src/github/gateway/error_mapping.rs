//! Maps Octocrab failures onto [`WatchError`] variants.

use http::StatusCode;

use crate::github::error::WatchError;

/// Checks if a GitHub error status indicates an authentication failure.
const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> WatchError {
    if let octocrab::Error::GitHub { source, .. } = error {
        let status = source.status_code;
        let message = &source.message;
        return if status == StatusCode::NOT_FOUND {
            WatchError::NotFound {
                message: format!("{operation}: GitHub returned {status} {message}"),
            }
        } else if is_auth_failure(status) {
            WatchError::Authentication {
                message: format!("{operation} failed: GitHub returned {status} {message}"),
            }
        } else {
            WatchError::Api {
                message: format!("{operation} failed with status {status}: {message}"),
            }
        };
    }

    if is_network_error(error) {
        return WatchError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    WatchError::Api {
        message: format!("{operation} failed: {error}"),
    }
}
