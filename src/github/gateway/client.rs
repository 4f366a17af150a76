//! Octocrab client construction for the gateway implementation.

use http::Uri;
use octocrab::Octocrab;

use crate::github::error::WatchError;
use crate::github::locator::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns `WatchError::InvalidUrl` when the base URI cannot be parsed or
/// `WatchError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, WatchError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| WatchError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| WatchError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
