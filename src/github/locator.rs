//! URL parsing and identity wrappers for watch targets.

use std::fmt;

use url::Url;

use super::error::WatchError;

const PUBLIC_API_BASE: &str = "https://api.github.com";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, WatchError> {
        if value.is_empty() {
            return Err(WatchError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Accepts the name as it appears in a clone URL, dropping any `.git`
    /// suffix.
    pub(crate) fn new(value: &str) -> Result<Self, WatchError> {
        let name = value.strip_suffix(".git").unwrap_or(value);
        if name.is_empty() {
            return Err(WatchError::MissingPathSegments);
        }
        Ok(Self(name.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number, unique within a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Wraps a pull request number.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidPullRequestNumber`] for zero.
    pub const fn new(value: u64) -> Result<Self, WatchError> {
        if value == 0 {
            return Err(WatchError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PullRequestNumber {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, WatchError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(WatchError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

fn invalid_url(error: &url::ParseError) -> WatchError {
    WatchError::InvalidUrl(error.to_string())
}

/// Derives the API base for a self-hosted instance from its web URL.
fn enterprise_api_base(enterprise_url: &str) -> Result<Url, WatchError> {
    let trimmed = enterprise_url.trim().trim_end_matches('/');
    Url::parse(&format!("{trimmed}/api/v3")).map_err(|error| invalid_url(&error))
}

/// Derives the GitHub API base URL from a host string.
fn derive_api_base_from_host(
    scheme: &str,
    host: &str,
    port: Option<u16>,
) -> Result<Url, WatchError> {
    if host.eq_ignore_ascii_case("github.com") || host.eq_ignore_ascii_case("www.github.com") {
        Url::parse(PUBLIC_API_BASE).map_err(|error| invalid_url(&error))
    } else {
        let authority = if host.contains(':') {
            format!("[{host}]")
        } else {
            host.to_owned()
        };
        let mut api_url =
            Url::parse(&format!("{scheme}://{authority}")).map_err(|error| invalid_url(&error))?;

        api_url
            .set_port(port)
            .map_err(|()| WatchError::InvalidUrl("invalid port".to_owned()))?;
        api_url.set_path("api/v3");
        Ok(api_url)
    }
}

/// Picks the API base: an explicit enterprise URL wins over the URL host.
fn derive_api_base(parsed: &Url, enterprise_url: Option<&str>) -> Result<Url, WatchError> {
    if let Some(base) = enterprise_url.filter(|value| !value.trim().is_empty()) {
        return enterprise_api_base(base);
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| WatchError::InvalidUrl("URL must include a host".to_owned()))?;

    derive_api_base_from_host(parsed.scheme(), host, parsed.port())
}

fn parse_url(input: &str) -> Result<Url, WatchError> {
    Url::parse(input.trim()).map_err(|error| invalid_url(&error))
}

/// Parsed repository URL with derived API base.
///
/// # Example
///
/// ```
/// use checkbell::RepositoryLocator;
///
/// let locator = RepositoryLocator::parse("https://github.com/octo/repo.git")
///     .expect("should parse repository URL");
/// assert_eq!(locator.owner().as_str(), "octo");
/// assert_eq!(locator.repository().as_str(), "repo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a repository locator on the public `github.com` API.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::MissingPathSegments` when owner or repo is empty.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, WatchError> {
        let validated_owner = RepositoryOwner::new(owner)?;
        let repository = RepositoryName::new(repo)?;
        let api_base = Url::parse(PUBLIC_API_BASE).map_err(|error| invalid_url(&error))?;

        Ok(Self {
            api_base,
            owner: validated_owner,
            repository,
        })
    }

    /// Parses a repository URL in the form `https://<host>/<owner>/<repo>`.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::InvalidUrl` when parsing fails or
    /// `MissingPathSegments` when the URL path does not start with
    /// `/owner/repo`.
    pub fn parse(input: &str) -> Result<Self, WatchError> {
        Self::parse_with_api_base(input, None)
    }

    /// Parses a repository URL, routing API calls through `enterprise_url`
    /// when one is supplied.
    ///
    /// # Errors
    ///
    /// See [`RepositoryLocator::parse`].
    pub fn parse_with_api_base(
        input: &str,
        enterprise_url: Option<&str>,
    ) -> Result<Self, WatchError> {
        let parsed = parse_url(input)?;
        Self::from_parsed(&parsed, enterprise_url)
    }

    fn from_parsed(parsed: &Url, enterprise_url: Option<&str>) -> Result<Self, WatchError> {
        let mut segments = parsed
            .path_segments()
            .ok_or(WatchError::MissingPathSegments)?;

        let owner_segment = segments.next().ok_or(WatchError::MissingPathSegments)?;
        let repository_segment = segments.next().ok_or(WatchError::MissingPathSegments)?;

        let owner = RepositoryOwner::new(owner_segment)?;
        let repository = RepositoryName::new(repository_segment)?;
        let api_base = derive_api_base(parsed, enterprise_url)?;

        Ok(Self {
            api_base,
            owner,
            repository,
        })
    }

    /// API base URL derived from the repository host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Returns `owner/repo` for display.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.as_str(), self.repository.as_str())
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!("/repos/{}/pulls", self.full_name())
    }

    pub(crate) fn pull_request_path(&self, number: PullRequestNumber) -> String {
        format!("/repos/{}/pulls/{}", self.full_name(), number.get())
    }

    pub(crate) fn check_runs_path(&self, sha: &str) -> String {
        format!("/repos/{}/commits/{sha}/check-runs", self.full_name())
    }
}

/// Parsed pull request URL and derived API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestLocator {
    repository: RepositoryLocator,
    number: PullRequestNumber,
}

impl PullRequestLocator {
    /// Parses a pull request URL in the form
    /// `https://<host>/<owner>/<repo>/pull/<number>`.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::InvalidUrl` when parsing fails, `MissingPathSegments`
    /// when the URL path is not `/owner/repo/pull/<number>`, and
    /// `InvalidPullRequestNumber` when the number is not a positive integer.
    pub fn parse(input: &str) -> Result<Self, WatchError> {
        Self::parse_with_api_base(input, None)
    }

    /// Parses a pull request URL, routing API calls through `enterprise_url`
    /// when one is supplied.
    ///
    /// # Errors
    ///
    /// See [`PullRequestLocator::parse`].
    pub fn parse_with_api_base(
        input: &str,
        enterprise_url: Option<&str>,
    ) -> Result<Self, WatchError> {
        let parsed = parse_url(input)?;
        Self::from_parsed(&parsed, enterprise_url)
    }

    fn from_parsed(parsed: &Url, enterprise_url: Option<&str>) -> Result<Self, WatchError> {
        let mut segments = parsed
            .path_segments()
            .ok_or(WatchError::MissingPathSegments)?
            .skip(2);

        let marker = segments.next().ok_or(WatchError::MissingPathSegments)?;
        let number_segment = segments.next().ok_or(WatchError::MissingPathSegments)?;

        if marker != "pull" || number_segment.is_empty() {
            return Err(WatchError::MissingPathSegments);
        }

        let number = number_segment
            .parse::<u64>()
            .map_err(|_| WatchError::InvalidPullRequestNumber)
            .and_then(PullRequestNumber::new)?;
        let repository = RepositoryLocator::from_parsed(parsed, enterprise_url)?;

        Ok(Self { repository, number })
    }

    /// Repository containing the pull request.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryLocator {
        &self.repository
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    pub(crate) fn pull_request_path(&self) -> String {
        self.repository.pull_request_path(self.number)
    }
}

/// What a single process run watches, selected by the shape of the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchTarget {
    /// Every open pull request of a repository.
    Repository(RepositoryLocator),
    /// One pull request.
    PullRequest(PullRequestLocator),
}

impl WatchTarget {
    /// Parses a repository or pull request URL. URLs whose path contains a
    /// `/pull/` segment select single pull request mode.
    ///
    /// # Errors
    ///
    /// Propagates the parse errors of [`RepositoryLocator`] and
    /// [`PullRequestLocator`].
    pub fn parse(input: &str, enterprise_url: Option<&str>) -> Result<Self, WatchError> {
        let parsed = parse_url(input)?;
        if parsed.path().contains("/pull/") {
            PullRequestLocator::from_parsed(&parsed, enterprise_url).map(Self::PullRequest)
        } else {
            RepositoryLocator::from_parsed(&parsed, enterprise_url).map(Self::Repository)
        }
    }

    /// Repository the target belongs to.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryLocator {
        match self {
            Self::Repository(locator) => locator,
            Self::PullRequest(locator) => locator.repository(),
        }
    }
}
