//! Unit tests for URL parsing and watch target selection.

use rstest::rstest;

use super::{PersonalAccessToken, PullRequestLocator, WatchError, WatchTarget};


#[rstest]
fn parses_standard_pull_request_url_segments() {
    let locator = PullRequestLocator::parse("https://github.com/octo/repo/pull/12/files")
        .expect("should parse standard GitHub URL");
    assert_eq!(
        locator.repository().owner().as_str(),
        "octo",
        "owner mismatch"
    );
    assert_eq!(
        locator.repository().repository().as_str(),
        "repo",
        "repository mismatch"
    );
    assert_eq!(locator.number().get(), 12_u64, "number mismatch");
    assert_eq!(
        locator.pull_request_path(),
        "/repos/octo/repo/pulls/12",
        "pull request path mismatch"
    );
}

#[rstest]
fn parses_enterprise_pull_request_url() {
    let locator = PullRequestLocator::parse("https://ghe.example.com/foo/bar/pull/7")
        .expect("should parse enterprise URL");
    assert_eq!(
        locator.repository().api_base().as_str(),
        "https://ghe.example.com/api/v3",
        "enterprise api base mismatch"
    );
}

#[rstest]
#[case::missing_number("https://github.com/octo/repo/pull/", WatchError::MissingPathSegments)]
#[case::non_numeric(
    "https://github.com/octo/repo/pull/not-a-number",
    WatchError::InvalidPullRequestNumber
)]
#[case::zero("https://github.com/octo/repo/pull/0", WatchError::InvalidPullRequestNumber)]
#[case::issues_path("https://github.com/octo/repo/issues/4", WatchError::MissingPathSegments)]
#[case::pulls_collection("https://github.com/octo/repo/pulls/4", WatchError::MissingPathSegments)]
fn rejects_malformed_pull_request_urls(#[case] input: &str, #[case] expected: WatchError) {
    let result = PullRequestLocator::parse(input);
    assert_eq!(result, Err(expected), "unexpected result for {input}");
}

#[rstest]
fn rejects_invalid_url() {
    let result = PullRequestLocator::parse("octo/repo/pull/4");
    assert!(
        matches!(result, Err(WatchError::InvalidUrl(_))),
        "expected InvalidUrl for malformed URL, got {result:?}"
    );
}

#[rstest]
fn rejects_empty_token() {
    let result = PersonalAccessToken::new("   ");
    assert!(
        matches!(result, Err(WatchError::MissingToken)),
        "expected MissingToken, got {result:?}"
    );
}

#[rstest]
fn trims_token_whitespace() {
    let token = PersonalAccessToken::new(" ghp_example\n").expect("token should be valid");
    assert_eq!(token.value(), "ghp_example");
}

#[rstest]
fn pull_request_url_selects_single_pull_request_mode() {
    let target = WatchTarget::parse("https://github.com/octo/repo/pull/3", None)
        .expect("target should parse");
    assert!(
        matches!(target, WatchTarget::PullRequest(ref locator) if locator.number().get() == 3),
        "expected PullRequest target, got {target:?}"
    );
    assert_eq!(target.repository().full_name(), "octo/repo");
}

#[rstest]
#[case::plain("https://github.com/octo/repo")]
#[case::trailing_slash("https://github.com/octo/repo/")]
#[case::clone_url("https://github.com/octo/repo.git")]
#[case::pulls_tab("https://github.com/octo/repo/pulls")]
fn repository_urls_select_repository_mode(#[case] input: &str) {
    let target = WatchTarget::parse(input, None).expect("target should parse");
    assert!(
        matches!(target, WatchTarget::Repository(_)),
        "expected Repository target for {input}, got {target:?}"
    );
    assert_eq!(target.repository().full_name(), "octo/repo");
}

#[rstest]
fn malformed_pull_request_url_is_not_treated_as_repository() {
    let result = WatchTarget::parse("https://github.com/octo/repo/pull/abc", None);
    assert_eq!(result, Err(WatchError::InvalidPullRequestNumber));
}

#[rstest]
#[case::bare_host("https://ghe.example.com")]
#[case::trailing_slash("https://ghe.example.com/")]
fn enterprise_url_overrides_host_derived_api_base(#[case] enterprise_url: &str) {
    let target = WatchTarget::parse("https://github.com/octo/repo/pull/3", Some(enterprise_url))
        .expect("target should parse");
    assert_eq!(
        target.repository().api_base().as_str(),
        "https://ghe.example.com/api/v3"
    );
}

#[rstest]
fn blank_enterprise_url_is_ignored() {
    let target =
        WatchTarget::parse("https://github.com/octo/repo", Some("  ")).expect("target should parse");
    assert_eq!(
        target.repository().api_base().as_str(),
        "https://api.github.com/"
    );
}
