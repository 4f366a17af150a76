//! Builders for pull request and check run fixtures.
//!
//! The domain builders serve unit tests; the `*_json` builders produce GitHub
//! REST payloads for tests that serve responses from a mock server.
//!
//! # Examples
//!
//! ```
//! use checkbell::github::models::test_support::{check_run, open_pull_request};
//!
//! let snapshot = open_pull_request(1, "Add parser", "a1");
//! assert_eq!(snapshot.head_sha.as_str(), "a1");
//!
//! let run = check_run("build", "completed", Some("success"));
//! assert!(run.is_completed());
//! ```

use serde_json::{Value, json};

use super::{
    CheckConclusion, CheckRun, CheckRunSet, CheckRunStatus, CommitSha, PullRequestSnapshot,
    PullRequestState,
};
use crate::github::locator::PullRequestNumber;

/// Constructs an open pull request snapshot.
///
/// # Panics
///
/// Panics when `number` is zero.
#[must_use]
pub fn open_pull_request(number: u64, title: &str, sha: &str) -> PullRequestSnapshot {
    PullRequestSnapshot {
        number: PullRequestNumber::new(number)
            .unwrap_or_else(|error| panic!("fixture number {number} is invalid: {error}")),
        title: title.to_owned(),
        head_sha: CommitSha::new(sha),
        state: PullRequestState::Open,
    }
}

/// Constructs a check run from GitHub's string vocabulary.
#[must_use]
pub fn check_run(name: &str, status: &str, conclusion: Option<&str>) -> CheckRun {
    CheckRun {
        name: name.to_owned(),
        status: CheckRunStatus::from_api(status),
        conclusion: conclusion.map(CheckConclusion::from_api),
    }
}

/// Wraps runs into a complete check run set.
#[must_use]
pub fn check_run_set(runs: Vec<CheckRun>) -> CheckRunSet {
    CheckRunSet {
        total_count: u64::try_from(runs.len()).unwrap_or(u64::MAX),
        runs,
    }
}

/// REST payload for one pull request.
#[must_use]
pub fn pull_request_json(number: u64, title: &str, sha: &str, state: &str) -> Value {
    json!({
        "number": number,
        "title": title,
        "state": state,
        "head": { "sha": sha },
        "user": { "login": "octocat" }
    })
}

/// REST payload for one check run.
#[must_use]
pub fn check_run_json(name: &str, status: &str, conclusion: Option<&str>) -> Value {
    json!({
        "name": name,
        "status": status,
        "conclusion": conclusion
    })
}

/// REST payload for a check run listing whose total matches its runs.
#[must_use]
pub fn check_runs_json(runs: &[Value]) -> Value {
    json!({
        "total_count": runs.len(),
        "check_runs": runs
    })
}
