//! Scripted collaborators for monitor tests.
//!
//! Each fake replays a queue of responses and repeats the last one once the
//! queue runs dry, so a test only scripts the cycles it cares about.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::github::{
    CheckRunGateway, CheckRunSet, CommitSha, PullRequestGateway, PullRequestLocator,
    PullRequestSnapshot, RepositoryLocator, WatchError,
};
use crate::notify::{Notification, Notifier};

struct Script<T> {
    queue: VecDeque<T>,
    last: Option<T>,
    calls: usize,
}

impl<T: Clone> Script<T> {
    fn new(responses: Vec<T>) -> Self {
        Self {
            queue: responses.into(),
            last: None,
            calls: 0,
        }
    }

    fn next(&mut self) -> Option<T> {
        self.calls += 1;
        if let Some(response) = self.queue.pop_front() {
            self.last = Some(response.clone());
        }
        self.last.clone()
    }
}

fn unscripted<T>(what: &str) -> Result<T, WatchError> {
    Err(WatchError::Api {
        message: format!("no scripted response for {what}"),
    })
}

/// Pull request gateway replaying scripted responses.
pub(super) struct ScriptedPullRequests {
    single: Mutex<Script<Result<PullRequestSnapshot, WatchError>>>,
    open: Mutex<Script<Result<Vec<PullRequestSnapshot>, WatchError>>>,
}

impl ScriptedPullRequests {
    pub(super) fn single(responses: Vec<Result<PullRequestSnapshot, WatchError>>) -> Self {
        Self {
            single: Mutex::new(Script::new(responses)),
            open: Mutex::new(Script::new(Vec::new())),
        }
    }

    pub(super) fn open(responses: Vec<Result<Vec<PullRequestSnapshot>, WatchError>>) -> Self {
        Self {
            single: Mutex::new(Script::new(Vec::new())),
            open: Mutex::new(Script::new(responses)),
        }
    }

    pub(super) fn single_calls(&self) -> usize {
        self.single.lock().expect("script lock poisoned").calls
    }
}

#[async_trait]
impl PullRequestGateway for ScriptedPullRequests {
    async fn pull_request(
        &self,
        _locator: &PullRequestLocator,
    ) -> Result<PullRequestSnapshot, WatchError> {
        let next = self.single.lock().expect("script lock poisoned").next();
        next.unwrap_or_else(|| unscripted("pull_request"))
    }

    async fn open_pull_requests(
        &self,
        _locator: &RepositoryLocator,
    ) -> Result<Vec<PullRequestSnapshot>, WatchError> {
        let next = self.open.lock().expect("script lock poisoned").next();
        next.unwrap_or_else(|| unscripted("open_pull_requests"))
    }
}

/// Check run gateway replaying scripted responses per commit.
#[derive(Default)]
pub(super) struct ScriptedCheckRuns {
    scripts: Mutex<HashMap<String, Script<Result<CheckRunSet, WatchError>>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedCheckRuns {
    pub(super) fn with(self, sha: &str, responses: Vec<Result<CheckRunSet, WatchError>>) -> Self {
        self.scripts
            .lock()
            .expect("script lock poisoned")
            .insert(sha.to_owned(), Script::new(responses));
        self
    }

    pub(super) fn calls_for(&self, sha: &str) -> usize {
        self.calls
            .lock()
            .expect("call log poisoned")
            .iter()
            .filter(|called| called.as_str() == sha)
            .count()
    }

    pub(super) fn total_calls(&self) -> usize {
        self.calls.lock().expect("call log poisoned").len()
    }
}

#[async_trait]
impl CheckRunGateway for ScriptedCheckRuns {
    async fn check_runs(
        &self,
        _locator: &RepositoryLocator,
        sha: &CommitSha,
    ) -> Result<CheckRunSet, WatchError> {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(sha.as_str().to_owned());
        let next = self
            .scripts
            .lock()
            .expect("script lock poisoned")
            .get_mut(sha.as_str())
            .and_then(Script::next);
        next.unwrap_or_else(|| unscripted(sha.as_str()))
    }
}

/// Notifier that records deliveries and can fail the first few attempts.
#[derive(Default)]
pub(super) struct RecordingNotifier {
    failures_left: Mutex<usize>,
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(super) fn failing_first(failures: usize) -> Self {
        Self {
            failures_left: Mutex::new(failures),
            sent: Mutex::default(),
        }
    }

    pub(super) fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("sent log poisoned").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), WatchError> {
        {
            let mut failures_left = self.failures_left.lock().expect("failure count poisoned");
            if *failures_left > 0 {
                *failures_left -= 1;
                return Err(WatchError::Notification {
                    message: "ntfy unavailable".to_owned(),
                });
            }
        }
        self.sent
            .lock()
            .expect("sent log poisoned")
            .push(notification.clone());
        Ok(())
    }
}
