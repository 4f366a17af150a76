//! Mock GitHub and ntfy endpoints plus the monitor driver for the repository
//! watch BDD tests.

use std::time::Duration;

use checkbell::github::models::test_support::{check_run_json, check_runs_json};
use checkbell::monitor::{MonitorContext, RepositoryMonitor};
use checkbell::{
    CheckbellConfig, NtfyNotifier, OctocrabGateway, PersonalAccessToken, RepositoryLocator,
    RetryPolicy, WatchError,
};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::state::SharedRuntime;

const PULLS_PATH: &str = "/api/v3/repos/owner/repo/pulls";
const NTFY_TOPIC: &str = "alerts";

/// A notification as received by the mock ntfy endpoint.
#[derive(Debug, Clone)]
pub(crate) struct SentNotification {
    pub(crate) title: String,
    pub(crate) tags: String,
    pub(crate) body: String,
}

fn check_runs_path(sha: &str) -> String {
    format!("/api/v3/repos/owner/repo/commits/{sha}/check-runs")
}

/// Serves check runs for `sha`: `first` on the first request when given,
/// `then` afterwards.
pub(crate) fn mount_check_runs(
    runtime: &SharedRuntime,
    server: &MockServer,
    sha: &str,
    first: Option<Value>,
    then: Value,
) {
    runtime.block_on(async {
        if let Some(initial) = first {
            Mock::given(method("GET"))
                .and(path(check_runs_path(sha)))
                .respond_with(ResponseTemplate::new(200).set_body_json(initial))
                .up_to_n_times(1)
                .mount(server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path(check_runs_path(sha)))
            .respond_with(ResponseTemplate::new(200).set_body_json(then))
            .mount(server)
            .await;
    });
}

/// Check run payload with every run finished; `failing` names the failures.
pub(crate) fn finished_checks(failing: Option<&str>) -> Value {
    let mut runs = vec![check_run_json("build", "completed", Some("success"))];
    if let Some(name) = failing {
        runs.push(check_run_json(name, "completed", Some("failure")));
    }
    check_runs_json(&runs)
}

/// Check run payload with one run still going.
pub(crate) fn running_checks() -> Value {
    check_runs_json(&[
        check_run_json("build", "completed", Some("success")),
        check_run_json("lint", "in_progress", None),
    ])
}

/// Notifications the mock ntfy endpoint has received so far.
pub(crate) async fn sent_notifications(server: &MockServer) -> Vec<SentNotification> {
    let header = |request: &wiremock::Request, name: &str| {
        request
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned()
    };

    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| {
            request.method.as_str() == "POST" && request.url.path() == format!("/{NTFY_TOPIC}")
        })
        .map(|request| SentNotification {
            title: header(request, "Title"),
            tags: header(request, "Tags"),
            body: String::from_utf8_lossy(&request.body).into_owned(),
        })
        .collect()
}

/// Number of check run requests made for `sha`.
pub(crate) async fn check_run_queries(server: &MockServer, sha: &str) -> usize {
    let expected = check_runs_path(sha);
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == expected)
        .count()
}

/// Serves `open_pulls`, runs `cycles` monitor cycles, and returns the running
/// total of notifications after each cycle.
///
/// # Errors
///
/// Returns configuration or locator errors raised while wiring the monitor.
pub(crate) async fn run_repository_cycles(
    server: &MockServer,
    open_pulls: Vec<Value>,
    pr_numbers: Option<String>,
    cycles: u64,
) -> Result<Vec<usize>, WatchError> {
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(open_pulls)))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/{NTFY_TOPIC}")))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;

    let config = CheckbellConfig {
        url: Some(format!("{}/owner/repo", server.uri())),
        token: Some("test-token".to_owned()),
        pr_numbers,
        ..CheckbellConfig::default()
    };
    let allow_list = config.allow_list()?;
    let locator = RepositoryLocator::parse(&config.require_target_url()?)?;
    let token = PersonalAccessToken::new("test-token")?;
    let gateway = OctocrabGateway::for_token(&token, &locator)?;
    let notifier = NtfyNotifier::new(&server.uri(), NTFY_TOPIC, RetryPolicy::new(1, Duration::ZERO))?;

    let context = MonitorContext {
        pulls: &gateway,
        checks: &gateway,
        notifier: &notifier,
        poll_interval: Duration::from_millis(1),
    };
    let mut monitor = RepositoryMonitor::new(context, locator).with_allow_list(allow_list);

    let mut sent_after_cycle = Vec::new();
    for _ in 0..cycles {
        monitor.poll_once().await;
        sent_after_cycle.push(sent_notifications(server).await.len());
    }
    Ok(sent_after_cycle)
}
