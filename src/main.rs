//! checkbell CLI entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use checkbell::monitor::{MonitorContext, MonitorExit, PullRequestMonitor, RepositoryMonitor};
use checkbell::{CheckbellConfig, NtfyNotifier, OctocrabGateway, WatchError, WatchTarget};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<ExitCode, WatchError> {
    let config = load_config()?;
    config.validate()?;

    let target = config.watch_target()?;
    let token = config.resolve_token()?;
    let topic = config.require_ntfy_topic()?;
    let allow_list = config.allow_list()?;

    let gateway = OctocrabGateway::for_token(&token, target.repository())?;
    let notifier = NtfyNotifier::new(&config.ntfy_server, &topic, config.retry_policy())?;
    tracing::info!(endpoint = %notifier.endpoint(), "notifications go to ntfy");

    let context = MonitorContext {
        pulls: &gateway,
        checks: &gateway,
        notifier: &notifier,
        poll_interval: config.poll_interval(),
    };

    let watch = async {
        match target {
            WatchTarget::PullRequest(locator) => {
                exit_code(&PullRequestMonitor::new(context, locator).run().await)
            }
            WatchTarget::Repository(locator) => {
                RepositoryMonitor::new(context, locator)
                    .with_allow_list(allow_list)
                    .with_initial_summary(config.initial_summary)
                    .run()
                    .await;
                ExitCode::SUCCESS
            }
        }
    };

    tokio::select! {
        code = watch => Ok(code),
        () = shutdown_signal() => {
            tracing::info!("interrupted; stopping");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`WatchError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<CheckbellConfig, WatchError> {
    CheckbellConfig::load().map_err(|error| WatchError::Configuration {
        message: error.to_string(),
    })
}

/// Resolves on Ctrl-C; never resolves when the handler cannot be installed.
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

fn exit_code(exit: &MonitorExit) -> ExitCode {
    match exit {
        MonitorExit::Closed | MonitorExit::NotFound => ExitCode::SUCCESS,
        MonitorExit::Aborted(_) => ExitCode::FAILURE,
    }
}
