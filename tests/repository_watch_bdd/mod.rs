//! Support code for the repository watch behavioural tests.

mod harness;
mod state;

pub(crate) use harness::{
    SentNotification, check_run_queries, finished_checks, mount_check_runs,
    run_repository_cycles, running_checks, sent_notifications,
};
pub(crate) use state::{WatchState, ensure_runtime_and_server};
