//! Scenario state and runtime/server initialisation for the repository watch
//! BDD tests.

use std::cell::RefCell;
use std::rc::Rc;

use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::Value;
use tokio::runtime::Runtime;
use wiremock::MockServer;

use super::harness::SentNotification;

/// Shared runtime wrapper that can be stored in rstest-bdd Slot.
#[derive(Clone)]
pub(crate) struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    pub(crate) fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub(crate) fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

#[derive(ScenarioState, Default)]
pub(crate) struct WatchState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) open_pulls: Slot<Vec<Value>>,
    pub(crate) pr_numbers: Slot<String>,
    pub(crate) sent_after_cycle: Slot<Vec<usize>>,
    pub(crate) sent: Slot<Vec<SentNotification>>,
}

/// Ensures the runtime and server are initialised in `WatchState`.
pub(crate) fn ensure_runtime_and_server(watch_state: &WatchState) -> SharedRuntime {
    if watch_state.runtime.with_ref(|_| ()).is_none() {
        let runtime = Runtime::new()
            .unwrap_or_else(|error| panic!("failed to create Tokio runtime: {error}"));
        watch_state.runtime.set(SharedRuntime::new(runtime));
    }

    let shared_runtime = watch_state
        .runtime
        .get()
        .unwrap_or_else(|| panic!("runtime not initialised after set"));

    if watch_state.server.with_ref(|_| ()).is_none() {
        watch_state
            .server
            .set(shared_runtime.block_on(MockServer::start()));
    }

    shared_runtime
}
