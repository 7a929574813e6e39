//! In-memory service controller.
//!
//! Mimics the parts of systemd the engine relies on: a unit is *loaded* once
//! it has been registered (by `enable --now` or [`FakeController::install`])
//! or, when the fake watches a unit directory, once its file exists there.
//! Calls against units that are not loaded fail the way `systemctl` does.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use vortex_forward::{CommandOutcome, ServiceController, ServiceId};

/// Activation and enablement of one fake unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitState {
    pub active: bool,
    pub enabled: bool,
}

impl UnitState {
    pub fn running() -> Self {
        Self {
            active: true,
            enabled: true,
        }
    }

    pub fn stopped() -> Self {
        Self {
            active: false,
            enabled: true,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    units: BTreeMap<String, UnitState>,
    calls: Vec<String>,
    failures: HashMap<String, String>,
    watch_dir: Option<PathBuf>,
}

impl Inner {
    fn is_loaded(&self, id: &ServiceId) -> bool {
        self.units.contains_key(id.as_str())
            || self
                .watch_dir
                .as_ref()
                .is_some_and(|dir| dir.join(id.as_str()).is_file())
    }

    fn injected(&self, call: &str) -> Option<CommandOutcome> {
        self.failures.get(call).map(CommandOutcome::failed)
    }
}

/// Cloneable handle to a shared fake controller.
///
/// Clones share state, so a test can hand one clone to the engine and keep
/// another for assertions.
#[derive(Debug, Clone, Default)]
pub struct FakeController {
    inner: Arc<Mutex<Inner>>,
}

impl FakeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat unit files present in `dir` as loaded.
    pub fn watching(dir: impl Into<PathBuf>) -> Self {
        let fake = Self::new();
        fake.lock().watch_dir = Some(dir.into());
        fake
    }

    /// Register `id` as loaded with the given state.
    pub fn install(&self, id: &ServiceId, state: UnitState) {
        self.lock().units.insert(id.as_str().to_string(), state);
    }

    /// Make the call rendered as `call` (e.g. `"start vortexl2-fwd-80.service"`)
    /// fail with `output`.
    pub fn fail_on(&self, call: impl Into<String>, output: impl Into<String>) {
        self.lock().failures.insert(call.into(), output.into());
    }

    /// Current state of `id`, `None` if never registered.
    pub fn state(&self, id: &ServiceId) -> Option<UnitState> {
        self.lock().units.get(id.as_str()).copied()
    }

    /// Every call made so far, rendered as `systemctl` argument strings.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Calls that mention `id`.
    pub fn calls_for(&self, id: &ServiceId) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.ends_with(id.as_str()))
            .collect()
    }

    pub fn reload_count(&self) -> usize {
        self.calls().iter().filter(|c| *c == "daemon-reload").count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking test thread must not hide the state from the others.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn unit_call<F>(&self, verb: &str, id: &ServiceId, apply: F) -> CommandOutcome
    where
        F: FnOnce(&mut UnitState) -> CommandOutcome,
    {
        let call = format!("{} {}", verb, id);
        let mut inner = self.lock();
        inner.calls.push(call.clone());

        if let Some(outcome) = inner.injected(&call) {
            return outcome;
        }
        if !inner.is_loaded(id) {
            return CommandOutcome::failed(format!("Unit {} not loaded.", id));
        }

        let state = inner.units.entry(id.as_str().to_string()).or_default();
        apply(state)
    }
}

impl ServiceController for FakeController {
    fn reload(&self) -> CommandOutcome {
        let mut inner = self.lock();
        inner.calls.push("daemon-reload".to_string());
        inner
            .injected("daemon-reload")
            .unwrap_or_else(|| CommandOutcome::ok(""))
    }

    fn enable_now(&self, id: &ServiceId) -> CommandOutcome {
        let call = format!("enable --now {}", id);
        let mut inner = self.lock();
        inner.calls.push(call.clone());

        if let Some(outcome) = inner.injected(&call) {
            return outcome;
        }
        inner
            .units
            .insert(id.as_str().to_string(), UnitState::running());
        CommandOutcome::ok("")
    }

    fn start(&self, id: &ServiceId) -> CommandOutcome {
        self.unit_call("start", id, |state| {
            state.active = true;
            CommandOutcome::ok("")
        })
    }

    fn stop(&self, id: &ServiceId) -> CommandOutcome {
        self.unit_call("stop", id, |state| {
            state.active = false;
            CommandOutcome::ok("")
        })
    }

    fn restart(&self, id: &ServiceId) -> CommandOutcome {
        self.unit_call("restart", id, |state| {
            state.active = true;
            CommandOutcome::ok("")
        })
    }

    fn disable(&self, id: &ServiceId) -> CommandOutcome {
        self.unit_call("disable", id, |state| {
            state.enabled = false;
            CommandOutcome::ok("")
        })
    }

    fn is_active(&self, id: &ServiceId) -> CommandOutcome {
        self.unit_call("is-active", id, |state| {
            if state.active {
                CommandOutcome::ok("active")
            } else {
                CommandOutcome::failed("inactive")
            }
        })
    }

    fn is_enabled(&self, id: &ServiceId) -> CommandOutcome {
        self.unit_call("is-enabled", id, |state| {
            if state.enabled {
                CommandOutcome::ok("enabled")
            } else {
                CommandOutcome::failed("disabled")
            }
        })
    }
}
