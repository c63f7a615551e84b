//! Suite state -- check results, status tracking, and the shared run journal.

pub mod journal;
pub mod runner;
pub mod summary;

pub use journal::{LogEntry, LogLevel, Recorder, GENERAL};
pub use runner::{Check, CheckContext, Suite};
pub use summary::SuiteReport;

use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Lifecycle of a single check within one suite run.
/// `Pending -> Running -> {Success, Error}`; terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pending,
    Running,
    Success,
    Error,
}

impl CheckStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckStatus::Success | CheckStatus::Error)
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Pending => write!(f, "pending"),
            CheckStatus::Running => write!(f, "running"),
            CheckStatus::Success => write!(f, "success"),
            CheckStatus::Error => write!(f, "error"),
        }
    }
}

/// Result record for one named check: current status plus the journal
/// entries that were emitted under this check's category.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub logs: Vec<LogEntry>,
}

/// Shared run state: the append-only global journal and the per-check
/// results. Single writer (the runner and its recorder); readers only ever
/// see cloned snapshots, so a live view never observes a partial write.
#[derive(Debug, Default)]
pub struct SuiteState {
    entries: Vec<LogEntry>,
    results: Vec<CheckResult>,
}

impl SuiteState {
    /// Append to the global journal and route a copy into the matching
    /// check's logs, if one is tracked under the entry's category.
    fn append(&mut self, entry: LogEntry) {
        if let Some(result) = self.results.iter_mut().find(|r| r.name == entry.category) {
            result.logs.push(entry.clone());
        }
        self.entries.push(entry);
    }

    fn initialize(&mut self, names: &[&str]) {
        self.entries.clear();
        self.results = names
            .iter()
            .map(|name| CheckResult {
                name: (*name).to_string(),
                status: CheckStatus::Pending,
                logs: Vec::new(),
            })
            .collect();
    }

    fn set_status(&mut self, name: &str, status: CheckStatus) {
        match self.results.iter_mut().find(|r| r.name == name) {
            Some(result) => {
                if result.status.is_terminal() {
                    tracing::warn!(%name, current = %result.status, requested = %status,
                        "ignoring status update for finished check");
                    return;
                }
                result.status = status;
            }
            // Contract violation by the caller, not a runtime error.
            None => tracing::warn!(%name, "status update for untracked check"),
        }
    }

    fn snapshot(&self) -> Vec<CheckResult> {
        self.results.clone()
    }
}

/// Handle for status bookkeeping over the shared suite state.
#[derive(Clone)]
pub struct Tracker {
    state: Arc<Mutex<SuiteState>>,
}

impl Tracker {
    /// Replace the tracked set with one `pending` result per name, in order.
    /// Clears any prior run.
    pub fn initialize(&self, names: &[&str]) {
        self.state.lock().expect("suite state poisoned").initialize(names);
    }

    pub fn set_status(&self, name: &str, status: CheckStatus) {
        self.state
            .lock()
            .expect("suite state poisoned")
            .set_status(name, status);
    }

    /// Ordered clone of the current results, safe to hold across awaits.
    pub fn snapshot(&self) -> Vec<CheckResult> {
        self.state.lock().expect("suite state poisoned").snapshot()
    }
}

/// Create a fresh suite state and the two handles over it.
pub fn shared_state() -> (Tracker, Recorder) {
    let state = Arc::new(Mutex::new(SuiteState::default()));
    (
        Tracker {
            state: Arc::clone(&state),
        },
        Recorder::new(state),
    )
}
