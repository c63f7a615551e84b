//! Sequential suite runner -- one check at a time, failures contained per check.

use anyhow::Result;
use async_trait::async_trait;

use super::{shared_state, summary, CheckStatus, Recorder, SuiteReport, Tracker, GENERAL};
use crate::client::SandboxClient;

/// A named diagnostic procedure against the sandbox service.
#[async_trait]
pub trait Check: Send + Sync {
    fn name(&self) -> &'static str;

    /// Exercise one slice of the service. Any error is captured by the
    /// runner and never aborts the rest of the suite.
    async fn run(&self, ctx: &CheckContext) -> Result<()>;
}

/// Everything a check body needs: the API client and the journal handle.
/// Owned by the suite for the duration of one run.
pub struct CheckContext {
    pub api: SandboxClient,
    pub log: Recorder,
}

pub struct Suite {
    checks: Vec<Box<dyn Check>>,
    tracker: Tracker,
    recorder: Recorder,
}

impl Suite {
    pub fn new(checks: Vec<Box<dyn Check>>) -> Self {
        let (tracker, recorder) = shared_state();
        Self {
            checks,
            tracker,
            recorder,
        }
    }

    pub fn recorder(&self) -> Recorder {
        self.recorder.clone()
    }

    pub fn tracker(&self) -> Tracker {
        self.tracker.clone()
    }

    /// Abort before any check starts, for one-time setup failures (missing
    /// credentials, bad base URL). Records a single `general` error entry;
    /// every check stays `pending` in the printed summary.
    pub fn abort_setup(&self, reason: &str) -> SuiteReport {
        let names: Vec<&str> = self.checks.iter().map(|c| c.name()).collect();
        self.tracker.initialize(&names);
        self.recorder
            .error(GENERAL, &format!("setup failed: {reason}"));

        let report = SuiteReport::from_snapshot(self.tracker.snapshot());
        summary::print(&report);
        report
    }

    /// Run every check strictly in order. Each check body awaits many remote
    /// calls internally, but the next check never starts before the previous
    /// one has fully settled.
    pub async fn run(&self, api: SandboxClient) -> SuiteReport {
        let names: Vec<&str> = self.checks.iter().map(|c| c.name()).collect();
        self.tracker.initialize(&names);

        let ctx = CheckContext {
            api,
            log: self.recorder.clone(),
        };

        for check in &self.checks {
            let name = check.name();
            self.tracker.set_status(name, CheckStatus::Running);
            self.recorder.info(name, &format!("Starting {name}"));

            match check.run(&ctx).await {
                Ok(()) => {
                    self.tracker.set_status(name, CheckStatus::Success);
                    self.recorder.success(name, &format!("{name} completed"));
                }
                Err(e) => {
                    self.tracker.set_status(name, CheckStatus::Error);
                    // {:#} keeps the anyhow context chain on one line
                    self.recorder.error(name, &format!("{name} failed: {e:#}"));
                }
            }
        }

        let report = SuiteReport::from_snapshot(self.tracker.snapshot());
        summary::print(&report);
        report
    }
}
