//! Sandcheck -- diagnostic check suite for cloud sandbox environments.
//!
//! This crate provides an HTTP client for a cloud sandbox service plus a
//! strictly sequential check runner: each named check provisions remote
//! resources, exercises one slice of the API, and reports into a shared
//! journal. One check's failure never aborts the rest of the suite.

pub mod checks;
pub mod client;
pub mod config;
pub mod suite;

use anyhow::{bail, Result};

use client::SandboxClient;
use config::Settings;
use suite::{Suite, SuiteReport};

/// Run the registered check suite, optionally filtered to a single check.
///
/// Takes the settings resolution result rather than resolved settings, so a
/// one-time setup failure (missing API key, bad base URL) still aborts
/// through the suite: one `general` journal entry, every check left
/// `pending` in the summary. Per-check failures are contained and reported
/// in the returned [`SuiteReport`].
pub async fn run_suite(settings: Result<Settings>, only: Option<&str>) -> Result<SuiteReport> {
    let mut checks = checks::registry();
    if let Some(name) = only {
        checks.retain(|c| c.name() == name);
        if checks.is_empty() {
            bail!(
                "unknown check '{name}'; available: {}",
                checks::names().join(", ")
            );
        }
    }

    let suite = Suite::new(checks);
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            suite.abort_setup(&format!("{e:#}"));
            return Err(e);
        }
    };
    let api = match SandboxClient::new(&settings) {
        Ok(api) => api,
        Err(e) => {
            suite.abort_setup(&e.to_string());
            return Err(e.into());
        }
    };

    tracing::info!(base_url = %settings.base_url, "Running sandcheck suite");
    Ok(suite.run(api).await)
}
