//! Suite runner behavior -- failure isolation, status transitions, journal
//! ordering, and summary counts, using local fake checks (no network).

use anyhow::{bail, Result};
use async_trait::async_trait;

use sandcheck::client::SandboxClient;
use sandcheck::config::Settings;
use sandcheck::suite::{Check, CheckContext, CheckStatus, LogLevel, Suite, GENERAL};

/// Client pointing at a closed port; the fake checks never call it.
fn offline_client() -> SandboxClient {
    let settings = Settings {
        api_key: "test-key".to_string(),
        base_url: "http://127.0.0.1:9".to_string(),
        target: None,
    };
    SandboxClient::new(&settings).expect("client construction is local")
}

struct PassingCheck(&'static str);

#[async_trait]
impl Check for PassingCheck {
    fn name(&self) -> &'static str {
        self.0
    }

    async fn run(&self, ctx: &CheckContext) -> Result<()> {
        ctx.log.info(self.0, "doing work");
        Ok(())
    }
}

struct FailingCheck(&'static str);

#[async_trait]
impl Check for FailingCheck {
    fn name(&self) -> &'static str {
        self.0
    }

    async fn run(&self, ctx: &CheckContext) -> Result<()> {
        ctx.log.info(self.0, "about to explode");
        bail!("simulated remote failure")
    }
}

#[tokio::test]
async fn test_failure_does_not_abort_remaining_checks() {
    let suite = Suite::new(vec![
        Box::new(PassingCheck("A")),
        Box::new(FailingCheck("B")),
        Box::new(PassingCheck("C")),
    ]);
    let report = suite.run(offline_client()).await;

    assert_eq!(report.total, 3);
    assert_eq!(report.successful, 2);
    assert_eq!(report.failed, 1);

    let statuses: Vec<_> = report.results.iter().map(|r| (r.name.as_str(), r.status)).collect();
    assert_eq!(
        statuses,
        vec![
            ("A", CheckStatus::Success),
            ("B", CheckStatus::Error),
            ("C", CheckStatus::Success),
        ]
    );
}

#[tokio::test]
async fn test_status_brackets_check_logs() {
    let suite = Suite::new(vec![Box::new(PassingCheck("solo"))]);
    let report = suite.run(offline_client()).await;

    let logs = &report.results[0].logs;
    // Runner logs "Starting" before the body and the outcome after it.
    assert!(logs.first().expect("has logs").message.contains("Starting solo"));
    assert!(logs.last().expect("has logs").message.contains("solo completed"));
    assert!(logs.iter().any(|e| e.message == "doing work"));
}

#[tokio::test]
async fn test_failure_detail_reaches_journal() {
    let suite = Suite::new(vec![Box::new(FailingCheck("broken"))]);
    let report = suite.run(offline_client()).await;

    let logs = &report.results[0].logs;
    assert!(logs
        .last()
        .expect("has logs")
        .message
        .contains("simulated remote failure"));
}

#[tokio::test]
async fn test_global_journal_preserves_emission_order() {
    let suite = Suite::new(vec![
        Box::new(PassingCheck("first")),
        Box::new(PassingCheck("second")),
    ]);
    let recorder = suite.recorder();
    suite.run(offline_client()).await;

    let entries = recorder.entries();
    let first_pos = entries
        .iter()
        .position(|e| e.message.contains("Starting first"))
        .expect("first start logged");
    let second_pos = entries
        .iter()
        .position(|e| e.message.contains("Starting second"))
        .expect("second start logged");
    assert!(first_pos < second_pos);
    // "first" fully settles before "second" begins.
    let first_done = entries
        .iter()
        .position(|e| e.message.contains("first completed"))
        .expect("first completion logged");
    assert!(first_done < second_pos);
}

#[tokio::test]
async fn test_setup_failure_records_general_entry_and_runs_nothing() {
    let suite = Suite::new(vec![
        Box::new(PassingCheck("A")),
        Box::new(PassingCheck("B")),
    ]);
    let recorder = suite.recorder();
    let report = suite.abort_setup("SANDCHECK_API_KEY is not set");

    // Exactly one journal entry, at error level, under the general category.
    let entries = recorder.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].category, GENERAL);
    assert_eq!(entries[0].level, LogLevel::Error);
    assert!(entries[0].message.contains("SANDCHECK_API_KEY"));

    // No check ever reached running: all still pending, nothing counted.
    assert_eq!(report.total, 2);
    assert!(report
        .results
        .iter()
        .all(|r| r.status == CheckStatus::Pending));
    assert_eq!(report.successful + report.failed, 0);
    assert!(report.results.iter().all(|r| r.logs.is_empty()));
}

#[tokio::test]
async fn test_missing_api_key_aborts_before_any_check() {
    let err = sandcheck::run_suite(
        Err(anyhow::anyhow!("SANDCHECK_API_KEY is not set")),
        None,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("SANDCHECK_API_KEY"));
}

#[tokio::test]
async fn test_empty_api_key_is_a_setup_error() {
    let settings = Settings {
        api_key: String::new(),
        base_url: "http://127.0.0.1:9".to_string(),
        target: None,
    };
    let err = sandcheck::run_suite(Ok(settings), None).await.unwrap_err();
    assert!(err.to_string().contains("configuration error"));
}

#[tokio::test]
async fn test_unknown_only_filter_is_a_setup_error() {
    let settings = Settings {
        api_key: "test-key".to_string(),
        base_url: "http://127.0.0.1:9".to_string(),
        target: None,
    };
    let err = sandcheck::run_suite(Ok(settings), Some("no-such-check"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unknown check"));
}
