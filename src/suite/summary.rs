//! Final suite summary -- one icon line per check plus success counts.

use colored::Colorize;
use serde::Serialize;

use super::{CheckResult, CheckStatus};

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<CheckResult>,
}

impl SuiteReport {
    /// Pure function of the final tracker snapshot.
    pub fn from_snapshot(results: Vec<CheckResult>) -> Self {
        let successful = results
            .iter()
            .filter(|r| r.status == CheckStatus::Success)
            .count();
        let failed = results
            .iter()
            .filter(|r| r.status == CheckStatus::Error)
            .count();
        Self {
            total: results.len(),
            successful,
            failed,
            results,
        }
    }
}

pub fn print(report: &SuiteReport) {
    println!("\n=== Sandcheck Suite Summary ===");
    for result in &report.results {
        println!("{} {}", icon(result.status), result.name);
    }
    let counts = format!("{}/{} checks successful", report.successful, report.total);
    if report.failed == 0 {
        println!("{}", counts.green().bold());
    } else {
        println!("{}", counts.yellow().bold());
    }
    println!("===============================\n");
}

fn icon(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Success => "✅",
        CheckStatus::Error => "❌",
        CheckStatus::Running => "▶️ ",
        CheckStatus::Pending => "⏳",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, status: CheckStatus) -> CheckResult {
        CheckResult {
            name: name.to_string(),
            status,
            logs: Vec::new(),
        }
    }

    #[test]
    fn test_counts_from_snapshot() {
        let report = SuiteReport::from_snapshot(vec![
            result("a", CheckStatus::Success),
            result("b", CheckStatus::Error),
            result("c", CheckStatus::Success),
        ]);
        assert_eq!(report.total, 3);
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn test_aborted_run_counts_leave_pending_out() {
        let report = SuiteReport::from_snapshot(vec![
            result("a", CheckStatus::Success),
            result("b", CheckStatus::Pending),
        ]);
        assert_eq!(report.successful + report.failed, 1);
        assert!(report.successful + report.failed <= report.total);
    }
}
