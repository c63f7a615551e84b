//! Run journal -- leveled, categorized entries mirrored to a colored console sink.

use chrono::Local;
use colored::Colorize;
use serde::Serialize;
use std::sync::{Arc, Mutex};

use super::SuiteState;

/// Category for entries that belong to no particular check.
pub const GENERAL: &str = "general";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Error,
    Warning,
}

/// Immutable journal entry. Appended once, never mutated or removed.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: String,
    pub category: String,
}

/// Cloneable writing handle over the shared suite state.
///
/// `record` captures a timestamp, appends to the global journal, routes a
/// copy into the matching check's logs, and prints one colored line. It
/// cannot fail.
#[derive(Clone)]
pub struct Recorder {
    state: Arc<Mutex<SuiteState>>,
}

impl Recorder {
    pub(super) fn new(state: Arc<Mutex<SuiteState>>) -> Self {
        Self { state }
    }

    pub fn record(&self, message: &str, level: LogLevel, category: &str) {
        let entry = LogEntry {
            level,
            message: message.to_string(),
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            category: category.to_string(),
        };
        print_entry(&entry);
        self.state.lock().expect("suite state poisoned").append(entry);
    }

    pub fn info(&self, category: &str, message: &str) {
        self.record(message, LogLevel::Info, category);
    }

    pub fn success(&self, category: &str, message: &str) {
        self.record(message, LogLevel::Success, category);
    }

    pub fn error(&self, category: &str, message: &str) {
        self.record(message, LogLevel::Error, category);
    }

    pub fn warning(&self, category: &str, message: &str) {
        self.record(message, LogLevel::Warning, category);
    }

    /// Clone of the global journal, in emission order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.state
            .lock()
            .expect("suite state poisoned")
            .entries
            .clone()
    }
}

fn print_entry(entry: &LogEntry) {
    let line = format!("[{}] [{}] {}", entry.timestamp, entry.category, entry.message);
    match entry.level {
        LogLevel::Info => println!("{}", line.cyan()),
        LogLevel::Success => println!("{}", line.green()),
        LogLevel::Warning => println!("{}", line.yellow()),
        LogLevel::Error => eprintln!("{}", line.red().bold()),
    }
}
