//! Structured logging for detection verdicts.
//!
//! Optional, file-backed, line-oriented. Each analyzed input can produce one
//! entry in text or JSON format, filtered by verdict kind. Inputs are
//! truncated to a configurable length before they reach the log.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::detector::Verdict;

// ============================================================================
// Configuration Types
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether verdict logging is enabled.
    pub enabled: bool,
    /// Path to log file. Supports ~ expansion.
    pub file: Option<String>,
    /// Output format: "text" or "json".
    pub format: LogFormat,
    /// Which verdicts to log.
    pub events: LogEventFilter,
    /// Inputs longer than this many characters are truncated in the log.
    pub max_input_len: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            file: None,
            format: LogFormat::Text,
            events: LogEventFilter::default(),
            max_input_len: 200,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Filter for which verdicts to log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogEventFilter {
    /// Log inputs that matched at least one signature.
    pub suspicious: bool,
    /// Log inputs that matched nothing.
    pub clean: bool,
}

impl Default for LogEventFilter {
    fn default() -> Self {
        Self {
            suspicious: true,
            clean: false,
        }
    }
}

// ============================================================================
// Log Entry
// ============================================================================

/// A structured log entry for one analyzed input.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub verdict: String,
    pub input: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<&'static str>,
}

impl LogEntry {
    /// Build an entry from a verdict, truncating the input.
    #[must_use]
    pub fn from_verdict(verdict: &Verdict, input: &str, max_input_len: usize) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            verdict: if verdict.suspicious {
                "suspicious".to_string()
            } else {
                "clean".to_string()
            },
            input: truncate_input(input, max_input_len),
            signatures: verdict.signature_names(),
        }
    }

    /// Format as a text log line.
    #[must_use]
    pub fn format_text(&self) -> String {
        let mut parts = Vec::with_capacity(4);
        parts.push(format!("[{}]", self.timestamp));
        parts.push(self.verdict.to_uppercase());
        parts.push(format!("\"{}\"", self.input));
        if !self.signatures.is_empty() {
            parts.push(format!("-- {}", self.signatures.join(",")));
        }
        parts.join(" ")
    }

    /// Format as a JSON line.
    #[must_use]
    pub fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// ============================================================================
// Logger
// ============================================================================

/// A file-backed logger for detection verdicts.
pub struct DecisionLogger {
    config: LoggingConfig,
    writer: Option<Mutex<BufWriter<File>>>,
}

impl DecisionLogger {
    /// Create a logger from configuration. Returns `None` when logging is
    /// disabled.
    #[must_use]
    pub fn new(config: &LoggingConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let writer = config.file.as_ref().and_then(|path| {
            let expanded = expand_tilde(path);
            open_log_file(&expanded)
                .ok()
                .map(|f| Mutex::new(BufWriter::new(f)))
        });
        Some(Self {
            config: config.clone(),
            writer,
        })
    }

    /// Log a verdict for an input.
    pub fn log(&self, verdict: &Verdict, input: &str) {
        if !self.should_log(verdict) {
            return;
        }
        let entry = LogEntry::from_verdict(verdict, input, self.config.max_input_len);
        let line = match self.config.format {
            LogFormat::Text => entry.format_text(),
            LogFormat::Json => entry.format_json(),
        };
        if let Some(ref writer) = self.writer {
            if let Ok(mut w) = writer.lock() {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    const fn should_log(&self, verdict: &Verdict) -> bool {
        if verdict.suspicious {
            self.config.events.suspicious
        } else {
            self.config.events.clean
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}{}", home.to_string_lossy(), &path[1..]);
        }
    }
    path.to_string()
}

fn open_log_file(path: &str) -> std::io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn truncate_input(input: &str, max_chars: usize) -> String {
    let mut iter = input.char_indices();
    match iter.nth(max_chars) {
        Some((idx, _)) => format!("{}...", &input[..idx]),
        None => input.to_string(),
    }
}
