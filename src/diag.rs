//! Per-invocation diagnostic log.
//!
//! Every fallible step of an extraction appends a human-readable line here
//! instead of raising past its local boundary. The log is created fresh for
//! each invocation and surfaced verbatim to the caller as the trailing
//! `extraction_log` result section — concurrent invocations never share one.

use tracing::warn;

/// Append-only ordered record of recoverable anomalies.
#[derive(Debug, Default)]
pub struct ParseLog {
    lines: Vec<String>,
}

impl ParseLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic line. Also mirrored to `tracing` at warn level.
    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        warn!("{line}");
        self.lines.push(line);
    }

    /// Whether any diagnostic has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Iterate over the recorded lines in append order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Consume the log, yielding the lines in append order.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
