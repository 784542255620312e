use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Debug verbosity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Trace = 4,
    Verbose = 5,
}

impl Default for DebugLevel {
    fn default() -> Self {
        #[cfg(feature = "debug")]
        {
            DebugLevel::Trace
        }
        #[cfg(not(feature = "debug"))]
        {
            DebugLevel::Off
        }
    }
}

const LEVEL_NAMES: [(DebugLevel, &str); 6] = [
    (DebugLevel::Off, "off"),
    (DebugLevel::Error, "error"),
    (DebugLevel::Warn, "warn"),
    (DebugLevel::Info, "info"),
    (DebugLevel::Trace, "trace"),
    (DebugLevel::Verbose, "verbose"),
];

impl std::fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = LEVEL_NAMES.iter().find(|(level, _)| level == self).map_or("off", |(_, name)| *name);
        f.write_str(name)
    }
}

/// Accepts a level name or its number; `warning` is an alias for `warn`.
impl std::str::FromStr for DebugLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = match s.trim().to_lowercase().as_str() {
            "warning" => "warn".to_string(),
            other => other.to_string(),
        };
        LEVEL_NAMES
            .iter()
            .find(|(level, name)| *name == wanted || (*level as u8).to_string() == wanted)
            .map(|(level, _)| *level)
            .ok_or_else(|| format!("Invalid debug level: {}", s))
    }
}

/// A single log entry recorded while migrating one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugEntry {
    pub level: DebugLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

/// Log sink for one transform invocation.
///
/// Clones share the same buffer, so a context handed to the suggestion
/// engine writes into the same session as the orchestrator.
#[derive(Clone)]
pub struct DebugContext {
    level: DebugLevel,
    logs: Arc<Mutex<Vec<DebugEntry>>>,
}

impl DebugContext {
    pub fn new(level: DebugLevel) -> Self {
        Self {
            level,
            logs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn level(&self) -> DebugLevel {
        self.level
    }

    pub fn enabled(&self, level: DebugLevel) -> bool {
        level != DebugLevel::Off && level <= self.level
    }

    pub fn log(&self, entry_level: DebugLevel, message: impl Into<String>) {
        self.log_at(entry_level, message, None, None);
    }

    fn log_at(&self, entry_level: DebugLevel, message: impl Into<String>, line: Option<usize>, column: Option<usize>) {
        if !self.enabled(entry_level) {
            return;
        }
        let entry = DebugEntry {
            level: entry_level,
            message: message.into(),
            line,
            column,
        };

        if let Ok(mut logs) = self.logs.lock() {
            logs.push(entry);
        }
    }

    /// Log against a byte offset in `source`, reported as a 1-based line and column.
    pub fn log_at_offset(&self, entry_level: DebugLevel, message: impl Into<String>, source: &str, offset: usize) {
        if !self.enabled(entry_level) {
            return;
        }
        let (line, column) = line_column(source, offset);
        self.log_at(entry_level, message, Some(line), Some(column));
    }

    pub fn warn(&self, msg: impl Into<String>) {
        self.log(DebugLevel::Warn, msg);
    }

    pub fn info(&self, msg: impl Into<String>) {
        self.log(DebugLevel::Info, msg);
    }

    pub fn trace(&self, msg: impl Into<String>) {
        self.log(DebugLevel::Trace, msg);
    }

    pub fn get_logs(&self) -> Vec<DebugEntry> {
        self.logs.lock()
            .map(|logs| logs.clone())
            .unwrap_or_default()
    }
}

impl Default for DebugContext {
    fn default() -> Self {
        Self::new(DebugLevel::default())
    }
}

fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.as_bytes()[..offset].iter();
    let mut line = 1;
    let mut column = 1;
    for &b in before {
        if b == b'\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_level_ordering() {
        assert!(DebugLevel::Off < DebugLevel::Error);
        assert!(DebugLevel::Error < DebugLevel::Warn);
        assert!(DebugLevel::Trace < DebugLevel::Verbose);
    }

    #[test]
    fn test_debug_level_from_str() {
        assert_eq!("trace".parse::<DebugLevel>().unwrap(), DebugLevel::Trace);
        assert_eq!("Off".parse::<DebugLevel>().unwrap(), DebugLevel::Off);
        assert_eq!("5".parse::<DebugLevel>().unwrap(), DebugLevel::Verbose);
        assert_eq!(" Warning ".parse::<DebugLevel>().unwrap(), DebugLevel::Warn);
        assert_eq!(DebugLevel::Trace.to_string(), "trace");
        assert!("loud".parse::<DebugLevel>().is_err());
    }

    #[test]
    fn test_debug_context_filtering() {
        let ctx = DebugContext::new(DebugLevel::Warn);
        ctx.trace("should not be logged");
        ctx.warn("should be logged");
        ctx.log(DebugLevel::Error, "should be logged");

        let logs = ctx.get_logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].level, DebugLevel::Warn);
        assert_eq!(logs[1].level, DebugLevel::Error);
    }

    #[test]
    fn test_off_records_nothing() {
        let ctx = DebugContext::new(DebugLevel::Off);
        ctx.warn("dropped");
        assert!(ctx.get_logs().is_empty());
    }

    #[test]
    fn test_log_at_offset_reports_line_and_column() {
        let ctx = DebugContext::new(DebugLevel::Trace);
        let source = "line one\n  <div className=\"flex\">";
        let offset = source.find("div").unwrap();
        ctx.log_at_offset(DebugLevel::Warn, "unmatched <div>", source, offset);

        let logs = ctx.get_logs();
        assert_eq!(logs[0].line, Some(2));
        assert_eq!(logs[0].column, Some(4));
        assert_eq!(logs[0].message, "unmatched <div>");
    }

    #[test]
    fn test_clones_share_buffer() {
        let ctx = DebugContext::new(DebugLevel::Info);
        let other = ctx.clone();
        other.info("from clone");
        assert_eq!(ctx.get_logs().len(), 1);
    }
}
