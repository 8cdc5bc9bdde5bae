// LogTab - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no platform
// dependencies.
//
// These types are the shared vocabulary across all layers.

use serde::{Deserialize, Serialize};

// =============================================================================
// Log Record (output of line parsing)
// =============================================================================

/// A single parsed log line.
///
/// Only ever built from a line that matched the full
/// `[timestamp] [level] - message` shape; there are no partially filled
/// records. Field names serialise to the CSV column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Verbatim contents of the first bracketed segment. Not parsed as a date.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,

    /// Contents of the second bracketed segment, upper-cased.
    #[serde(rename = "Log Level")]
    pub level: String,

    /// Everything after the first ` - ` separator, unmodified.
    #[serde(rename = "Message")]
    pub message: String,
}

// =============================================================================
// NoMatch
// =============================================================================

/// Outcome for a line that does not have the structural prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoMatch {
    /// The original line, exactly as read.
    pub line: String,
}

impl NoMatch {
    /// The line with trailing whitespace stripped, for diagnostic display.
    pub fn display_text(&self) -> &str {
        self.line.trim_end()
    }
}

impl std::fmt::Display for NoMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_text())
    }
}

/// A malformed line as retained by a collecting diagnostic sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number in the source file.
    pub line_number: u64,

    /// Display text of the line (trailing whitespace stripped).
    pub text: String,
}

// =============================================================================
// Parse result
// =============================================================================

/// Result of scanning one log file.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Successfully parsed records, in file order.
    pub records: Vec<LogRecord>,

    /// Total lines read, matched or not.
    pub lines_processed: u64,

    /// Lines reported to the diagnostic sink.
    pub malformed: u64,
}

// =============================================================================
// Table (output of HTML extraction, input of table export)
// =============================================================================

/// An ordered set of named columns with ordered rows.
///
/// Every row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Level counts
// =============================================================================

/// Number of records carrying one level value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCount {
    pub level: String,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_display_strips_trailing_whitespace_only() {
        let nm = NoMatch {
            line: "  not a log line \t ".to_string(),
        };
        assert_eq!(nm.display_text(), "  not a log line");
        assert_eq!(nm.to_string(), "  not a log line");
        assert_eq!(nm.line, "  not a log line \t ");
    }

    #[test]
    fn test_table_len_counts_data_rows() {
        let table = Table {
            columns: vec!["a".to_string()],
            rows: vec![vec!["1".to_string()], vec!["2".to_string()]],
        };
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
        assert!(Table::default().is_empty());
    }
}
