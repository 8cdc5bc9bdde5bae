// LogTab - core/summary.rs
//
// Post-parse statistics: level frequencies and a short record preview,
// rendered as plain text for the console.

use crate::core::model::{LevelCount, LogRecord, ParseResult};
use std::collections::HashMap;
use std::fmt::Write as _;

/// Count records per level, most frequent first. Ties sort by level name.
pub fn level_counts(records: &[LogRecord]) -> Vec<LevelCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.level.as_str()).or_default() += 1;
    }

    let mut out: Vec<LevelCount> = counts
        .into_iter()
        .map(|(level, count)| LevelCount {
            level: level.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.level.cmp(&b.level)));
    out
}

/// The first `n` records.
pub fn preview(records: &[LogRecord], n: usize) -> &[LogRecord] {
    &records[..records.len().min(n)]
}

/// Render the console report printed after a log conversion.
///
/// Sections: a preview table of the first `preview_rows` records, the
/// line totals, and the level counts.
pub fn render_report(result: &ParseResult, preview_rows: usize) -> String {
    let mut out = String::new();
    let shown = preview(&result.records, preview_rows);

    if shown.is_empty() {
        out.push_str("No records parsed.\n");
    } else {
        let ts_width = column_width("Timestamp", shown.iter().map(|r| r.timestamp.as_str()));
        let level_width = column_width("Log Level", shown.iter().map(|r| r.level.as_str()));

        let _ = writeln!(
            out,
            "{:<ts_width$}  {:<level_width$}  Message",
            "Timestamp", "Log Level"
        );
        for record in shown {
            let _ = writeln!(
                out,
                "{:<ts_width$}  {:<level_width$}  {}",
                record.timestamp, record.level, record.message
            );
        }
        if result.records.len() > shown.len() {
            let _ = writeln!(out, "... {} more", result.records.len() - shown.len());
        }
    }

    let _ = writeln!(
        out,
        "\nLines read: {}, records: {}, malformed: {}",
        result.lines_processed,
        result.records.len(),
        result.malformed
    );

    let counts = level_counts(&result.records);
    if !counts.is_empty() {
        out.push_str("Number of log levels received in analysis:\n");
        let width = column_width("", counts.iter().map(|c| c.level.as_str()));
        for LevelCount { level, count } in &counts {
            let _ = writeln!(out, "  {level:<width$}  {count}");
        }
    }

    out
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(level: &str, message: &str) -> LogRecord {
        LogRecord {
            timestamp: "2024-01-01 10:00:00".to_string(),
            level: level.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_level_counts_sorted_by_frequency_then_name() {
        let records = vec![
            record("INFO", "a"),
            record("WARN", "b"),
            record("INFO", "c"),
            record("ERROR", "d"),
        ];
        let counts = level_counts(&records);
        let pairs: Vec<(&str, usize)> = counts.iter().map(|c| (c.level.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("INFO", 2), ("ERROR", 1), ("WARN", 1)]);
    }

    #[test]
    fn test_level_counts_empty() {
        assert!(level_counts(&[]).is_empty());
    }

    #[test]
    fn test_preview_caps_at_available_records() {
        let records = vec![record("INFO", "a"), record("INFO", "b")];
        assert_eq!(preview(&records, 5).len(), 2);
        assert_eq!(preview(&records, 1).len(), 1);
        assert!(preview(&records, 0).is_empty());
    }

    #[test]
    fn test_render_report_contents() {
        let result = ParseResult {
            records: (0..7).map(|i| record("INFO", &format!("msg {i}"))).collect(),
            lines_processed: 8,
            malformed: 1,
        };
        let report = render_report(&result, 5);

        assert!(report.contains("msg 0"));
        assert!(report.contains("msg 4"));
        assert!(!report.contains("msg 5"));
        assert!(report.contains("... 2 more"));
        assert!(report.contains("Lines read: 8, records: 7, malformed: 1"));
        assert!(report.contains("INFO  7"));
    }

    #[test]
    fn test_render_report_without_records() {
        let result = ParseResult {
            records: Vec::new(),
            lines_processed: 1,
            malformed: 1,
        };
        let report = render_report(&result, 5);
        assert!(report.contains("No records parsed."));
        assert!(!report.contains("Number of log levels"));
    }
}
