// LogTab - core/export.rs
//
// CSV export of parsed log records and extracted tables.
// Core layer: writes to any Write trait object. Quoting follows RFC 4180
// via the csv crate; no index column is written.

use crate::core::model::{LogRecord, Table};
use crate::util::constants::LOG_CSV_HEADERS;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export log records to CSV.
///
/// Writes: Timestamp, Log Level, Message. The header is written even when
/// `records` is empty. Returns the number of data rows written.
pub fn export_records_csv<W: Write>(
    records: &[LogRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(LOG_CSV_HEADERS).map_err(csv_err)?;

    for record in records {
        csv_writer
            .write_record([&record.timestamp, &record.level, &record.message])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(records.len())
}

/// Export a table to CSV, header row first.
///
/// Returns the number of data rows written.
pub fn export_table_csv<W: Write>(
    table: &Table,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    // Rows are rectangular by construction, but a hand-built table may not be.
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    csv_writer.write_record(&table.columns).map_err(csv_err)?;

    for row in &table.rows {
        csv_writer.write_record(row).map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(table.rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(timestamp: &str, level: &str, message: &str) -> LogRecord {
        LogRecord {
            timestamp: timestamp.to_string(),
            level: level.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_csv_export() {
        let records = vec![
            record("2024-01-01 10:00:00", "INFO", "Service started"),
            record("2024-01-01 10:00:05", "ERROR", "Disk full"),
        ];
        let mut buf = Vec::new();
        let count = export_records_csv(&records, &mut buf, &PathBuf::from("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        assert_eq!(
            output,
            "Timestamp,Log Level,Message\n\
             2024-01-01 10:00:00,INFO,Service started\n\
             2024-01-01 10:00:05,ERROR,Disk full\n"
        );
    }

    #[test]
    fn test_csv_export_empty_still_writes_header() {
        let mut buf = Vec::new();
        let count = export_records_csv(&[], &mut buf, &PathBuf::from("out.csv")).unwrap();
        assert_eq!(count, 0);
        assert_eq!(String::from_utf8(buf).unwrap(), "Timestamp,Log Level,Message\n");
    }

    #[test]
    fn test_csv_round_trip_preserves_commas_and_quotes() {
        let records = vec![
            record("t1", "WARN", "retry, attempt 2"),
            record("t2", "INFO", "said \"hello\""),
            record("t,3", "DEBUG", "  padded  "),
        ];
        let mut buf = Vec::new();
        export_records_csv(&records, &mut buf, &PathBuf::from("out.csv")).unwrap();

        let mut reader = csv::Reader::from_reader(buf.as_slice());
        let read_back: Vec<LogRecord> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(read_back, records);
    }

    #[test]
    fn test_table_export() {
        let table = Table {
            columns: vec!["Name".to_string(), "Note".to_string()],
            rows: vec![
                vec!["Alice".to_string(), "a, b".to_string()],
                vec!["Bob".to_string(), String::new()],
            ],
        };
        let mut buf = Vec::new();
        let count = export_table_csv(&table, &mut buf, &PathBuf::from("out.csv")).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Name,Note\nAlice,\"a, b\"\nBob,\n"
        );
    }
}
