// LogTab - app/convert.rs
//
// Conversion pipeline. Picks the mode from the input file extension, runs
// the log scanner or the HTML table extractor, and writes the CSV output
// atomically.
//
// Failure policy:
//   - Malformed log lines go to the diagnostic sink; the run continues.
//   - Unreadable input, a document without tables, or a failed write abort
//     the run before any output file appears.
//   - An unsupported extension is an outcome, not an error; nothing is read
//     or written.

use crate::core::export;
use crate::core::model::ParseResult;
use crate::core::parser::{self, DiagnosticSink, LogLineParser};
use crate::core::table;
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::{Result, TableError};
use std::path::{Path, PathBuf};

// =============================================================================
// Input kind
// =============================================================================

/// Conversion mode, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Bracketed application log.
    Log,
    /// HTML document containing a table.
    Html,
}

impl InputKind {
    /// Classify `path` by extension (ASCII case-insensitive).
    /// Returns `None` for anything that is neither a log nor an HTML file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if constants::LOG_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Log)
        } else if constants::HTML_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Html)
        } else {
            None
        }
    }

    /// Configured CSV file name for this mode.
    pub fn output_file_name(self, config: &AppConfig) -> &str {
        match self {
            Self::Log => &config.log_file_name,
            Self::Html => &config.html_file_name,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Html => "html",
        }
    }
}

/// Resolve where the CSV goes.
///
/// Priority: explicit `--output` path > `[output] directory` joined with the
/// mode file name > the mode file name relative to the working directory.
pub fn resolve_output(kind: InputKind, cli_output: Option<&Path>, config: &AppConfig) -> PathBuf {
    if let Some(path) = cli_output {
        return path.to_path_buf();
    }
    let name = kind.output_file_name(config);
    match &config.output_dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// What to convert and where to put it.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub input: PathBuf,
    /// Explicit output path; `None` uses the configured default.
    pub output: Option<PathBuf>,
}

/// Result of a conversion run.
#[derive(Debug)]
pub enum ConvertOutcome {
    /// A log file was parsed and its records written.
    Log {
        output: PathBuf,
        result: ParseResult,
    },

    /// The first table of an HTML document was written.
    Html {
        output: PathBuf,
        columns: usize,
        rows: usize,
    },

    /// The input extension is not handled; nothing was read or written.
    Unsupported { input: PathBuf },
}

/// Run one conversion.
///
/// Malformed log lines are reported to `sink`.
pub fn convert(
    request: &ConvertRequest,
    config: &AppConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<ConvertOutcome> {
    let Some(kind) = InputKind::from_path(&request.input) else {
        tracing::info!(input = %request.input.display(), "Unsupported input format");
        return Ok(ConvertOutcome::Unsupported {
            input: request.input.clone(),
        });
    };

    let output = resolve_output(kind, request.output.as_deref(), config);
    tracing::info!(
        input = %request.input.display(),
        output = %output.display(),
        mode = kind.label(),
        "Conversion started"
    );

    match kind {
        InputKind::Log => convert_log(&request.input, output, sink),
        InputKind::Html => convert_html(&request.input, output),
    }
}

fn convert_log(
    input: &Path,
    output: PathBuf,
    sink: &mut dyn DiagnosticSink,
) -> Result<ConvertOutcome> {
    let parser = LogLineParser::new();
    let result = parser::parse_file(input, &parser, sink)?;

    let written = fs::write_atomic(&output, |w| {
        export::export_records_csv(&result.records, w, &output)
    })?;

    tracing::info!(
        output = %output.display(),
        records = written,
        malformed = result.malformed,
        "Log conversion complete"
    );

    Ok(ConvertOutcome::Log { output, result })
}

fn convert_html(input: &Path, output: PathBuf) -> Result<ConvertOutcome> {
    let html = fs::read_file_lossy(input).map_err(|e| TableError::Io {
        path: input.to_path_buf(),
        source: e,
    })?;

    let extracted = table::extract_first_table(&html, input)?;
    if extracted.is_empty() {
        tracing::warn!(file = %input.display(), "First table has a header but no data rows");
    }

    let rows = fs::write_atomic(&output, |w| {
        export::export_table_csv(&extracted, w, &output)
    })?;

    tracing::info!(
        output = %output.display(),
        rows,
        columns = extracted.columns.len(),
        "HTML conversion complete"
    );

    Ok(ConvertOutcome::Html {
        output,
        columns: extracted.columns.len(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::MalformedLine;
    use crate::util::error::{LogTabError, ParseError};
    use tempfile::TempDir;

    fn request(input: PathBuf, output: PathBuf) -> ConvertRequest {
        ConvertRequest {
            input,
            output: Some(output),
        }
    }

    #[test]
    fn test_input_kind_from_extension() {
        assert_eq!(InputKind::from_path(Path::new("app.log")), Some(InputKind::Log));
        assert_eq!(InputKind::from_path(Path::new("APP.LOG")), Some(InputKind::Log));
        assert_eq!(InputKind::from_path(Path::new("page.html")), Some(InputKind::Html));
        assert_eq!(InputKind::from_path(Path::new("page.htm")), Some(InputKind::Html));
        assert_eq!(InputKind::from_path(Path::new("data.txt")), None);
        assert_eq!(InputKind::from_path(Path::new("log")), None);
        assert_eq!(InputKind::from_path(Path::new("archive.log.gz")), None);
    }

    #[test]
    fn test_resolve_output_priority() {
        let mut config = AppConfig::default();
        assert_eq!(
            resolve_output(InputKind::Log, None, &config),
            PathBuf::from("parsed_log_data.csv")
        );
        assert_eq!(
            resolve_output(InputKind::Html, None, &config),
            PathBuf::from("parsed_html_data.csv")
        );

        config.output_dir = Some(PathBuf::from("exports"));
        assert_eq!(
            resolve_output(InputKind::Log, None, &config),
            PathBuf::from("exports").join("parsed_log_data.csv")
        );
        assert_eq!(
            resolve_output(InputKind::Log, Some(Path::new("x.csv")), &config),
            PathBuf::from("x.csv")
        );
    }

    #[test]
    fn test_convert_log_writes_records() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("app.log");
        let output = dir.path().join("out.csv");
        std::fs::write(
            &input,
            "[2024-01-01 10:00:00] [info] - Service started\n\
             not a log line\n\
             [2024-01-01 10:00:02] [warn] - retry - attempt 2\n",
        )
        .unwrap();

        let mut sink: Vec<MalformedLine> = Vec::new();
        let outcome = convert(
            &request(input, output.clone()),
            &AppConfig::default(),
            &mut sink,
        )
        .unwrap();

        match outcome {
            ConvertOutcome::Log { output: written, result } => {
                assert_eq!(written, output);
                assert_eq!(result.records.len(), 2);
                assert_eq!(result.malformed, 1);
            }
            other => panic!("expected Log outcome, got {other:?}"),
        }
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].text, "not a log line");

        let csv_text = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            csv_text,
            "Timestamp,Log Level,Message\n\
             2024-01-01 10:00:00,INFO,Service started\n\
             2024-01-01 10:00:02,WARN,retry - attempt 2\n"
        );
    }

    #[test]
    fn test_convert_unsupported_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("data.txt");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, "[t] [info] - would parse\n").unwrap();

        let mut sink: Vec<MalformedLine> = Vec::new();
        let outcome = convert(
            &request(input.clone(), output.clone()),
            &AppConfig::default(),
            &mut sink,
        )
        .unwrap();

        assert!(matches!(outcome, ConvertOutcome::Unsupported { input: ref i } if *i == input));
        assert!(!output.exists());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_convert_html_without_tables_fails_without_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("page.html");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, "<html><body><p>nothing</p></body></html>").unwrap();

        let mut sink: Vec<MalformedLine> = Vec::new();
        let err = convert(
            &request(input, output.clone()),
            &AppConfig::default(),
            &mut sink,
        )
        .unwrap_err();

        assert!(matches!(err, LogTabError::Table(TableError::NoTables { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_convert_html_writes_first_table() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("page.html");
        let output = dir.path().join("out.csv");
        std::fs::write(
            &input,
            "<table><tr><th>k</th><th>v</th></tr><tr><td>a</td><td>1, 2</td></tr></table>",
        )
        .unwrap();

        let mut sink: Vec<MalformedLine> = Vec::new();
        let outcome = convert(
            &request(input, output.clone()),
            &AppConfig::default(),
            &mut sink,
        )
        .unwrap();

        assert!(matches!(
            outcome,
            ConvertOutcome::Html {
                columns: 2,
                rows: 1,
                ..
            }
        ));
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "k,v\na,\"1, 2\"\n"
        );
    }

    #[test]
    fn test_convert_missing_log_is_fatal() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.csv");

        let mut sink: Vec<MalformedLine> = Vec::new();
        let err = convert(
            &request(dir.path().join("missing.log"), output.clone()),
            &AppConfig::default(),
            &mut sink,
        )
        .unwrap_err();

        assert!(matches!(err, LogTabError::Parse(ParseError::Io { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_convert_uses_configured_directory() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("app.log");
        std::fs::write(&input, "[t] [info] - ok\n").unwrap();

        let config = AppConfig {
            output_dir: Some(dir.path().join("exports")),
            log_file_name: "logs.csv".to_string(),
            ..AppConfig::default()
        };

        let mut sink: Vec<MalformedLine> = Vec::new();
        convert(
            &ConvertRequest {
                input,
                output: None,
            },
            &config,
            &mut sink,
        )
        .unwrap();

        assert!(dir.path().join("exports").join("logs.csv").exists());
    }
}
