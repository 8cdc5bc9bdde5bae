// LogTab - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every variant carries the path it concerns; the causal chain is kept
// through `source()` for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogTab operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogTabError {
    /// Log file reading failed.
    Parse(ParseError),

    /// HTML table extraction failed.
    Table(TableError),

    /// CSV export failed.
    Export(ExportError),

    /// Configuration loading failed.
    Config(ConfigError),
}

impl fmt::Display for LogTabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Table(e) => write!(f, "Table error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for LogTabError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Table(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors related to log file reading.
///
/// Malformed lines are not errors; they go to the diagnostic sink.
#[derive(Debug)]
pub enum ParseError {
    /// I/O error while opening or reading a log file.
    Io { file: PathBuf, source: io::Error },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { file, source } => {
                write!(f, "'{}': I/O error: {source}", file.display())
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ParseError> for LogTabError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Table errors
// ---------------------------------------------------------------------------

/// Errors related to HTML table extraction.
#[derive(Debug)]
pub enum TableError {
    /// The document contains no usable `<table>` element.
    NoTables { path: PathBuf },

    /// I/O error reading the HTML document.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTables { path } => {
                write!(f, "No tables found in '{}'", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "I/O error reading '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::NoTables { .. } => None,
        }
    }
}

impl From<TableError> for LogTabError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for LogTabError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
///
/// Only raised for a config file named explicitly on the command line;
/// problems with the implicit platform config degrade to warnings.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for LogTabError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for LogTab results.
pub type Result<T> = std::result::Result<T, LogTabError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_no_tables_message_names_the_file() {
        let err: LogTabError = TableError::NoTables {
            path: PathBuf::from("report.html"),
        }
        .into();
        let text = err.to_string();
        assert!(text.contains("No tables found"), "got: {text}");
        assert!(text.contains("report.html"), "got: {text}");
    }

    #[test]
    fn test_io_error_chain_is_preserved() {
        let err: LogTabError = ParseError::Io {
            file: PathBuf::from("app.log"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        }
        .into();

        let parse = err.source().expect("top-level error should have a source");
        let io = parse.source().expect("parse error should wrap the io error");
        assert_eq!(io.to_string(), "missing");
    }
}
