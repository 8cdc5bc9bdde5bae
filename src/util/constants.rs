// LogTab - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogTab";

/// Application identifier used for config directories.
pub const APP_ID: &str = "LogTab";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Input dispatch
// =============================================================================

/// File extensions handled as bracketed application logs.
pub const LOG_EXTENSIONS: &[&str] = &["log"];

/// File extensions handled as HTML documents.
pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

// =============================================================================
// Output
// =============================================================================

/// Default CSV file name written in log mode.
pub const DEFAULT_LOG_OUTPUT_FILE: &str = "parsed_log_data.csv";

/// Default CSV file name written in HTML mode.
pub const DEFAULT_HTML_OUTPUT_FILE: &str = "parsed_html_data.csv";

/// CSV header row written in log mode, in column order.
pub const LOG_CSV_HEADERS: [&str; 3] = ["Timestamp", "Log Level", "Message"];

/// Extension appended to the output path while the CSV is being written.
/// The finished file is renamed into place.
pub const TEMP_OUTPUT_SUFFIX: &str = "tmp";

// =============================================================================
// Summary
// =============================================================================

/// Number of parsed records shown in the post-conversion preview.
pub const PREVIEW_ROWS: usize = 5;

// =============================================================================
// HTML tables
// =============================================================================

/// Upper bound for `colspan` / `rowspan` attribute values.
/// Larger values are clamped so a hostile document cannot explode the grid.
pub const MAX_CELL_SPAN: usize = 1_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Maximum length of a log line included in debug output.
/// Prevents accidental exposure of sensitive data in long lines.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
