// LogTab - platform/config.rs
//
// Config directory resolution and config.toml loading with validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogTab configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logtab/ or %APPDATA%\LogTab\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Full path of the default config file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[output]` section.
    pub output: OutputSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Directory CSV files are written to (default: working directory).
    pub directory: Option<String>,
    /// File name used in log mode.
    pub log_file_name: Option<String>,
    /// File name used in HTML mode.
    pub html_file_name: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory CSV files are written to. `None` means the working directory.
    pub output_dir: Option<PathBuf>,
    /// CSV file name for log mode.
    pub log_file_name: String,
    /// CSV file name for HTML mode.
    pub html_file_name: String,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            log_file_name: constants::DEFAULT_LOG_OUTPUT_FILE.to_string(),
            html_file_name: constants::DEFAULT_HTML_OUTPUT_FILE.to_string(),
            log_level: None,
        }
    }
}

/// Load the implicit (platform) config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unreadable or unparseable, returns defaults with a warning;
/// the conversion still runs but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    match load_config_strict(config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Load a config file named explicitly by the user.
///
/// A missing, unreadable, or unparseable file is an error. Out-of-range
/// values still degrade to warnings.
pub fn load_config_strict(config_path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    Ok(validate(raw))
}

/// Validate each field, accumulating all warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let mut config = AppConfig::default();

    // -- Output: directory --
    if let Some(dir) = raw.output.directory {
        if dir.trim().is_empty() {
            warnings.push(
                "[output] directory is empty. Using the working directory.".to_string(),
            );
        } else {
            config.output_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Output: file names --
    if let Some(name) = raw.output.log_file_name {
        match check_file_name(&name) {
            Ok(()) => config.log_file_name = name,
            Err(reason) => warnings.push(format!(
                "[output] log_file_name = \"{name}\" {reason}. Using default ({}).",
                constants::DEFAULT_LOG_OUTPUT_FILE,
            )),
        }
    }
    if let Some(name) = raw.output.html_file_name {
        match check_file_name(&name) {
            Ok(()) => config.html_file_name = name,
            Err(reason) => warnings.push(format!(
                "[output] html_file_name = \"{name}\" {reason}. Using default ({}).",
                constants::DEFAULT_HTML_OUTPUT_FILE,
            )),
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Output file names must be bare `.csv` names; directories go in
/// `[output] directory`.
fn check_file_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("is empty");
    }
    if name.contains('/') || name.contains('\\') {
        return Err("must be a file name, not a path");
    }
    let is_csv = Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err("must end in .csv");
    }
    Ok(())
}
