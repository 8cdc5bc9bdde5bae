// LogTab - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading (explicit --config or platform default)
// 3. Logging initialisation (debug mode support)
// 4. Dispatch to the conversion pipeline and console reporting

use clap::Parser;
use logtab::app::convert::{self, ConvertOutcome, ConvertRequest};
use logtab::app::diagnostics::ConsoleReporter;
use logtab::core::summary;
use logtab::platform::config::{self, PlatformPaths};
use logtab::util;
use std::path::PathBuf;
use std::process::ExitCode;

/// LogTab - convert bracketed application logs and HTML tables to CSV.
///
/// `.log` files are parsed line by line as `[timestamp] [level] - message`;
/// `.html` files have their first table extracted. Any other extension is
/// rejected without writing output.
#[derive(Parser, Debug)]
#[command(name = "logtab", version, about)]
struct Cli {
    /// Input file (.log, .html or .htm).
    input: PathBuf,

    /// Output CSV path (default: parsed_log_data.csv / parsed_html_data.csv).
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Configuration file (default: config.toml in the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Suppress the record preview and level summary.
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config is loaded before logging so [logging] level can take effect;
    // warnings are replayed once the subscriber is installed.
    let loaded = match &cli.config {
        Some(path) => config::load_config_strict(path),
        None => Ok(config::load_config(&PlatformPaths::resolve().config_file())),
    };
    let (app_config, config_warnings) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            util::logging::init(cli.debug, None);
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    util::logging::init(cli.debug, app_config.log_level.as_deref());
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    tracing::debug!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "LogTab starting"
    );

    let request = ConvertRequest {
        input: cli.input.clone(),
        output: cli.output.clone(),
    };

    let mut reporter = ConsoleReporter::new(std::io::stdout().lock());
    let outcome = convert::convert(&request, &app_config, &mut reporter);
    let malformed_reported = reporter.reported();
    drop(reporter);

    match outcome {
        Ok(ConvertOutcome::Log { output, result }) => {
            if !cli.quiet {
                print!(
                    "{}",
                    summary::render_report(&result, util::constants::PREVIEW_ROWS)
                );
            } else if malformed_reported > 0 {
                println!("Skipped {malformed_reported} malformed lines");
            }
            println!(
                "Wrote {} records to {}",
                result.records.len(),
                output.display()
            );
            ExitCode::SUCCESS
        }
        Ok(ConvertOutcome::Html {
            output,
            columns,
            rows,
        }) => {
            println!(
                "Wrote {rows} rows x {columns} columns to {}",
                output.display()
            );
            ExitCode::SUCCESS
        }
        Ok(ConvertOutcome::Unsupported { input }) => {
            println!(
                "Unsupported file format: '{}'. Expected a .log or .html file.",
                input.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Conversion failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
