// LogTab - app/diagnostics.rs
//
// Console reporting of malformed log lines.

use crate::core::model::NoMatch;
use crate::core::parser::DiagnosticSink;
use crate::util::constants::DEBUG_MAX_LINE_PREVIEW;
use std::io::Write;

/// Prefix of every malformed-line report.
pub const MALFORMED_PREFIX: &str = "Line did not match pattern or was malformed";

/// Writes one human-readable line per malformed log line.
///
/// The CLI wires this to standard output; tests hand it a `&mut Vec<u8>`.
pub struct ConsoleReporter<W: Write> {
    out: W,
    reported: u64,
    write_failed: bool,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            reported: 0,
            write_failed: false,
        }
    }

    /// Number of malformed lines reported so far.
    pub fn reported(&self) -> u64 {
        self.reported
    }
}

impl<W: Write> DiagnosticSink for ConsoleReporter<W> {
    fn malformed_line(&mut self, line_number: u64, no_match: &NoMatch) {
        self.reported += 1;

        let preview: String = no_match
            .display_text()
            .chars()
            .take(DEBUG_MAX_LINE_PREVIEW)
            .collect();
        tracing::debug!(line = line_number, text = %preview, "Malformed line skipped");

        if let Err(e) = writeln!(self.out, "{MALFORMED_PREFIX}: {no_match}") {
            // Warn once; a closed stdout should not flood stderr.
            if !self.write_failed {
                tracing::warn!(error = %e, "Failed to write malformed-line report");
                self.write_failed = true;
            }
        }
    }
}
