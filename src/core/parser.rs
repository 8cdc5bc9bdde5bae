// LogTab - core/parser.rs
//
// Line-oriented parsing of `[timestamp] [level] - message` logs.
// Core layer: accepts BufRead objects; `parse_file` is the only entry point
// that opens a path.

use crate::core::model::{LogRecord, MalformedLine, NoMatch, ParseResult};
use crate::util::error::ParseError;
use regex::Regex;
use std::io::{BufRead, ErrorKind};
use std::path::Path;
use std::sync::OnceLock;

/// Structural prefix of a log line:
///   `[` non-`]`+ `]`, one space, `[` non-`]`+ `]`, ` - `, then the message.
/// Anchored at the start only; the message capture is greedy to end of line.
const LINE_PATTERN: &str = r"(?i)^\[([^\]]+)\] \[([^\]]+)\] - (.*)";

// =============================================================================
// Diagnostic sink
// =============================================================================

/// Receives lines that did not match the structural pattern.
///
/// The scanner never prints; the caller decides where malformed lines go.
pub trait DiagnosticSink {
    fn malformed_line(&mut self, line_number: u64, no_match: &NoMatch);
}

/// Collects malformed lines in memory.
impl DiagnosticSink for Vec<MalformedLine> {
    fn malformed_line(&mut self, line_number: u64, no_match: &NoMatch) {
        self.push(MalformedLine {
            line_number,
            text: no_match.display_text().to_string(),
        });
    }
}

// =============================================================================
// LogLineParser
// =============================================================================

/// Parses single lines into `LogRecord`s.
#[derive(Debug, Clone)]
pub struct LogLineParser {
    pattern: Regex,
}

impl LogLineParser {
    pub fn new() -> Self {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        // The pattern is a compile-time constant exercised by the unit tests
        // below, so a bad edit fails the test suite rather than a user run.
        let pattern = PATTERN
            .get_or_init(|| Regex::new(LINE_PATTERN).expect("LINE_PATTERN: invalid regex"))
            .clone();
        Self { pattern }
    }

    /// Parse one line (without its line terminator).
    ///
    /// Returns the record with the level upper-cased, or `NoMatch` carrying
    /// the original line. Only the first `[..] [..] - ` prefix is structural.
    pub fn parse(&self, line: &str) -> Result<LogRecord, NoMatch> {
        match self.pattern.captures(line) {
            Some(caps) => {
                let field = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();
                Ok(LogRecord {
                    timestamp: field(1).to_string(),
                    level: field(2).to_uppercase(),
                    message: field(3).to_string(),
                })
            }
            None => Err(NoMatch {
                line: line.to_string(),
            }),
        }
    }
}

impl Default for LogLineParser {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Line scanner
// =============================================================================

/// Open `path` and scan it with `parse_lines`.
pub fn parse_file(
    path: &Path,
    parser: &LogLineParser,
    sink: &mut dyn DiagnosticSink,
) -> Result<ParseResult, ParseError> {
    let file = std::fs::File::open(path).map_err(|e| ParseError::Io {
        file: path.to_path_buf(),
        source: e,
    })?;
    parse_lines(std::io::BufReader::new(file), path, parser, sink)
}

/// Read one line into `buf` without its terminator. `\n`, `\r\n` and a lone
/// `\r` all end a line. Returns `false` at end of input.
fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<bool> {
    let mut consumed_any = false;
    loop {
        let (used, terminator) = {
            let available = match reader.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(consumed_any);
            }
            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    buf.extend_from_slice(&available[..i]);
                    (i + 1, Some(available[i]))
                }
                None => {
                    buf.extend_from_slice(available);
                    (available.len(), None)
                }
            }
        };
        reader.consume(used);
        consumed_any = true;

        match terminator {
            Some(b'\r') => {
                if reader.fill_buf()?.first() == Some(&b'\n') {
                    reader.consume(1);
                }
                return Ok(true);
            }
            Some(_) => return Ok(true),
            None => {}
        }
    }
}

/// Scan `reader` line by line, collecting records in order.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. Invalid UTF-8 is decoded
/// lossily so a stray byte costs one line, not the whole file. Every non-matching line
/// (blank lines included) is reported to `sink` with its 1-based number and
/// scanning continues. A read failure aborts the scan.
///
/// `source` is only used for error context and log fields.
pub fn parse_lines<R: BufRead>(
    mut reader: R,
    source: &Path,
    parser: &LogLineParser,
    sink: &mut dyn DiagnosticSink,
) -> Result<ParseResult, ParseError> {
    tracing::debug!(file = %source.display(), "Parsing started");

    let mut result = ParseResult::default();
    let mut buf: Vec<u8> = Vec::new();

    loop {
        buf.clear();
        let more = read_line(&mut reader, &mut buf).map_err(|e| ParseError::Io {
            file: source.to_path_buf(),
            source: e,
        })?;
        if !more {
            break;
        }

        result.lines_processed += 1;
        let line = String::from_utf8_lossy(&buf);

        match parser.parse(&line) {
            Ok(record) => result.records.push(record),
            Err(no_match) => {
                result.malformed += 1;
                sink.malformed_line(result.lines_processed, &no_match);
            }
        }
    }

    tracing::debug!(
        file = %source.display(),
        records = result.records.len(),
        malformed = result.malformed,
        lines = result.lines_processed,
        "Parsing complete"
    );

    Ok(result)
}
