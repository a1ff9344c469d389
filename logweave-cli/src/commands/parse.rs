//! `logweave parse <LOG_TYPE> [FILE]` command handler
//!
//! Events go to stdout as one JSON object per line. Per-line failures are
//! logged as warnings and the summary is rendered to stderr, so stdout can be
//! piped straight into another tool.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};

use serde::Serialize;
use tracing::{info, warn};

use logweave_core::{LogParser, Registry, parse_line};

use crate::cli::ParseArgs;
use crate::commands::lookup;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `parse` command.
///
/// # Errors
///
/// * `CliError::UnknownLogType` if the log type is not registered
/// * `CliError::Io` if the input cannot be opened or read
/// * `CliError::ParseFailures` if any line failed
pub fn execute(registry: &Registry, args: ParseArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let log_type = lookup(registry, &args.log_type)?;
    let mut parser = log_type.new_parser();

    let source = match &args.file {
        Some(path) => path.display().to_string(),
        None => "-".to_owned(),
    };
    info!(log_type = %args.log_type, source = %source, "parsing input");

    let input: Box<dyn BufRead> = match &args.file {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(std::io::stdin().lock()),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = parse_lines(parser.as_mut(), input, &mut out, args.fail_fast)?;
    out.flush()?;

    writer.render_to(&mut std::io::stderr().lock(), &summary)?;
    summary.into_result()
}

/// Parse every line of `input`, writing each event as a JSON line to `out`.
///
/// Empty lines are skipped and not counted. A line that is not valid UTF-8
/// counts as a failure like any other. With `fail_fast` the first failing
/// line stops the run.
pub fn parse_lines(
    parser: &mut dyn LogParser,
    mut input: impl BufRead,
    out: &mut dyn Write,
    fail_fast: bool,
) -> Result<ParseSummary, CliError> {
    let mut summary = ParseSummary {
        log_type: parser.log_type().to_owned(),
        ..ParseSummary::default()
    };

    let mut buf = Vec::new();
    let mut number = 0usize;
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        number += 1;

        let raw = buf.strip_suffix(b"\n").unwrap_or(buf.as_slice());
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let result = match std::str::from_utf8(raw) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => parse_line(parser, line).map_err(|e| (e.kind(), e.to_string())),
            Err(e) => Err(("encoding", e.to_string())),
        };
        summary.lines += 1;

        match result {
            Ok(events) => {
                for event in &events {
                    writeln!(out, "{}", event.to_json_line()?)?;
                }
                summary.events += events.len() as u64;
            }
            Err((reason, error)) => {
                summary.failed += 1;
                warn!(line = number, reason, error = %error, "line failed to parse");
                if fail_fast {
                    summary.stopped_early = true;
                    break;
                }
            }
        }
    }

    Ok(summary)
}

/// Counters for one `parse` run.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct ParseSummary {
    pub log_type: String,
    /// Non-empty lines read
    pub lines: u64,
    pub events: u64,
    pub failed: u64,
    pub stopped_early: bool,
}

impl ParseSummary {
    /// `Ok` when every line parsed.
    pub fn into_result(self) -> Result<(), CliError> {
        if self.failed == 0 {
            Ok(())
        } else {
            Err(CliError::ParseFailures {
                failed: self.failed,
                lines: self.lines,
            })
        }
    }
}

impl Render for ParseSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let failed = if self.failed == 0 {
            "0".green()
        } else {
            self.failed.to_string().red().bold()
        };
        write!(
            w,
            "{}: {} lines, {} events, {} failed",
            self.log_type.bold(),
            self.lines,
            self.events,
            failed
        )?;
        if self.stopped_early {
            write!(w, " (stopped at first failure)")?;
        }
        writeln!(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logweave_core::LogweaveConfig;

    use crate::commands::build_registry;

    const COMMON: &str =
        r#"127.0.0.1 - frank [10/Oct/2000:13:55:36 -0700] "GET /apache_pb.gif HTTP/1.0" 200 2326"#;

    fn run(input: &str, fail_fast: bool) -> (ParseSummary, Vec<serde_json::Value>) {
        run_bytes(input.as_bytes(), fail_fast)
    }

    fn run_bytes(input: &[u8], fail_fast: bool) -> (ParseSummary, Vec<serde_json::Value>) {
        let registry = build_registry(&LogweaveConfig::default()).expect("registry");
        let mut parser = registry.new_parser("Apache.AccessCommon").expect("parser");
        let mut out = Vec::new();
        let summary = parse_lines(parser.as_mut(), input, &mut out, fail_fast).expect("run");
        let events = String::from_utf8(out)
            .expect("utf8")
            .lines()
            .map(|l| serde_json::from_str(l).expect("json line"))
            .collect();
        (summary, events)
    }

    #[test]
    fn every_line_becomes_one_json_event() {
        let input = format!("{COMMON}\n{COMMON}\r\n\n");
        let (summary, events) = run(&input, false);
        assert_eq!(summary.lines, 2);
        assert_eq!(summary.events, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(events[0]["lw_log_type"], "Apache.AccessCommon");
        assert_eq!(events[1]["user"], "frank");
        assert!(summary.into_result().is_ok());
    }

    #[test]
    fn failures_are_counted_and_processing_continues() {
        let input = format!("garbage\n{COMMON}\nmore garbage\n");
        let (summary, events) = run(&input, false);
        assert_eq!(summary.lines, 3);
        assert_eq!(summary.failed, 2);
        assert_eq!(events.len(), 1);
        assert!(!summary.stopped_early);
        assert_eq!(summary.into_result().unwrap_err().exit_code(), 4);
    }

    #[test]
    fn invalid_utf8_line_is_a_line_failure() {
        let mut input = Vec::new();
        input.extend_from_slice(COMMON.as_bytes());
        input.extend_from_slice(b"\nbad \xff line\n");
        input.extend_from_slice(COMMON.as_bytes());
        input.extend_from_slice(b"\r\n");

        let (summary, events) = run_bytes(&input, false);
        assert_eq!(summary.lines, 3);
        assert_eq!(summary.events, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1]["user"], "frank");
        assert_eq!(summary.into_result().unwrap_err().exit_code(), 4);
    }

    #[test]
    fn last_line_without_newline_is_parsed() {
        let (summary, events) = run(&format!("{COMMON}\n{COMMON}"), false);
        assert_eq!(summary.lines, 2);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn fail_fast_stops_at_first_failure() {
        let input = format!("{COMMON}\ngarbage\n{COMMON}\n");
        let (summary, events) = run(&input, true);
        assert_eq!(summary.lines, 2);
        assert_eq!(summary.failed, 1);
        assert!(summary.stopped_early);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn summary_text_and_json() {
        colored::control::set_override(false);
        let summary = ParseSummary {
            log_type: "Zeek.DNS".to_owned(),
            lines: 3,
            events: 2,
            failed: 1,
            stopped_early: false,
        };

        let mut text = Vec::new();
        OutputWriter::new(crate::cli::OutputFormat::Text)
            .render_to(&mut text, &summary)
            .expect("render");
        assert_eq!(
            String::from_utf8(text).unwrap(),
            "Zeek.DNS: 3 lines, 2 events, 1 failed\n"
        );

        let json = serde_json::to_value(&summary).expect("json");
        assert_eq!(json["failed"], 1);
        assert_eq!(json["stopped_early"], false);
    }
}
