//! Message writer
//!
//! `json` writes every message as one JSON line to stdout. `pretty` writes
//! indented records to stdout and progress lines to stderr.

use crate::engine::{Message, MessageSink};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (one message per line)
    #[default]
    Json,
    /// Human-readable output
    Pretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(Error::InvalidConfigValue {
                field: "format".to_string(),
                message: format!("unknown output format '{other}'"),
            }),
        }
    }
}

/// Writes engine messages in the selected format
pub struct MessageWriter {
    format: OutputFormat,
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
    messages_written: usize,
}

impl MessageWriter {
    /// Writer over stdout and stderr
    pub fn stdio(format: OutputFormat) -> Self {
        Self::new(format, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Writer over arbitrary streams
    pub fn new(format: OutputFormat, out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            format,
            out,
            err,
            messages_written: 0,
        }
    }

    /// Selected format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Number of messages written so far
    pub fn messages_written(&self) -> usize {
        self.messages_written
    }

    /// Write one message
    pub fn write(&mut self, message: &Message) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let line = serde_json::to_string(&message.to_json())?;
                writeln!(self.out, "{line}").map_err(write_error)?;
            }
            OutputFormat::Pretty => self.write_pretty(message)?,
        }
        self.messages_written += 1;
        Ok(())
    }

    fn write_pretty(&mut self, message: &Message) -> Result<()> {
        if let Message::Record { data, .. } = message {
            let text = serde_json::to_string_pretty(data)?;
            return writeln!(self.out, "{text}").map_err(write_error);
        }

        let line = match message {
            Message::Record { .. } => return Ok(()),
            Message::Page {
                number,
                records,
                next_token: Some(token),
                ..
            } => format!("-- page {number}: {records} records (next token: {token})"),
            Message::Page {
                number, records, ..
            } => format!("-- page {number}: {records} records"),
            Message::State {
                operation,
                next_token,
            } => format!("-- {operation} has more results; continue with --next-token {next_token}"),
            Message::Log { level, message } => format!("[{}] {message}", level.as_str()),
            Message::Error {
                operation,
                page: Some(page),
                message,
                ..
            } => format!("!! {operation} failed on page {page}: {message}"),
            Message::Error {
                operation, message, ..
            } => format!("!! {operation} failed: {message}"),
            Message::Summary(stats) => format!(
                "-- {} records in {} pages ({} ms)",
                stats.records_emitted, stats.pages_fetched, stats.duration_ms
            ),
        };
        writeln!(self.err, "{line}").map_err(write_error)
    }

    /// Flush both streams
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().map_err(write_error)?;
        self.err.flush().map_err(write_error)
    }
}

impl MessageSink for MessageWriter {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.write(&message)
    }
}

impl std::fmt::Debug for MessageWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageWriter")
            .field("format", &self.format)
            .field("messages_written", &self.messages_written)
            .finish_non_exhaustive()
    }
}

fn write_error(e: io::Error) -> Error {
    Error::output(format!("Failed to write output: {e}"))
}
