//! Tests for output module

use super::*;
use crate::engine::{LogLevel, Message, MessageSink, RunStats};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Cloneable in-memory sink for captured output
#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn writer(format: OutputFormat) -> (MessageWriter, Buffer, Buffer) {
    let out = Buffer::default();
    let err = Buffer::default();
    let writer = MessageWriter::new(format, Box::new(out.clone()), Box::new(err.clone()));
    (writer, out, err)
}

fn page(number: usize, next_token: Option<&str>) -> Message {
    Message::Page {
        operation: "DescribeVolumes".to_string(),
        number,
        records: 2,
        request_token: None,
        next_token: next_token.map(String::from),
    }
}

#[test]
fn test_output_format_parse() {
    assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    assert_eq!("Pretty".parse::<OutputFormat>().unwrap(), OutputFormat::Pretty);
    assert!("yaml".parse::<OutputFormat>().is_err());
    assert_eq!(OutputFormat::default(), OutputFormat::Json);

    let format: OutputFormat = serde_yaml::from_str("pretty").unwrap();
    assert_eq!(format, OutputFormat::Pretty);
}

#[test]
fn test_json_lines() {
    let (mut writer, out, err) = writer(OutputFormat::Json);

    writer
        .write(&Message::record(
            "DescribeVolumes",
            Some(1),
            json!({"volumeId": "vol-1"}),
        ))
        .unwrap();
    writer.write(&page(1, Some("T1"))).unwrap();
    writer
        .write(&Message::state("DescribeVolumes", "T1"))
        .unwrap();

    let lines: Vec<Value> = out
        .text()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["type"], "RECORD");
    assert_eq!(lines[0]["record"]["data"]["volumeId"], "vol-1");
    assert_eq!(lines[0]["record"]["page"], 1);
    assert_eq!(lines[1]["type"], "PAGE");
    assert_eq!(lines[1]["page"]["next_token"], "T1");
    assert_eq!(lines[2]["type"], "STATE");
    assert_eq!(lines[2]["state"]["next_token"], "T1");
    assert!(err.text().is_empty());
    assert_eq!(writer.messages_written(), 3);
}

#[test]
fn test_json_error_and_log() {
    let (mut writer, out, _) = writer(OutputFormat::Json);

    let error = crate::error::Error::Service {
        status: 400,
        code: "InvalidNextToken".to_string(),
        message: "The token is invalid".to_string(),
        request_id: None,
    };
    writer
        .emit(Message::error("DescribeVolumes", Some(3), &error))
        .unwrap();
    writer
        .emit(Message::log(LogLevel::Warn, "careful"))
        .unwrap();

    let text = out.text();
    let lines: Vec<Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines[0]["type"], "ERROR");
    assert_eq!(lines[0]["error"]["page"], 3);
    assert_eq!(lines[0]["error"]["code"], "InvalidNextToken");
    assert_eq!(lines[1]["log"]["level"], "WARN");
}

#[test]
fn test_pretty_splits_records_and_progress() {
    let (mut writer, out, err) = writer(OutputFormat::Pretty);

    writer
        .write(&Message::record("DescribeVolumes", Some(1), json!({"volumeId": "vol-1"})))
        .unwrap();
    writer.write(&page(1, Some("T1"))).unwrap();
    writer.write(&page(2, None)).unwrap();
    writer
        .write(&Message::state("DescribeVolumes", "T1"))
        .unwrap();
    writer
        .write(&Message::Summary(RunStats {
            records_emitted: 4,
            pages_fetched: 2,
            errors: 0,
            duration_ms: 12,
        }))
        .unwrap();
    writer.flush().unwrap();

    assert!(out.text().contains("\"volumeId\": \"vol-1\""));
    let progress = err.text();
    assert!(progress.contains("page 1: 2 records (next token: T1)"));
    assert!(progress.contains("page 2: 2 records\n"));
    assert!(progress.contains("--next-token T1"));
    assert!(progress.contains("4 records in 2 pages"));
}
