//! XML to JSON conversion
//!
//! Element names become object keys, text-only elements become strings,
//! repeated siblings become arrays and empty elements become null.
//! Attributes (only `xmlns` in EC2 responses) are dropped.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Value};

/// Parse an XML document into a JSON value
pub fn xml_to_json(xml: &str) -> Result<Value> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root_map: Map<String, Value> = Map::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let child_value = parse_element(&mut reader)?;
                root_map.insert(tag_name, child_value);
            }
            Ok(Event::Empty(e)) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                root_map.insert(tag_name, Value::Null);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(Error::xml(e.to_string())),
        }
        buf.clear();
    }

    if root_map.is_empty() {
        return Err(Error::xml("document has no root element"));
    }

    Ok(Value::Object(root_map))
}

fn parse_element(reader: &mut Reader<&[u8]>) -> Result<Value> {
    let mut map: Map<String, Value> = Map::new();
    let mut buf = Vec::new();
    let mut current_text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let child_value = parse_element(reader)?;
                insert_child(&mut map, tag_name, child_value);
            }
            Ok(Event::Empty(e)) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                insert_child(&mut map, tag_name, Value::Null);
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| Error::xml(err.to_string()))?
                    .trim()
                    .to_string();
                if !text.is_empty() {
                    current_text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                current_text.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(Error::xml("unexpected end of document")),
            Err(e) => return Err(Error::xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if map.is_empty() && !current_text.is_empty() {
        Ok(Value::String(current_text))
    } else if map.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(map))
    }
}

/// Repeated keys collapse into an array
fn insert_child(map: &mut Map<String, Value>, key: String, value: Value) {
    if let Some(existing) = map.get_mut(&key) {
        match existing {
            Value::Array(arr) => arr.push(value),
            _ => {
                let old = existing.take();
                *existing = Value::Array(vec![old, value]);
            }
        }
    } else {
        map.insert(key, value);
    }
}

/// The first `<Error>` of an EC2 error document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceErrorBody {
    /// Error code (e.g., "InvalidInstanceID.NotFound")
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Request id for support cases
    pub request_id: Option<String>,
}

/// Parse an EC2 error document:
///
/// ```text
/// <Response><Errors><Error><Code>..</Code><Message>..</Message></Error></Errors>
/// <RequestID>..</RequestID></Response>
/// ```
pub fn parse_error_response(xml: &str) -> Option<ServiceErrorBody> {
    let json = xml_to_json(xml).ok()?;
    let response = json.get("Response").or_else(|| json.get("ErrorResponse"))?;

    let error = match &response["Errors"]["Error"] {
        Value::Array(arr) => arr.first()?.clone(),
        Value::Object(_) => response["Errors"]["Error"].clone(),
        _ => response.get("Error")?.clone(),
    };

    let code = error.get("Code")?.as_str()?.to_string();
    let message = error
        .get("Message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let request_id = response
        .get("RequestID")
        .or_else(|| response.get("RequestId"))
        .and_then(Value::as_str)
        .map(String::from);

    Some(ServiceErrorBody {
        code,
        message,
        request_id,
    })
}
