//! Decoder types and traits
//!
//! Defines how an operation's response is turned into items and a token.

use super::path::{extract_by_path, extract_list, extract_string};
use super::xml::xml_to_json;
use crate::error::Result;
use crate::pagination::PageResult;
use serde_json::Value;

/// Where an operation's items and continuation token live in the response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseShape {
    /// Path to the item list (or the single result value)
    pub items_path: &'static str,
    /// Path to the continuation token, for paged operations
    pub token_path: Option<&'static str>,
}

impl ResponseShape {
    /// Shape of a paged describe response
    pub const fn paged(items_path: &'static str, token_path: &'static str) -> Self {
        Self {
            items_path,
            token_path: Some(token_path),
        }
    }

    /// Shape of a single-result response
    pub const fn single(items_path: &'static str) -> Self {
        Self {
            items_path,
            token_path: None,
        }
    }
}

/// Trait for decoding response bodies
pub trait ResponseDecoder: Send + Sync {
    /// Decode one page of items plus its continuation token
    fn decode_page(&self, body: &str) -> Result<PageResult<Value>>;

    /// Decode the single result value of a non-paged operation
    fn decode_single(&self, body: &str) -> Result<Value>;

    /// Decode the full response
    fn decode_raw(&self, body: &str) -> Result<Value>;
}

/// Decoder for EC2 Query protocol (XML) responses
#[derive(Debug, Clone, Copy)]
pub struct QueryDecoder {
    shape: ResponseShape,
}

impl QueryDecoder {
    /// Create a decoder for the given response shape
    pub fn new(shape: ResponseShape) -> Self {
        Self { shape }
    }

    /// The response shape
    pub fn shape(&self) -> ResponseShape {
        self.shape
    }
}

impl ResponseDecoder for QueryDecoder {
    fn decode_page(&self, body: &str) -> Result<PageResult<Value>> {
        let json = xml_to_json(body)?;
        let items = extract_list(&json, self.shape.items_path);
        let next_token = self
            .shape
            .token_path
            .and_then(|path| extract_string(&json, path));
        Ok(PageResult::new(items, next_token))
    }

    fn decode_single(&self, body: &str) -> Result<Value> {
        let json = xml_to_json(body)?;
        Ok(extract_by_path(&json, self.shape.items_path))
    }

    fn decode_raw(&self, body: &str) -> Result<Value> {
        xml_to_json(body)
    }
}
