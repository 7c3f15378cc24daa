//! Common types used throughout ec2kit
//!
//! This module contains shared type definitions, type aliases,
//! and small value types used by several operations.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Filters
// ============================================================================

/// A describe-call filter (`Filter.N.Name` / `Filter.N.Value.M`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Filter name (e.g., "instance-state-name", "tag:Env")
    pub name: String,
    /// Accepted values (OR-ed by the service)
    pub values: Vec<String>,
}

impl Filter {
    /// Create a filter
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parses the shorthand `Name=instance-state-name,Values=running,stopped`.
/// The shorter `instance-state-name=running,stopped` is accepted too.
impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix("Name=") {
            let (name, values) = rest
                .split_once(",Values=")
                .ok_or_else(|| Error::validation(format!("Filter '{s}' is missing Values=")))?;
            return build_filter(name, values, s);
        }

        let (name, values) = s
            .split_once('=')
            .ok_or_else(|| Error::validation(format!("Filter '{s}' must look like name=v1,v2")))?;
        build_filter(name, values, s)
    }
}

fn build_filter(name: &str, values: &str, raw: &str) -> Result<Filter> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation(format!("Filter '{raw}' has an empty name")));
    }
    let values: Vec<String> = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    if values.is_empty() {
        return Err(Error::validation(format!("Filter '{raw}' has no values")));
    }
    Ok(Filter {
        name: name.to_string(),
        values,
    })
}

// ============================================================================
// Tags
// ============================================================================

/// A resource tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag key
    pub key: String,
    /// Tag value (may be empty)
    pub value: String,
}

impl Tag {
    /// Create a tag
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (key, value) = s.split_once('=').unwrap_or((s, ""));
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::validation(format!("Tag '{s}' has an empty key")));
        }
        Ok(Tag::new(key, value.trim()))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Name=instance-state-name,Values=running,stopped" ; "long form")]
    #[test_case("instance-state-name=running,stopped" ; "short form")]
    #[test_case(" instance-state-name = running , stopped " ; "whitespace")]
    fn test_filter_parse(raw: &str) {
        let filter: Filter = raw.parse().unwrap();
        assert_eq!(filter.name, "instance-state-name");
        assert_eq!(filter.values, vec!["running", "stopped"]);
    }

    #[test]
    fn test_filter_parse_tag_name() {
        let filter: Filter = "tag:Env=prod".parse().unwrap();
        assert_eq!(filter, Filter::new("tag:Env", ["prod"]));
    }

    #[test_case("running" ; "no separator")]
    #[test_case("=running" ; "empty name")]
    #[test_case("instance-state-name=" ; "no values")]
    #[test_case("Name=instance-state-name" ; "long form without values")]
    fn test_filter_parse_rejects(raw: &str) {
        let err = raw.parse::<Filter>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_tag_parse() {
        let tag: Tag = "Team=infra".parse().unwrap();
        assert_eq!(tag, Tag::new("Team", "infra"));

        let tag: Tag = "Flag".parse().unwrap();
        assert_eq!(tag.value, "");
        assert_eq!(tag.to_string(), "Flag=");

        assert!("=x".parse::<Tag>().is_err());
    }
}
