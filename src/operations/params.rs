//! EC2 Query parameter builder
//!
//! Values are only written when present, so an unset field never reaches
//! the wire.

use crate::error::{Error, Result};
use crate::types::{Filter, Tag};
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use tracing::warn;

/// Ordered `Name=value` pairs of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter
    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        self.pairs.push((name.into(), value.to_string()));
        self
    }

    /// Add a parameter only when a value is present
    pub fn push_opt<V: ToString>(&mut self, name: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(name, value);
        }
        self
    }

    /// Add `true` only when the flag is set
    pub fn flag(&mut self, name: &str, value: bool) -> &mut Self {
        if value {
            self.push(name, true);
        }
        self
    }

    /// Add `Prefix.1`, `Prefix.2`, ...
    pub fn list(&mut self, prefix: &str, values: &[String]) -> &mut Self {
        for (i, value) in values.iter().enumerate() {
            self.push(format!("{prefix}.{}", i + 1), value);
        }
        self
    }

    /// Add `Filter.N.Name` / `Filter.N.Value.M`
    pub fn filters(&mut self, filters: &[Filter]) -> &mut Self {
        for (i, filter) in filters.iter().enumerate() {
            let n = i + 1;
            self.push(format!("Filter.{n}.Name"), &filter.name);
            for (j, value) in filter.values.iter().enumerate() {
                self.push(format!("Filter.{n}.Value.{}", j + 1), value);
            }
        }
        self
    }

    /// Add one tag specification for the given resource type
    pub fn tag_specification(&mut self, resource_type: &str, tags: &[Tag]) -> &mut Self {
        if tags.is_empty() {
            return self;
        }
        self.push("TagSpecification.1.ResourceType", resource_type);
        for (i, tag) in tags.iter().enumerate() {
            let n = i + 1;
            self.push(format!("TagSpecification.1.Tag.{n}.Key"), &tag.key);
            self.push(format!("TagSpecification.1.Tag.{n}.Value"), &tag.value);
        }
        self
    }

    /// Add an RFC 3339 UTC timestamp when present
    pub fn time(&mut self, name: &str, value: Option<DateTime<Utc>>) -> &mut Self {
        self.push_opt(
            name,
            value.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        )
    }

    /// Resolve a dual time field and add it under `name`.
    ///
    /// A deprecated local value logs a deprecation warning.
    pub fn dual_time(&mut self, name: &str, utc_name: &str, value: &DualTime) -> Result<&mut Self> {
        let resolved = value.resolve(name, utc_name)?;
        if value.local.is_some() {
            warn!(
                "Parameter {} is deprecated and may be removed in a future version, use {} instead",
                name, utc_name
            );
        }
        Ok(self.time(name, resolved))
    }

    /// Value of the first parameter with this name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check if a parameter is set
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Parameter pairs in insertion order
    pub fn as_slice(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if no parameters are set
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

// ============================================================================
// Dual time fields
// ============================================================================

/// A deprecated local-time parameter paired with its UTC replacement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DualTime {
    /// Deprecated value, read in the local time zone
    pub local: Option<NaiveDateTime>,
    /// Replacement value in UTC
    pub utc: Option<DateTime<Utc>>,
}

impl DualTime {
    /// Only the UTC field set
    pub fn utc(value: DateTime<Utc>) -> Self {
        Self {
            local: None,
            utc: Some(value),
        }
    }

    /// Only the deprecated local field set
    pub fn local(value: NaiveDateTime) -> Self {
        Self {
            local: Some(value),
            utc: None,
        }
    }

    /// Check if neither field is set
    pub fn is_unset(&self) -> bool {
        self.local.is_none() && self.utc.is_none()
    }

    /// Resolve to a UTC instant. Both fields set is an error.
    pub fn resolve(&self, local_name: &str, utc_name: &str) -> Result<Option<DateTime<Utc>>> {
        match (self.local, self.utc) {
            (Some(_), Some(_)) => Err(Error::mutually_exclusive(local_name, utc_name)),
            (None, utc) => Ok(utc),
            (Some(local), None) => Local
                .from_local_datetime(&local)
                .earliest()
                .map(|t| Some(t.with_timezone(&Utc)))
                .ok_or_else(|| {
                    Error::validation(format!(
                        "{local_name} '{local}' does not exist in the local time zone"
                    ))
                }),
        }
    }
}

/// Parse a local wall-clock time (`2024-05-01T10:00:00` or `2024-05-01 10:00:00`)
pub fn parse_local_time(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| Error::validation(format!("'{value}' is not a local date-time")))
}

/// Parse an RFC 3339 instant (`2024-05-01T10:00:00Z`)
pub fn parse_utc_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::validation(format!("'{value}' is not an RFC 3339 timestamp: {e}")))
}
