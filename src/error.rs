//! Error types for ec2kit
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for ec2kit
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Caller Input Errors
    // ============================================================================
    #[error("Invalid parameters: {message}")]
    Validation { message: String },

    #[error("Parameters '{first}' and '{second}' are mutually exclusive")]
    MutuallyExclusive { first: String, second: String },

    #[error("{param} must be between {min} and {max}, got {value}")]
    PageSizeOutOfRange {
        param: String,
        value: u32,
        min: u32,
        max: u32,
    },

    // ============================================================================
    // Credential Errors
    // ============================================================================
    #[error("Credentials error: {message}")]
    Credentials { message: String },

    #[error("Request signing failed: {message}")]
    Signing { message: String },

    // ============================================================================
    // HTTP / Service Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("{code}: {message} (HTTP {status}, request id {})", request_id.as_deref().unwrap_or("-"))]
    Service {
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("XML parsing error: {message}")]
    XmlParse { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // State Errors
    // ============================================================================
    #[error("State error: {message}")]
    State { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a mutual exclusion error
    pub fn mutually_exclusive(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::MutuallyExclusive {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a credentials error
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials {
            message: message.into(),
        }
    }

    /// Create a signing error
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an XML parse error
    pub fn xml(message: impl Into<String>) -> Self {
        Self::XmlParse {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// True for caller input errors raised before any network call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. }
                | Error::MutuallyExclusive { .. }
                | Error::PageSizeOutOfRange { .. }
        )
    }

    /// Service error code, if this error came back from EC2
    pub fn service_code(&self) -> Option<&str> {
        match self {
            Error::Service { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True when EC2 answered a `DryRun` request with "would have succeeded"
    pub fn is_dry_run_success(&self) -> bool {
        self.service_code() == Some("DryRunOperation")
    }
}

/// Result type alias for ec2kit
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::mutually_exclusive("StartTime", "StartTimeUtc");
        assert_eq!(
            err.to_string(),
            "Parameters 'StartTime' and 'StartTimeUtc' are mutually exclusive"
        );

        let err = Error::PageSizeOutOfRange {
            param: "MaxResults".to_string(),
            value: 2,
            min: 5,
            max: 1000,
        };
        assert_eq!(err.to_string(), "MaxResults must be between 5 and 1000, got 2");

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");
    }

    #[test]
    fn test_service_error_display() {
        let err = Error::Service {
            status: 400,
            code: "InvalidInstanceID.NotFound".to_string(),
            message: "The instance ID 'i-1' does not exist".to_string(),
            request_id: Some("req-1".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "InvalidInstanceID.NotFound: The instance ID 'i-1' does not exist (HTTP 400, request id req-1)"
        );
    }

    #[test]
    fn test_is_validation() {
        assert!(Error::validation("bad").is_validation());
        assert!(Error::mutually_exclusive("a", "b").is_validation());
        assert!(Error::PageSizeOutOfRange {
            param: "MaxResults".to_string(),
            value: 0,
            min: 5,
            max: 1000
        }
        .is_validation());

        assert!(!Error::http_status(500, "").is_validation());
        assert!(!Error::config("test").is_validation());
    }

    #[test]
    fn test_dry_run_success() {
        let err = Error::Service {
            status: 412,
            code: "DryRunOperation".to_string(),
            message: "Request would have succeeded".to_string(),
            request_id: None,
        };
        assert!(err.is_dry_run_success());
        assert!(!Error::validation("x").is_dry_run_success());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
