//! Engine types
//!
//! Message types, paging configuration and run statistics.

use crate::error::{Error, Result};
use crate::pagination::{FetchOptions, PageSizeBounds};
use chrono::Utc;
use serde_json::{json, Value};

/// A message emitted while running an operation
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// One result item
    Record {
        /// Action that produced the item
        operation: String,
        /// Page the item arrived on (`None` for single-call operations)
        page: Option<usize>,
        /// Item data
        data: Value,
    },
    /// Summary of one received page
    Page {
        /// Action name
        operation: String,
        /// 1-based page number
        number: usize,
        /// Items on the page
        records: usize,
        /// Token the page was requested with
        request_token: Option<String>,
        /// Token for the following page
        next_token: Option<String>,
    },
    /// Continuation token left over when the run stopped
    State {
        /// Action name
        operation: String,
        /// Token to pass back as `--next-token`
        next_token: String,
    },
    /// Log message
    Log {
        /// Log level
        level: LogLevel,
        /// Log message
        message: String,
    },
    /// A failure after zero or more emitted pages
    Error {
        /// Action name
        operation: String,
        /// Page that failed, for paged runs
        page: Option<usize>,
        /// Service error code, when EC2 returned one
        code: Option<String>,
        /// Error text
        message: String,
    },
    /// End-of-run statistics
    Summary(RunStats),
}

/// Log level for engine messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// General information
    Info,
    /// Warning
    Warn,
    /// Error (non-fatal)
    Error,
}

impl LogLevel {
    /// Upper-case level name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl Message {
    /// Create a record message
    pub fn record(operation: impl Into<String>, page: Option<usize>, data: Value) -> Self {
        Self::Record {
            operation: operation.into(),
            page,
            data,
        }
    }

    /// Create a state message
    pub fn state(operation: impl Into<String>, next_token: impl Into<String>) -> Self {
        Self::State {
            operation: operation.into(),
            next_token: next_token.into(),
        }
    }

    /// Create a log message
    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Self::Log {
            level,
            message: message.into(),
        }
    }

    /// Create an info log
    pub fn info(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Info, message)
    }

    /// Create a warning log
    pub fn warn(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Warn, message)
    }

    /// Create an error message from a failure
    pub fn error(operation: impl Into<String>, page: Option<usize>, error: &Error) -> Self {
        Self::Error {
            operation: operation.into(),
            page,
            code: error.service_code().map(String::from),
            message: error.to_string(),
        }
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a page message
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page { .. })
    }

    /// Check if this is a state message
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }

    /// Check if this is a log message
    pub fn is_log(&self) -> bool {
        matches!(self, Self::Log { .. })
    }

    /// Check if this is an error message
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Wire form: `{"type": "RECORD", "record": {...}}` and friends
    pub fn to_json(&self) -> Value {
        match self {
            Self::Record {
                operation,
                page,
                data,
            } => json!({
                "type": "RECORD",
                "record": {
                    "operation": operation,
                    "page": page,
                    "data": data,
                    "emitted_at": Utc::now().timestamp_millis()
                }
            }),
            Self::Page {
                operation,
                number,
                records,
                request_token,
                next_token,
            } => json!({
                "type": "PAGE",
                "page": {
                    "operation": operation,
                    "number": number,
                    "records": records,
                    "request_token": request_token,
                    "next_token": next_token
                }
            }),
            Self::State {
                operation,
                next_token,
            } => json!({
                "type": "STATE",
                "state": {
                    "operation": operation,
                    "next_token": next_token
                }
            }),
            Self::Log { level, message } => json!({
                "type": "LOG",
                "log": {
                    "level": level.as_str(),
                    "message": message
                }
            }),
            Self::Error {
                operation,
                page,
                code,
                message,
            } => json!({
                "type": "ERROR",
                "error": {
                    "operation": operation,
                    "page": page,
                    "code": code,
                    "message": message
                }
            }),
            Self::Summary(stats) => json!({
                "type": "SUMMARY",
                "summary": {
                    "status": if stats.errors == 0 { "SUCCEEDED" } else if stats.records_emitted == 0 { "FAILED" } else { "PARTIAL" },
                    "records": stats.records_emitted,
                    "pages": stats.pages_fetched,
                    "errors": stats.errors,
                    "duration_ms": stats.duration_ms
                }
            }),
        }
    }
}

/// Receives messages as the engine produces them
pub trait MessageSink {
    /// Handle one message
    fn emit(&mut self, message: Message) -> Result<()>;
}

impl MessageSink for Vec<Message> {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.push(message);
        Ok(())
    }
}

// ============================================================================
// Paging configuration
// ============================================================================

/// Caller paging choices for a paged run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingConfig {
    /// Explicit start token; switches to manual paging
    pub next_token: Option<String>,
    /// `MaxResults` sent with each request
    pub page_size: Option<u32>,
    /// Stop after this many records
    pub max_items: Option<usize>,
    /// Fetch one page only
    pub no_auto_iteration: bool,
    /// Start from the saved token for this operation
    pub resume: bool,
}

impl PagingConfig {
    /// Create a default paging config (auto-iterate everything)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start token
    #[must_use]
    pub fn with_next_token(mut self, token: Option<String>) -> Self {
        self.next_token = token;
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, size: Option<u32>) -> Self {
        self.page_size = size;
        self
    }

    /// Set the emit limit
    #[must_use]
    pub fn with_max_items(mut self, max: Option<usize>) -> Self {
        self.max_items = max;
        self
    }

    /// Fetch a single page
    #[must_use]
    pub fn with_no_auto_iteration(mut self, value: bool) -> Self {
        self.no_auto_iteration = value;
        self
    }

    /// Resume from the saved token
    #[must_use]
    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Build fetch options for the given bounds.
    ///
    /// An explicit token wins over a saved one.
    pub fn fetch_options(&self, bounds: PageSizeBounds, saved_token: Option<String>) -> FetchOptions {
        let options = FetchOptions::new(bounds)
            .with_emit_limit(self.max_items)
            .with_page_size(self.page_size)
            .with_no_auto_iteration(self.no_auto_iteration);

        if self.next_token.is_some() {
            options.with_start_token(self.next_token.clone())
        } else if self.resume {
            options.with_resume_token(saved_token)
        } else {
            options
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Statistics from one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Records emitted
    pub records_emitted: usize,
    /// Pages received
    pub pages_fetched: usize,
    /// Errors encountered
    pub errors: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_emitted += count;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add an error
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
