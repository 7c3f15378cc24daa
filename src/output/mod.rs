//! Output module
//!
//! Renders engine messages for the terminal or for other programs.
//!
//! # Overview
//!
//! - `OutputFormat` - `json` (one message per line) or `pretty`
//! - `MessageWriter` - Writes messages to stdout/stderr or any `Write`

mod writer;

pub use writer::{MessageWriter, OutputFormat};

#[cfg(test)]
mod tests;
