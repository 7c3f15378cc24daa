// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # ec2kit
//!
//! Typed EC2 Query API calls with continuation-token paging.
//!
//! ## Features
//!
//! - **Typed operations**: one struct per action, validated before sending
//! - **Paging**: automatic iteration, emit limit, manual single-page mode,
//!   and resuming from a saved token
//! - **Signed requests**: SigV4 over credentials from the environment or
//!   shared profiles
//! - **Streaming output**: records are written page by page as JSON lines
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ec2kit::auth::CredentialProvider;
//! use ec2kit::engine::{OperationEngine, PagingConfig};
//! use ec2kit::http::{Ec2Client, Ec2ClientConfig};
//! use ec2kit::operations::DescribeVolumes;
//! use ec2kit::output::{MessageWriter, OutputFormat};
//! use ec2kit::state::StateManager;
//!
//! #[tokio::main]
//! async fn main() -> ec2kit::Result<()> {
//!     let credentials = CredentialProvider::from_env().credentials()?;
//!     let config = Ec2ClientConfig::builder().region("eu-west-1").build();
//!     let client = Ec2Client::new(config, credentials)?;
//!
//!     let mut engine = OperationEngine::new(client, StateManager::in_memory());
//!     let mut out = MessageWriter::stdio(OutputFormat::Json);
//!     let paging = PagingConfig::new().with_max_items(Some(100));
//!
//!     engine.run_paged(&DescribeVolumes::default(), &paging, &mut out).await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 CLI (clap) + Settings (YAML)                 │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │         Engine: pages → RECORD / PAGE / STATE / ERROR        │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌────────────┬─────────────┬───┴─────────┬────────────┬─────────┐
//! │ Operations │  Paginate   │    HTTP     │   Decode   │  Auth   │
//! ├────────────┼─────────────┼─────────────┼────────────┼─────────┤
//! │ Describe*  │ Token loop  │ POST form   │ Query XML  │ Env     │
//! │ Create*    │ Emit limit  │ Rate limit  │ Error XML  │ Profile │
//! │ Modify*    │ Manual mode │ Timeout     │            │ SigV4   │
//! └────────────┴─────────────┴─────────────┴────────────┴─────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types (filters, tags)
pub mod types;

/// Credentials and request signing
pub mod auth;

/// EC2 Query client with rate limiting
pub mod http;

/// Continuation-token paging
pub mod pagination;

/// Query API response decoding (XML)
pub mod decode;

/// Typed EC2 operations
pub mod operations;

/// Saved continuation tokens
pub mod state;

/// Message output
pub mod output;

/// Main execution engine
pub mod engine;

/// Settings file and layering
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
