//! Authentication module
//!
//! Supports: static keys, environment variables, shared credentials/config
//! profiles. Requests are signed with AWS Signature Version 4.
//!
//! The `CredentialProvider` resolves credentials once per client; the
//! `RequestSigner` turns them into signed headers for each call.

mod provider;
mod signer;
mod types;

pub use provider::{parse_ini_file, CredentialProvider};
pub use signer::RequestSigner;
pub use types::{mask_credential, CredentialSource, Credentials};
