//! Credential types

use std::fmt;

/// AWS credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Access key id
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Session token for temporary credentials
    pub session_token: Option<String>,
    /// Where these credentials came from
    pub source: CredentialSource,
}

impl Credentials {
    /// Create static credentials
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
            source: CredentialSource::Static,
        }
    }

    /// Tag the credentials with their source
    #[must_use]
    pub fn with_source(mut self, source: CredentialSource) -> Self {
        self.source = source;
        self
    }
}

// Keeps secrets out of debug logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &mask_credential(&self.access_key_id))
            .field("secret_access_key", &"***")
            .field("has_session_token", &self.session_token.is_some())
            .field("source", &self.source)
            .finish()
    }
}

/// Origin of a set of credentials
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CredentialSource {
    /// Supplied directly
    #[default]
    Static,
    /// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`
    Environment,
    /// Shared credentials file profile
    CredentialsFile {
        /// Profile name
        profile: String,
    },
    /// Shared config file profile
    ConfigFile {
        /// Profile name
        profile: String,
    },
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Environment => write!(f, "environment"),
            Self::CredentialsFile { profile } => write!(f, "credentials file [{profile}]"),
            Self::ConfigFile { profile } => write!(f, "config file [{profile}]"),
        }
    }
}

/// Mask a credential value for logging
pub fn mask_credential(value: &str) -> String {
    if value.len() <= 8 {
        "*".repeat(value.len())
    } else {
        format!("{}...{}", &value[..4], &value[value.len() - 4..])
    }
}
