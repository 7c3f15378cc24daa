//! Credential and region resolution
//!
//! Lookup order for credentials:
//! 1. `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` (unless a profile was named explicitly)
//! 2. the profile in the shared credentials file
//! 3. the profile in the shared config file
//!
//! Region: `AWS_REGION`, then `AWS_DEFAULT_REGION`, then the profile's
//! `region` key in the config file.

use super::types::{CredentialSource, Credentials};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Default profile name
pub const DEFAULT_PROFILE: &str = "default";

/// Resolves credentials and region from environment and shared files
#[derive(Debug, Clone, Default)]
pub struct CredentialProvider {
    vars: HashMap<String, String>,
    profile: Option<String>,
    credentials_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
}

impl CredentialProvider {
    /// Create a provider over the process environment
    pub fn from_env() -> Self {
        Self::with_vars(std::env::vars())
    }

    /// Create a provider over an explicit variable set
    pub fn with_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            vars: vars.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Use a specific profile (overrides `AWS_PROFILE`)
    #[must_use]
    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    /// Override the shared credentials file path
    #[must_use]
    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    /// Override the shared config file path
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Effective profile name
    pub fn profile(&self) -> String {
        self.profile
            .clone()
            .or_else(|| self.var("AWS_PROFILE").map(String::from))
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }

    fn credentials_path(&self) -> Option<PathBuf> {
        self.credentials_file
            .clone()
            .or_else(|| self.var("AWS_SHARED_CREDENTIALS_FILE").map(PathBuf::from))
            .or_else(|| dirs::home_dir().map(|h| h.join(".aws").join("credentials")))
    }

    fn config_path(&self) -> Option<PathBuf> {
        self.config_file
            .clone()
            .or_else(|| self.var("AWS_CONFIG_FILE").map(PathBuf::from))
            .or_else(|| dirs::home_dir().map(|h| h.join(".aws").join("config")))
    }

    /// Resolve credentials
    pub fn credentials(&self) -> Result<Credentials> {
        // An explicit profile wins over environment keys
        if self.profile.is_none() {
            if let Some(creds) = self.env_credentials() {
                debug!("Using credentials from environment");
                return Ok(creds);
            }
        }

        let profile = self.profile();

        if let Some(creds) = self.shared_file_credentials(&profile)? {
            debug!("Using credentials from credentials file profile '{}'", profile);
            return Ok(creds);
        }

        if let Some(creds) = self.config_file_credentials(&profile)? {
            debug!("Using credentials from config file profile '{}'", profile);
            return Ok(creds);
        }

        Err(Error::credentials(format!(
            "no credentials found in environment or for profile '{profile}'"
        )))
    }

    fn env_credentials(&self) -> Option<Credentials> {
        let access_key_id = self.var("AWS_ACCESS_KEY_ID")?;
        let secret_access_key = self.var("AWS_SECRET_ACCESS_KEY")?;
        let session_token = self.var("AWS_SESSION_TOKEN").map(String::from);
        Some(
            Credentials::new(access_key_id, secret_access_key, session_token)
                .with_source(CredentialSource::Environment),
        )
    }

    fn shared_file_credentials(&self, profile: &str) -> Result<Option<Credentials>> {
        let Some(sections) = self.credentials_path().and_then(|p| read_ini(&p)) else {
            return Ok(None);
        };
        let Some(section) = sections.get(profile) else {
            return Ok(None);
        };
        section_credentials(section, profile).map(|c| {
            c.map(|c| {
                c.with_source(CredentialSource::CredentialsFile {
                    profile: profile.to_string(),
                })
            })
        })
    }

    fn config_file_credentials(&self, profile: &str) -> Result<Option<Credentials>> {
        let Some(sections) = self.config_path().and_then(|p| read_ini(&p)) else {
            return Ok(None);
        };
        let Some(section) = sections.get(profile) else {
            return Ok(None);
        };
        section_credentials(section, profile).map(|c| {
            c.map(|c| {
                c.with_source(CredentialSource::ConfigFile {
                    profile: profile.to_string(),
                })
            })
        })
    }

    /// Resolve the region, if configured anywhere
    pub fn region(&self) -> Option<String> {
        if let Some(region) = self.var("AWS_REGION").or_else(|| self.var("AWS_DEFAULT_REGION")) {
            return Some(region.to_string());
        }

        let sections = self.config_path().and_then(|p| read_ini(&p))?;
        sections.get(&self.profile())?.get("region").cloned()
    }
}

fn read_ini(path: &PathBuf) -> Option<HashMap<String, HashMap<String, String>>> {
    let content = fs::read_to_string(path).ok()?;
    Some(parse_ini_file(&content))
}

/// Keys present but half-filled are an error; no keys at all is "not here"
fn section_credentials(
    section: &HashMap<String, String>,
    profile: &str,
) -> Result<Option<Credentials>> {
    match (
        section.get("aws_access_key_id"),
        section.get("aws_secret_access_key"),
    ) {
        (Some(access), Some(secret)) => Ok(Some(Credentials::new(
            access.clone(),
            secret.clone(),
            section.get("aws_session_token").cloned(),
        ))),
        (None, None) => Ok(None),
        _ => Err(Error::credentials(format!(
            "profile '{profile}' must set both aws_access_key_id and aws_secret_access_key"
        ))),
    }
}

/// Parse an INI-style file into sections.
///
/// `[profile name]` headers (config file style) are stored as `name`.
pub fn parse_ini_file(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current_section = String::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            current_section = line[1..line.len() - 1].trim().to_string();
            if let Some(name) = current_section.strip_prefix("profile ") {
                current_section = name.trim().to_string();
            }
            sections.entry(current_section.clone()).or_default();
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            if !current_section.is_empty() {
                sections
                    .entry(current_section.clone())
                    .or_default()
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }

    sections
}
