//! Tool settings
//!
//! Settings come from four layers, later ones winning:
//! 1. built-in defaults
//! 2. a YAML settings file (`--settings`, `$EC2KIT_CONFIG`, or
//!    `<config dir>/ec2kit/config.yaml`)
//! 3. environment variables
//! 4. command-line flags
//!
//! ```yaml
//! region: eu-west-1
//! profile: ops
//! endpoint_url: http://localhost:4566
//! timeout_secs: 30
//! rate_limit:
//!   requests_per_second: 5
//!   burst_size: 5
//! format: pretty
//! ```

use crate::error::{Error, Result};
use crate::http::{Ec2ClientConfig, RateLimiterConfig};
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable naming a settings file
pub const CONFIG_ENV: &str = "EC2KIT_CONFIG";

/// Fallback region when nothing else names one
pub const DEFAULT_REGION: &str = "us-east-1";

// ============================================================================
// Settings
// ============================================================================

/// Effective tool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Region to call
    #[serde(default)]
    pub region: Option<String>,

    /// Credentials profile
    #[serde(default)]
    pub profile: Option<String>,

    /// Custom EC2 endpoint
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Client-side rate limit; omit for the default
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Continuation token store file
    #[serde(default)]
    pub state_file: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            endpoint_url: None,
            timeout_secs: default_timeout_secs(),
            rate_limit: None,
            format: OutputFormat::default(),
            state_file: None,
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--region`
    pub region: Option<String>,
    /// `--profile`
    pub profile: Option<String>,
    /// `--endpoint-url`
    pub endpoint_url: Option<String>,
    /// `--timeout`
    pub timeout_secs: Option<u64>,
    /// `--format`
    pub format: Option<OutputFormat>,
    /// `--state`
    pub state_file: Option<PathBuf>,
}

impl Settings {
    /// Parse settings from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        debug!("Loading settings from {}", path.display());
        Self::from_yaml(&contents)
    }

    /// Default settings file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ec2kit").join("config.yaml"))
    }

    /// Load file and environment layers.
    ///
    /// An explicitly named file (flag or `$EC2KIT_CONFIG`) must exist; the
    /// default location is skipped when absent.
    pub fn load(explicit: Option<&Path>, vars: &HashMap<String, String>) -> Result<Self> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| env_var(vars, CONFIG_ENV).map(PathBuf::from));

        let mut settings = match named {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(path)?,
                None => Self::default(),
            },
        };

        settings.apply_env(vars)?;
        Ok(settings)
    }

    /// Apply environment variables.
    ///
    /// `AWS_PROFILE` is resolved by the credential provider, not here.
    pub fn apply_env(&mut self, vars: &HashMap<String, String>) -> Result<()> {
        if let Some(region) = env_var(vars, "AWS_REGION").or_else(|| env_var(vars, "AWS_DEFAULT_REGION")) {
            self.region = Some(region.to_string());
        }
        if let Some(endpoint) =
            env_var(vars, "AWS_ENDPOINT_URL_EC2").or_else(|| env_var(vars, "AWS_ENDPOINT_URL"))
        {
            self.endpoint_url = Some(endpoint.to_string());
        }
        if let Some(format) = env_var(vars, "EC2KIT_FORMAT") {
            self.format = format.parse()?;
        }
        if let Some(timeout) = env_var(vars, "EC2KIT_TIMEOUT_SECS") {
            self.timeout_secs = timeout.parse().map_err(|_| Error::InvalidConfigValue {
                field: "EC2KIT_TIMEOUT_SECS".to_string(),
                message: format!("'{timeout}' is not a number of seconds"),
            })?;
        }
        self.validate()
    }

    /// Apply command-line flags
    pub fn apply_overrides(&mut self, overrides: &Overrides) -> Result<()> {
        if let Some(region) = &overrides.region {
            self.region = Some(region.clone());
        }
        if let Some(profile) = &overrides.profile {
            self.profile = Some(profile.clone());
        }
        if let Some(endpoint) = &overrides.endpoint_url {
            self.endpoint_url = Some(endpoint.clone());
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs = timeout;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(path) = &overrides.state_file {
            self.state_file = Some(path.clone());
        }
        self.validate()
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::InvalidConfigValue {
                field: "timeout_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(limit) = &self.rate_limit {
            if limit.requests_per_second == 0 {
                return Err(Error::InvalidConfigValue {
                    field: "rate_limit.requests_per_second".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if matches!(&self.region, Some(r) if r.trim().is_empty()) {
            return Err(Error::InvalidConfigValue {
                field: "region".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Build the EC2 client config for a resolved region
    pub fn client_config(&self, region: impl Into<String>) -> Ec2ClientConfig {
        let mut builder = Ec2ClientConfig::builder()
            .region(region)
            .timeout(Duration::from_secs(self.timeout_secs))
            .rate_limit(self.rate_limit.clone().unwrap_or_default());
        if let Some(endpoint) = &self.endpoint_url {
            builder = builder.endpoint_url(endpoint.clone());
        }
        builder.build()
    }
}

fn env_var<'a>(vars: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    vars.get(name).map(String::as_str).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.format, OutputFormat::Json);
        assert!(settings.region.is_none());
        assert_eq!(Settings::from_yaml("").unwrap(), settings);
    }

    #[test]
    fn test_settings_from_yaml() {
        let yaml = r"
region: eu-west-1
profile: ops
timeout_secs: 10
rate_limit:
  requests_per_second: 5
  burst_size: 2
format: pretty
";
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.region.as_deref(), Some("eu-west-1"));
        assert_eq!(settings.profile.as_deref(), Some("ops"));
        assert_eq!(settings.timeout_secs, 10);
        assert_eq!(settings.rate_limit, Some(RateLimiterConfig::new(5, 2)));
        assert_eq!(settings.format, OutputFormat::Pretty);
    }

    #[test]
    fn test_settings_rejects_bad_values() {
        assert!(Settings::from_yaml("timeout_secs: 0").is_err());
        assert!(Settings::from_yaml("format: xml").is_err());
        assert!(Settings::from_yaml("region: ''").is_err());
        assert!(Settings::from_yaml("rate_limit:\n  requests_per_second: 0\n  burst_size: 1\n").is_err());
    }

    #[test]
    fn test_layering_file_env_cli() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "region: eu-west-1\nprofile: file-profile\ntimeout_secs: 5\n").unwrap();

        let env = vars(&[("AWS_REGION", "us-west-2"), ("EC2KIT_FORMAT", "pretty")]);
        let mut settings = Settings::load(Some(path.as_path()), &env).unwrap();

        assert_eq!(settings.region.as_deref(), Some("us-west-2"));
        assert_eq!(settings.profile.as_deref(), Some("file-profile"));
        assert_eq!(settings.format, OutputFormat::Pretty);
        assert_eq!(settings.timeout_secs, 5);

        settings
            .apply_overrides(&Overrides {
                region: Some("ap-south-1".to_string()),
                format: Some(OutputFormat::Json),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(settings.region.as_deref(), Some("ap-south-1"));
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.profile.as_deref(), Some("file-profile"));
    }

    #[test]
    fn test_load_from_env_named_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, "endpoint_url: http://localhost:4566\n").unwrap();

        let env = vars(&[(CONFIG_ENV, path.to_str().unwrap())]);
        let settings = Settings::load(None, &env).unwrap();
        assert_eq!(settings.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn test_load_missing_named_file() {
        let err = Settings::load(Some(Path::new("/nonexistent/ec2kit.yaml")), &vars(&[])).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_bad_timeout_env() {
        let mut settings = Settings::default();
        let err = settings
            .apply_env(&vars(&[("EC2KIT_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_client_config() {
        let settings = Settings {
            endpoint_url: Some("http://localhost:4566".to_string()),
            timeout_secs: 7,
            ..Default::default()
        };
        let config = settings.client_config("eu-west-1");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.timeout, Duration::from_secs(7));
        assert_eq!(config.endpoint(), "http://localhost:4566");
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::default()));
    }
}
