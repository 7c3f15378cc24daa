//! EC2 Query protocol client
//!
//! Sends `Action=...&Version=...` form posts signed with SigV4:
//! - Client-side rate limiting to stay under EC2 request quotas
//! - Error XML mapped to `Error::Service`
//! - One attempt per call; there is no retry loop

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{mask_credential, Credentials, RequestSigner};
use crate::error::{Error, Result};
use crate::decode::parse_error_response;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, trace, warn};
use url::Url;

/// EC2 API version sent with every request
pub const EC2_API_VERSION: &str = "2016-11-15";

/// Signing name of the EC2 service
const SERVICE_NAME: &str = "ec2";

/// Configuration for the EC2 client
#[derive(Debug, Clone)]
pub struct Ec2ClientConfig {
    /// Region to call and sign for
    pub region: String,
    /// Custom endpoint (LocalStack, VPC endpoint, tests)
    pub endpoint_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for Ec2ClientConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint_url: None,
            timeout: Duration::from_secs(30),
            rate_limit: Some(RateLimiterConfig::default()),
            user_agent: format!("ec2kit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Ec2ClientConfig {
    /// Create a new config builder
    pub fn builder() -> Ec2ClientConfigBuilder {
        Ec2ClientConfigBuilder::default()
    }

    /// Endpoint URL for the configured region
    pub fn endpoint(&self) -> String {
        if let Some(endpoint) = &self.endpoint_url {
            return endpoint.trim_end_matches('/').to_string();
        }
        let domain = if self.region.starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        };
        format!("https://ec2.{}.{}", self.region, domain)
    }
}

/// Builder for EC2 client config
#[derive(Default)]
pub struct Ec2ClientConfigBuilder {
    config: Ec2ClientConfig,
}

impl Ec2ClientConfigBuilder {
    /// Set the region
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.region = region.into();
        self
    }

    /// Set a custom endpoint
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> Ec2ClientConfig {
        self.config
    }
}

/// Signed EC2 Query API client
pub struct Ec2Client {
    client: Client,
    config: Ec2ClientConfig,
    endpoint: Url,
    signer: RequestSigner,
    rate_limiter: Option<RateLimiter>,
}

impl Ec2Client {
    /// Create a client for the given credentials
    pub fn new(config: Ec2ClientConfig, credentials: Credentials) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint())?;
        if endpoint.host_str().is_none() {
            return Err(Error::config(format!("endpoint '{endpoint}' has no host")));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        debug!(
            "Creating EC2 client for region: {}, endpoint: {}, access_key: {} ({})",
            config.region,
            endpoint,
            mask_credential(&credentials.access_key_id),
            credentials.source
        );

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);
        let signer = RequestSigner::new(credentials, config.region.clone(), SERVICE_NAME);

        Ok(Self {
            client,
            config,
            endpoint,
            signer,
            rate_limiter,
        })
    }

    /// Client configuration
    pub fn config(&self) -> &Ec2ClientConfig {
        &self.config
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Invoke an action and return the raw XML response body
    pub async fn call(&self, action: &str, params: &[(String, String)]) -> Result<String> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let body = encode_form(action, params);
        trace!("{} form body: {}", action, body);

        let host = match (self.endpoint.host_str(), self.endpoint.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(Error::config("endpoint has no host")),
        };
        let content_type = "application/x-www-form-urlencoded; charset=utf-8";
        let headers = vec![
            ("host".to_string(), host),
            ("content-type".to_string(), content_type.to_string()),
        ];

        let signed = self
            .signer
            .sign("POST", self.endpoint.as_str(), &headers, body.as_bytes())?;

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("content-type", content_type);
        for (name, value) in signed {
            request = request.header(name, value);
        }

        debug!("Calling {} at {}", action, self.endpoint);
        let response = request.body(body).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        let text = response.text().await?;
        debug!("{} response status: {}", action, status);

        if !status.is_success() {
            warn!(
                "EC2 {} failed: status={}, body={}",
                action,
                status,
                truncate_chars(&text, 500)
            );
            return Err(match parse_error_response(&text) {
                Some(err) => Error::Service {
                    status: status.as_u16(),
                    code: err.code,
                    message: err.message,
                    request_id: err.request_id,
                },
                None => Error::http_status(status.as_u16(), text),
            });
        }

        Ok(text)
    }
}

impl std::fmt::Debug for Ec2Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ec2Client")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint.as_str())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Prefix of `text` holding at most `max` characters
pub(super) fn truncate_chars(text: &str, max: usize) -> &str {
    text.char_indices().nth(max).map_or(text, |(i, _)| &text[..i])
}

/// Form-encode the action, version and parameters in order
pub fn encode_form(action: &str, params: &[(String, String)]) -> String {
    let mut pairs = vec![
        format!("Action={}", urlencoding::encode(action)),
        format!("Version={}", urlencoding::encode(EC2_API_VERSION)),
    ];
    pairs.extend(
        params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v))),
    );
    pairs.join("&")
}
