//! SigV4 request signing

use super::types::{mask_credential, Credentials};
use crate::error::{Error, Result};
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4::SigningParams;
use aws_smithy_runtime_api::client::identity::Identity;
use std::time::SystemTime;
use tracing::trace;

/// Signs requests for one service in one region
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
    region: String,
    service: String,
}

impl RequestSigner {
    /// Create a signer
    pub fn new(credentials: Credentials, region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
            service: service.into(),
        }
    }

    /// Signing region
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sign a request at the current time
    pub fn sign(
        &self,
        method: &str,
        url: &str,
        headers: &[(String, String)],
        body: &[u8],
    ) -> Result<Vec<(String, String)>> {
        self.sign_at(method, url, headers, body, SystemTime::now())
    }

    /// Sign a request at a fixed time.
    ///
    /// `headers` must include `host`. Returns the headers to add to the
    /// request (`authorization`, `x-amz-date`, and the session token if any).
    pub fn sign_at(
        &self,
        method: &str,
        url: &str,
        headers: &[(String, String)],
        body: &[u8],
        time: SystemTime,
    ) -> Result<Vec<(String, String)>> {
        let creds = aws_credential_types::Credentials::new(
            &self.credentials.access_key_id,
            &self.credentials.secret_access_key,
            self.credentials.session_token.clone(),
            None,
            "ec2kit",
        );
        let identity: Identity = creds.into();

        let signing_params = SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(&self.service)
            .time(time)
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| Error::signing(e.to_string()))?
            .into();

        let signable_request = SignableRequest::new(
            method,
            url,
            headers.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            SignableBody::Bytes(body),
        )
        .map_err(|e| Error::signing(e.to_string()))?;

        let (instructions, _signature) = sign(signable_request, &signing_params)
            .map_err(|e| Error::signing(e.to_string()))?
            .into_parts();

        trace!(
            "Signed {} {} as {}",
            method,
            url,
            mask_credential(&self.credentials.access_key_id)
        );

        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }
}
