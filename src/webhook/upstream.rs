use axum::body::Bytes;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::HeaderValue;
use serde::de::IgnoredAny;
use tracing::{debug, error, warn};

use super::error::GatewayError;

/// Single-shot forwarder to the automation webhook.
///
/// Redirects are not followed so a 3xx from the upstream surfaces as a
/// backend error instead of a silent hop.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    url: String,
}

impl UpstreamClient {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts `body` unchanged with the caller's `Authorization` value and
    /// returns the upstream body bytes once they are known to be JSON.
    pub async fn forward(
        &self,
        body: Bytes,
        authorization: &HeaderValue,
    ) -> Result<Bytes, GatewayError> {
        let resp = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, authorization.clone())
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    error!(error = %e, url = %self.url, "upstream request could not be built");
                    GatewayError::Internal
                } else {
                    warn!(error = %e, url = %self.url, "upstream unreachable");
                    GatewayError::BackendUnreachable
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %text, "upstream returned a non-OK status");
            return Err(GatewayError::BackendStatus(status.as_u16()));
        }

        let bytes = resp.bytes().await.map_err(|e| {
            error!(error = %e, "failed to read upstream body");
            GatewayError::Internal
        })?;
        if let Err(e) = serde_json::from_slice::<IgnoredAny>(&bytes) {
            error!(error = %e, "upstream body is not JSON");
            return Err(GatewayError::Internal);
        }
        debug!(len = bytes.len(), "relaying upstream response");
        Ok(bytes)
    }
}
