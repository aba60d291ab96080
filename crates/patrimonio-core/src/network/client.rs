//! HTTP client wrapper.
//!
//! A thin layer over reqwest with a configured timeout and user agent,
//! mapping transport failures into the crate error type.

use crate::config::NetworkConfig;
use crate::{PatrimonioError, Result};
use reqwest::{header, Client, Response};
use std::time::Duration;

/// HTTP client for registry requests.
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client with the default request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| PatrimonioError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(e),
            })?;

        Ok(Self { client, timeout })
    }

    /// The timeout requests are issued with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Make a GET request.
    pub async fn get(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::transport_error("GET", url, e))?;
        Ok(response)
    }

    /// Make a GET request with a per-request timeout, for probes that
    /// should give up faster than regular operations.
    pub async fn get_with_timeout(&self, url: &str, timeout: Duration) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::transport_error("GET", url, e))?;
        Ok(response)
    }

    /// POST a JSON-serialized body with a `text/plain` content type.
    ///
    /// The registry runs as an Apps Script web app, which cannot answer a
    /// CORS preflight; a text/plain body keeps the request "simple" so no
    /// preflight is issued.
    pub async fn post_text_json<T: serde::Serialize>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<Response> {
        let payload = serde_json::to_string(body)?;
        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(payload)
            .send()
            .await
            .map_err(|e| Self::transport_error("POST", url, e))?;
        Ok(response)
    }

    fn transport_error(verb: &str, url: &str, err: reqwest::Error) -> PatrimonioError {
        if err.is_timeout() {
            PatrimonioError::Timeout(NetworkConfig::REQUEST_TIMEOUT)
        } else {
            PatrimonioError::Network {
                message: format!("{} {} failed: {}", verb, host_of(url), err),
                source: Some(err),
            }
        }
    }
}

/// Extract the host from a URL for log and error messages, so full
/// endpoint URLs (which embed the deployment id) stay out of them.
pub fn host_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}
