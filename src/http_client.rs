//! Shared HTTP client for every pipeline stage
//!
//! Features:
//! - TLS 1.3 via rustls
//! - Brotli, Zstd, Gzip compression (auto-negotiated)
//! - Connection pooling with keep-alive
//! - Browser-like `User-Agent` (the trending feed rejects bare clients)
//!
//! No request timeout is configured: every call blocks the pipeline until
//! the transport gives up on its own.

use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, info, instrument};

/// User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0 Safari/537.36";

/// HTTP client shared by the pipeline stages
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new client with the default user agent
    pub fn new() -> Result<Self> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Create client with a specific user agent
    pub fn with_user_agent(user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).context("invalid user agent")?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let client = Client::builder()
            // ═══════════════════════════════════════════════════════════════
            // CONNECTIONS
            // ═══════════════════════════════════════════════════════════════
            // Let the server negotiate HTTP/1.1 or HTTP/2
            .http2_adaptive_window(true)
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .use_rustls_tls()
            // ═══════════════════════════════════════════════════════════════
            // COMPRESSION (auto-negotiated via Accept-Encoding)
            // ═══════════════════════════════════════════════════════════════
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            .default_headers(headers)
            // ═══════════════════════════════════════════════════════════════
            // REDIRECTS (stock image endpoints redirect to the CDN)
            // ═══════════════════════════════════════════════════════════════
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }

    /// GET a URL, returning the response whatever its status
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<Response> {
        debug!("GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        info!(
            status = %response.status(),
            version = ?response.version(),
            "Response received"
        );

        Ok(response)
    }

    /// GET a URL and return the body bytes, whatever the status
    pub async fn get_bytes(&self, url: &str) -> Result<(reqwest::StatusCode, Bytes)> {
        let response = self.get(url).await?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .with_context(|| format!("failed to read body from {url}"))?;
        Ok((status, body))
    }

    /// Start a POST request
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Start a PUT request
    pub fn put(&self, url: &str) -> RequestBuilder {
        self.client.put(url)
    }

    /// Get the underlying reqwest client
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

/// Fail with the response body when the status is not a success.
///
/// External APIs report errors in the body; `error_for_status` would drop it.
pub async fn ensure_success(response: Response, service: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    anyhow::bail!(
        "{service} returned {status}: {}",
        body.chars().take(500).collect::<String>()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_default_user_agent() {
        assert!(HttpClient::new().is_ok());
    }

    #[test]
    fn rejects_user_agent_with_newline() {
        assert!(HttpClient::with_user_agent("bad\nagent").is_err());
    }
}
