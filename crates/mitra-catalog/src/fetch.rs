//! Single-attempt HTTP fetches against the catalog API.
//!
//! Every call is independent: no retries, no shared per-call state, no side
//! effects beyond the request itself. Failures come back as one of
//! [`Error::Transport`], [`Error::Http`] or [`Error::Decode`].

use std::time::{Duration, Instant};

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use mitra_core::{CatalogConfig, Error, Result};

/// Outcome of one fetch: the decoded JSON body or the failure reason.
pub type FetchOutcome = Result<Value>;

/// Per-call request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query-string parameters, in order.
    pub params: Vec<(String, String)>,
    /// Overrides the client-wide timeout for this call.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Issues authenticated GET requests against the catalog.
#[derive(Clone)]
pub struct FetchOrchestrator {
    client: Client,
    base_url: String,
    api_token: String,
}

impl FetchOrchestrator {
    /// Build from validated catalog configuration.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        debug!(
            subsystem = "catalog",
            component = "fetch",
            base_url = %config.base_url,
            "Initializing catalog fetcher"
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Perform one GET and decode the body as JSON.
    pub async fn request(&self, path: &str, options: &RequestOptions) -> FetchOutcome {
        let url = self.endpoint_url(path);
        let start = Instant::now();

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .bearer_auth(&self.api_token)
            .query(&options.params);
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            warn!(
                subsystem = "catalog",
                component = "fetch",
                op = "request",
                path,
                error = %e,
                "Catalog request failed"
            );
            Error::Transport(format!("Request to {} failed: {}", path, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                subsystem = "catalog",
                component = "fetch",
                op = "request",
                path,
                status = status.as_u16(),
                "Catalog returned non-success status"
            );
            return Err(Error::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await.map_err(|e| {
            Error::Transport(format!("Failed to read body from {}: {}", path, e))
        })?;
        let value: Value = serde_json::from_slice(&body).map_err(|e| {
            warn!(
                subsystem = "catalog",
                component = "fetch",
                op = "request",
                path,
                error = %e,
                "Catalog body is not valid JSON"
            );
            Error::Decode(format!("Malformed body from {}: {}", path, e))
        })?;

        debug!(
            subsystem = "catalog",
            component = "fetch",
            op = "request",
            path,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Catalog request complete"
        );
        Ok(value)
    }
}
