//! Chat message shape and HTTP plumbing shared by the HTTP backends.
//!
//! Ollama's `/api/chat` and the OpenAI `/chat/completions` endpoint accept
//! the same `{role, content}` messages, so both backends build their
//! payloads from [`ChatMessage`].

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use mitra_core::{Error, Result};

/// Upper bound on generated tokens; summaries are two or three sentences.
pub const MAX_SUMMARY_TOKENS: u32 = 320;

/// Generations slower than this are logged at WARN.
pub const SLOW_GENERATION_MS: u64 = 30_000;

/// Timeout for health probes.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Messages for one exchange; an empty system instruction is omitted.
pub fn exchange(system: &str, prompt: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if !system.trim().is_empty() {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(prompt));
    messages
}

/// Reject base URLs without an http(s) scheme.
pub(crate) fn check_base_url(backend: &str, base_url: &str) -> Result<()> {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        return Ok(());
    }
    Err(Error::Config(format!(
        "{} base_url must start with http:// or https://, got: {}",
        backend, base_url
    )))
}

pub(crate) fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}

pub(crate) fn join_url(base_url: &str, endpoint: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), endpoint)
}

/// Log completion, and a WARN when the call was slow.
pub(crate) fn record_generation(
    component: &str,
    elapsed_ms: u64,
    prompt_len: usize,
    response_len: usize,
) {
    debug!(
        subsystem = "inference",
        component,
        response_len,
        duration_ms = elapsed_ms,
        "Generation complete"
    );
    if elapsed_ms > SLOW_GENERATION_MS {
        warn!(
            subsystem = "inference",
            component,
            duration_ms = elapsed_ms,
            prompt_len,
            slow = true,
            "Slow generation operation"
        );
    }
}

/// GET a cheap endpoint; any transport error or non-2xx is "unhealthy".
pub(crate) async fn probe(component: &str, request: RequestBuilder) -> Result<bool> {
    match request.timeout(HEALTH_TIMEOUT).send().await {
        Ok(resp) if resp.status().is_success() => {
            debug!(subsystem = "inference", component, "Health check passed");
            Ok(true)
        }
        Ok(resp) => {
            warn!(
                subsystem = "inference",
                component,
                status = resp.status().as_u16(),
                "Health check failed"
            );
            Ok(false)
        }
        Err(e) => {
            warn!(subsystem = "inference", component, error = %e, "Health check unreachable");
            Ok(false)
        }
    }
}
