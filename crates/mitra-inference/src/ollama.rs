//! Ollama generation backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, instrument};

use mitra_core::{defaults, Error, GenerationBackend, InferenceBackend, Result};

use crate::chat::{self, ChatMessage, MAX_SUMMARY_TOKENS};

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = defaults::OLLAMA_URL;

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = defaults::GEN_MODEL;

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = defaults::GEN_TIMEOUT_SECS;

/// Ollama backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    pub base_url: String,
    /// Model used for summaries.
    pub gen_model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            gen_model: DEFAULT_GEN_MODEL.to_string(),
            timeout_secs: GEN_TIMEOUT_SECS,
        }
    }
}

impl OllamaConfig {
    pub fn validate(&self) -> Result<()> {
        chat::check_base_url("Ollama", &self.base_url)?;
        if self.gen_model.trim().is_empty() {
            return Err(Error::Config("OLLAMA_GEN_MODEL cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "Ollama generation timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request payload for `/api/chat`.
#[derive(Debug, Serialize)]
struct SummaryChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: SamplingOptions,
}

#[derive(Debug, Serialize)]
struct SamplingOptions {
    num_predict: u32,
}

/// The part of an `/api/chat` reply we read.
#[derive(Debug, Deserialize)]
struct SummaryChatReply {
    message: ChatMessage,
}

/// Summary generation through a local or remote Ollama server.
pub struct OllamaBackend {
    client: Client,
    config: OllamaConfig,
}

impl OllamaBackend {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        config.validate()?;
        let client = chat::build_client(config.timeout_secs)?;

        info!(
            subsystem = "inference",
            component = "ollama",
            base_url = %config.base_url,
            model = %config.gen_model,
            timeout_secs = config.timeout_secs,
            "Ollama backend ready"
        );

        Ok(Self { client, config })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(OllamaConfig::default())
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        chat::join_url(&self.config.base_url, endpoint)
    }

    /// One non-streaming `/api/chat` exchange.
    ///
    /// `/api/chat` keeps a thinking model's reasoning out of
    /// `message.content`; `/api/generate` does not.
    async fn chat(&self, system: &str, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let request = SummaryChatRequest {
            model: &self.config.gen_model,
            messages: chat::exchange(system, prompt),
            stream: false,
            options: SamplingOptions {
                num_predict: MAX_SUMMARY_TOKENS,
            },
        };

        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("Ollama unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "Ollama returned {}: {}",
                status,
                body.trim()
            )));
        }

        let reply: SummaryChatReply = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("Unreadable Ollama reply: {}", e)))?;

        let content = reply.message.content;
        chat::record_generation(
            "ollama",
            start.elapsed().as_millis() as u64,
            prompt.len(),
            content.len(),
        );
        Ok(content)
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    #[instrument(skip(self, system, prompt), fields(subsystem = "inference", component = "ollama", op = "generate", model = %self.config.gen_model, prompt_len = prompt.len()))]
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(system, prompt).await
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }
}

#[async_trait]
impl InferenceBackend for OllamaBackend {
    async fn health_check(&self) -> Result<bool> {
        chat::probe("ollama", self.client.get(self.url("/api/tags"))).await
    }
}
