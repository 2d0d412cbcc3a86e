//! OpenAI-compatible backend implementation.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use mitra_core::{Error, GenerationBackend, InferenceBackend, Result};

use super::error::{to_mitra_error, OpenAIErrorCode};
use super::types::{ChatCompletionRequest, ChatCompletionResponse, OpenAIErrorResponse};
use crate::chat::{self, MAX_SUMMARY_TOKENS};

/// Default OpenAI API endpoint.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = "gpt-4o-mini";

/// Default timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for an OpenAI-compatible backend.
#[derive(Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key (optional for local endpoints).
    pub api_key: Option<String>,
    /// Model used for summaries.
    pub gen_model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// HTTP-Referer header for OpenRouter rankings.
    pub http_referer: Option<String>,
    /// X-Title header for the app name on OpenRouter.
    pub x_title: Option<String>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: None,
            gen_model: DEFAULT_GEN_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            http_referer: None,
            x_title: None,
        }
    }
}

impl fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("gen_model", &self.gen_model)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("http_referer", &self.http_referer)
            .field("x_title", &self.x_title)
            .finish()
    }
}

impl OpenAIConfig {
    pub fn validate(&self) -> Result<()> {
        chat::check_base_url("OpenAI", &self.base_url)?;
        if self.gen_model.trim().is_empty() {
            return Err(Error::Config("OPENAI_GEN_MODEL cannot be empty".to_string()));
        }
        if self.timeout_seconds == 0 {
            return Err(Error::Config(
                "OPENAI_TIMEOUT must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Summary generation through any `/chat/completions` server.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        config.validate()?;
        let client = chat::build_client(config.timeout_seconds)?;

        info!(
            subsystem = "inference",
            component = "openai",
            base_url = %config.base_url,
            model = %config.gen_model,
            authenticated = config.api_key.is_some(),
            "OpenAI-compatible backend ready"
        );

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        chat::join_url(&self.config.base_url, endpoint)
    }

    fn with_auth(&self, req: RequestBuilder) -> RequestBuilder {
        match self.config.api_key {
            Some(ref api_key) => req.bearer_auth(api_key),
            None => req,
        }
    }

    /// POST with auth and the optional OpenRouter attribution headers.
    fn post(&self, endpoint: &str) -> RequestBuilder {
        let mut req = self.with_auth(self.client.post(self.url(endpoint)));
        if let Some(ref referer) = self.config.http_referer {
            req = req.header("HTTP-Referer", referer);
        }
        if let Some(ref title) = self.config.x_title {
            req = req.header("X-Title", title);
        }
        req.header("Content-Type", "application/json")
    }

    /// Classify a non-success response.
    async fn error_from_response(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let (message, error_type) = match response.json::<OpenAIErrorResponse>().await {
            Ok(body) => (body.error.message, body.error.error_type),
            Err(_) => ("no error body".to_string(), String::new()),
        };
        let code = OpenAIErrorCode::from_response(status, &error_type);
        warn!(
            subsystem = "inference",
            component = "openai",
            status,
            code = ?code,
            transient = code.is_transient(),
            "Completion request rejected"
        );
        to_mitra_error(code, &format!("{} ({})", message, status))
    }
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    #[instrument(skip(self, system, prompt), fields(subsystem = "inference", component = "openai", op = "generate", model = %self.config.gen_model, prompt_len = prompt.len()))]
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let request = ChatCompletionRequest {
            model: &self.config.gen_model,
            messages: chat::exchange(system, prompt),
            max_tokens: MAX_SUMMARY_TOKENS,
            stream: false,
        };

        let response = self
            .post("/chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("Completion endpoint unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("Unreadable completion: {}", e)))?;
        if let Some(ref usage) = completion.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion usage"
            );
        }

        let content = completion.into_content()?;
        chat::record_generation(
            "openai",
            start.elapsed().as_millis() as u64,
            prompt.len(),
            content.len(),
        );
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }
}

#[async_trait]
impl InferenceBackend for OpenAIBackend {
    async fn health_check(&self) -> Result<bool> {
        chat::probe("openai", self.with_auth(self.client.get(self.url("/models")))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenAIConfig::default();
        assert_eq!(config.base_url, DEFAULT_OPENAI_URL);
        assert_eq!(config.gen_model, DEFAULT_GEN_MODEL);
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = OpenAIConfig {
            api_key: Some("sk-very-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = OpenAIBackend::new(OpenAIConfig {
            base_url: "api.openai.com".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_local_endpoint_needs_no_key() {
        let backend = OpenAIBackend::new(OpenAIConfig {
            base_url: "http://localhost:11434/v1/".to_string(),
            gen_model: "llama3.2:3b".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(backend.url("/models"), "http://localhost:11434/v1/models");
        assert_eq!(backend.model_name(), "llama3.2:3b");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = OpenAIConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
