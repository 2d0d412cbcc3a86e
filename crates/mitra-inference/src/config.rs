//! Generation backend selection.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MITRA_INFERENCE_BACKEND` | `ollama` | `ollama`, `openai` or `none` |
//! | `OLLAMA_BASE` | `http://127.0.0.1:11434` | Ollama endpoint |
//! | `OLLAMA_GEN_MODEL` | `llama3.2:3b` | Ollama model |
//! | `MITRA_GEN_TIMEOUT_SECS` | `60` | Ollama request timeout |
//! | `OPENAI_BASE_URL` | `https://api.openai.com/v1` | OpenAI-compatible endpoint |
//! | `OPENAI_API_KEY` | (none) | Bearer key, optional for local servers |
//! | `OPENAI_GEN_MODEL` | `gpt-4o-mini` | OpenAI-compatible model |
//! | `OPENAI_TIMEOUT` | `120` | OpenAI-compatible request timeout |
//! | `OPENAI_HTTP_REFERER`, `OPENAI_X_TITLE` | (none) | OpenRouter headers |
//!
//! # Example
//!
//! ```rust,no_run
//! use mitra_inference::InferenceConfig;
//!
//! let config = InferenceConfig::from_env().expect("invalid inference config");
//! let backend = config.build_backend().expect("backend");
//! println!("summaries enabled: {}", backend.is_some());
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use mitra_core::{Error, GenerationBackend, Result};

#[cfg(feature = "ollama")]
use crate::ollama::{OllamaBackend, OllamaConfig};
#[cfg(feature = "openai")]
use crate::openai::{OpenAIBackend, OpenAIConfig};

pub const ENV_BACKEND: &str = "MITRA_INFERENCE_BACKEND";
pub const ENV_OLLAMA_BASE: &str = "OLLAMA_BASE";
pub const ENV_OLLAMA_GEN_MODEL: &str = "OLLAMA_GEN_MODEL";
pub const ENV_GEN_TIMEOUT: &str = "MITRA_GEN_TIMEOUT_SECS";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_GEN_MODEL: &str = "OPENAI_GEN_MODEL";
pub const ENV_OPENAI_TIMEOUT: &str = "OPENAI_TIMEOUT";
pub const ENV_OPENAI_HTTP_REFERER: &str = "OPENAI_HTTP_REFERER";
pub const ENV_OPENAI_X_TITLE: &str = "OPENAI_X_TITLE";

/// Which generation backend summaries use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Ollama,
    OpenAI,
    /// No generation; every summary is the fallback.
    Disabled,
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            "none" | "disabled" | "off" => Ok(Self::Disabled),
            other => Err(Error::Config(format!(
                "{} must be ollama, openai or none, got: {}",
                ENV_BACKEND, other
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAI => write!(f, "openai"),
            Self::Disabled => write!(f, "none"),
        }
    }
}

/// Backend selection plus per-backend settings.
#[derive(Debug, Clone, Default)]
pub struct InferenceConfig {
    pub backend: BackendKind,
    #[cfg(feature = "ollama")]
    pub ollama: OllamaConfig,
    #[cfg(feature = "openai")]
    pub openai: OpenAIConfig,
}

impl InferenceConfig {
    /// Configuration with generation turned off.
    pub fn disabled() -> Self {
        Self {
            backend: BackendKind::Disabled,
            ..Default::default()
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match get(ENV_BACKEND) {
            Some(raw) => raw.parse()?,
            None => BackendKind::default(),
        };

        #[allow(unused_mut)]
        let mut config = Self {
            backend,
            ..Default::default()
        };

        #[cfg(feature = "ollama")]
        {
            if let Some(base) = get(ENV_OLLAMA_BASE) {
                config.ollama.base_url = base;
            }
            if let Some(model) = get(ENV_OLLAMA_GEN_MODEL) {
                config.ollama.gen_model = model;
            }
            if let Some(raw) = get(ENV_GEN_TIMEOUT) {
                config.ollama.timeout_secs = parse_secs(ENV_GEN_TIMEOUT, &raw)?;
            }
        }

        #[cfg(feature = "openai")]
        {
            if let Some(base) = get(ENV_OPENAI_BASE_URL) {
                config.openai.base_url = base;
            }
            config.openai.api_key = get(ENV_OPENAI_API_KEY);
            if let Some(model) = get(ENV_OPENAI_GEN_MODEL) {
                config.openai.gen_model = model;
            }
            if let Some(raw) = get(ENV_OPENAI_TIMEOUT) {
                config.openai.timeout_seconds = parse_secs(ENV_OPENAI_TIMEOUT, &raw)?;
            }
            config.openai.http_referer = get(ENV_OPENAI_HTTP_REFERER);
            config.openai.x_title = get(ENV_OPENAI_X_TITLE);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the selected backend's settings.
    pub fn validate(&self) -> Result<()> {
        match self.backend {
            BackendKind::Disabled => Ok(()),
            #[cfg(feature = "ollama")]
            BackendKind::Ollama => self.ollama.validate(),
            #[cfg(feature = "openai")]
            BackendKind::OpenAI => self.openai.validate(),
            #[allow(unreachable_patterns)]
            other => Err(Error::Config(format!(
                "backend '{}' is not compiled into this build",
                other
            ))),
        }
    }

    /// Construct the selected backend; `None` when generation is disabled.
    pub fn build_backend(&self) -> Result<Option<Arc<dyn GenerationBackend>>> {
        self.validate()?;
        let backend: Option<Arc<dyn GenerationBackend>> = match self.backend {
            BackendKind::Disabled => None,
            #[cfg(feature = "ollama")]
            BackendKind::Ollama => Some(Arc::new(OllamaBackend::new(self.ollama.clone())?)),
            #[cfg(feature = "openai")]
            BackendKind::OpenAI => Some(Arc::new(OpenAIBackend::new(self.openai.clone())?)),
            #[allow(unreachable_patterns)]
            other => {
                return Err(Error::Config(format!(
                    "backend '{}' is not compiled into this build",
                    other
                )))
            }
        };

        info!(
            subsystem = "inference",
            backend = %self.backend,
            model = backend.as_ref().map(|b| b.model_name()).unwrap_or("-"),
            "Generation backend selected"
        );
        Ok(backend)
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        Error::Config(format!(
            "{} must be a whole number of seconds, got: {}",
            key, raw
        ))
    })
}
