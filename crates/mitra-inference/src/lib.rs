//! # mitra-inference
//!
//! Text generation backends for MovieMitra summaries.
//!
//! This crate provides:
//! - Ollama implementation (`/api/chat`, feature `ollama`)
//! - OpenAI-compatible implementation (`/chat/completions`, feature `openai`)
//! - Environment-driven backend selection, including a disabled mode
//! - Reasoning-block stripping for thinking models
//! - A shared chat message shape with a summary-length token cap
//! - A deterministic mock backend (feature `mock`)
//!
//! # Feature Flags
//!
//! - `ollama` (default): Enable Ollama backend
//! - `openai` (default): Enable OpenAI-compatible backend
//! - `mock`: Expose [`mock::MockGenerationBackend`] to other crates' tests
//!
//! # Example
//!
//! ```rust,no_run
//! use mitra_inference::{OllamaBackend, OllamaConfig};
//! use mitra_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() -> mitra_core::Result<()> {
//!     let backend = OllamaBackend::new(OllamaConfig::default())?;
//!     let text = backend.generate("Describe Heat (1995) in two sentences.").await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod thinking;

#[cfg(any(feature = "ollama", feature = "openai"))]
pub mod chat;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use config::{BackendKind, InferenceConfig};
pub use thinking::{parse_thinking_response, strip_thinking, ThinkingResponse};

#[cfg(any(feature = "ollama", feature = "openai"))]
pub use chat::{ChatMessage, Role, MAX_SUMMARY_TOKENS};

#[cfg(feature = "ollama")]
pub use ollama::{OllamaBackend, OllamaConfig};

#[cfg(feature = "openai")]
pub use openai::{OpenAIBackend, OpenAIConfig};
