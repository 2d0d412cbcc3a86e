//! OpenAI-compatible generation backend.
//!
//! Works with any endpoint that speaks `/chat/completions`:
//!
//! - OpenAI cloud API
//! - Ollama (in OpenAI compatibility mode)
//! - vLLM, LocalAI, LM Studio
//! - OpenRouter
//!
//! # Example
//!
//! ```rust,no_run
//! use mitra_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use mitra_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() -> mitra_core::Result<()> {
//!     let backend = OpenAIBackend::new(OpenAIConfig {
//!         base_url: "http://localhost:11434/v1".to_string(),
//!         api_key: None,
//!         ..Default::default()
//!     })?;
//!     let text = backend.generate("Describe Alien in two sentences.").await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{
    OpenAIBackend, OpenAIConfig, DEFAULT_GEN_MODEL, DEFAULT_OPENAI_URL, DEFAULT_TIMEOUT_SECS,
};
pub use error::{to_mitra_error, OpenAIErrorCode};
pub use types::*;
