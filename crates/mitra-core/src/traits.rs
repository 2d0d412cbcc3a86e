//! Collaborator traits.
//!
//! The controllers are written against these interfaces; the catalog
//! client, the inference backends and the markdown renderer implement them,
//! and tests substitute fakes.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::models::{Entity, EntityId, EntityKind, ListQuery};

// =============================================================================
// CATALOG
// =============================================================================

/// Read-only source of catalog records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one list page for the given query.
    ///
    /// A response without `results` is an empty list, not an error.
    async fn fetch_list(&self, kind: EntityKind, query: &ListQuery) -> Result<Vec<Entity>>;

    /// Fetch the full detail record for one entity.
    async fn fetch_detail(&self, kind: EntityKind, id: EntityId) -> Result<Entity>;
}

// =============================================================================
// INFERENCE
// =============================================================================

/// Text-generation collaborator used for AI summaries.
///
/// Failures surface as `Error::Generation` (or `Error::Config` for bad
/// credentials); the summary service turns either into a fallback.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// `system` is an instruction message sent ahead of `prompt`; empty
    /// means none.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    fn model_name(&self) -> &str;
}

/// A generation backend with a reachability probe.
#[async_trait]
pub trait InferenceBackend: GenerationBackend {
    /// `Ok(false)` when the server is unreachable or unhappy.
    async fn health_check(&self) -> Result<bool>;
}

// =============================================================================
// RENDERING
// =============================================================================

/// HTML that has passed through a sanitizer.
///
/// Only renderers construct this; callers can embed it without further
/// escaping.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SafeHtml(String);

impl SafeHtml {
    /// Wrap HTML produced by a sanitizer. Renderers call this after cleaning.
    pub fn from_sanitized(html: String) -> Self {
        Self(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SafeHtml").field(&self.0).finish()
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Markdown to sanitized HTML conversion.
pub trait MarkdownRenderer: Send + Sync {
    /// Render markdown; no executable markup may survive.
    fn render(&self, markdown: &str) -> SafeHtml;
}
