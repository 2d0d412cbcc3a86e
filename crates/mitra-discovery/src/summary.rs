//! AI summaries with a session-wide, at-most-once cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use mitra_core::{Entity, EntityId, EntityKind, GenerationBackend, SummaryCacheEntry};
use mitra_inference::strip_thinking;

/// System instruction sent with every summary prompt.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You write short insights for a movie discovery app. \
Answer in two or three sentences of lightweight markdown (bold or italics are fine). \
Do not use headings, lists or links.";

const MISSING_OVERVIEW: &str = "No overview available.";
const MISSING_BIOGRAPHY: &str = "No biography available.";

type CacheKey = (EntityKind, EntityId);

/// Generates and caches one summary per `(kind, id)`.
///
/// Concurrent calls for the same subject share a single generation; calls
/// for different subjects never wait on each other. Failures are absorbed
/// into the per-kind fallback text, which is cached like any other result.
pub struct AISummaryService {
    backend: Option<Arc<dyn GenerationBackend>>,
    cache: Mutex<HashMap<CacheKey, Arc<OnceCell<SummaryCacheEntry>>>>,
}

impl AISummaryService {
    /// `backend = None` means generation is unavailable; every subject gets
    /// the fallback.
    pub fn new(backend: Option<Arc<dyn GenerationBackend>>) -> Self {
        Self {
            backend,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Summary for `subject`, generating it on first request.
    ///
    /// The subject's kind selects the prompt fields and fallback text.
    pub async fn summarize(&self, subject: &Entity) -> SummaryCacheEntry {
        let key = (subject.kind, subject.id);
        let cell = self.cell_for(key);

        if let Some(entry) = cell.get() {
            debug!(
                subsystem = "discovery",
                component = "summary",
                kind = %subject.kind,
                entity_id = %subject.id,
                fallback = entry.is_fallback,
                "Summary cache hit"
            );
            return entry.clone();
        }

        cell.get_or_init(|| self.generate_entry(subject))
            .await
            .clone()
    }

    /// Cached entry for a subject, if one has been produced.
    pub fn entry(&self, kind: EntityKind, id: EntityId) -> Option<SummaryCacheEntry> {
        self.lock_cache()
            .get(&(kind, id))
            .and_then(|cell| cell.get().cloned())
    }

    /// Number of subjects with a finished entry.
    pub fn len(&self) -> usize {
        self.lock_cache()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_cache(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Arc<OnceCell<SummaryCacheEntry>>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cell_for(&self, key: CacheKey) -> Arc<OnceCell<SummaryCacheEntry>> {
        self.lock_cache().entry(key).or_default().clone()
    }

    async fn generate_entry(&self, subject: &Entity) -> SummaryCacheEntry {
        let (kind, id) = (subject.kind, subject.id);

        let Some(backend) = self.backend.as_ref() else {
            debug!(
                subsystem = "discovery",
                component = "summary",
                kind = %kind,
                entity_id = %id,
                "No generation backend, using fallback"
            );
            return SummaryCacheEntry::fallback(kind, id);
        };

        let prompt = build_prompt(subject);
        let start = Instant::now();

        match backend
            .generate_with_system(SUMMARY_SYSTEM_PROMPT, &prompt)
            .await
        {
            Ok(raw) => {
                let text = strip_thinking(&raw);
                if text.is_empty() {
                    warn!(
                        subsystem = "discovery",
                        component = "summary",
                        kind = %kind,
                        entity_id = %id,
                        fallback = true,
                        "Generation returned no usable text, using fallback"
                    );
                    return SummaryCacheEntry::fallback(kind, id);
                }
                info!(
                    subsystem = "discovery",
                    component = "summary",
                    kind = %kind,
                    entity_id = %id,
                    model = backend.model_name(),
                    prompt_len = prompt.len(),
                    response_len = text.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Summary generated"
                );
                SummaryCacheEntry::generated(kind, id, text)
            }
            Err(e) => {
                warn!(
                    subsystem = "discovery",
                    component = "summary",
                    kind = %kind,
                    entity_id = %id,
                    fallback = true,
                    error = %e,
                    "Summary generation failed, using fallback"
                );
                SummaryCacheEntry::fallback(kind, id)
            }
        }
    }
}

/// Prompt built from the subject's descriptive fields.
pub fn build_prompt(subject: &Entity) -> String {
    let title = subject.title().unwrap_or("Unknown");
    match subject.kind {
        EntityKind::Movie => format!(
            "Write an engaging insight about the movie \"{}\".\n\nOverview: {}",
            title,
            subject.description().unwrap_or(MISSING_OVERVIEW)
        ),
        EntityKind::Actor => format!(
            "Write an engaging insight about the actor {}.\n\nBiography: {}",
            title,
            subject.description().unwrap_or(MISSING_BIOGRAPHY)
        ),
    }
}
