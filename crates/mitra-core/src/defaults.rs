//! Centralized default constants for MovieMitra.
//!
//! All crates reference these constants instead of defining their own
//! magic numbers. Organized by domain area.

// =============================================================================
// CATALOG
// =============================================================================

/// Default catalog API base URL (TMDB v3 layout).
pub const CATALOG_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Base URL for catalog images; the size segment and image path are appended.
pub const CATALOG_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Poster size used by list views.
pub const POSTER_SIZE: &str = "w500";

// =============================================================================
// SEARCH
// =============================================================================

/// Quiet window before a typed query is considered settled.
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

// =============================================================================
// USER-FACING MESSAGES
// =============================================================================

/// Shown when the movie list cannot be loaded.
pub const MOVIE_LIST_ERROR: &str = "Error fetching movies. Please try again later.";

/// Shown when the actor list cannot be loaded.
pub const ACTOR_LIST_ERROR: &str = "Error fetching actors. Please try again later.";

/// Shown when a mood-filtered list cannot be loaded.
pub const MOOD_LIST_ERROR: &str = "Could not load movies for this mood.";

// =============================================================================
// SUMMARIES
// =============================================================================

/// Substituted when no movie summary can be generated.
pub const MOVIE_FALLBACK_SUMMARY: &str =
    "This film highlights the power of storytelling through compelling visuals and narrative depth.";

/// Substituted when no actor summary can be generated.
pub const ACTOR_FALLBACK_SUMMARY: &str =
    "This artist has built a remarkable career through dedication, versatility, and memorable performances.";

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Ollama endpoint.
pub const OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default generation model.
pub const GEN_MODEL: &str = "llama3.2:3b";

/// Generation request timeout. Summaries are short, so this stays well
/// below a full document-generation budget.
pub const GEN_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// EVENTS
// =============================================================================

/// Broadcast buffer for view events.
pub const EVENT_BUS_CAPACITY: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks_are_distinct_and_non_empty() {
        assert!(!MOVIE_FALLBACK_SUMMARY.is_empty());
        assert!(!ACTOR_FALLBACK_SUMMARY.is_empty());
        assert_ne!(MOVIE_FALLBACK_SUMMARY, ACTOR_FALLBACK_SUMMARY);
    }

    #[test]
    fn test_debounce_default() {
        assert_eq!(SEARCH_DEBOUNCE_MS, 500);
    }
}
