//! Structured logging schema and subscriber setup for MovieMitra.
//!
//! Field names shared by every mitra crate, so catalog, inference and
//! discovery events can be filtered and joined on the same keys.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Misconfiguration the process cannot work around |
//! | WARN  | Fetch or generation failure absorbed by a fallback |
//! | INFO  | Lifecycle events (session mount, teardown) |
//! | DEBUG | Decision points (stale discard, cache hit), request completions |
//! | TRACE | Per-item data |

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{Error, Result};

// ─── Identity fields ───────────────────────────────────────────────────────

/// Browse session UUID (v7) that issued the operation.
pub const SESSION_ID: &str = "session_id";

/// Crate-level origin of the event.
/// Values: "catalog", "inference", "discovery"
pub const SUBSYSTEM: &str = "subsystem";

/// Module within the subsystem.
/// Examples: "fetch", "ollama", "list", "detail", "summary", "debounce"
pub const COMPONENT: &str = "component";

/// Operation name, e.g. "fetch_list", "generate".
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Entity kind ("movie" / "actor").
pub const KIND: &str = "kind";

/// Catalog entity id.
pub const ENTITY_ID: &str = "entity_id";

/// Settled search text.
pub const QUERY: &str = "query";

/// Mood id.
pub const MOOD: &str = "mood";

/// List request sequence number.
pub const SEQUENCE: &str = "sequence";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Elapsed milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of entities returned by a list request.
pub const RESULT_COUNT: &str = "result_count";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of generated text.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// HTTP status code.
pub const STATUS: &str = "status";

/// Whether a summary is the static fallback.
pub const FALLBACK: &str = "fallback";

/// Display form of the error.
pub const ERROR_MSG: &str = "error";

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "mitra=info";

/// Install the global tracing subscriber.
///
/// Environment variables:
///   RUST_LOG    - filter directives (default: `mitra=info`)
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_ANSI    - "true"/"false" to force ANSI colors
///
/// Fails if a global subscriber is already installed.
pub fn init_subscriber() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        let mut layer = tracing_subscriber::fmt::layer();
        if let Some(ansi) = ansi {
            layer = layer.with_ansi(ansi);
        }
        registry.with(layer).try_init()
    };

    installed.map_err(|e| Error::Internal(format!("Failed to install subscriber: {}", e)))
}
