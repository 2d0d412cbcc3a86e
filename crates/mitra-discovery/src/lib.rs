//! # mitra-discovery
//!
//! Discovery controllers for the MovieMitra browse pages.
//!
//! This crate provides:
//! - [`QueryDebouncer`]: settles raw keystrokes after a quiet window
//! - [`DiscoveryController`]: the sequence-gated list state machine with
//!   mood filtering and a fire-once trending sub-list
//! - [`DetailSelectionController`]: detail fetch, merge and summary
//! - [`AISummaryService`]: at-most-once generation with per-kind fallbacks
//! - [`SanitizingRenderer`]: markdown to sanitized HTML
//! - [`MitraContext`] / [`BrowseSession`]: the owning contexts
//!
//! # Example
//!
//! ```rust,no_run
//! use mitra_core::EntityKind;
//! use mitra_discovery::MitraContext;
//!
//! #[tokio::main]
//! async fn main() -> mitra_core::Result<()> {
//!     mitra_core::logging::init_subscriber()?;
//!     let context = MitraContext::from_env()?;
//!
//!     let session = context.open_session(EntityKind::Movie);
//!     let mut events = context.events().subscribe();
//!     session.mount();
//!     session.input("blade runner");
//!
//!     while let Ok(event) = events.recv().await {
//!         println!("{}", event.payload.event_type());
//!     }
//!     Ok(())
//! }
//! ```

pub mod debounce;
pub mod detail;
pub mod list;
pub mod render;
pub mod session;
pub mod summary;

pub use debounce::QueryDebouncer;
pub use detail::{DetailSelectionController, Selection, SummaryState};
pub use list::{DiscoveryController, DiscoveryView, ListMachine};
pub use render::SanitizingRenderer;
pub use session::{BrowseSession, MitraContext};
pub use summary::{build_prompt, AISummaryService, SUMMARY_SYSTEM_PROMPT};
