//! # mitra-core
//!
//! Core types, traits, and configuration for the MovieMitra discovery core.
//!
//! This crate provides the data model (entities, moods, list requests and
//! view states), the collaborator traits the controllers are written
//! against, and the shared error, configuration and logging conventions
//! that the other mitra crates depend on.

pub mod config;
pub mod defaults;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod moods;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::{AppConfig, CatalogConfig};
pub use error::{Error, Result};
pub use events::{EventBus, EventEnvelope, ViewEvent};
pub use models::*;
pub use moods::{Mood, MoodCatalog};
pub use traits::*;
