//! Data model shared by the catalog client and the controllers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::defaults;
use crate::error::{Error, Result};
use crate::moods::Mood;

// =============================================================================
// ENTITIES
// =============================================================================

/// Which catalog collection an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Movie,
    Actor,
}

impl EntityKind {
    /// Lowercase label used in messages and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Actor => "actor",
        }
    }

    /// User-facing message when the primary list fails to load.
    pub fn list_error_message(&self) -> &'static str {
        match self {
            Self::Movie => defaults::MOVIE_LIST_ERROR,
            Self::Actor => defaults::ACTOR_LIST_ERROR,
        }
    }

    /// Summary text used when generation is unavailable or fails.
    pub fn fallback_summary(&self) -> &'static str {
        match self {
            Self::Movie => defaults::MOVIE_FALLBACK_SUMMARY,
            Self::Actor => defaults::ACTOR_FALLBACK_SUMMARY,
        }
    }

    fn title_field(&self) -> &'static str {
        match self {
            Self::Movie => "title",
            Self::Actor => "name",
        }
    }

    fn description_field(&self) -> &'static str {
        match self {
            Self::Movie => "overview",
            Self::Actor => "biography",
        }
    }

    fn image_field(&self) -> &'static str {
        match self {
            Self::Movie => "poster_path",
            Self::Actor => "profile_path",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Catalog identifier of a movie or person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque catalog record.
///
/// Only `id` is interpreted; every other field is kept verbatim so the UI
/// layer can render whatever the catalog returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entity {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self {
            id,
            kind,
            fields: Map::new(),
        }
    }

    /// Set a field, builder style.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Build an entity from one catalog JSON object.
    ///
    /// The object must carry a non-negative integer `id`.
    pub fn from_json(kind: EntityKind, value: Value) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(Error::Decode(format!(
                "{} record is not a JSON object",
                kind
            )));
        };
        let id = fields
            .remove("id")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| Error::Decode(format!("{} record has no numeric id", kind)))?;
        Ok(Self {
            id: EntityId(id),
            kind,
            fields,
        })
    }

    /// Raw field access.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String field access; empty strings count as absent.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Movie title or actor name.
    pub fn title(&self) -> Option<&str> {
        self.str_field(self.kind.title_field())
    }

    /// Movie overview or actor biography.
    pub fn description(&self) -> Option<&str> {
        self.str_field(self.kind.description_field())
    }

    /// Poster (movie) or profile (actor) image path.
    pub fn image_path(&self) -> Option<&str> {
        self.str_field(self.kind.image_field())
    }

    /// Full poster/profile URL at the list-view size.
    pub fn image_url(&self) -> Option<String> {
        self.image_path().map(|path| {
            format!(
                "{}/{}{}",
                defaults::CATALOG_IMAGE_BASE_URL,
                defaults::POSTER_SIZE,
                path
            )
        })
    }

    /// Overlay a detail record on this list record; detail fields win.
    pub fn merge(&self, detail: Entity) -> DetailRecord {
        let mut fields = self.fields.clone();
        fields.extend(detail.fields);
        DetailRecord {
            entity: Entity {
                id: self.id,
                kind: self.kind,
                fields,
            },
        }
    }
}

/// An entity merged with its full detail fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DetailRecord {
    pub entity: Entity,
}

impl DetailRecord {
    pub fn id(&self) -> EntityId {
        self.entity.id
    }

    pub fn kind(&self) -> EntityKind {
        self.entity.kind
    }
}

impl std::ops::Deref for DetailRecord {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.entity
    }
}

// =============================================================================
// LIST REQUESTS
// =============================================================================

/// What a list fetch asks the catalog for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListQuery {
    /// Popularity-sorted listing.
    Default,
    /// Free-text search.
    Search(String),
    /// Genre-filtered discovery for a mood.
    MoodFiltered(Mood),
    /// Daily trending listing.
    Trending,
}

impl ListQuery {
    /// `Search(q)` for non-empty text, `Default` otherwise.
    pub fn for_text(query: &str) -> Self {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            Self::Default
        } else {
            Self::Search(trimmed.to_string())
        }
    }

    /// Short name for log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Search(_) => "search",
            Self::MoodFiltered(_) => "mood",
            Self::Trending => "trending",
        }
    }
}

/// One issued list fetch, tagged with the controller's sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub query: ListQuery,
    pub sequence: u64,
}

// =============================================================================
// VIEW STATES
// =============================================================================

/// Primary list state of a discovery controller.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListState {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<Entity>),
    Error(String),
}

impl ListState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Items when loaded; empty otherwise.
    pub fn items(&self) -> &[Entity] {
        match self {
            Self::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Trending sub-state, independent of the primary list.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TrendingState {
    #[default]
    NotRequested,
    Loading,
    Loaded(Vec<Entity>),
    /// Fetch failed; hidden from the user.
    Unavailable,
}

impl TrendingState {
    pub fn items(&self) -> &[Entity] {
        match self {
            Self::Loaded(items) => items,
            _ => &[],
        }
    }
}

// =============================================================================
// SUMMARIES
// =============================================================================

/// A cached AI summary for one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCacheEntry {
    pub subject_id: EntityId,
    pub subject_kind: EntityKind,
    pub text: String,
    pub generated_at: DateTime<Utc>,
    pub is_fallback: bool,
}

impl SummaryCacheEntry {
    pub fn generated(kind: EntityKind, id: EntityId, text: String) -> Self {
        Self {
            subject_id: id,
            subject_kind: kind,
            text,
            generated_at: Utc::now(),
            is_fallback: false,
        }
    }

    pub fn fallback(kind: EntityKind, id: EntityId) -> Self {
        Self {
            subject_id: id,
            subject_kind: kind,
            text: kind.fallback_summary().to_string(),
            generated_at: Utc::now(),
            is_fallback: true,
        }
    }
}
