//! Static mood catalog.
//!
//! Each mood maps to a catalog genre filter for `with_genres`. Ids are
//! pipe-separated, so a title in any of the listed genres matches (a comma
//! would require all of them). The order of [`MOODS`] is the display order.

use serde::Serialize;

/// A named mood and the genre filter it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Mood {
    pub id: &'static str,
    pub label: &'static str,
    pub genre_filter: &'static str,
}

/// All moods, in display order.
pub const MOODS: &[Mood] = &[
    Mood {
        id: "happy",
        label: "Happy",
        genre_filter: "35",
    },
    Mood {
        id: "sad",
        label: "Sad",
        genre_filter: "18",
    },
    Mood {
        id: "excited",
        label: "Excited",
        genre_filter: "28|12",
    },
    Mood {
        id: "romantic",
        label: "Romantic",
        genre_filter: "10749",
    },
    Mood {
        id: "scared",
        label: "Scared",
        genre_filter: "27|53",
    },
    Mood {
        id: "curious",
        label: "Curious",
        genre_filter: "9648|99",
    },
    Mood {
        id: "dreamy",
        label: "Dreamy",
        genre_filter: "14|878",
    },
    Mood {
        id: "nostalgic",
        label: "Nostalgic",
        genre_filter: "10751|16",
    },
];

/// Lookup over the static mood list.
pub struct MoodCatalog;

impl MoodCatalog {
    /// Every mood, in display order.
    pub fn list_moods() -> &'static [Mood] {
        MOODS
    }

    /// Find a mood by id.
    pub fn find(id: &str) -> Option<Mood> {
        MOODS.iter().find(|mood| mood.id == id).copied()
    }
}
