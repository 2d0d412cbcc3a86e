//! Catalog endpoint table.
//!
//! | Request | Movie | Actor |
//! |---------|-------|-------|
//! | Default | `discover/movie?sort_by=popularity.desc` | `person/popular` |
//! | Search | `search/movie?query=…` | `search/person?query=…` |
//! | Mood | `discover/movie?with_genres=…&sort_by=popularity.desc` | n/a |
//! | Trending | `trending/movie/day` | `trending/person/day` |
//! | Detail | `movie/{id}` | `person/{id}` |

use mitra_core::{EntityId, EntityKind, Error, ListQuery, Result};

use crate::fetch::RequestOptions;

const POPULARITY_DESC: &str = "popularity.desc";

/// A resolved endpoint: path relative to the base URL plus query params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl Endpoint {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    /// Request options carrying this endpoint's query params.
    pub fn options(&self) -> RequestOptions {
        RequestOptions {
            params: self.params.clone(),
            timeout: None,
        }
    }
}

/// Endpoint for a list query.
///
/// Mood filtering only exists for movies; asking for it on actors is an
/// input error rather than a silent fallback.
pub fn list_endpoint(kind: EntityKind, query: &ListQuery) -> Result<Endpoint> {
    let endpoint = match (kind, query) {
        (EntityKind::Movie, ListQuery::Default) => {
            Endpoint::new("discover/movie").param("sort_by", POPULARITY_DESC)
        }
        (EntityKind::Actor, ListQuery::Default) => Endpoint::new("person/popular"),
        (EntityKind::Movie, ListQuery::Search(q)) => {
            Endpoint::new("search/movie").param("query", q.as_str())
        }
        (EntityKind::Actor, ListQuery::Search(q)) => {
            Endpoint::new("search/person").param("query", q.as_str())
        }
        (EntityKind::Movie, ListQuery::MoodFiltered(mood)) => Endpoint::new("discover/movie")
            .param("with_genres", mood.genre_filter)
            .param("sort_by", POPULARITY_DESC),
        (EntityKind::Actor, ListQuery::MoodFiltered(mood)) => {
            return Err(Error::InvalidInput(format!(
                "mood '{}' filtering is only available for movies",
                mood.id
            )))
        }
        (EntityKind::Movie, ListQuery::Trending) => Endpoint::new("trending/movie/day"),
        (EntityKind::Actor, ListQuery::Trending) => Endpoint::new("trending/person/day"),
    };
    Ok(endpoint)
}

/// Endpoint for a single entity's detail record.
pub fn detail_endpoint(kind: EntityKind, id: EntityId) -> Endpoint {
    match kind {
        EntityKind::Movie => Endpoint::new(format!("movie/{}", id)),
        EntityKind::Actor => Endpoint::new(format!("person/{}", id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mitra_core::MoodCatalog;

    #[test]
    fn test_default_endpoints() {
        let movie = list_endpoint(EntityKind::Movie, &ListQuery::Default).unwrap();
        assert_eq!(movie.path, "discover/movie");
        assert_eq!(
            movie.params,
            vec![("sort_by".to_string(), "popularity.desc".to_string())]
        );

        let actor = list_endpoint(EntityKind::Actor, &ListQuery::Default).unwrap();
        assert_eq!(actor.path, "person/popular");
        assert!(actor.params.is_empty());
    }

    #[test]
    fn test_search_endpoints_carry_query() {
        let q = ListQuery::Search("the dark knight".to_string());
        let movie = list_endpoint(EntityKind::Movie, &q).unwrap();
        assert_eq!(movie.path, "search/movie");
        assert_eq!(
            movie.params,
            vec![("query".to_string(), "the dark knight".to_string())]
        );
        assert_eq!(list_endpoint(EntityKind::Actor, &q).unwrap().path, "search/person");
    }

    #[test]
    fn test_mood_endpoint_uses_genre_filter() {
        let happy = MoodCatalog::find("happy").unwrap();
        let endpoint = list_endpoint(EntityKind::Movie, &ListQuery::MoodFiltered(happy)).unwrap();
        assert_eq!(endpoint.path, "discover/movie");
        assert!(endpoint
            .params
            .contains(&("with_genres".to_string(), "35".to_string())));
    }

    #[test]
    fn test_mood_rejected_for_actors() {
        let happy = MoodCatalog::find("happy").unwrap();
        let err = list_endpoint(EntityKind::Actor, &ListQuery::MoodFiltered(happy)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_trending_and_detail_paths() {
        assert_eq!(
            list_endpoint(EntityKind::Movie, &ListQuery::Trending).unwrap().path,
            "trending/movie/day"
        );
        assert_eq!(
            list_endpoint(EntityKind::Actor, &ListQuery::Trending).unwrap().path,
            "trending/person/day"
        );
        assert_eq!(detail_endpoint(EntityKind::Movie, EntityId(550)).path, "movie/550");
        assert_eq!(detail_endpoint(EntityKind::Actor, EntityId(287)).path, "person/287");
    }
}
