//! HTTP-level tests for the catalog client against a mock server.

use mitra_catalog::{CatalogClient, FetchOrchestrator, RequestOptions};
use mitra_core::{
    CatalogConfig, CatalogSource, EntityId, EntityKind, Error, ListQuery, MoodCatalog,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-read-token";

fn client_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(&CatalogConfig::new(server.uri(), TOKEN)).expect("client")
}

#[tokio::test]
async fn test_default_movie_listing_sends_bearer_and_sort() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("sort_by", "popularity.desc"))
        .and(header("Authorization", "Bearer test-read-token"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [
                {"id": 550, "title": "Fight Club", "poster_path": "/fc.jpg"},
                {"id": 680, "title": "Pulp Fiction", "poster_path": null}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = client_for(&server)
        .fetch_list(EntityKind::Movie, &ListQuery::Default)
        .await
        .expect("listing should succeed");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, EntityId(550));
    assert_eq!(items[0].title(), Some("Fight Club"));
    assert_eq!(items[1].image_path(), None);
}

#[tokio::test]
async fn test_actor_search_passes_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/person"))
        .and(query_param("query", "keanu reeves"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 6384, "name": "Keanu Reeves"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = client_for(&server)
        .fetch_list(
            EntityKind::Actor,
            &ListQuery::Search("keanu reeves".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title(), Some("Keanu Reeves"));
}

#[tokio::test]
async fn test_mood_listing_uses_genre_filter() {
    let server = MockServer::start().await;
    let excited = MoodCatalog::find("excited").unwrap();

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("with_genres", "28|12"))
        .and(query_param("sort_by", "popularity.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 1, "title": "Fast"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = client_for(&server)
        .fetch_list(EntityKind::Movie, &ListQuery::MoodFiltered(excited))
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_actor_mood_listing_never_hits_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(0)
        .mount(&server)
        .await;

    let happy = MoodCatalog::find("happy").unwrap();
    let err = client_for(&server)
        .fetch_list(EntityKind::Actor, &ListQuery::MoodFiltered(happy))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_missing_results_is_empty_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trending/movie/day"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"page": 1})))
        .mount(&server)
        .await;

    let items = client_for(&server)
        .fetch_list(EntityKind::Movie, &ListQuery::Trending)
        .await
        .expect("missing results is not an error");
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/person/popular"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_list(EntityKind::Actor, &ListQuery::Default)
        .await
        .unwrap_err();

    match err {
        Error::Http { status, url } => {
            assert_eq!(status, 401);
            assert!(url.ends_with("/person/popular"));
        }
        other => panic!("Expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_detail(EntityKind::Movie, EntityId(42))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert!(err.is_fetch_failure());
}

#[tokio::test]
async fn test_detail_fetch_returns_full_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/person/287"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 287,
            "name": "Brad Pitt",
            "biography": "An American actor.",
            "profile_path": "/bp.jpg",
            "birthday": "1963-12-18"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entity = client_for(&server)
        .fetch_detail(EntityKind::Actor, EntityId(287))
        .await
        .unwrap();

    assert_eq!(entity.id, EntityId(287));
    assert_eq!(entity.kind, EntityKind::Actor);
    assert_eq!(entity.description(), Some("An American actor."));
    assert_eq!(entity.str_field("birthday"), Some("1963-12-18"));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Nothing listens on port 9 (discard) in the test environment.
    let client = CatalogClient::new(&CatalogConfig::new("http://127.0.0.1:9", TOKEN)).unwrap();

    let err = client
        .fetch_list(EntityKind::Movie, &ListQuery::Default)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_per_call_timeout_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let fetcher = FetchOrchestrator::new(&CatalogConfig::new(server.uri(), TOKEN)).unwrap();
    let err = fetcher
        .request(
            "slow",
            &RequestOptions::new().with_timeout(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_client_over_shared_fetcher() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/550"))
        .and(header("Authorization", "Bearer test-read-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 550,
            "title": "Fight Club"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = FetchOrchestrator::new(&CatalogConfig::new(server.uri(), TOKEN)).unwrap();
    let client = CatalogClient::from_fetcher(fetcher.clone());
    assert_eq!(client.fetcher().base_url(), fetcher.base_url());

    let entity = client
        .fetch_detail(EntityKind::Movie, EntityId(550))
        .await
        .unwrap();
    assert_eq!(entity.str_field("title"), Some("Fight Club"));
}

#[tokio::test]
async fn test_repeated_requests_are_independent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/7"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "title": "Se7en"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.fetch_detail(EntityKind::Movie, EntityId(7)).await;
    assert_eq!(first.unwrap_err().status(), Some(500));

    let second = client
        .fetch_detail(EntityKind::Movie, EntityId(7))
        .await
        .unwrap();
    assert_eq!(second.title(), Some("Se7en"));
}
