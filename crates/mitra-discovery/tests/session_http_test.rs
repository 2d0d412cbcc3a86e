//! End-to-end session wiring over HTTP: real catalog client and Ollama
//! backend against wiremock servers.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::json;
use tokio::time::timeout;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mitra_core::{AppConfig, EntityId, EntityKind, EventEnvelope, ListState, ViewEvent};
use mitra_discovery::{MitraContext, SummaryState};
use mitra_inference::InferenceConfig;

fn lookup(vars: HashMap<&'static str, String>) -> impl Fn(&str) -> Option<String> {
    move |key| vars.get(key).cloned()
}

fn app_config(catalog: &MockServer) -> AppConfig {
    AppConfig::from_lookup(lookup(HashMap::from([
        ("MITRA_API_READ_ACCESS_TOKEN", "test-token".to_string()),
        ("MITRA_API_BASE_URL", catalog.uri()),
        ("MITRA_SEARCH_DEBOUNCE_MS", "20".to_string()),
    ])))
    .unwrap()
}

async fn next_loaded(
    events: &mut tokio::sync::broadcast::Receiver<EventEnvelope>,
) -> Vec<EntityId> {
    loop {
        let envelope = timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("timed out waiting for list")
            .unwrap();
        if let ViewEvent::ListChanged {
            state: ListState::Loaded(items),
            ..
        } = envelope.payload
        {
            return items.iter().map(|e| e.id).collect();
        }
    }
}

#[tokio::test]
async fn test_browse_search_and_summarize_over_http() {
    let catalog = MockServer::start().await;
    let ollama = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": 550, "title": "Fight Club" }]
        })))
        .mount(&catalog)
        .await;
    Mock::given(method("GET"))
        .and(path("/trending/movie/day"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&catalog)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "matrix"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": 603, "title": "The Matrix", "poster_path": "/m.jpg" }]
        })))
        .expect(1)
        .mount(&catalog)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/603"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 603,
            "title": "The Matrix",
            "overview": "A hacker learns the truth about reality."
        })))
        .mount(&catalog)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "role": "assistant", "content": "A *landmark* of sci-fi." }
        })))
        .expect(1)
        .mount(&ollama)
        .await;

    let inference = InferenceConfig::from_lookup(lookup(HashMap::from([
        ("MITRA_INFERENCE_BACKEND", "ollama".to_string()),
        ("OLLAMA_BASE", ollama.uri()),
    ])))
    .unwrap();
    let context = MitraContext::from_config(&app_config(&catalog), &inference).unwrap();
    let mut events = context.events().subscribe();

    let session = context.open_session(EntityKind::Movie);
    session.mount();
    assert_eq!(next_loaded(&mut events).await, vec![EntityId(550)]);

    session.input("matr");
    session.input("matrix");
    assert_eq!(next_loaded(&mut events).await, vec![EntityId(603)]);

    let listed = session.view().list.items()[0].clone();
    session.select(listed.clone()).await.unwrap();
    // Second open of the same subject is served from the cache.
    session.close_detail();
    session.select(listed).await.unwrap();

    let selection = session.selection().unwrap();
    assert_eq!(selection.record.image_path(), Some("/m.jpg"));
    match selection.summary {
        SummaryState::Ready {
            html, is_fallback, ..
        } => {
            assert!(!is_fallback);
            assert!(html.as_str().contains("<em>landmark</em>"));
        }
        other => panic!("Expected ready summary, got {:?}", other),
    }

    session.teardown();
}

#[tokio::test]
async fn test_unreachable_generation_falls_back() {
    let catalog = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/person/31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 31, "name": "Tom Hanks", "biography": "Actor."
        })))
        .mount(&catalog)
        .await;

    let inference = InferenceConfig::from_lookup(lookup(HashMap::from([
        ("MITRA_INFERENCE_BACKEND", "ollama".to_string()),
        ("OLLAMA_BASE", "http://127.0.0.1:9".to_string()),
    ])))
    .unwrap();
    let context = MitraContext::from_config(&app_config(&catalog), &inference).unwrap();
    let session = context.open_session(EntityKind::Actor);

    let listed =
        mitra_core::Entity::new(EntityKind::Actor, EntityId(31)).with_field("name", "Tom Hanks");
    session.select(listed).await.unwrap();

    match session.selection().unwrap().summary {
        SummaryState::Ready { text, is_fallback, .. } => {
            assert!(is_fallback);
            assert_eq!(text, mitra_core::defaults::ACTOR_FALLBACK_SUMMARY);
        }
        other => panic!("Expected ready summary, got {:?}", other),
    }
}

#[tokio::test]
async fn test_disabled_generation_needs_no_backend() {
    let catalog = MockServer::start().await;
    let context =
        MitraContext::from_config(&app_config(&catalog), &InferenceConfig::disabled()).unwrap();
    assert!(!context.summaries().has_backend());
}
