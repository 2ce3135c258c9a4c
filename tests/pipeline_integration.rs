//! End-to-end pipeline tests against mocked search, store, and generation endpoints.

use async_trait::async_trait;
use draftforge::generation::{GenerationClient, GenerationError, GenerationRequest, OllamaGenerationClient};
use draftforge::pipeline::{PipelineError, PipelineService, ResearchRequest};
use draftforge::research::{BackoffSchedule, ResearchAcquirer};
use draftforge::search::HttpSearchClient;
use draftforge::store::StoreService;
use httpmock::{Method::GET, Method::POST, MockServer};
use serde_json::json;
use std::time::Duration;

const COLLECTION: &str = "research-data";
const MODEL: &str = "llama3";

fn acquirer(search: &MockServer, max_retries: u32) -> ResearchAcquirer {
    ResearchAcquirer::new(
        Box::new(HttpSearchClient::new(search.base_url(), None, 5)),
        BackoffSchedule::new(Duration::ZERO, false),
        max_retries,
    )
}

fn store(server: &MockServer) -> StoreService {
    StoreService::new(&server.base_url(), None, COLLECTION).expect("store service")
}

fn request(topic: &str) -> ResearchRequest {
    ResearchRequest {
        topic: topic.to_string(),
        word_count: 500,
        instructions: String::new(),
    }
}

/// Generator that hands the assembled prompt back as the document.
struct EchoGenerator;

#[async_trait]
impl GenerationClient for EchoGenerator {
    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        Ok(request.prompt)
    }
}

#[tokio::test]
async fn exhausted_lookup_falls_back_and_skips_storage() {
    let search = MockServer::start_async().await;
    let store_server = MockServer::start_async().await;

    let search_mock = search
        .mock_async(|when, then| {
            when.method(POST).path("/search");
            then.status(503).body("overloaded");
        })
        .await;
    let store_mock = store_server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/api/v1/collections/{COLLECTION}/add"));
            then.status(201).json_body(json!(true));
        })
        .await;

    let service = PipelineService::with_components(
        acquirer(&search, 2),
        store(&store_server),
        Box::new(EchoGenerator),
        MODEL,
        false,
    );

    let document = service
        .run(request("quantum computing"))
        .await
        .expect("pipeline run");

    // max_retries + 1 total lookup attempts
    search_mock.assert_hits(3);
    // store-only-when-live policy: fallback research is not persisted
    store_mock.assert_hits(0);
    assert!(!document.live_research);
    assert!(document.vector_id.is_none());
    assert!(!document.research_data.is_empty());
    // the echoed prompt carries the fallback disclosure
    assert!(document.content.contains("general knowledge"));
}

#[tokio::test]
async fn live_lookup_is_stored_and_drafted() {
    let search = MockServer::start_async().await;
    let store_server = MockServer::start_async().await;
    let ollama = MockServer::start_async().await;

    search
        .mock_async(|when, then| {
            when.method(POST).path("/search");
            then.status(200).json_body(json!({
                "results": [
                    {
                        "title": "Rust async",
                        "content": "Futures are lazy.",
                        "url": "https://example.org/async"
                    }
                ]
            }));
        })
        .await;
    let store_mock = store_server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/api/v1/collections/{COLLECTION}/add"))
                .json_body_partial(
                    json!({
                        "documents": ["### Rust async\nFutures are lazy.\nSource: https://example.org/async"]
                    })
                    .to_string(),
                );
            then.status(201).json_body(json!(true));
        })
        .await;
    ollama
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200).json_body(json!({
                "response": "# Async Rust\n\nAn article.",
                "done": true
            }));
        })
        .await;

    let service = PipelineService::with_components(
        acquirer(&search, 0),
        store(&store_server),
        Box::new(OllamaGenerationClient::new(ollama.base_url())),
        MODEL,
        false,
    );

    let document = service.run(request("rust async")).await.expect("run");

    store_mock.assert();
    assert!(document.live_research);
    assert_eq!(document.content, "# Async Rust\n\nAn article.");
    let id = document.vector_id.expect("stored id");
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    // prompt was live, so no disclosure reaches the generator
    assert!(document.research_data.contains("Futures are lazy."));
}

#[tokio::test]
async fn storage_failure_is_swallowed() {
    let search = MockServer::start_async().await;
    let store_server = MockServer::start_async().await;

    search
        .mock_async(|when, then| {
            when.method(POST).path("/search");
            then.status(200).json_body(json!({
                "results": [{ "title": "T", "content": "C", "url": "" }]
            }));
        })
        .await;
    store_server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/api/v1/collections/{COLLECTION}/add"));
            then.status(500).body("store down");
        })
        .await;

    let service = PipelineService::with_components(
        acquirer(&search, 0),
        store(&store_server),
        Box::new(EchoGenerator),
        MODEL,
        false,
    );

    let document = service.run(request("any topic")).await.expect("run");

    assert!(document.live_research);
    assert!(document.vector_id.is_none());
}

#[tokio::test]
async fn fallback_is_stored_when_policy_allows() {
    let search = MockServer::start_async().await;
    let store_server = MockServer::start_async().await;

    search
        .mock_async(|when, then| {
            when.method(POST).path("/search");
            then.status(503);
        })
        .await;
    let store_mock = store_server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/api/v1/collections/{COLLECTION}/add"));
            then.status(201).json_body(json!(true));
        })
        .await;

    let service = PipelineService::with_components(
        acquirer(&search, 0),
        store(&store_server),
        Box::new(EchoGenerator),
        MODEL,
        true,
    );

    let document = service.run(request("gardening tools")).await.expect("run");

    store_mock.assert();
    assert!(!document.live_research);
    assert!(document.vector_id.is_some());
}

#[tokio::test]
async fn generation_failure_is_the_only_surfaced_error() {
    let search = MockServer::start_async().await;
    let store_server = MockServer::start_async().await;
    let ollama = MockServer::start_async().await;

    search
        .mock_async(|when, then| {
            when.method(POST).path("/search");
            then.status(503);
        })
        .await;
    ollama
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(500).body("model crashed");
        })
        .await;

    let service = PipelineService::with_components(
        acquirer(&search, 0),
        store(&store_server),
        Box::new(OllamaGenerationClient::new(ollama.base_url())),
        MODEL,
        false,
    );

    let error = service
        .run(request("quantum computing"))
        .await
        .expect_err("generation failure");

    assert!(matches!(
        error,
        PipelineError::Generation(GenerationError::GenerationFailed(_))
    ));
}

#[tokio::test]
async fn blank_generation_output_is_rejected() {
    let search = MockServer::start_async().await;
    let store_server = MockServer::start_async().await;
    let ollama = MockServer::start_async().await;

    search
        .mock_async(|when, then| {
            when.method(POST).path("/search");
            then.status(200).json_body(json!({
                "results": [{ "title": "T", "content": "C", "url": "" }]
            }));
        })
        .await;
    store_server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/api/v1/collections/{COLLECTION}/add"));
            then.status(201).json_body(json!(true));
        })
        .await;
    ollama
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200).json_body(json!({
                "response": "   ",
                "done": true
            }));
        })
        .await;

    let service = PipelineService::with_components(
        acquirer(&search, 0),
        store(&store_server),
        Box::new(OllamaGenerationClient::new(ollama.base_url())),
        MODEL,
        false,
    );

    let error = service
        .run(request("quantum computing"))
        .await
        .expect_err("blank output");

    assert!(matches!(
        error,
        PipelineError::Generation(GenerationError::EmptyOutput)
    ));
}

#[tokio::test]
async fn invalid_requests_are_rejected_before_any_call() {
    let search = MockServer::start_async().await;
    let store_server = MockServer::start_async().await;

    let search_mock = search
        .mock_async(|when, then| {
            when.method(POST).path("/search");
            then.status(200);
        })
        .await;

    let service = PipelineService::with_components(
        acquirer(&search, 0),
        store(&store_server),
        Box::new(EchoGenerator),
        MODEL,
        false,
    );

    let blank_topic = service
        .run(ResearchRequest {
            topic: "   ".into(),
            word_count: 500,
            instructions: String::new(),
        })
        .await
        .expect_err("blank topic");
    assert!(matches!(blank_topic, PipelineError::InvalidRequest(_)));

    let zero_words = service
        .run(ResearchRequest {
            topic: "valid".into(),
            word_count: 0,
            instructions: String::new(),
        })
        .await
        .expect_err("zero word count");
    assert!(matches!(zero_words, PipelineError::InvalidRequest(_)));

    search_mock.assert_hits(0);
}

#[tokio::test]
async fn store_health_probe_uses_count() {
    let search = MockServer::start_async().await;
    let store_server = MockServer::start_async().await;

    store_server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/api/v1/collections/{COLLECTION}/count"));
            then.status(200).json_body(json!(12));
        })
        .await;

    let service = PipelineService::with_components(
        acquirer(&search, 0),
        store(&store_server),
        Box::new(EchoGenerator),
        MODEL,
        false,
    );

    let health = service.store_health().await;
    assert!(health.reachable);
    assert_eq!(health.documents, Some(12));

    let metrics = service.metrics_snapshot();
    assert_eq!(metrics.documents_generated, 0);
}
