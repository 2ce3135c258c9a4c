//! HTTP surface for Draft Forge.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /generate` – Run the full drafting pipeline for a topic and return the
//!   generated markdown plus the stored research identifier (when storage succeeded).
//! - `POST /structure` – Convert raw markdown into the heading/paragraph block model
//!   consumed by the external document writer.
//! - `GET /health` – Probe the document store and report reachability and size.
//! - `GET /metrics` – Observe drafting counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.

use crate::markdown::{self, DocumentBlock};
use crate::metrics::MetricsSnapshot;
use crate::pipeline::{PipelineApi, PipelineError, ResearchRequest};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the drafting API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: PipelineApi + 'static,
{
    Router::new()
        .route("/generate", post(generate_document::<S>))
        .route("/structure", post(structure_markdown))
        .route("/health", get(get_health::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// Request body for the `POST /generate` endpoint.
#[derive(Deserialize)]
struct GenerateRequest {
    /// Subject of the document to draft.
    topic: String,
    /// Target document length in words.
    word_count: u32,
    /// Optional free-form writing instructions.
    #[serde(default)]
    instructions: String,
}

/// Success response for the `POST /generate` endpoint.
#[derive(Serialize)]
struct GenerateResponse {
    /// Generated markdown content.
    content: String,
    /// Identifier of the stored research document, if storage succeeded.
    vector_id: Option<String>,
    /// Reference text the draft was generated from.
    research_data: String,
    /// Whether the reference text came from a live lookup.
    live_research: bool,
}

/// Draft a document for the requested topic.
async fn generate_document<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError>
where
    S: PipelineApi,
{
    let GenerateRequest {
        topic,
        word_count,
        instructions,
    } = request;
    let document = service
        .run(ResearchRequest {
            topic,
            word_count,
            instructions,
        })
        .await?;
    Ok(Json(GenerateResponse {
        content: document.content,
        vector_id: document.vector_id,
        research_data: document.research_data,
        live_research: document.live_research,
    }))
}

/// Request body for the `POST /structure` endpoint.
#[derive(Deserialize)]
struct StructureRequest {
    /// Raw markdown to convert.
    markdown: String,
}

/// Response body for `POST /structure`.
#[derive(Serialize)]
struct StructureResponse {
    blocks: Vec<DocumentBlock>,
}

/// Convert markdown into the document block model.
async fn structure_markdown(Json(request): Json<StructureRequest>) -> Json<StructureResponse> {
    let blocks = markdown::structure(&request.markdown);
    tracing::debug!(blocks = blocks.len(), "Structured markdown");
    Json(StructureResponse { blocks })
}

/// Response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    store_reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    documents: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Report document store reachability.
async fn get_health<S>(State(service): State<Arc<S>>) -> Json<HealthResponse>
where
    S: PipelineApi,
{
    let snapshot = service.store_health().await;
    Json(HealthResponse {
        store_reachable: snapshot.reachable,
        documents: snapshot.documents,
        error: snapshot.error,
    })
}

/// Return a concise metrics snapshot with drafting counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: PipelineApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "generate",
                method: "POST",
                path: "/generate",
                description: "Gather research for a topic (with retry and fallback) and draft a markdown document from it.",
                request_example: Some(json!({
                    "topic": "quantum computing",
                    "word_count": 800,
                    "instructions": "keep it accessible"
                })),
            },
            CommandDescriptor {
                name: "structure",
                method: "POST",
                path: "/structure",
                description: "Convert raw markdown into an ordered heading/paragraph block list.",
                request_example: Some(json!({
                    "markdown": "# Title\n\nBody text"
                })),
            },
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/health",
                description: "Report document store reachability and collection size.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return drafting counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

struct AppError(PipelineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PipelineError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PipelineError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.0.to_string()).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(inner: PipelineError) -> Self {
        Self(inner)
    }
}
