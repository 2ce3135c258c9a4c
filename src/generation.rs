//! Abstractions for long-form text generation via local providers.
//!
//! The Ollama-backed client mirrors the store adapter by issuing HTTP requests
//! directly to the runtime. Generation is a single-shot call: no streaming and
//! no partial results.

use crate::config::get_config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Errors surfaced while attempting text generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Provider was unreachable or explicitly disabled.
    #[error("Generation provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate document: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
    /// Provider returned a blank result; empty output is a failure, not an answer.
    #[error("Generation produced empty output")]
    EmptyOutput,
}

/// Request payload passed to the generation provider.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Fully qualified model identifier understood by the provider.
    pub model: String,
    /// Prompt assembled by the drafting pipeline.
    pub prompt: String,
}

/// Interface implemented by text-generation providers.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate text for the supplied prompt using the configured model.
    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

/// Build a generation client based on configuration.
pub fn get_generation_client() -> Box<dyn GenerationClient + Send + Sync> {
    let config = get_config();
    let base_url = config
        .ollama_url
        .clone()
        .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
    Box::new(OllamaGenerationClient::new(base_url))
}

/// Ollama-backed generation client speaking to `/api/generate`.
pub struct OllamaGenerationClient {
    http: Client,
    base_url: String,
}

impl OllamaGenerationClient {
    /// Construct a client against an explicit Ollama base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .user_agent("draftforge/generate")
            .build()
            .expect("Failed to construct reqwest::Client for generation");
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

#[async_trait]
impl GenerationClient for OllamaGenerationClient {
    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let payload = json!({
            "model": request.model,
            "prompt": request.prompt,
            "stream": false,
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                GenerationError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GenerationError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            GenerationError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        if !body.done {
            return Err(GenerationError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(body.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    #[tokio::test]
    async fn ollama_client_handles_successful_response() {
        let server = MockServer::start_async().await;
        let client = OllamaGenerationClient::new(server.base_url());

        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).json_body(json!({
                    "response": "# Draft\n\nBody text",
                    "done": true
                }));
            })
            .await;

        let content = client
            .complete(GenerationRequest {
                model: "llama".into(),
                prompt: "Write".into(),
            })
            .await
            .expect("content");

        mock.assert();
        assert_eq!(content, "# Draft\n\nBody text");
    }

    #[tokio::test]
    async fn ollama_client_handles_error_status() {
        let server = MockServer::start_async().await;
        let client = OllamaGenerationClient::new(server.base_url());

        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(500).body("boom");
            })
            .await;

        let error = client
            .complete(GenerationRequest {
                model: "llama".into(),
                prompt: "Write".into(),
            })
            .await
            .expect_err("error response");

        assert!(
            matches!(error, GenerationError::GenerationFailed(message) if message.contains("500"))
        );
    }

    #[tokio::test]
    async fn ollama_client_rejects_incomplete_response() {
        let server = MockServer::start_async().await;
        let client = OllamaGenerationClient::new(server.base_url());

        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).json_body(json!({
                    "response": "partial",
                    "done": false
                }));
            })
            .await;

        let error = client
            .complete(GenerationRequest {
                model: "llama".into(),
                prompt: "Write".into(),
            })
            .await
            .expect_err("incomplete response");

        assert!(matches!(error, GenerationError::InvalidResponse(_)));
    }
}
