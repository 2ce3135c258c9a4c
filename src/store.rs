//! HTTP client wrapper for the research document store.
//!
//! The store is used as an append-only content-addressed log: `record` assigns a
//! fresh random identifier and submits `(id, document, metadata)`; `count` is a
//! liveness probe. Callers treat every failure here as a degraded-store
//! condition and continue without aborting generation.

use crate::config::get_config;
use rand::Rng;
use reqwest::{Client, Method, StatusCode};
use serde_json::{Map, Value, json};
use thiserror::Error;
use time::OffsetDateTime;

/// Errors returned while interacting with the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid store URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Store responded with an unexpected status code.
    #[error("Unexpected store response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from the store.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
}

/// Lightweight HTTP client for store operations.
pub struct StoreService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    collection: String,
}

impl StoreService {
    /// Construct a client against an explicit base URL and collection.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        collection: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent("draftforge/store")
            .build()?;
        let base_url = normalize_base_url(base_url).map_err(StoreError::InvalidUrl)?;

        Ok(Self {
            client,
            base_url,
            api_key,
            collection: collection.into(),
        })
    }

    /// Construct a client using configuration derived from the environment.
    pub fn from_config() -> Result<Self, StoreError> {
        let config = get_config();
        let service = Self::new(
            &config.store_url,
            config.store_api_key.clone(),
            config.store_collection_name.clone(),
        )?;
        tracing::debug!(
            url = %service.base_url,
            collection = %service.collection,
            has_api_key = service.api_key.as_deref().map(|value| !value.is_empty()).unwrap_or(false),
            "Initialized store HTTP client"
        );
        Ok(service)
    }

    /// Create the backing collection when it is missing from the store.
    pub async fn ensure_collection(&self) -> Result<(), StoreError> {
        let body = json!({
            "name": self.collection,
            "get_or_create": true,
        });

        let response = self
            .request(Method::POST, "api/v1/collections")
            .json(&body)
            .send()
            .await?;

        self.ensure_success(response, || {
            tracing::debug!(collection = %self.collection, "Collection ensured");
        })
        .await
    }

    /// Append a document with metadata, returning the assigned identifier.
    pub async fn record(
        &self,
        document: &str,
        metadata: Map<String, Value>,
    ) -> Result<String, StoreError> {
        let document_id = generate_document_id();
        let body = json!({
            "ids": [document_id],
            "documents": [document],
            "metadatas": [metadata],
        });

        let response = self
            .request(
                Method::POST,
                &format!("api/v1/collections/{}/add", self.collection),
            )
            .json(&body)
            .send()
            .await?;

        self.ensure_success(response, || {
            tracing::debug!(
                collection = %self.collection,
                document_id = %document_id,
                "Document recorded"
            );
        })
        .await?;

        Ok(document_id)
    }

    /// Number of documents currently held in the collection. Liveness probe only.
    pub async fn count(&self) -> Result<u64, StoreError> {
        let response = self
            .request(
                Method::GET,
                &format!("api/v1/collections/{}/count", self.collection),
            )
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = StoreError::UnexpectedStatus { status, body };
            tracing::error!(collection = %self.collection, error = %error, "Store count failed");
            return Err(error);
        }

        Ok(response.json().await?)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut req = self.client.request(method, url);
        if let Some(api_key) = &self.api_key
            && !api_key.is_empty()
        {
            req = req.header("x-api-key", api_key);
        }
        req
    }

    async fn ensure_success<F>(
        &self,
        response: reqwest::Response,
        on_success: F,
    ) -> Result<(), StoreError>
    where
        F: FnOnce(),
    {
        if response.status().is_success() {
            on_success();
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = StoreError::UnexpectedStatus { status, body };
            tracing::error!(error = %error, "Store request failed");
            Err(error)
        }
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

/// Generate a fresh identifier with 128 bits of entropy, hex-encoded.
///
/// The ids are random rather than content hashes; uniqueness comes from
/// entropy, so append-only writes never conflict.
pub fn generate_document_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// Metadata stored alongside each research document.
pub fn research_metadata(topic: &str, is_live: bool) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert("topic".into(), Value::String(topic.to_string()));
    metadata.insert(
        "provenance".into(),
        Value::String(if is_live { "live" } else { "fallback" }.to_string()),
    );
    metadata.insert(
        "stored_at".into(),
        Value::String(current_timestamp_rfc3339()),
    );
    metadata
}

fn current_timestamp_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::GET, Method::POST, MockServer};

    #[test]
    fn document_ids_are_128_bit_hex() {
        let id = generate_document_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, generate_document_id());
    }

    #[test]
    fn metadata_carries_topic_and_provenance() {
        let metadata = research_metadata("quantum computing", false);
        assert_eq!(metadata["topic"], "quantum computing");
        assert_eq!(metadata["provenance"], "fallback");
        let stored_at = metadata["stored_at"].as_str().expect("timestamp");
        assert!(stored_at.contains('T') && stored_at.ends_with('Z'));
    }

    #[tokio::test]
    async fn record_appends_one_document() {
        let server = MockServer::start_async().await;
        let service =
            StoreService::new(&server.base_url(), None, "research-data").expect("service");

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/collections/research-data/add");
                then.status(201).json_body(json!(true));
            })
            .await;

        let id = service
            .record("reference text", research_metadata("topic", true))
            .await
            .expect("record");

        mock.assert();
        assert_eq!(id.len(), 32);
    }

    #[tokio::test]
    async fn record_surfaces_unexpected_status() {
        let server = MockServer::start_async().await;
        let service =
            StoreService::new(&server.base_url(), None, "research-data").expect("service");

        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/collections/research-data/add");
                then.status(500).body("store down");
            })
            .await;

        let error = service
            .record("reference text", Map::new())
            .await
            .expect_err("status error");
        assert!(matches!(
            error,
            StoreError::UnexpectedStatus { status, .. }
                if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn count_parses_numeric_body() {
        let server = MockServer::start_async().await;
        let service =
            StoreService::new(&server.base_url(), None, "research-data").expect("service");

        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/collections/research-data/count");
                then.status(200).json_body(json!(42));
            })
            .await;

        assert_eq!(service.count().await.expect("count"), 42);
    }
}
