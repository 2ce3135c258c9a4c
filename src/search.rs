//! Client for the external search provider used to gather reference material.
//!
//! The provider is treated as a flaky collaborator: any failure is surfaced as a
//! [`SearchError`] and the research acquirer decides whether to retry. Results are
//! flattened into a single reference-text block consumed by the prompt template.

use crate::config::get_config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Errors raised while querying the search provider.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Provider could not be reached at the configured URL.
    #[error("Search provider unreachable: {0}")]
    ProviderUnavailable(String),
    /// Provider responded with an error status.
    #[error("Search request failed ({status}): {body}")]
    RequestFailed {
        /// HTTP status returned by the provider.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Provider response could not be parsed.
    #[error("Malformed search response: {0}")]
    InvalidResponse(String),
    /// Provider returned zero results for the query.
    #[error("No search results for query: {0}")]
    NoResults(String),
}

/// Interface implemented by reference-material lookup providers.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Look up reference material for a topic, returning flattened text.
    async fn lookup(&self, query: &str) -> Result<String, SearchError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: String,
}

/// HTTP client for the external search API.
pub struct HttpSearchClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    max_results: usize,
}

impl HttpSearchClient {
    /// Construct a client against an explicit base URL.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, max_results: usize) -> Self {
        let http = Client::builder()
            .user_agent("draftforge/search")
            .build()
            .expect("Failed to construct reqwest::Client for search");
        Self {
            http,
            base_url: base_url.into(),
            api_key,
            max_results,
        }
    }

    /// Construct a client using configuration derived from the environment.
    pub fn from_config() -> Self {
        let config = get_config();
        Self::new(
            config.search_api_url.clone(),
            config.search_api_key.clone(),
            config.search_max_results,
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SearchProvider for HttpSearchClient {
    async fn lookup(&self, query: &str) -> Result<String, SearchError> {
        let payload = json!({
            "query": query,
            "max_results": self.max_results,
        });

        let mut request = self.http.post(self.endpoint()).json(&payload);
        if let Some(api_key) = &self.api_key
            && !api_key.is_empty()
        {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|error| {
            SearchError::ProviderUnavailable(format!(
                "failed to reach search provider at {}: {error}",
                self.base_url
            ))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::RequestFailed { status, body });
        }

        let body: SearchResponse = response.json().await.map_err(|error| {
            SearchError::InvalidResponse(format!("failed to decode search response: {error}"))
        })?;

        if body.results.is_empty() {
            return Err(SearchError::NoResults(query.to_string()));
        }

        tracing::debug!(query, results = body.results.len(), "Search completed");
        Ok(flatten_results(&body.results))
    }
}

/// Collapse structured results into one reference-text block.
fn flatten_results(results: &[SearchResult]) -> String {
    let mut text = String::new();
    for result in results {
        let title = result.title.trim();
        if !title.is_empty() {
            text.push_str(&format!("### {title}\n"));
        }
        let content = result.content.trim();
        if !content.is_empty() {
            text.push_str(content);
            text.push('\n');
        }
        let url = result.url.trim();
        if !url.is_empty() {
            text.push_str(&format!("Source: {url}\n"));
        }
        text.push('\n');
    }
    text.trim_end().to_string()
}
