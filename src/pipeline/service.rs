//! Pipeline service coordinating research acquisition, storage, and generation.

use crate::{
    config::get_config,
    generation::{GenerationClient, get_generation_client},
    metrics::{DraftMetrics, MetricsSnapshot},
    pipeline::{
        compose::compose_draft,
        types::{GeneratedDocument, PipelineError, ResearchRequest, StoreHealthSnapshot},
    },
    research::{BackoffSchedule, ResearchAcquirer},
    search::HttpSearchClient,
    store::{StoreService, research_metadata},
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Coordinates the full drafting pipeline: acquire, record, compose.
///
/// The service owns long-lived handles to the search provider, the document
/// store, and the generation client so that every surface reuses the same
/// components. Construct it once near process start and share it through an
/// `Arc`.
pub struct PipelineService {
    acquirer: ResearchAcquirer,
    store: StoreService,
    generator: Box<dyn GenerationClient + Send + Sync>,
    model: String,
    store_fallback_research: bool,
    metrics: Arc<DraftMetrics>,
}

/// Abstraction over the drafting pipeline used by external surfaces.
#[async_trait]
pub trait PipelineApi: Send + Sync {
    /// Run one request/response drafting cycle.
    async fn run(&self, request: ResearchRequest) -> Result<GeneratedDocument, PipelineError>;

    /// Probe the document store for a lightweight health snapshot.
    async fn store_health(&self) -> StoreHealthSnapshot;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl PipelineService {
    /// Build a new pipeline service from the environment configuration.
    ///
    /// A degraded store is tolerated at startup: storage is best-effort for
    /// the lifetime of the process, so an unreachable store only logs.
    pub async fn new() -> Self {
        let config = get_config();
        let acquirer = ResearchAcquirer::new(
            Box::new(HttpSearchClient::from_config()),
            BackoffSchedule::new(
                Duration::from_millis(config.search_retry_base_ms),
                config.search_retry_jitter,
            ),
            config.search_max_retries,
        );
        let store = StoreService::from_config().expect("Failed to construct store client");
        if let Err(error) = store.ensure_collection().await {
            tracing::warn!(error = %error, "Store unreachable at startup; storage will be best-effort");
        }

        Self::with_components(
            acquirer,
            store,
            get_generation_client(),
            config.generation_model.clone(),
            config.store_fallback_research,
        )
    }

    /// Assemble a service from explicitly constructed components.
    pub fn with_components(
        acquirer: ResearchAcquirer,
        store: StoreService,
        generator: Box<dyn GenerationClient + Send + Sync>,
        model: impl Into<String>,
        store_fallback_research: bool,
    ) -> Self {
        Self {
            acquirer,
            store,
            generator,
            model: model.into(),
            store_fallback_research,
            metrics: Arc::new(DraftMetrics::new()),
        }
    }

    /// Run one drafting cycle: acquire research, record it, compose the draft.
    pub async fn run(
        &self,
        request: ResearchRequest,
    ) -> Result<GeneratedDocument, PipelineError> {
        validate(&request)?;
        tracing::info!(topic = %request.topic, word_count = request.word_count, "Drafting request");

        let outcome = self.acquirer.acquire(&request.topic).await;

        let vector_id = if outcome.is_live || self.store_fallback_research {
            match self
                .store
                .record(
                    &outcome.text,
                    research_metadata(&request.topic, outcome.is_live),
                )
                .await
            {
                Ok(id) => Some(id),
                Err(error) => {
                    tracing::warn!(error = %error, "Best-effort storage failed; continuing");
                    None
                }
            }
        } else {
            tracing::debug!(topic = %request.topic, "Skipping storage for fallback research");
            None
        };

        let content = compose_draft(
            self.generator.as_ref(),
            &self.model,
            &request.topic,
            request.word_count,
            &outcome.text,
            &request.instructions,
            outcome.is_live,
        )
        .await?;

        self.metrics.record_document(outcome.is_live);
        tracing::info!(
            topic = %request.topic,
            live_research = outcome.is_live,
            stored = vector_id.is_some(),
            "Draft generated"
        );

        Ok(GeneratedDocument {
            content,
            vector_id,
            research_data: outcome.text,
            live_research: outcome.is_live,
        })
    }

    /// Probe the store with `count()` to surface a health snapshot.
    pub async fn store_health(&self) -> StoreHealthSnapshot {
        match self.store.count().await {
            Ok(documents) => StoreHealthSnapshot {
                reachable: true,
                documents: Some(documents),
                error: None,
            },
            Err(error) => {
                tracing::warn!(error = %error, "Store health probe failed");
                StoreHealthSnapshot {
                    reachable: false,
                    documents: None,
                    error: Some(error.to_string()),
                }
            }
        }
    }

    /// Return the current drafting metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

fn validate(request: &ResearchRequest) -> Result<(), PipelineError> {
    if request.topic.trim().is_empty() {
        return Err(PipelineError::InvalidRequest("topic must not be empty".into()));
    }
    if request.word_count == 0 {
        return Err(PipelineError::InvalidRequest(
            "word_count must be positive".into(),
        ));
    }
    Ok(())
}

#[async_trait]
impl PipelineApi for PipelineService {
    async fn run(&self, request: ResearchRequest) -> Result<GeneratedDocument, PipelineError> {
        PipelineService::run(self, request).await
    }

    async fn store_health(&self) -> StoreHealthSnapshot {
        PipelineService::store_health(self).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        PipelineService::metrics_snapshot(self)
    }
}
