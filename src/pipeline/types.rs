//! Core data types and error definitions for the drafting pipeline.

use crate::generation::GenerationError;
use thiserror::Error;

/// Immutable input describing one drafting request.
#[derive(Debug, Clone)]
pub struct ResearchRequest {
    /// Subject of the document. Must be non-empty.
    pub topic: String,
    /// Target document length in words. Must be positive.
    pub word_count: u32,
    /// Free-form writing instructions; empty by default.
    pub instructions: String,
}

/// Document produced by one pipeline run. Ephemeral; never persisted here.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// Generated markdown content.
    pub content: String,
    /// Identifier of the stored research document, when storage succeeded.
    pub vector_id: Option<String>,
    /// Reference text the document was generated from.
    pub research_data: String,
    /// Whether the reference text came from a live lookup.
    pub live_research: bool,
}

/// Errors emitted by the drafting pipeline.
///
/// Lookup failures are fully absorbed by the research acquirer and storage
/// failures are swallowed as best-effort, so generation is the only failure
/// mode that crosses this boundary.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Request failed validation before any external call.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Generation step failed; fatal to the current request.
    #[error("Failed to generate document: {0}")]
    Generation(#[from] GenerationError),
}

/// Reachability snapshot for the research document store.
#[derive(Debug, Clone)]
pub struct StoreHealthSnapshot {
    /// Indicates whether the store endpoint responded successfully.
    pub reachable: bool,
    /// Document count reported by the store, when reachable.
    pub documents: Option<u64>,
    /// Optional diagnostic string captured when the store is unreachable.
    pub error: Option<String>,
}
