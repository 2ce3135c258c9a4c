//! Drafting pipeline: research acquisition, best-effort storage, and generation.

mod compose;
mod service;
mod types;

pub use service::{PipelineApi, PipelineService};
pub use types::{GeneratedDocument, PipelineError, ResearchRequest, StoreHealthSnapshot};
