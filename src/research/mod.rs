//! Reference-material acquisition: bounded retries with backoff, and synthetic
//! fallback content when the search provider is exhausted.

pub mod backoff;
mod fallback;

mod acquirer;

pub use acquirer::ResearchAcquirer;
pub use backoff::BackoffSchedule;
pub use fallback::fallback_research;

/// Reference material produced for a topic, tagged with its provenance.
///
/// `is_live` is `true` only when the text came back from the live search
/// provider; synthetic fallback content always carries `is_live = false`.
#[derive(Debug, Clone)]
pub struct ResearchOutcome {
    /// Flattened reference text handed to the prompt template.
    pub text: String,
    /// Whether the text originated from a live external lookup.
    pub is_live: bool,
}
