//! Bounded retry orchestration around the search provider.

use crate::research::{ResearchOutcome, backoff::BackoffSchedule, fallback::fallback_research};
use crate::search::SearchProvider;

/// Acquires reference material for a topic, absorbing every provider failure.
///
/// The defining property of this component is that [`acquire`] never fails:
/// downstream stages must not special-case "no data". Lookup errors are
/// retried up to `max_retries` additional times with backoff sleeps between
/// attempts; on exhaustion a synthetic fallback is returned with
/// `is_live = false`.
///
/// [`acquire`]: ResearchAcquirer::acquire
pub struct ResearchAcquirer {
    provider: Box<dyn SearchProvider>,
    backoff: BackoffSchedule,
    max_retries: u32,
}

impl ResearchAcquirer {
    /// Wrap a lookup capability with the given retry budget and schedule.
    pub fn new(provider: Box<dyn SearchProvider>, backoff: BackoffSchedule, max_retries: u32) -> Self {
        Self {
            provider,
            backoff,
            max_retries,
        }
    }

    /// Gather reference material for the topic. Always returns a value.
    pub async fn acquire(&self, topic: &str) -> ResearchOutcome {
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.backoff.delay(attempt);
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying reference lookup"
                );
                tokio::time::sleep(delay).await;
            }

            match self.provider.lookup(topic).await {
                Ok(text) => {
                    tracing::info!(topic, attempt, "Reference lookup succeeded");
                    return ResearchOutcome {
                        text,
                        is_live: true,
                    };
                }
                Err(error) => {
                    tracing::warn!(topic, attempt, error = %error, "Reference lookup failed");
                }
            }
        }

        tracing::warn!(
            topic,
            retries = self.max_retries,
            "Reference lookup exhausted; substituting synthetic fallback"
        );
        ResearchOutcome {
            text: fallback_research(topic),
            is_live: false,
        }
    }
}
