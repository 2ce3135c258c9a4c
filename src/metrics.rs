use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing drafting activity.
#[derive(Default)]
pub struct DraftMetrics {
    documents_generated: AtomicU64,
    live_research: AtomicU64,
    fallback_research: AtomicU64,
}

impl DraftMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generated document and the provenance of its research.
    pub fn record_document(&self, live_research: bool) {
        self.documents_generated.fetch_add(1, Ordering::Relaxed);
        if live_research {
            self.live_research.fetch_add(1, Ordering::Relaxed);
        } else {
            self.fallback_research.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_generated: self.documents_generated.load(Ordering::Relaxed),
            live_research: self.live_research.load(Ordering::Relaxed),
            fallback_research: self.fallback_research.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of drafting counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents generated since startup.
    pub documents_generated: u64,
    /// Documents backed by live research.
    pub live_research: u64,
    /// Documents backed by synthetic fallback research.
    pub fallback_research: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_documents_by_provenance() {
        let metrics = DraftMetrics::new();
        metrics.record_document(true);
        metrics.record_document(false);
        metrics.record_document(false);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_generated, 3);
        assert_eq!(snapshot.live_research, 1);
        assert_eq!(snapshot.fallback_research, 2);
    }

    #[test]
    fn snapshot_is_consistent() {
        let metrics = DraftMetrics::new();
        assert_eq!(metrics.snapshot().documents_generated, 0);
        assert_eq!(metrics.snapshot().live_research, 0);
        assert_eq!(metrics.snapshot().fallback_research, 0);
    }
}
