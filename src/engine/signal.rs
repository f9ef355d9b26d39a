//! Readiness signaling: a per-pass broadcast plus a one-shot future
//! derived from the first broadcast.
//!
//! The ready future resolves exactly once, with the first replay report,
//! and stays resolved for the engine's lifetime; later passes only reach
//! broadcast subscribers. If no pass ever completes (unsupported
//! environment), the future never resolves and callers own any timeout.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::engine::report::SyncReport;

pub struct ReadinessSignal {
    first_tx: watch::Sender<Option<Arc<SyncReport>>>,
    passes_tx: broadcast::Sender<Arc<SyncReport>>,
}

impl ReadinessSignal {
    pub(crate) fn new() -> Self {
        let (first_tx, _) = watch::channel(None);
        let (passes_tx, _) = broadcast::channel(16);
        Self { first_tx, passes_tx }
    }

    /// Publish one pass's report: every subscriber sees it, and the first
    /// one ever published also resolves the ready future.
    pub(crate) fn publish(&self, report: SyncReport) -> Arc<SyncReport> {
        let report = Arc::new(report);
        // No receivers is fine; the send only fails when nobody listens.
        let _ = self.passes_tx.send(Arc::clone(&report));
        self.first_tx.send_if_modified(|slot| {
            if slot.is_none() {
                *slot = Some(Arc::clone(&report));
                true
            } else {
                false
            }
        });
        report
    }

    /// Receiver that observes every subsequent pass.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<SyncReport>> {
        self.passes_tx.subscribe()
    }

    /// The first report, immediately, if a pass has already completed.
    pub fn first(&self) -> Option<Arc<SyncReport>> {
        self.first_tx.borrow().clone()
    }

    /// Wait for the first replay pass. Resolves immediately once resolved;
    /// pends forever if no pass ever completes.
    pub async fn ready(&self) -> Arc<SyncReport> {
        let mut rx = self.first_tx.subscribe();
        loop {
            if let Some(report) = rx.borrow_and_update().clone() {
                return report;
            }
            if rx.changed().await.is_err() {
                // Sender dropped without a first pass; stay pending, the
                // documented behavior for an environment that never syncs.
                std::future::pending::<()>().await;
            }
        }
    }
}
