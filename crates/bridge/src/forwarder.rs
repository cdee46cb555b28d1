//! Fire-and-forget forwarding of scan results.
//!
//! Every result gets its own detached task. Tasks are tracked so that
//! shutdown can wait for in-flight forwards for a bounded grace period
//! and cancel whatever is still running afterwards.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use discovery_core::types::ScanResult;

use crate::client::AnalysisBridge;

/// Spawns and tracks forwarding tasks. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Forwarder {
    bridge: Arc<AnalysisBridge>,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl Forwarder {
    pub fn new(bridge: Arc<AnalysisBridge>) -> Self {
        Self {
            bridge,
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Forward each result on its own task and return immediately.
    ///
    /// Failures are logged and never reach the caller; one result's
    /// outcome has no effect on any other.
    pub fn forward_all(&self, results: &[ScanResult]) {
        for result in results {
            self.spawn_forward(result.clone());
        }
    }

    /// Number of forwarding tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait up to `grace` for in-flight forwards, then cancel the rest.
    pub async fn shutdown(&self, grace: Duration) {
        self.tracker.close();

        if tokio::time::timeout(grace, self.tracker.wait()).await.is_err() {
            tracing::warn!(
                remaining = self.tracker.len(),
                "Forward grace period elapsed, cancelling in-flight forwards",
            );
            self.cancel.cancel();
            self.tracker.wait().await;
        }

        tracing::info!("Forwarder drained");
    }

    fn spawn_forward(&self, result: ScanResult) {
        let bridge = Arc::clone(&self.bridge);
        let cancel = self.cancel.clone();

        self.tracker.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::warn!(niche = %result.niche, "Forward cancelled during shutdown");
                }
                outcome = bridge.forward(&result) => match outcome {
                    Ok(()) => {
                        tracing::info!(niche = %result.niche, "Forwarded scan result to analysis API");
                    }
                    Err(e) => {
                        tracing::warn!(niche = %result.niche, error = %e, "Failed to forward scan result");
                    }
                },
            }
        });
    }
}
