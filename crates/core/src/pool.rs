//! Bounded scan worker pool and dispatch coordinator.
//!
//! [`ScanPool::dispatch`] runs one dispatch cycle: it starts
//! `min(max_workers, N)` workers, hands every niche to exactly one of
//! them through a shared intake channel, waits for all workers to
//! finish, and drains the output channel into a single result list.
//! Callers never see partial results.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::CoreError;
use crate::scanner::Scanner;
use crate::types::{scan_requests, ScanRequest, ScanResult};

/// Default upper bound on concurrent scan workers.
pub const DEFAULT_MAX_WORKERS: usize = 50;

type Intake = Arc<Mutex<mpsc::Receiver<ScanRequest>>>;

/// Results of one completed dispatch cycle.
#[derive(Debug)]
pub struct Dispatch {
    /// One result per submitted niche, in completion order.
    pub results: Vec<ScanResult>,
    /// Number of workers started for this cycle.
    pub worker_count: usize,
}

/// Fixed-size pool of scan workers.
///
/// Cheap to clone; holds no per-dispatch state, so concurrent or repeated
/// dispatches are fully independent.
#[derive(Clone)]
pub struct ScanPool {
    scanner: Arc<dyn Scanner>,
    max_workers: usize,
}

impl ScanPool {
    /// Create a pool. A `max_workers` of zero is treated as one.
    pub fn new(scanner: Arc<dyn Scanner>, max_workers: usize) -> Self {
        Self {
            scanner,
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Workers started for a batch of `niche_count` niches.
    pub fn worker_count(&self, niche_count: usize) -> usize {
        self.max_workers.min(niche_count)
    }

    /// Scan every niche and return once all results are collected.
    ///
    /// Result order is unspecified; cardinality always matches the input.
    /// If `cancel` fires before every niche is scanned the partial results
    /// are discarded and [`CoreError::Cancelled`] is returned.
    pub async fn dispatch(
        &self,
        niches: Vec<String>,
        cancel: &CancellationToken,
    ) -> Result<Dispatch, CoreError> {
        let total = niches.len();
        if total == 0 {
            return Ok(Dispatch {
                results: Vec::new(),
                worker_count: 0,
            });
        }

        let worker_count = self.worker_count(total);
        tracing::info!(niche_count = total, worker_count, "Starting scan dispatch");

        // Both channels hold the whole batch, so neither side ever waits on capacity.
        let (intake_tx, intake_rx) = mpsc::channel::<ScanRequest>(total);
        let (output_tx, mut output_rx) = mpsc::channel::<ScanResult>(total);
        let intake: Intake = Arc::new(Mutex::new(intake_rx));

        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            workers.spawn(run_worker(
                worker_id,
                Arc::clone(&self.scanner),
                Arc::clone(&intake),
                output_tx.clone(),
                cancel.clone(),
            ));
        }
        drop(output_tx);
        drop(intake);

        for request in scan_requests(niches) {
            if intake_tx.send(request).await.is_err() {
                // Every worker has already exited (cancellation).
                break;
            }
        }
        drop(intake_tx);

        while let Some(joined) = workers.join_next().await {
            joined.map_err(|e| CoreError::Internal(format!("Scan worker failed: {e}")))?;
        }

        let mut results = Vec::with_capacity(total);
        while let Some(result) = output_rx.recv().await {
            results.push(result);
        }

        if results.len() != total {
            if cancel.is_cancelled() {
                tracing::warn!(
                    niche_count = total,
                    completed = results.len(),
                    "Scan dispatch cancelled",
                );
                return Err(CoreError::Cancelled);
            }
            return Err(CoreError::Internal(format!(
                "Collected {} scan results for {total} niches",
                results.len()
            )));
        }

        tracing::info!(niche_count = total, worker_count, "Scan dispatch complete");
        Ok(Dispatch {
            results,
            worker_count,
        })
    }
}

/// Claim and scan requests until the intake is exhausted or `cancel` fires.
///
/// Returns the number of niches this worker scanned.
async fn run_worker(
    worker_id: usize,
    scanner: Arc<dyn Scanner>,
    intake: Intake,
    output: mpsc::Sender<ScanResult>,
    cancel: CancellationToken,
) -> usize {
    let mut scanned = 0;

    loop {
        let request = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            request = next_request(&intake) => request,
        };
        let Some(request) = request else {
            break;
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = scanner.scan(request.niche()) => result,
        };

        if output.send(result).await.is_err() {
            break;
        }
        scanned += 1;
    }

    tracing::trace!(worker_id, scanned, "Scan worker finished");
    scanned
}

async fn next_request(intake: &Mutex<mpsc::Receiver<ScanRequest>>) -> Option<ScanRequest> {
    intake.lock().await.recv().await
}
