//! Mock transfer engine for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::transfer::{TransferEngine, TransferError, TransferJob, TransferReport};

/// A settled job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedTransfer {
    /// The job that was processed.
    pub job: TransferJob,
    /// Whether the job succeeded.
    pub success: bool,
}

/// Mock implementation of the TransferEngine trait.
///
/// Jobs succeed by default with one reported file. Failures and delays are
/// configured per artifact name, which makes completion order controllable.
#[derive(Debug, Clone)]
pub struct MockTransferEngine {
    /// Jobs in the order `process_items` was called.
    submitted: Arc<RwLock<Vec<TransferJob>>>,
    /// Jobs in the order they settled.
    completed: Arc<RwLock<Vec<RecordedTransfer>>>,
    /// Failure message per artifact.
    failures: Arc<RwLock<HashMap<String, String>>>,
    /// Simulated duration per artifact.
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl Default for MockTransferEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransferEngine {
    /// Create a new mock engine where every job succeeds immediately.
    pub fn new() -> Self {
        Self {
            submitted: Arc::new(RwLock::new(Vec::new())),
            completed: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            delays: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make jobs for `artifact` fail with `message`.
    pub async fn fail_artifact(&self, artifact: &str, message: &str) {
        self.failures
            .write()
            .await
            .insert(artifact.to_string(), message.to_string());
    }

    /// Make jobs for `artifact` take `delay` before settling.
    pub async fn set_delay(&self, artifact: &str, delay: Duration) {
        self.delays.write().await.insert(artifact.to_string(), delay);
    }

    /// Jobs the engine was asked to process, in call order.
    pub async fn submitted_jobs(&self) -> Vec<TransferJob> {
        self.submitted.read().await.clone()
    }

    /// Jobs that settled, in completion order.
    pub async fn completed_jobs(&self) -> Vec<RecordedTransfer> {
        self.completed.read().await.clone()
    }

    /// Highest number of jobs that were in progress at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransferEngine for MockTransferEngine {
    fn name(&self) -> &str {
        "mock"
    }

    async fn process_items(&self, job: TransferJob) -> Result<TransferReport, TransferError> {
        self.submitted.write().await.push(job.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.read().await.get(&job.artifact).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.read().await.get(&job.artifact).cloned();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.write().await.push(RecordedTransfer {
            job: job.clone(),
            success: failure.is_none(),
        });

        if let Some(message) = failure {
            return Err(TransferError::Failed(message));
        }

        Ok(TransferReport {
            artifact: job.artifact,
            files_transferred: 1,
            bytes_transferred: 0,
            duration_ms: delay.map(|d| d.as_millis() as u64).unwrap_or(0),
            completed_at: Utc::now(),
        })
    }
}
