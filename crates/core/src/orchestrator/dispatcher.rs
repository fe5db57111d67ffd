//! Transfer dispatch and outcome aggregation.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tracing::{debug, error, warn};

use crate::transfer::{DownloadSpec, TransferEngine, TransferError, TransferJob, TransferReport};

use super::error::OrchestratorError;
use super::selector::ProviderSelection;

/// Settled result of one transfer job.
#[derive(Debug)]
pub struct JobOutcome {
    pub artifact: String,
    pub result: Result<TransferReport, TransferError>,
}

/// Transfers that have been submitted and not yet awaited.
pub type PendingTransfers = FuturesUnordered<BoxFuture<'static, JobOutcome>>;

/// Turns provider selections into transfer jobs sharing the run's options.
pub fn build_jobs(
    selections: Vec<(String, ProviderSelection)>,
    options: &DownloadSpec,
) -> Vec<TransferJob> {
    selections
        .into_iter()
        .map(|(artifact, selection)| TransferJob {
            artifact,
            source: selection.source,
            destination: selection.destination,
            options: DownloadSpec {
                item_pattern: selection.item_pattern,
                ..options.clone()
            },
        })
        .collect()
}

/// Submits every job to the engine without awaiting any of them.
pub fn dispatch(engine: &Arc<dyn TransferEngine>, jobs: Vec<TransferJob>) -> PendingTransfers {
    jobs.into_iter()
        .map(|job| {
            let engine = Arc::clone(engine);
            async move {
                let artifact = job.artifact.clone();
                let result = engine.process_items(job).await;
                JobOutcome { artifact, result }
            }
            .boxed()
        })
        .collect()
}

/// Keeps the first failure it is given; later ones are ignored.
#[derive(Debug, Default)]
struct FirstFailure {
    failure: Option<(String, TransferError)>,
    count: usize,
}

impl FirstFailure {
    /// Records a failure. Returns true if it became the surfaced one.
    fn record(&mut self, artifact: String, err: TransferError) -> bool {
        self.count += 1;
        if self.failure.is_some() {
            return false;
        }
        self.failure = Some((artifact, err));
        true
    }

    fn into_error(self, total_jobs: usize) -> Option<OrchestratorError> {
        let count = self.count;
        self.failure
            .map(|(artifact, source)| OrchestratorError::TransferFailed {
                artifact,
                failed_jobs: count,
                total_jobs,
                source,
            })
    }
}

/// Waits for every pending transfer.
///
/// Succeeds with all reports only if every job succeeded. Otherwise fails with
/// the first failure in completion order, after the remaining jobs settle.
pub async fn aggregate(
    mut pending: PendingTransfers,
) -> Result<Vec<TransferReport>, OrchestratorError> {
    let total_jobs = pending.len();
    let mut reports = Vec::with_capacity(total_jobs);
    let mut failures = FirstFailure::default();

    while let Some(outcome) = pending.next().await {
        match outcome.result {
            Ok(report) => {
                debug!(
                    artifact = %report.artifact,
                    files = report.files_transferred,
                    bytes = report.bytes_transferred,
                    "Transfer job completed"
                );
                reports.push(report);
            }
            Err(e) => {
                let artifact = outcome.artifact;
                let message = e.to_string();
                if failures.record(artifact.clone(), e) {
                    error!(artifact = %artifact, error = %message, "Transfer job failed");
                } else {
                    warn!(artifact = %artifact, error = %message, "Additional transfer job failed");
                }
            }
        }
    }

    match failures.into_error(total_jobs) {
        Some(err) => Err(err),
        None => Ok(reports),
    }
}
