//! Trait definitions for the transfer module.

use async_trait::async_trait;

use super::error::TransferError;
use super::types::{TransferJob, TransferReport};

/// An engine that copies the items of a source provider to a destination provider.
///
/// Implementations own file-level parallelism within a job. Failures are
/// reported through the returned result only.
#[async_trait]
pub trait TransferEngine: Send + Sync {
    /// Returns the name of this engine implementation.
    fn name(&self) -> &str;

    /// Transfers every item of `job.source` selected by the job's item pattern.
    async fn process_items(&self, job: TransferJob) -> Result<TransferReport, TransferError>;
}
