//! Item transfer engine implementation.

use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::credential::Credential;

use super::config::TransferConfig;
use super::error::TransferError;
use super::pattern::ItemPattern;
use super::traits::TransferEngine;
use super::types::{
    DestinationProvider, ItemLocation, SourceItem, SourceProvider, TransferJob, TransferReport,
};
use super::{container, file_share};

/// Transfer engine that copies container or file-share items into a local directory.
pub struct ItemTransferEngine {
    client: Client,
    config: TransferConfig,
}

impl ItemTransferEngine {
    /// Creates a new engine with the given configuration.
    pub fn new(config: TransferConfig) -> Result<Self, TransferError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| TransferError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Creates an engine with default configuration.
    pub fn with_defaults() -> Result<Self, TransferError> {
        Self::new(TransferConfig::default())
    }

    /// Lists every file the source exposes.
    async fn list_items(&self, source: &SourceProvider) -> Result<Vec<SourceItem>, TransferError> {
        match source {
            SourceProvider::Container(c) => container::list_items(&self.client, c).await,
            SourceProvider::FileShare(f) => file_share::list_items(f).await,
        }
    }

    /// Copies a single item. Returns bytes written.
    async fn transfer_item(
        &self,
        item: &SourceItem,
        credential: Option<&Credential>,
        target: &Path,
        verbose: bool,
    ) -> Result<u64, TransferError> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| TransferError::io(parent, e))?;
        }

        let bytes = match &item.location {
            ItemLocation::Remote(url) => {
                let anonymous = Credential::Anonymous;
                let credential = credential.unwrap_or(&anonymous);
                container::download(&self.client, credential, url, target, self.config.buffer_size)
                    .await?
            }
            ItemLocation::Local(path) => {
                file_share::copy_file(path, target, self.config.buffer_size).await?
            }
        };

        if verbose {
            info!(item = %item.path, bytes, "Downloaded item");
        } else {
            debug!(item = %item.path, bytes, "Downloaded item");
        }

        Ok(bytes)
    }
}

/// Resolves an item path beneath `root`, rejecting anything that could escape it.
pub(crate) fn destination_path(root: &Path, item_path: &str) -> Result<PathBuf, TransferError> {
    let invalid = || TransferError::InvalidItemPath {
        path: item_path.to_string(),
    };

    let normalized = item_path.replace('\\', "/");
    let relative = Path::new(normalized.trim_start_matches('/'));

    let mut target = root.to_path_buf();
    let mut depth = 0usize;
    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                target.push(segment);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(invalid())
            }
        }
    }

    if depth == 0 {
        return Err(invalid());
    }
    Ok(target)
}

#[async_trait]
impl TransferEngine for ItemTransferEngine {
    fn name(&self) -> &str {
        "item"
    }

    async fn process_items(&self, job: TransferJob) -> Result<TransferReport, TransferError> {
        let start = Instant::now();
        let pattern = ItemPattern::parse(&job.options.item_pattern)?;
        let DestinationProvider::Filesystem { root } = &job.destination;

        let listed = self.list_items(&job.source).await?;
        let listed_count = listed.len();

        // Unsafe paths are skipped so the rest of the artifact still lands.
        let mut first_error = None;
        let mut selected = Vec::new();
        for item in listed.into_iter().filter(|i| pattern.matches(&i.path)) {
            match destination_path(root, &item.path) {
                Ok(target) => selected.push((item, target)),
                Err(e) => {
                    warn!(artifact = %job.artifact, error = %e, "Skipping item");
                    first_error.get_or_insert(e);
                }
            }
        }

        let concurrency = job
            .options
            .max_parallel_transfers
            .map(|n| n.get())
            .unwrap_or(self.config.default_parallel_limit)
            .max(1);

        debug!(
            artifact = %job.artifact,
            listed = listed_count,
            selected = selected.len(),
            concurrency,
            pattern = %pattern.as_str(),
            "Transferring items"
        );

        let credential = job.source.credential();
        let verbose = job.options.verbose;
        let transfers: Vec<_> = selected
            .iter()
            .map(|(item, target)| self.transfer_item(item, credential, target, verbose))
            .collect();
        let results: Vec<Result<u64, TransferError>> = stream::iter(transfers)
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut files_transferred = 0usize;
        let mut bytes_transferred = 0u64;
        for result in results {
            match result {
                Ok(bytes) => {
                    files_transferred += 1;
                    bytes_transferred += bytes;
                }
                Err(e) => {
                    warn!(artifact = %job.artifact, error = %e, "Item transfer failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        Ok(TransferReport {
            artifact: job.artifact,
            files_transferred,
            bytes_transferred,
            duration_ms: start.elapsed().as_millis() as u64,
            completed_at: Utc::now(),
        })
    }
}
