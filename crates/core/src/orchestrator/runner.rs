//! Download run driver.
//!
//! Drives one request through the stages in order:
//! - Checking: build/definition consistency (skipped without a definition)
//! - Resolving: one named artifact or every linked artifact
//! - Dispatching: every artifact is mapped to providers before any job is submitted
//! - Awaiting: all jobs settle; the first failure decides the run

use std::sync::Arc;

use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::build_api::{BuildApi, HttpBuildClient};
use crate::config::Config;
use crate::credential::Credential;
use crate::transfer::{DownloadSpec, ItemTransferEngine, TransferEngine};

use super::consistency::verify;
use super::dispatcher::{aggregate, build_jobs, dispatch};
use super::error::OrchestratorError;
use super::resolver::resolve;
use super::selector::{select, Selection, SelectionContext};
use super::types::{DownloadOutcome, DownloadRequest, RunState};

/// Tracks the stage of a run and logs every transition.
struct RunTracker {
    state: RunState,
}

impl RunTracker {
    fn new() -> Self {
        debug!(state = %RunState::Checking, "Run started");
        Self {
            state: RunState::Checking,
        }
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(next > self.state, "run stages are never re-entered");
        debug!(from = %self.state, to = %next, "Run state changed");
        self.state = next;
    }

    fn state(&self) -> RunState {
        self.state
    }
}

/// Downloads the artifacts of a build into a local directory.
pub struct ArtifactDownloader {
    collection_url: String,
    credential: Credential,
    build_api: Arc<dyn BuildApi>,
    engine: Arc<dyn TransferEngine>,
}

impl ArtifactDownloader {
    /// Creates a downloader over the given build service and transfer engine.
    pub fn new(
        collection_url: impl Into<String>,
        credential: Credential,
        build_api: Arc<dyn BuildApi>,
        engine: Arc<dyn TransferEngine>,
    ) -> Self {
        Self {
            collection_url: collection_url.into().trim_end_matches('/').to_string(),
            credential,
            build_api,
            engine,
        }
    }

    /// Returns the name of the transfer engine in use.
    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Runs one download request to completion.
    pub async fn run(&self, request: DownloadRequest) -> Result<DownloadOutcome, OrchestratorError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("download", %run_id, build_id = request.build_id);
        self.run_inner(run_id, request).instrument(span).await
    }

    async fn run_inner(
        &self,
        run_id: Uuid,
        request: DownloadRequest,
    ) -> Result<DownloadOutcome, OrchestratorError> {
        let mut tracker = RunTracker::new();
        let result = self.execute(run_id, &request, &mut tracker).await;

        match &result {
            Ok(outcome) => {
                tracker.advance(RunState::Completed);
                info!(
                    jobs = outcome.jobs_dispatched,
                    warnings = outcome.warnings.len(),
                    "Artifacts successfully downloaded to {}",
                    outcome.destination.display()
                );
            }
            Err(e) => {
                let stage = tracker.state();
                tracker.advance(RunState::Failed);
                error!(stage = %stage, error = %e, "Download failed");
            }
        }

        result
    }

    async fn execute(
        &self,
        run_id: Uuid,
        request: &DownloadRequest,
        tracker: &mut RunTracker,
    ) -> Result<DownloadOutcome, OrchestratorError> {
        let mode = request.mode()?;
        let build = request.build_reference();

        verify(self.build_api.as_ref(), &build).await?;

        tracker.advance(RunState::Resolving);
        let artifacts = resolve(self.build_api.as_ref(), &build, &mode).await?;

        tracker.advance(RunState::Dispatching);
        let item_pattern = request.effective_item_pattern(&mode);
        let ctx = SelectionContext {
            collection_url: self.collection_url.clone(),
            credential: self.credential.clone(),
            destination_root: request.download_path.clone(),
        };

        let mut selections = Vec::with_capacity(artifacts.len());
        let mut warnings = Vec::new();
        for artifact in &artifacts {
            match select(artifact, &ctx, &item_pattern)? {
                Selection::Transfer(pair) => {
                    info!(
                        artifact = %artifact.name,
                        "Downloading artifact from {}",
                        pair.source.describe()
                    );
                    if let Some(warning) = &pair.warning {
                        warn!(artifact = %artifact.name, "{}", warning);
                        warnings.push(warning.clone());
                    }
                    selections.push((artifact.name.clone(), pair));
                }
                Selection::Skip(warning) => {
                    warn!(artifact = %artifact.name, "{}", warning);
                    warnings.push(warning);
                }
            }
        }

        let options = DownloadSpec {
            item_pattern: item_pattern.clone(),
            destination_root: request.download_path.clone(),
            max_parallel_transfers: request.parallel_limit,
            verbose: request.verbose,
        };
        let jobs = build_jobs(selections, &options);
        let jobs_dispatched = jobs.len();
        let pending = dispatch(&self.engine, jobs);

        tracker.advance(RunState::Awaiting);
        debug!(jobs = jobs_dispatched, engine = self.engine.name(), "Awaiting transfers");
        let reports = aggregate(pending).await?;

        Ok(DownloadOutcome {
            run_id,
            destination: request.download_path.clone(),
            jobs_dispatched,
            reports,
            warnings,
        })
    }
}

/// Creates a downloader backed by the HTTP build client and the item transfer engine.
pub fn create_downloader(config: &Config) -> Result<ArtifactDownloader, OrchestratorError> {
    let build_api = HttpBuildClient::new(&config.service)?;
    let engine =
        ItemTransferEngine::new(config.transfer.clone()).map_err(OrchestratorError::EngineSetup)?;

    Ok(ArtifactDownloader::new(
        config.service.base_url(),
        Credential::from_token(config.service.access_token.as_deref()),
        Arc::new(build_api),
        Arc::new(engine),
    ))
}
