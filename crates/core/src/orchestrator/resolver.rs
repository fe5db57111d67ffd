//! Artifact resolution.

use tracing::{debug, info};

use crate::build_api::{Artifact, BuildApi, BuildReference};

use super::error::OrchestratorError;
use super::types::DownloadMode;

/// Resolves the artifacts a run will download.
///
/// Single mode yields exactly one artifact or `ArtifactNotFound`. All mode yields
/// every artifact linked to the build in service order; an empty list is valid.
pub async fn resolve(
    api: &dyn BuildApi,
    build: &BuildReference,
    mode: &DownloadMode,
) -> Result<Vec<Artifact>, OrchestratorError> {
    match mode {
        DownloadMode::Single(name) => {
            debug!(build_id = build.build_id, artifact = %name, "Resolving single artifact");
            match api
                .get_artifact(build.build_id, name, &build.project_id)
                .await?
            {
                Some(artifact) => Ok(vec![artifact]),
                None => Err(OrchestratorError::ArtifactNotFound {
                    name: name.clone(),
                    build_id: build.build_id,
                }),
            }
        }
        DownloadMode::All => {
            let artifacts = api
                .get_artifacts(build.build_id, &build.project_id)
                .await?;
            info!(
                build_id = build.build_id,
                count = artifacts.len(),
                "Linked artifacts for build: {}",
                artifacts.len()
            );
            Ok(artifacts)
        }
    }
}
