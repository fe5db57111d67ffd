//! Trait definitions for build queries.

use async_trait::async_trait;

use super::error::BuildApiError;
use super::types::{Artifact, BuildSummary};

/// A service that can answer queries about builds and their artifacts.
#[async_trait]
pub trait BuildApi: Send + Sync {
    /// Lists the builds produced by the given definitions.
    async fn get_builds(
        &self,
        project_id: &str,
        definition_ids: &[u32],
    ) -> Result<Vec<BuildSummary>, BuildApiError>;

    /// Fetches a single artifact by name. `None` when the build has no such artifact.
    async fn get_artifact(
        &self,
        build_id: u32,
        name: &str,
        project_id: &str,
    ) -> Result<Option<Artifact>, BuildApiError>;

    /// Fetches every artifact linked to the build.
    async fn get_artifacts(
        &self,
        build_id: u32,
        project_id: &str,
    ) -> Result<Vec<Artifact>, BuildApiError>;
}
