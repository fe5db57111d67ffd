//! Mock build service for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::build_api::{Artifact, BuildApi, BuildApiError, BuildSummary};

/// A recorded artifact query for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedArtifactQuery {
    /// `get_artifact(build_id, name)`.
    Single { build_id: u32, name: String },
    /// `get_artifacts(build_id)`.
    All { build_id: u32 },
}

/// Mock implementation of the BuildApi trait.
///
/// Provides controllable behavior for testing:
/// - Configure artifacts per build and builds per definition
/// - Inject a one-shot service error
/// - Track every query for assertions
///
/// # Example
///
/// ```rust,ignore
/// use buildfetch_core::testing::{fixtures, MockBuildApi};
///
/// let api = MockBuildApi::new();
/// api.add_artifact(42, fixtures::container_artifact("drop", 7)).await;
/// api.set_definition_builds(7, vec![41, 42]).await;
///
/// let artifacts = api.get_artifacts(42, "proj").await?;
/// assert_eq!(artifacts.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockBuildApi {
    /// Artifacts per build id, in insertion order.
    artifacts: Arc<RwLock<HashMap<u32, Vec<Artifact>>>>,
    /// Build ids per definition id.
    definition_builds: Arc<RwLock<HashMap<u32, Vec<u32>>>>,
    /// If set, the next query will fail with this error.
    next_error: Arc<RwLock<Option<BuildApiError>>>,
    /// Recorded `get_builds` calls as (project_id, definition_ids).
    build_queries: Arc<RwLock<Vec<(String, Vec<u32>)>>>,
    /// Recorded artifact queries.
    artifact_queries: Arc<RwLock<Vec<RecordedArtifactQuery>>>,
}

impl Default for MockBuildApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBuildApi {
    /// Create a new mock build service with no builds.
    pub fn new() -> Self {
        Self {
            artifacts: Arc::new(RwLock::new(HashMap::new())),
            definition_builds: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            build_queries: Arc::new(RwLock::new(Vec::new())),
            artifact_queries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Link an artifact to a build.
    pub async fn add_artifact(&self, build_id: u32, artifact: Artifact) {
        self.artifacts
            .write()
            .await
            .entry(build_id)
            .or_default()
            .push(artifact);
    }

    /// Set the builds produced by a definition.
    pub async fn set_definition_builds(&self, definition_id: u32, build_ids: Vec<u32>) {
        self.definition_builds
            .write()
            .await
            .insert(definition_id, build_ids);
    }

    /// Configure the next query to fail with the given error.
    pub async fn set_next_error(&self, error: BuildApiError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all recorded `get_builds` calls.
    pub async fn recorded_build_queries(&self) -> Vec<(String, Vec<u32>)> {
        self.build_queries.read().await.clone()
    }

    /// Get all recorded artifact queries.
    pub async fn recorded_artifact_queries(&self) -> Vec<RecordedArtifactQuery> {
        self.artifact_queries.read().await.clone()
    }

    /// Total number of queries received.
    pub async fn call_count(&self) -> usize {
        self.build_queries.read().await.len() + self.artifact_queries.read().await.len()
    }

    async fn take_error(&self) -> Option<BuildApiError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl BuildApi for MockBuildApi {
    async fn get_builds(
        &self,
        project_id: &str,
        definition_ids: &[u32],
    ) -> Result<Vec<BuildSummary>, BuildApiError> {
        self.build_queries
            .write()
            .await
            .push((project_id.to_string(), definition_ids.to_vec()));

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let definitions = self.definition_builds.read().await;
        Ok(definition_ids
            .iter()
            .filter_map(|id| definitions.get(id))
            .flatten()
            .map(|&id| BuildSummary { id })
            .collect())
    }

    async fn get_artifact(
        &self,
        build_id: u32,
        name: &str,
        _project_id: &str,
    ) -> Result<Option<Artifact>, BuildApiError> {
        self.artifact_queries
            .write()
            .await
            .push(RecordedArtifactQuery::Single {
                build_id,
                name: name.to_string(),
            });

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .artifacts
            .read()
            .await
            .get(&build_id)
            .and_then(|list| list.iter().find(|a| a.name == name).cloned()))
    }

    async fn get_artifacts(
        &self,
        build_id: u32,
        _project_id: &str,
    ) -> Result<Vec<Artifact>, BuildApiError> {
        self.artifact_queries
            .write()
            .await
            .push(RecordedArtifactQuery::All { build_id });

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .artifacts
            .read()
            .await
            .get(&build_id)
            .cloned()
            .unwrap_or_default())
    }
}
