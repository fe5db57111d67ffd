//! Types for the download orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use uuid::Uuid;

use crate::build_api::BuildReference;
use crate::transfer::TransferReport;

use super::error::OrchestratorError;

/// Which build the artifacts come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildType {
    /// The build the caller is running in; no definition check applies.
    Current,
    /// An explicitly chosen build, optionally checked against its definition.
    Specific,
}

/// How many artifacts to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadType {
    /// Exactly the artifact named in the request.
    Single,
    /// Every artifact linked to the build.
    Specific,
}

/// Resolution mode derived from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadMode {
    Single(String),
    All,
}

/// Everything a download run needs from its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub build_type: BuildType,
    pub project_id: String,
    /// Ignored for `BuildType::Current`.
    #[serde(default)]
    pub definition_id: Option<u32>,
    pub build_id: u32,
    pub download_path: PathBuf,
    pub download_type: DownloadType,
    /// Required for `DownloadType::Single`.
    #[serde(default)]
    pub artifact_name: Option<String>,
    /// Item pattern for multi-artifact downloads; defaults to `**`.
    #[serde(default)]
    pub item_pattern: Option<String>,
    /// Per-job ceiling on simultaneous file transfers; engine default when absent.
    #[serde(default)]
    pub parallel_limit: Option<NonZeroUsize>,
    #[serde(default)]
    pub verbose: bool,
}

impl DownloadRequest {
    /// Request for every artifact of a specific build.
    pub fn all(project_id: impl Into<String>, build_id: u32, download_path: impl Into<PathBuf>) -> Self {
        Self {
            build_type: BuildType::Specific,
            project_id: project_id.into(),
            definition_id: None,
            build_id,
            download_path: download_path.into(),
            download_type: DownloadType::Specific,
            artifact_name: None,
            item_pattern: None,
            parallel_limit: None,
            verbose: false,
        }
    }

    /// Request for one named artifact of a specific build.
    pub fn single(
        project_id: impl Into<String>,
        build_id: u32,
        artifact_name: impl Into<String>,
        download_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            download_type: DownloadType::Single,
            artifact_name: Some(artifact_name.into()),
            ..Self::all(project_id, build_id, download_path)
        }
    }

    /// The build reference this request targets.
    pub fn build_reference(&self) -> BuildReference {
        BuildReference {
            project_id: self.project_id.clone(),
            definition_id: match self.build_type {
                BuildType::Current => None,
                BuildType::Specific => self.definition_id,
            },
            build_id: self.build_id,
        }
    }

    /// Resolution mode; single mode needs a non-empty artifact name.
    pub fn mode(&self) -> Result<DownloadMode, OrchestratorError> {
        match self.download_type {
            DownloadType::Single => match self.artifact_name.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => Ok(DownloadMode::Single(name.to_string())),
                _ => Err(OrchestratorError::MissingArtifactName),
            },
            DownloadType::Specific => Ok(DownloadMode::All),
        }
    }

    /// Item pattern applied to every job of the run.
    pub fn effective_item_pattern(&self, mode: &DownloadMode) -> String {
        match mode {
            DownloadMode::Single(name) => format!("{}/**", name),
            DownloadMode::All => self
                .item_pattern
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .unwrap_or("**")
                .to_string(),
        }
    }
}

/// Stage of a download run. Stages are never re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Checking,
    Resolving,
    Dispatching,
    Awaiting,
    Completed,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Checking => "checking",
            Self::Resolving => "resolving",
            Self::Dispatching => "dispatching",
            Self::Awaiting => "awaiting",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Non-fatal condition recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactWarning {
    /// Artifact skipped because its storage kind is not handled.
    UnsupportedResource {
        artifact: String,
        resource_type: String,
    },
    /// Container items live under a folder other than the artifact name.
    NamespaceMismatch { artifact: String, item_path: String },
}

impl fmt::Display for ArtifactWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedResource {
                artifact,
                resource_type,
            } => write!(
                f,
                "artifact '{}' has unsupported type '{}' and was skipped",
                artifact, resource_type
            ),
            Self::NamespaceMismatch {
                artifact,
                item_path,
            } => write!(
                f,
                "artifact '{}' stores its items under '{}' and may overlap other artifacts",
                artifact, item_path
            ),
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadOutcome {
    /// Identifier of the run, also attached to its log span.
    pub run_id: Uuid,
    /// Where the artifacts were written.
    pub destination: PathBuf,
    /// Number of transfer jobs submitted.
    pub jobs_dispatched: usize,
    /// One report per job, in completion order.
    pub reports: Vec<TransferReport>,
    /// Skipped artifacts.
    pub warnings: Vec<ArtifactWarning>,
}
