//! Errors for the download orchestrator.

use thiserror::Error;

use crate::build_api::BuildApiError;
use crate::transfer::TransferError;

/// Broad class of a run failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The target definition or the local setup is unusable.
    Configuration,
    /// The caller's build/definition/artifact selection is inconsistent.
    CallerInput,
    /// The build query service failed.
    Service,
    /// A transfer job failed.
    Transfer,
}

/// Errors that terminate a download run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The definition query returned no builds at all.
    #[error("no builds found for definition {definition_id}")]
    DefinitionHasNoBuilds { definition_id: u32 },

    /// The build was not produced by the given definition.
    #[error("build {build_id} does not belong to definition {definition_id}")]
    BuildDefinitionMismatch { build_id: u32, definition_id: u32 },

    /// The named artifact does not exist in the build.
    #[error("artifact '{name}' not found in build {build_id}")]
    ArtifactNotFound { name: String, build_id: u32 },

    /// A container locator is malformed.
    #[error("invalid artifact data for '{artifact}': {locator}")]
    InvalidArtifactData { artifact: String, locator: String },

    /// Single-artifact download requested without a name.
    #[error("an artifact name is required when downloading a single artifact")]
    MissingArtifactName,

    /// Build query failure, propagated as-is.
    #[error("build query failed: {0}")]
    BuildApi(#[from] BuildApiError),

    /// The transfer engine could not be created.
    #[error("failed to set up transfer engine: {0}")]
    EngineSetup(TransferError),

    /// First failed transfer job of the run.
    #[error(
        "failed to download artifact '{artifact}' ({failed_jobs} of {total_jobs} transfers failed): {source}"
    )]
    TransferFailed {
        artifact: String,
        failed_jobs: usize,
        total_jobs: usize,
        #[source]
        source: TransferError,
    },
}

impl OrchestratorError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DefinitionHasNoBuilds { .. } | Self::EngineSetup(_) => ErrorKind::Configuration,
            Self::BuildDefinitionMismatch { .. }
            | Self::ArtifactNotFound { .. }
            | Self::InvalidArtifactData { .. }
            | Self::MissingArtifactName => ErrorKind::CallerInput,
            Self::BuildApi(_) => ErrorKind::Service,
            Self::TransferFailed { .. } => ErrorKind::Transfer,
        }
    }

    /// Whether the run failed before any transfer was dispatched.
    pub fn is_pre_dispatch(&self) -> bool {
        !matches!(self, Self::TransferFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OrchestratorError::BuildDefinitionMismatch {
            build_id: 42,
            definition_id: 7,
        };
        assert_eq!(err.to_string(), "build 42 does not belong to definition 7");

        let err = OrchestratorError::DefinitionHasNoBuilds { definition_id: 7 };
        assert_eq!(err.to_string(), "no builds found for definition 7");
    }

    #[test]
    fn test_transfer_failed_display_names_cause() {
        let err = OrchestratorError::TransferFailed {
            artifact: "drop".to_string(),
            failed_jobs: 1,
            total_jobs: 2,
            source: TransferError::Failed("disk full".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "failed to download artifact 'drop' (1 of 2 transfers failed): Transfer failed: disk full"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            OrchestratorError::DefinitionHasNoBuilds { definition_id: 1 }.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            OrchestratorError::InvalidArtifactData {
                artifact: "a".to_string(),
                locator: "#/x".to_string()
            }
            .kind(),
            ErrorKind::CallerInput
        );
        assert_eq!(
            OrchestratorError::BuildApi(BuildApiError::Request("x".to_string())).kind(),
            ErrorKind::Service
        );
        let transfer = OrchestratorError::TransferFailed {
            artifact: "a".to_string(),
            failed_jobs: 1,
            total_jobs: 1,
            source: TransferError::Failed("x".to_string()),
        };
        assert_eq!(transfer.kind(), ErrorKind::Transfer);
        assert!(!transfer.is_pre_dispatch());
        assert!(OrchestratorError::MissingArtifactName.is_pre_dispatch());
    }
}
