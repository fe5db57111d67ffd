//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the build service and transfer
//! engine traits, allowing full download runs to be exercised without a real
//! build service or file transfers.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use buildfetch_core::testing::{fixtures, MockBuildApi, MockTransferEngine};
//!
//! let api = MockBuildApi::new();
//! let engine = MockTransferEngine::new();
//!
//! // Configure mock responses
//! api.add_artifact(42, fixtures::container_artifact("drop", 7)).await;
//! engine.fail_artifact("drop", "disk full").await;
//!
//! // Use in ArtifactDownloader...
//! ```

mod mock_build_api;
mod mock_transfer_engine;

pub use mock_build_api::{MockBuildApi, RecordedArtifactQuery};
pub use mock_transfer_engine::{MockTransferEngine, RecordedTransfer};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    use crate::build_api::Artifact;
    use crate::transfer::{
        DestinationProvider, DownloadSpec, FileShareSource, SourceProvider, TransferJob,
    };

    /// Create a container artifact stored at `#/<container_id>/<name>`.
    pub fn container_artifact(name: &str, container_id: u64) -> Artifact {
        Artifact::new(name, "Container", format!("#/{}/{}", container_id, name))
    }

    /// Create a file-path artifact with the given share locator.
    pub fn file_path_artifact(name: &str, locator: &str) -> Artifact {
        Artifact::new(name, "FilePath", locator)
    }

    /// Create an artifact with a storage kind the downloader does not handle.
    pub fn unsupported_artifact(name: &str, resource_type: &str) -> Artifact {
        Artifact::new(name, resource_type, format!("{}://{}", resource_type, name))
    }

    /// Create a file-share transfer job for `artifact` writing into `destination`.
    pub fn transfer_job(artifact: &str, destination: impl AsRef<Path>) -> TransferJob {
        let root = destination.as_ref().to_path_buf();
        TransferJob {
            artifact: artifact.to_string(),
            source: SourceProvider::FileShare(FileShareSource {
                root: PathBuf::from("/share").join(artifact),
                namespace: artifact.to_string(),
            }),
            destination: DestinationProvider::Filesystem { root: root.clone() },
            options: DownloadSpec::new(root),
        }
    }
}
