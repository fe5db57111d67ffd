//! Multi-artifact download orchestrator.
//!
//! A run is a single linear pass over typed stages:
//! - **Check**: when a definition is given, the build must belong to it
//! - **Resolve**: the named artifact, or every artifact linked to the build
//! - **Select**: storage kind -> (source, destination) provider pair
//! - **Dispatch**: one transfer job per artifact, all submitted at once
//! - **Aggregate**: success only if every job succeeded, first failure wins

mod consistency;
mod dispatcher;
mod error;
mod resolver;
mod runner;
mod selector;
mod types;

pub use consistency::verify;
pub use dispatcher::{aggregate, build_jobs, dispatch, JobOutcome, PendingTransfers};
pub use error::{ErrorKind, OrchestratorError};
pub use resolver::resolve;
pub use runner::{create_downloader, ArtifactDownloader};
pub use selector::{
    parse_container_locator, select, share_path, ProviderSelection, Selection, SelectionContext,
};
pub use types::{
    ArtifactWarning, BuildType, DownloadMode, DownloadOutcome, DownloadRequest, DownloadType,
    RunState,
};
