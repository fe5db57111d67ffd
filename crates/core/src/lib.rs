pub mod build_api;
pub mod config;
pub mod credential;
pub mod orchestrator;
pub mod testing;
pub mod transfer;

pub use build_api::{
    Artifact, BuildApi, BuildApiError, BuildReference, BuildSummary, HttpBuildClient, ResourceKind,
};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config, ConfigError,
    SanitizedConfig, ServiceConfig,
};
pub use credential::Credential;
pub use orchestrator::{
    create_downloader, ArtifactDownloader, ArtifactWarning, BuildType, DownloadOutcome,
    DownloadRequest, DownloadType, ErrorKind, OrchestratorError, RunState,
};
pub use transfer::{
    ItemPattern, ItemTransferEngine, TransferConfig, TransferEngine, TransferError, TransferJob,
    TransferReport,
};
