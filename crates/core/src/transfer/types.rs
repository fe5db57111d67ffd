//! Types for the transfer module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::credential::Credential;

/// Read access to a remote container store folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSource {
    /// Collection URL without trailing slash.
    pub collection_url: String,
    /// Container identifier.
    pub container_id: u64,
    /// Path inside the container; items are listed beneath it.
    pub item_path: String,
    /// Credential sent with listing and content requests.
    pub credential: Credential,
}

impl ContainerSource {
    /// Shallow listing URL for `item_path`.
    pub fn items_url(&self) -> String {
        self.folder_url(&self.item_path)
    }

    /// Shallow listing URL for an arbitrary folder of the container.
    pub fn folder_url(&self, folder: &str) -> String {
        format!("{}&isShallow=true", self.item_url(folder))
    }

    /// URL addressing a single item of the container.
    pub fn item_url(&self, path: &str) -> String {
        format!(
            "{}/_apis/resources/Containers/{}?itemPath={}",
            self.collection_url,
            self.container_id,
            urlencoding::encode(path)
        )
    }
}

/// Read access to a directory on a local or network file share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileShareSource {
    /// Directory holding the artifact contents.
    pub root: PathBuf,
    /// Prefix given to every item path (the artifact name).
    pub namespace: String,
}

/// Where items are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceProvider {
    /// Remote container store.
    Container(ContainerSource),
    /// File share path.
    FileShare(FileShareSource),
}

impl SourceProvider {
    /// Human-readable location, used in logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Container(c) => c.items_url(),
            Self::FileShare(f) => f.root.display().to_string(),
        }
    }

    /// Credential for remote reads, if any.
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Self::Container(c) => Some(&c.credential),
            Self::FileShare(_) => None,
        }
    }
}

/// Where items are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationProvider {
    /// Local filesystem directory.
    Filesystem { root: PathBuf },
}

impl DestinationProvider {
    /// Root directory of the destination.
    pub fn root(&self) -> &PathBuf {
        match self {
            Self::Filesystem { root } => root,
        }
    }
}

/// Options applied to one transfer job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSpec {
    /// Glob pattern(s) selecting which items are transferred.
    pub item_pattern: String,
    /// Destination root directory.
    pub destination_root: PathBuf,
    /// Ceiling on simultaneous file transfers within the job.
    pub max_parallel_transfers: Option<NonZeroUsize>,
    /// Log every transferred item.
    pub verbose: bool,
}

impl DownloadSpec {
    /// Creates a spec matching every item.
    pub fn new(destination_root: impl Into<PathBuf>) -> Self {
        Self {
            item_pattern: "**".to_string(),
            destination_root: destination_root.into(),
            max_parallel_transfers: None,
            verbose: false,
        }
    }
}

/// A single artifact transfer submitted to an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferJob {
    /// Artifact the job belongs to.
    pub artifact: String,
    /// Source provider.
    pub source: SourceProvider,
    /// Destination provider.
    pub destination: DestinationProvider,
    /// Job options.
    pub options: DownloadSpec,
}

/// Where the content of a listed item can be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemLocation {
    /// HTTP URL.
    Remote(String),
    /// Path on a file share.
    Local(PathBuf),
}

/// A file listed by a source provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceItem {
    /// Relative item path, `/`-separated; also the path under the destination root.
    pub path: String,
    /// Where to read the content from.
    pub location: ItemLocation,
}

/// Result of a successful transfer job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReport {
    /// Artifact name.
    pub artifact: String,
    /// Files written to the destination.
    pub files_transferred: usize,
    /// Bytes written to the destination.
    pub bytes_transferred: u64,
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// When the job finished.
    pub completed_at: DateTime<Utc>,
}
