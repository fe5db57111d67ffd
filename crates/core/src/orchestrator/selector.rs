//! Provider selection by artifact storage kind.

use std::path::PathBuf;

use crate::build_api::{Artifact, ResourceKind};
use crate::credential::Credential;
use crate::transfer::{ContainerSource, DestinationProvider, FileShareSource, SourceProvider};

use super::error::OrchestratorError;
use super::types::ArtifactWarning;

/// Run-wide inputs shared by every selection.
#[derive(Debug, Clone)]
pub struct SelectionContext {
    /// Collection URL without trailing slash.
    pub collection_url: String,
    /// Credential attached to container reads.
    pub credential: Credential,
    /// Download path of the run; every artifact lands here.
    pub destination_root: PathBuf,
}

/// Provider pair for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSelection {
    pub source: SourceProvider,
    pub destination: DestinationProvider,
    pub item_pattern: String,
    /// Raised when the source's items are not written under the artifact name.
    pub warning: Option<ArtifactWarning>,
}

/// Outcome of selecting providers for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Artifact will be transferred.
    Transfer(ProviderSelection),
    /// Artifact is skipped.
    Skip(ArtifactWarning),
}

/// Chooses the source and destination providers for `artifact`.
///
/// Unsupported storage kinds yield `Selection::Skip`; a malformed container
/// locator fails the whole run.
pub fn select(
    artifact: &Artifact,
    ctx: &SelectionContext,
    item_pattern: &str,
) -> Result<Selection, OrchestratorError> {
    let mut warning = None;
    let source = match &artifact.resource_kind {
        ResourceKind::Container => {
            let (container_id, item_path) = parse_container_locator(&artifact.resource_locator)
                .ok_or_else(|| OrchestratorError::InvalidArtifactData {
                    artifact: artifact.name.clone(),
                    locator: artifact.resource_locator.clone(),
                })?;
            if item_path != artifact.name {
                warning = Some(ArtifactWarning::NamespaceMismatch {
                    artifact: artifact.name.clone(),
                    item_path: item_path.clone(),
                });
            }
            SourceProvider::Container(ContainerSource {
                collection_url: ctx.collection_url.clone(),
                container_id,
                item_path,
                credential: ctx.credential.clone(),
            })
        }
        ResourceKind::FilePath => SourceProvider::FileShare(FileShareSource {
            root: share_path(&artifact.resource_locator),
            namespace: artifact.name.clone(),
        }),
        ResourceKind::Unsupported(tag) => {
            return Ok(Selection::Skip(ArtifactWarning::UnsupportedResource {
                artifact: artifact.name.clone(),
                resource_type: tag.clone(),
            }));
        }
    };

    Ok(Selection::Transfer(ProviderSelection {
        source,
        destination: DestinationProvider::Filesystem {
            root: ctx.destination_root.clone(),
        },
        item_pattern: item_pattern.to_string(),
        warning,
    }))
}

/// Splits a container locator `<prefix>/<containerId>/<subPath>`.
///
/// Returns `None` unless there are exactly three segments with a numeric id
/// and a non-empty sub-path.
pub fn parse_container_locator(locator: &str) -> Option<(u64, String)> {
    let parts: Vec<&str> = locator.trim().split('/').collect();
    let [_prefix, container_id, item_path] = parts.as_slice() else {
        return None;
    };
    let container_id = container_id.trim().parse::<u64>().ok()?;
    if item_path.is_empty() {
        return None;
    }
    Some((container_id, item_path.to_string()))
}

/// File share location for a file-path locator, with any `file:` scheme removed.
pub fn share_path(locator: &str) -> PathBuf {
    let trimmed = locator.trim();
    let stripped = match trimmed.get(..5) {
        Some(scheme) if scheme.eq_ignore_ascii_case("file:") => &trimmed[5..],
        _ => trimmed,
    };
    // file:///share -> /share, file://server/share stays a UNC-style path
    let stripped = if stripped.starts_with("///") {
        &stripped[2..]
    } else {
        stripped
    };
    PathBuf::from(stripped)
}
