//! Types for build queries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the build whose artifacts should be downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReference {
    /// Project the build lives in.
    pub project_id: String,
    /// Definition the build is expected to belong to, if checked.
    pub definition_id: Option<u32>,
    /// The build itself.
    pub build_id: u32,
}

impl BuildReference {
    /// Creates a reference without a definition constraint.
    pub fn new(project_id: impl Into<String>, build_id: u32) -> Self {
        Self {
            project_id: project_id.into(),
            definition_id: None,
            build_id,
        }
    }

    /// Constrains the reference to builds of `definition_id`.
    pub fn with_definition(mut self, definition_id: u32) -> Self {
        self.definition_id = Some(definition_id);
        self
    }
}

/// Minimal build record returned by a definition query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub id: u32,
}

/// Storage kind of an artifact, decided when the build response is ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Stored in the build service's remote container store.
    Container,
    /// Stored on a file share.
    FilePath,
    /// Any other tag, kept verbatim for reporting.
    Unsupported(String),
}

impl ResourceKind {
    /// Classifies a raw resource type tag (case-insensitive).
    pub fn from_tag(tag: &str) -> Self {
        let trimmed = tag.trim();
        if trimmed.eq_ignore_ascii_case("container") {
            Self::Container
        } else if trimmed.eq_ignore_ascii_case("filepath") {
            Self::FilePath
        } else {
            Self::Unsupported(tag.to_string())
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container => write!(f, "container"),
            Self::FilePath => write!(f, "filepath"),
            Self::Unsupported(tag) => write!(f, "{}", tag),
        }
    }
}

/// A named output of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Artifact name, also the namespace its items are written under.
    pub name: String,
    /// Where the artifact is stored.
    pub resource_kind: ResourceKind,
    /// Container path (`#/<containerId>/<subPath>`) or file-system URI.
    pub resource_locator: String,
}

impl Artifact {
    /// Creates an artifact, classifying `resource_type` once.
    pub fn new(
        name: impl Into<String>,
        resource_type: &str,
        resource_locator: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            resource_kind: ResourceKind::from_tag(resource_type),
            resource_locator: resource_locator.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_kind_from_tag() {
        assert_eq!(ResourceKind::from_tag("Container"), ResourceKind::Container);
        assert_eq!(ResourceKind::from_tag("container"), ResourceKind::Container);
        assert_eq!(ResourceKind::from_tag("FilePath"), ResourceKind::FilePath);
        assert_eq!(
            ResourceKind::from_tag("VersionControl"),
            ResourceKind::Unsupported("VersionControl".to_string())
        );
    }

    #[test]
    fn test_resource_kind_display_keeps_raw_tag() {
        assert_eq!(ResourceKind::Container.to_string(), "container");
        assert_eq!(
            ResourceKind::Unsupported("GitRef".to_string()).to_string(),
            "GitRef"
        );
    }

    #[test]
    fn test_build_reference_builder() {
        let reference = BuildReference::new("proj", 42).with_definition(7);
        assert_eq!(reference.project_id, "proj");
        assert_eq!(reference.build_id, 42);
        assert_eq!(reference.definition_id, Some(7));
    }

    #[test]
    fn test_artifact_serialization() {
        let artifact = Artifact::new("drop", "container", "#/7/drop");
        let json = serde_json::to_string(&artifact).unwrap();
        let parsed: Artifact = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, artifact);
    }
}
