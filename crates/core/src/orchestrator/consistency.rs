//! Build/definition consistency check.

use tracing::debug;

use crate::build_api::{BuildApi, BuildReference};

use super::error::OrchestratorError;

/// Verifies that the build belongs to the reference's definition.
///
/// References without a definition always pass.
pub async fn verify(api: &dyn BuildApi, build: &BuildReference) -> Result<(), OrchestratorError> {
    let Some(definition_id) = build.definition_id else {
        return Ok(());
    };

    let builds = api
        .get_builds(&build.project_id, &[definition_id])
        .await?;

    if builds.is_empty() {
        return Err(OrchestratorError::DefinitionHasNoBuilds { definition_id });
    }

    if !builds.iter().any(|b| b.id == build.build_id) {
        return Err(OrchestratorError::BuildDefinitionMismatch {
            build_id: build.build_id,
            definition_id,
        });
    }

    debug!(
        build_id = build.build_id,
        definition_id,
        candidates = builds.len(),
        "Build belongs to definition"
    );
    Ok(())
}
