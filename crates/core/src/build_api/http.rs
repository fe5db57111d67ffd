//! HTTP build query client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::credential::Credential;

use super::{Artifact, BuildApi, BuildApiError, BuildSummary, ResourceKind};

/// Envelope used by list endpoints.
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct WireBuild {
    id: u32,
}

#[derive(Debug, Deserialize)]
struct WireArtifact {
    name: String,
    resource: WireResource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResource {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
}

impl From<WireArtifact> for Artifact {
    fn from(wire: WireArtifact) -> Self {
        let resource_kind = ResourceKind::from_tag(&wire.resource.kind);
        let WireResource {
            data, download_url, ..
        } = wire.resource;

        // File shares are addressed by their download URL; containers by the data path.
        let resource_locator = match resource_kind {
            ResourceKind::FilePath => download_url.or(data),
            _ => data.or(download_url),
        }
        .unwrap_or_default();

        Artifact {
            name: wire.name,
            resource_kind,
            resource_locator,
        }
    }
}

/// Build query client for the build service REST API.
pub struct HttpBuildClient {
    client: Client,
    base_url: String,
    api_version: String,
    credential: Credential,
}

impl HttpBuildClient {
    /// Create a new client for the configured collection.
    pub fn new(config: &ServiceConfig) -> Result<Self, BuildApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| BuildApiError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            api_version: config.api_version.clone(),
            credential: Credential::from_token(config.access_token.as_deref()),
        })
    }

    /// Root of the build endpoints for a project.
    fn build_root(&self, project_id: &str) -> String {
        format!(
            "{}/{}/_apis/build",
            self.base_url,
            urlencoding::encode(project_id)
        )
    }

    /// GET `url` and decode the JSON body. A 404 is an error.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, BuildApiError> {
        self.get_optional_json(url)
            .await?
            .ok_or_else(|| BuildApiError::Http {
                status: StatusCode::NOT_FOUND.as_u16(),
                url: url.to_string(),
            })
    }

    /// GET `url` and decode the JSON body. `Ok(None)` on 404.
    async fn get_optional_json<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<T>, BuildApiError> {
        debug!(url = %url, "Querying build service");

        let response = self
            .credential
            .apply(self.client.get(url))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| BuildApiError::from_reqwest(url, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BuildApiError::Unauthorized {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(BuildApiError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| BuildApiError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl BuildApi for HttpBuildClient {
    async fn get_builds(
        &self,
        project_id: &str,
        definition_ids: &[u32],
    ) -> Result<Vec<BuildSummary>, BuildApiError> {
        let definitions = definition_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "{}/builds?definitions={}&api-version={}",
            self.build_root(project_id),
            definitions,
            self.api_version
        );

        let builds: ListResponse<WireBuild> = self.get_json(&url).await?;
        Ok(builds
            .value
            .into_iter()
            .map(|b| BuildSummary { id: b.id })
            .collect())
    }

    async fn get_artifact(
        &self,
        build_id: u32,
        name: &str,
        project_id: &str,
    ) -> Result<Option<Artifact>, BuildApiError> {
        let url = format!(
            "{}/builds/{}/artifacts?artifactName={}&api-version={}",
            self.build_root(project_id),
            build_id,
            urlencoding::encode(name),
            self.api_version
        );

        let artifact: Option<WireArtifact> = self.get_optional_json(&url).await?;
        Ok(artifact.map(Artifact::from))
    }

    async fn get_artifacts(
        &self,
        build_id: u32,
        project_id: &str,
    ) -> Result<Vec<Artifact>, BuildApiError> {
        let url = format!(
            "{}/builds/{}/artifacts?api-version={}",
            self.build_root(project_id),
            build_id,
            self.api_version
        );

        let artifacts: ListResponse<WireArtifact> = self.get_json(&url).await?;
        Ok(artifacts.value.into_iter().map(Artifact::from).collect())
    }
}
