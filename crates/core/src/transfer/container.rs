//! Remote container store source.

use std::collections::{HashSet, VecDeque};
use std::path::Path;

use reqwest::Client;
use serde::Deserialize;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::credential::Credential;

use super::error::TransferError;
use super::types::{ContainerSource, ItemLocation, SourceItem};

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    value: Vec<ContainerItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContainerItem {
    path: String,
    #[serde(default)]
    item_type: String,
    #[serde(default)]
    content_location: Option<String>,
}

impl ContainerItem {
    fn is_folder(&self) -> bool {
        self.item_type.eq_ignore_ascii_case("folder")
    }
}

/// Lists every file beneath the source's item path.
///
/// Each folder is listed shallowly; nested folders are queued and listed in turn.
pub(super) async fn list_items(
    client: &Client,
    source: &ContainerSource,
) -> Result<Vec<SourceItem>, TransferError> {
    let mut items = Vec::new();
    let mut seen_files = HashSet::new();
    let mut visited = HashSet::new();
    let mut folders = VecDeque::from([normalize(&source.item_path)]);

    while let Some(folder) = folders.pop_front() {
        if !visited.insert(folder.clone()) {
            continue;
        }

        for entry in list_folder(client, source, &folder).await? {
            let path = normalize(&entry.path);
            if entry.is_folder() {
                if path != folder {
                    folders.push_back(path);
                }
                continue;
            }
            if !seen_files.insert(path.clone()) {
                continue;
            }

            let url = entry
                .content_location
                .unwrap_or_else(|| source.item_url(&path));
            items.push(SourceItem {
                path,
                location: ItemLocation::Remote(url),
            });
        }
    }

    debug!(
        container_id = source.container_id,
        item_path = %source.item_path,
        files = items.len(),
        "Listed container items"
    );

    Ok(items)
}

async fn list_folder(
    client: &Client,
    source: &ContainerSource,
    folder: &str,
) -> Result<Vec<ContainerItem>, TransferError> {
    let url = source.folder_url(folder);
    let response = source
        .credential
        .apply(client.get(&url))
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| TransferError::Listing {
            url: url.clone(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransferError::Http {
            status: status.as_u16(),
            url,
        });
    }

    let list: ListResponse = response.json().await.map_err(|e| TransferError::Listing {
        url: url.clone(),
        reason: e.to_string(),
    })?;
    Ok(list.value)
}

/// Streams the content at `url` into `destination`. Returns bytes written.
pub(super) async fn download(
    client: &Client,
    credential: &Credential,
    url: &str,
    destination: &Path,
    buffer_size: usize,
) -> Result<u64, TransferError> {
    let mut response = credential
        .apply(client.get(url))
        .header("Accept", "application/octet-stream")
        .send()
        .await
        .map_err(|e| TransferError::request(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransferError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let file = File::create(destination)
        .await
        .map_err(|e| TransferError::io(destination, e))?;
    let mut writer = BufWriter::with_capacity(buffer_size, file);
    let mut total_bytes = 0u64;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| TransferError::request(url, e))?
    {
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| TransferError::io(destination, e))?;
        total_bytes += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| TransferError::io(destination, e))?;

    Ok(total_bytes)
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/").trim_matches('/').to_string()
}
