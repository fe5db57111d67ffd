//! File share source.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use walkdir::WalkDir;

use super::error::TransferError;
use super::types::{FileShareSource, ItemLocation, SourceItem};

/// Lists every file beneath the share root, prefixed with the source namespace.
pub(super) async fn list_items(source: &FileShareSource) -> Result<Vec<SourceItem>, TransferError> {
    let root = source.root.clone();
    let namespace = source.namespace.clone();

    tokio::task::spawn_blocking(move || walk(&root, &namespace))
        .await
        .map_err(|e| TransferError::Failed(format!("file share listing aborted: {}", e)))?
}

fn walk(root: &Path, namespace: &str) -> Result<Vec<SourceItem>, TransferError> {
    if !root.is_dir() {
        return Err(TransferError::SourceNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut items = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            TransferError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(r) => r,
            Err(_) => continue,
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        items.push(SourceItem {
            path: format!("{}/{}", namespace, relative),
            location: ItemLocation::Local(entry.path().to_path_buf()),
        });
    }

    Ok(items)
}

/// Copies `source` to `destination` through buffered streams. Returns bytes copied.
pub(super) async fn copy_file(
    source: &Path,
    destination: &Path,
    buffer_size: usize,
) -> Result<u64, TransferError> {
    let source_file = File::open(source).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TransferError::SourceNotFound {
                path: source.to_path_buf(),
            }
        } else {
            TransferError::io(source, e)
        }
    })?;
    let dest_file = File::create(destination)
        .await
        .map_err(|e| TransferError::io(destination, e))?;

    let mut reader = BufReader::with_capacity(buffer_size, source_file);
    let mut writer = BufWriter::with_capacity(buffer_size, dest_file);
    let mut buffer = vec![0u8; buffer_size];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .await
            .map_err(|e| TransferError::io(source, e))?;
        if bytes_read == 0 {
            break;
        }
        writer
            .write_all(&buffer[..bytes_read])
            .await
            .map_err(|e| TransferError::io(destination, e))?;
        total_bytes += bytes_read as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| TransferError::io(destination, e))?;

    Ok(total_bytes)
}
