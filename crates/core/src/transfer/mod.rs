//! Transfer module for copying artifact items to their destination.
//!
//! This module provides the `TransferEngine` trait consumed by the download
//! orchestrator, and `ItemTransferEngine`, an implementation that lists the
//! items of a source provider, filters them with an item-selection pattern and
//! copies the selected files into a filesystem destination.
//!
//! # Sources
//!
//! - Remote container store, walked through shallow folder listings
//! - File share (local or network path), walked recursively
//!
//! # Example
//!
//! ```ignore
//! use buildfetch_core::transfer::{ItemTransferEngine, TransferConfig, TransferEngine};
//!
//! let engine = ItemTransferEngine::new(TransferConfig::default())?;
//! let report = engine.process_items(job).await?;
//! println!("{} files ({} bytes)", report.files_transferred, report.bytes_transferred);
//! ```

mod config;
mod container;
mod engine;
mod error;
mod file_share;
mod pattern;
mod traits;
mod types;

pub use config::TransferConfig;
pub use engine::ItemTransferEngine;
pub use error::TransferError;
pub use pattern::ItemPattern;
pub use traits::TransferEngine;
pub use types::{
    ContainerSource, DestinationProvider, DownloadSpec, FileShareSource, ItemLocation,
    SourceItem, SourceProvider, TransferJob, TransferReport,
};
