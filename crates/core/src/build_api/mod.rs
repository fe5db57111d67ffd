//! Build query abstraction.
//!
//! This module provides a `BuildApi` trait for querying builds and their
//! linked artifacts, plus an HTTP implementation against the build service
//! REST endpoints.

mod error;
mod http;
mod traits;
mod types;

pub use error::BuildApiError;
pub use http::HttpBuildClient;
pub use traits::BuildApi;
pub use types::*;
