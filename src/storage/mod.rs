//! Storage backend abstraction layer
//!
//! Narrow capability interface the request handler depends on: list
//! buckets, list every key in a bucket with its size, open a streaming
//! reader for one key. The S3 implementation lives in [`s3`]; tests
//! substitute an in-memory mock.

pub mod s3;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::config::Config;

/// Per-object metadata from a bucket listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Object size in bytes.
    pub size: u64,
}

/// Streaming handle for one object's bytes, scoped to a single request.
pub type ObjectReader = Box<dyn AsyncRead + Send + Unpin>;

/// Object store capabilities consumed by the request handler.
///
/// All three calls are issued fresh on every request; the gateway keeps
/// no cross-request cache and never retries.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// List all bucket names, in the order the backend returns them.
    async fn list_buckets(&self) -> anyhow::Result<Vec<String>>;

    /// List every key in a bucket with its byte size.
    async fn list_keys(&self, bucket: &str) -> anyhow::Result<HashMap<String, ObjectInfo>>;

    /// Open a streaming reader for one object.
    async fn open_reader(&self, bucket: &str, key: &str) -> anyhow::Result<ObjectReader>;
}

/// Create the storage backend from startup configuration.
pub async fn create_backend(config: &Config) -> anyhow::Result<Arc<dyn StorageBackend>> {
    let backend = s3::S3Backend::new(config).await?;
    Ok(Arc::new(backend))
}
