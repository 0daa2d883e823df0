//! Object storage for the voxrelay pipeline.
//!
//! The orchestrator talks to storage through the [`ObjectStore`] trait so the
//! backend can be swapped for an in-memory double in tests. The production
//! implementation is [`HttpObjectStore`], a thin client for an S3-compatible
//! HTTP gateway with client-side HMAC presigning.
//!
//! Every call is a single attempt; the adapter performs no retries of its
//! own. Delete failures are expected to be swallowed (logged) by callers.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;

pub use config::StoreConfig;
pub use error::StoreError;
pub use http::HttpObjectStore;
pub use memory::MemoryObjectStore;

use async_trait::async_trait;
use std::time::Duration;

/// Durable object storage as the pipeline needs it: put, get, delete, and
/// time-bounded signed retrieval URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `bytes` under `bucket`/`key`, overwriting any existing object.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Fetches the object at `bucket`/`key`.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Removes the object at `bucket`/`key`. Callers treat failure as
    /// non-fatal: log and continue.
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError>;

    /// Issues a signed URL granting read access to `bucket`/`key` for `ttl`.
    /// The capability expires, not the object.
    async fn presign(&self, bucket: &str, key: &str, ttl: Duration) -> Result<String, StoreError>;
}
