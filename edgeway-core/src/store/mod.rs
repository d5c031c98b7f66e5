mod etag;
#[cfg(feature = "fs_bucket")]
mod fs;
mod memory;
#[cfg(test)]
mod tests;

pub use etag::{fingerprint, http_etag};
#[cfg(feature = "fs_bucket")]
pub use fs::FsStore;
pub use memory::MemoryStore;

use crate::canonical::ObjectKey;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bucket read failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bucket unavailable: {0}")]
    Unavailable(String),

    #[error("invalid metadata for key '{key}': {reason}")]
    InvalidMetadata { key: String, reason: String },
}

/// HTTP metadata stored alongside an object and replayed onto responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectMetadata {
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub content_language: Option<String>,
    #[serde(default)]
    pub content_disposition: Option<String>,
    #[serde(default)]
    pub content_encoding: Option<String>,

    /// Object-specific cache policy. When present it wins over the
    /// proxy-wide default lifetime.
    #[serde(default)]
    pub cache_control: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub metadata: ObjectMetadata,

    /// Content fingerprint, unquoted.
    pub etag: String,

    pub uploaded: Option<SystemTime>,
}

impl StoredObject {
    pub fn new(body: impl Into<Bytes>, metadata: ObjectMetadata) -> Self {
        let body = body.into();
        let etag = fingerprint(&body);

        Self {
            body,
            metadata,
            etag,
            uploaded: None,
        }
    }

    pub fn with_uploaded(mut self, uploaded: SystemTime) -> Self {
        self.uploaded = Some(uploaded);
        self
    }

    /// The entity tag in its quoted, header-ready form.
    pub fn http_etag(&self) -> String {
        http_etag(&self.etag)
    }
}

/// The backing bucket.
///
/// Keys are UTF-8 strings without a leading `/`. An absent object is not an
/// error; `Err` is reserved for the store being unreachable or broken.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn head(&self, key: &ObjectKey) -> Result<bool, StoreError>;

    async fn get(&self, key: &ObjectKey) -> Result<Option<StoredObject>, StoreError>;
}
