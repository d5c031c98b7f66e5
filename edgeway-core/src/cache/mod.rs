mod memory;
mod policy;

pub use memory::MemoryCache;
pub use policy::shared_max_age;

use crate::canonical::CacheKey;
use crate::ctx::EdgeResponse;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// The shared edge cache.
///
/// Expiry is the cache's own business; callers only look up and store.
/// Writes are idempotent: storing the same key twice is harmless.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn lookup(&self, key: &CacheKey) -> Result<Option<EdgeResponse>, CacheError>;

    async fn store(&self, key: &CacheKey, response: EdgeResponse) -> Result<(), CacheError>;
}
