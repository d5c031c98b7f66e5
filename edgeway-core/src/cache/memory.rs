use crate::cache::{CacheError, ResponseCache, shared_max_age};
use crate::canonical::CacheKey;
use crate::ctx::EdgeResponse;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry {
    response: EdgeResponse,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Stores between two sweeps of expired entries.
const DEFAULT_SWEEP_INTERVAL: usize = 256;

/// In-process shared cache honoring each response's own `Cache-Control`.
///
/// Expired entries are dropped when their key is looked up, and every
/// `sweep_interval` stores the whole map is swept, so keys that are never
/// requested again do not accumulate.
#[derive(Debug)]
pub struct MemoryCache {
    entries: DashMap<CacheKey, CacheEntry>,
    lookups: AtomicUsize,
    stores: AtomicUsize,
    sweep_interval: usize,
    unavailable: AtomicBool,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sweep_interval(sweep_interval: usize) -> Self {
        Self {
            entries: DashMap::new(),
            lookups: AtomicUsize::new(0),
            stores: AtomicUsize::new(0),
            sweep_interval: sweep_interval.max(1),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        let now = Instant::now();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn stores(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail as if the cache were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("memory cache offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn lookup(&self, key: &CacheKey) -> Result<Option<EdgeResponse>, CacheError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let Some(entry) = self.entries.get(key).map(|e| e.value().clone()) else {
            return Ok(None);
        };

        let now = Instant::now();
        if entry.is_expired(now) {
            self.entries.remove_if(key, |_, e| e.is_expired(now));
            return Ok(None);
        }

        Ok(Some(entry.response))
    }

    async fn store(&self, key: &CacheKey, response: EdgeResponse) -> Result<(), CacheError> {
        let stores = self.stores.fetch_add(1, Ordering::SeqCst) + 1;
        self.check_available()?;

        if stores % self.sweep_interval == 0 {
            let purged = self.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, remaining = self.entries.len(), "swept expired cache entries");
            }
        }

        let Some(ttl) = shared_max_age(&response.headers) else {
            tracing::debug!(cache_key = %key, "response not cacheable, skipping store");
            return Ok(());
        };

        let entry = CacheEntry {
            response,
            expires_at: Instant::now() + ttl,
        };
        self.entries.insert(key.clone(), entry);

        Ok(())
    }
}
