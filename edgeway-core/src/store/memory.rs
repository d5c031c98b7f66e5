use crate::canonical::ObjectKey;
use crate::store::{ObjectMetadata, ObjectStore, StoreError, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-process bucket.
///
/// Counts every `head`/`get` so callers can assert how many probes a
/// request cost.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: DashMap<String, StoredObject>,
    head_calls: AtomicUsize,
    get_calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, object: StoredObject) {
        self.objects.insert(key.to_owned(), object);
    }

    pub fn insert_bytes(&self, key: &str, body: impl Into<Bytes>) {
        self.insert(key, StoredObject::new(body, ObjectMetadata::default()));
    }

    pub fn remove(&self, key: &str) {
        self.objects.remove(key);
    }

    /// Make every subsequent call fail as if the bucket were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.head_calls() + self.get_calls()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn head(&self, key: &ObjectKey) -> Result<bool, StoreError> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        Ok(self.objects.contains_key(key.as_str()))
    }

    async fn get(&self, key: &ObjectKey) -> Result<Option<StoredObject>, StoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let object = self.objects.get(key.as_str()).map(|o| o.value().clone());
        Ok(object)
    }
}
