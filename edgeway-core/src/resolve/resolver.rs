use crate::canonical::{CanonicalPath, ObjectKey};
use crate::resolve::Candidates;
use crate::store::{ObjectStore, StoreError};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A candidate the store confirmed, or the only candidate when the raw
    /// path was unambiguous (no probe is made in that case).
    Resolved { key: ObjectKey, path: CanonicalPath },

    /// No candidate exists in the store.
    Unresolved,
}

impl Resolution {
    fn of(path: &CanonicalPath) -> Self {
        Resolution::Resolved {
            key: path.object_key(),
            path: path.clone(),
        }
    }
}

/// Decides which interpretation of an ambiguously encoded path names a real
/// object.
///
/// Probes are sequential and ordered single-decode first, so when both
/// interpretations exist the literal one always wins. An unambiguous path
/// costs zero store round-trips; an ambiguous one at most two.
pub struct ObjectKeyResolver {
    store: Arc<dyn ObjectStore>,
    decode_passes: u8,
}

impl ObjectKeyResolver {
    pub fn new(store: Arc<dyn ObjectStore>, decode_passes: u8) -> Self {
        Self {
            store,
            decode_passes,
        }
    }

    pub fn candidates(&self, raw: &str) -> Candidates {
        Candidates::derive(raw, self.decode_passes)
    }

    pub async fn resolve(&self, raw: &str) -> Result<Resolution, StoreError> {
        let candidates = self.candidates(raw);

        if !candidates.ambiguous {
            return Ok(Resolution::of(&candidates.once));
        }

        for path in candidates.iter() {
            let key = path.object_key();

            if self.store.head(&key).await? {
                tracing::debug!(raw_path = raw, key = %key, "resolved ambiguous path");
                return Ok(Resolution::of(path));
            }
        }

        tracing::debug!(raw_path = raw, "no candidate exists for ambiguous path");
        Ok(Resolution::Unresolved)
    }
}
