use crate::canonical::ObjectKey;
use crate::store::{ObjectMetadata, ObjectStore, StoreError, StoredObject};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Suffix of the optional JSON sidecar holding an object's HTTP metadata.
pub const METADATA_SUFFIX: &str = ".meta.json";

/// A bucket backed by a local directory.
///
/// Object `a/b c.txt` lives at `<root>/a/b c.txt`. Metadata can be supplied
/// in `<root>/a/b c.txt.meta.json`; otherwise the content type is guessed
/// from the extension.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a key onto the filesystem, refusing anything that could escape the
    /// root or that names a sidecar file.
    fn object_path(&self, key: &ObjectKey) -> Option<PathBuf> {
        let key = key.as_str();
        if key.is_empty() || key.ends_with(METADATA_SUFFIX) {
            return None;
        }

        let mut path = self.root.clone();
        for component in key.split('/') {
            match component {
                "" | "." | ".." => return None,
                c if c.contains('\\') || c.contains('\0') => return None,
                c => path.push(c),
            }
        }

        Some(path)
    }

    async fn read_metadata(
        &self,
        key: &ObjectKey,
        path: &Path,
    ) -> Result<ObjectMetadata, StoreError> {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(METADATA_SUFFIX);

        let mut metadata = match fs::read(&sidecar).await {
            Ok(raw) => serde_json::from_slice::<ObjectMetadata>(&raw).map_err(|e| {
                StoreError::InvalidMetadata {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
            })?,
            Err(e) if is_absent(&e) => ObjectMetadata::default(),
            Err(e) => return Err(io_error(key, e)),
        };

        if metadata.content_type.is_none() {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            metadata.content_type = Some(mime.essence_str().to_owned());
        }

        Ok(metadata)
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn head(&self, key: &ObjectKey) -> Result<bool, StoreError> {
        let Some(path) = self.object_path(key) else {
            return Ok(false);
        };

        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if is_absent(&e) => Ok(false),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn get(&self, key: &ObjectKey) -> Result<Option<StoredObject>, StoreError> {
        let Some(path) = self.object_path(key) else {
            return Ok(None);
        };

        let file_meta = match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Ok(None),
            Err(e) if is_absent(&e) => return Ok(None),
            Err(e) => return Err(io_error(key, e)),
        };

        let body = match fs::read(&path).await {
            Ok(body) => body,
            // Removed between the stat and the read.
            Err(e) if is_absent(&e) => return Ok(None),
            Err(e) => return Err(io_error(key, e)),
        };

        let metadata = self.read_metadata(key, &path).await?;

        let mut object = StoredObject::new(body, metadata);
        if let Ok(modified) = file_meta.modified() {
            object = object.with_uploaded(modified);
        }

        tracing::trace!(key = %key, size = object.body.len(), "read object from bucket");

        Ok(Some(object))
    }
}

fn is_absent(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

fn io_error(key: &ObjectKey, source: std::io::Error) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        source,
    }
}
