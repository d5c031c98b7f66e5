use http::Method;
use serde::Serialize;
use std::fmt;

/// A request path reduced to one canonical single-encoded form.
///
/// Both views are kept: `encoded` identifies the resource in cache keys and
/// redirects, `decoded` names the object in the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPath {
    encoded: String,
    decoded: String,
}

impl CanonicalPath {
    pub(crate) fn new(encoded: String, decoded: String) -> Self {
        Self { encoded, decoded }
    }

    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn decoded(&self) -> &str {
        &self.decoded
    }

    /// The bucket key: the decoded path without its leading slash.
    pub fn object_key(&self) -> ObjectKey {
        let key = self.decoded.strip_prefix('/').unwrap_or(&self.decoded);
        ObjectKey(key.to_owned())
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectKey(pub String);

impl ObjectKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectKey {
    fn from(s: &str) -> Self {
        ObjectKey(s.to_owned())
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Synthetic GET identity used as a handle into the shared cache.
///
/// Never dereferenced as a live request. The inbound method and body play
/// no part in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: Method,
    scheme: String,
    host: String,
    path: String,
}

impl CacheKey {
    pub fn new(scheme: &str, host: &str, path: &CanonicalPath) -> Self {
        Self {
            method: Method::GET,
            scheme: scheme.to_ascii_lowercase(),
            host: host.to_ascii_lowercase(),
            path: path.encoded().to_owned(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}://{}{}", self.method, self.scheme, self.host, self.path)
    }
}
