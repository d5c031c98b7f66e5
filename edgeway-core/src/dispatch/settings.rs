use crate::canonical::CanonicalPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Hand every request off to an external CDN-backed domain.
    Redirect { external_domain: String },

    /// Serve from the bucket through the shared cache.
    Cached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherSettings {
    pub mode: DeliveryMode,

    /// Applied when the object carries no cache-control of its own.
    pub default_max_age_seconds: u64,

    /// Lifetime of cached not-found responses.
    pub negative_max_age_seconds: u64,

    /// Upper bound on decode passes when resolving ambiguous paths.
    pub decode_passes: u8,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            mode: DeliveryMode::Cached,
            default_max_age_seconds: 3600,
            negative_max_age_seconds: 60,
            decode_passes: 2,
        }
    }
}

/// Absolute redirect target for `path` on the external domain.
///
/// A bare domain is served over https; a domain given with an explicit
/// scheme keeps it.
pub fn redirect_location(external_domain: &str, path: &CanonicalPath) -> String {
    let domain = external_domain.trim_end_matches('/');

    if domain.starts_with("https://") || domain.starts_with("http://") {
        format!("{domain}{}", path.encoded())
    } else {
        format!("https://{domain}{}", path.encoded())
    }
}
