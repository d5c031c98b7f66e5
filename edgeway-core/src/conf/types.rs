use crate::dispatch::{DeliveryMode, DispatcherSettings};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EdgewayConfig {
    pub server: ServerConfig,
    pub bucket: BucketConfig,

    #[serde(default)]
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    /// Socket address of the public listener, e.g. `0.0.0.0:8080`.
    pub listen: String,

    /// Optional number of worker threads - default is decided by Pingora.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,
}

impl ServerConfig {
    /// Scheme recorded in cache keys for requests arriving on the listener.
    pub fn scheme(&self) -> &'static str {
        if self.tls.is_some() { "https" } else { "http" }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TlsConfig {
    pub cert: String,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BucketConfig {
    /// Directory holding the objects. Relative paths are resolved against
    /// the config directory by the loader.
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeliveryConfig {
    /// When set, every request is answered with a redirect to this domain
    /// instead of being served from the bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_domain: Option<String>,

    #[serde(default = "default_max_age_seconds")]
    pub default_max_age_seconds: u64,

    #[serde(default = "negative_max_age_seconds")]
    pub negative_max_age_seconds: u64,

    #[serde(default = "decode_passes")]
    pub decode_passes: u8,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            external_domain: None,
            default_max_age_seconds: default_max_age_seconds(),
            negative_max_age_seconds: negative_max_age_seconds(),
            decode_passes: decode_passes(),
        }
    }
}

fn default_max_age_seconds() -> u64 {
    3600
}

fn negative_max_age_seconds() -> u64 {
    60
}

fn decode_passes() -> u8 {
    2
}

impl From<&DeliveryConfig> for DispatcherSettings {
    fn from(cfg: &DeliveryConfig) -> Self {
        let mode = match &cfg.external_domain {
            Some(domain) => DeliveryMode::Redirect {
                external_domain: domain.clone(),
            },
            None => DeliveryMode::Cached,
        };

        Self {
            mode,
            default_max_age_seconds: cfg.default_max_age_seconds,
            negative_max_age_seconds: cfg.negative_max_age_seconds,
            decode_passes: cfg.decode_passes,
        }
    }
}
