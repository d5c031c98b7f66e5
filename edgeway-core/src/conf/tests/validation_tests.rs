use crate::conf::{
    BucketConfig, DeliveryConfig, EdgewayConfig, ServerConfig, Severity, validate_config,
};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn config(bucket_root: &Path) -> EdgewayConfig {
    EdgewayConfig {
        server: ServerConfig {
            version: 1,
            listen: "127.0.0.1:8080".to_string(),
            threads: None,
            pid_file: None,
            tls: None,
        },
        bucket: BucketConfig {
            root: bucket_root.to_path_buf(),
        },
        delivery: DeliveryConfig::default(),
    }
}

fn messages(cfg: &EdgewayConfig) -> Vec<String> {
    validate_config(cfg, &PathBuf::from("edgeway.hcl"))
        .errors
        .into_iter()
        .map(|i| i.message)
        .collect()
}

//-----------------------------------------------------------------------------
// Server
//-----------------------------------------------------------------------------
#[test]
fn valid_config_has_no_violations() {
    let dir = tempdir().unwrap();
    let report = validate_config(&config(dir.path()), Path::new("edgeway.hcl"));

    assert!(!report.has_violations());
}

#[test]
fn unsupported_version_stops_further_checks() {
    // Arrange
    let mut cfg = config(Path::new("/definitely/not/here"));
    cfg.server.version = 2;

    // Act
    let errors = messages(&cfg);

    // Assert
    assert_eq!(errors, vec!["invalid config version: 2".to_string()]);
}

#[test]
fn invalid_listen_address_is_reported() {
    // Arrange
    let dir = tempdir().unwrap();
    let mut cfg = config(dir.path());
    cfg.server.listen = "localhost".to_string();

    // Act
    let errors = messages(&cfg);

    // Assert
    assert_eq!(errors, vec!["invalid listen address: localhost".to_string()]);
}

#[test]
fn missing_tls_files_are_reported() {
    // Arrange
    let dir = tempdir().unwrap();
    let mut cfg = config(dir.path());
    cfg.server.tls = Some(crate::conf::TlsConfig {
        cert: "/no/cert.pem".to_string(),
        key: "/no/key.pem".to_string(),
    });

    // Act
    let errors = messages(&cfg);

    // Assert
    assert_eq!(errors.len(), 2);
}

//-----------------------------------------------------------------------------
// Delivery
//-----------------------------------------------------------------------------
#[test]
fn decode_passes_out_of_range_is_an_error() {
    let dir = tempdir().unwrap();

    for passes in [0, 5] {
        let mut cfg = config(dir.path());
        cfg.delivery.decode_passes = passes;

        assert_eq!(messages(&cfg).len(), 1, "passes = {passes}");
    }
}

#[test]
fn single_decode_pass_is_only_a_warning() {
    // Arrange
    let dir = tempdir().unwrap();
    let mut cfg = config(dir.path());
    cfg.delivery.decode_passes = 1;

    // Act
    let report = validate_config(&cfg, Path::new("edgeway.hcl"));

    // Assert
    assert!(report.errors.is_empty());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].severity, Severity::Warning);
}

#[test]
fn negative_lifetime_must_be_shorter_than_default() {
    // Arrange
    let dir = tempdir().unwrap();
    let mut cfg = config(dir.path());
    cfg.delivery.default_max_age_seconds = 60;
    cfg.delivery.negative_max_age_seconds = 60;

    // Act
    let errors = messages(&cfg);

    // Assert
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("negative_max_age_seconds (60)"));
}

#[test]
fn external_domain_must_not_carry_a_path() {
    let dir = tempdir().unwrap();

    let cases = [
        ("cdn.example.com", 0),
        ("https://cdn.example.com/", 0),
        ("cdn.example.com/assets", 1),
        ("", 1),
        ("https://", 1),
    ];

    for (domain, expected) in cases {
        let mut cfg = config(dir.path());
        cfg.delivery.external_domain = Some(domain.to_string());

        assert_eq!(messages(&cfg).len(), expected, "domain = {domain:?}");
    }
}
