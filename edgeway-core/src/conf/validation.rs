use crate::conf::EdgewayConfig;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const SUPPORTED_VERSION: u32 = 1;
pub const MAX_DECODE_PASSES: u8 = 4;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
    pub file: PathBuf,

    /// Config block the issue belongs to (`server`, `bucket`, `delivery`).
    pub section: String,
    pub help: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn has_violations(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    fn error(&mut self, file: &Path, section: &str, message: String, help: Option<&str>) {
        self.errors.push(ValidationIssue {
            severity: Severity::Error,
            message,
            file: file.to_path_buf(),
            section: section.to_owned(),
            help: help.map(str::to_owned),
        });
    }

    fn warning(&mut self, file: &Path, section: &str, message: String, help: Option<&str>) {
        self.warnings.push(ValidationIssue {
            severity: Severity::Warning,
            message,
            file: file.to_path_buf(),
            section: section.to_owned(),
            help: help.map(str::to_owned),
        });
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_plain(&self) {
        for issue in self.errors.iter().chain(self.warnings.iter()) {
            let severity = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };

            println!(
                "{}:{}: [{}] {}",
                issue.file.display(),
                severity,
                issue.section,
                issue.message
            );

            if let Some(help) = &issue.help {
                println!("  help: {}", help);
            }
        }
    }

    pub fn render_pretty(&self) {
        if self.has_violations() {
            println!(
                "configuration validation failed ({} errors, {} warnings)\n",
                self.errors.len(),
                self.warnings.len()
            );
        }

        for issue in self.errors.iter().chain(self.warnings.iter()) {
            let label = match issue.severity {
                Severity::Error => "error".red().bold().to_string(),
                Severity::Warning => "warning".yellow().bold().to_string(),
            };

            println!("{} ({})", issue.file.display(), issue.section.dimmed());
            println!("  {}: {}", label, issue.message);
            if let Some(help) = &issue.help {
                println!("  {}: {}", "help".cyan(), help);
            }
            println!();
        }
    }
}

/// Validate a parsed config. `file` is only used to label issues.
///
/// Nothing else is checked when the version is unsupported.
pub fn validate_config(config: &EdgewayConfig, file: &Path) -> ValidationReport {
    let mut report = ValidationReport::default();

    if validate_version(config, file, &mut report) {
        validate_server(config, file, &mut report);
        validate_bucket(config, file, &mut report);
        validate_delivery(config, file, &mut report);
    }

    report
}

fn validate_version(config: &EdgewayConfig, file: &Path, report: &mut ValidationReport) -> bool {
    if config.server.version == SUPPORTED_VERSION {
        return true;
    }

    report.error(
        file,
        "server",
        format!("invalid config version: {}", config.server.version),
        Some("Set `version = 1` in the server block."),
    );
    false
}

fn validate_server(config: &EdgewayConfig, file: &Path, report: &mut ValidationReport) {
    let server = &config.server;

    if server.listen.parse::<SocketAddr>().is_err() {
        report.error(
            file,
            "server",
            format!("invalid listen address: {}", server.listen),
            Some("Use an IP and port, e.g. \"0.0.0.0:8080\"."),
        );
    }

    if server.threads == Some(0) {
        report.error(file, "server", "threads must be greater than zero".to_string(), None);
    }

    if let Some(pid_file) = &server.pid_file {
        match pid_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) if !parent.exists() => report.error(
                file,
                "server",
                format!(
                    "pid file parent directory does not exist: {}",
                    pid_file.display()
                ),
                None,
            ),
            Some(parent) if !parent.is_dir() => report.error(
                file,
                "server",
                format!("pid file parent is not a directory: {}", pid_file.display()),
                None,
            ),
            _ => {}
        }
    }

    if let Some(tls) = &server.tls {
        if !Path::new(&tls.cert).is_file() {
            report.error(file, "server", format!("missing cert file: {}", tls.cert), None);
        }
        if !Path::new(&tls.key).is_file() {
            report.error(file, "server", format!("missing key file: {}", tls.key), None);
        }
    }
}

fn validate_bucket(config: &EdgewayConfig, file: &Path, report: &mut ValidationReport) {
    let root = &config.bucket.root;

    if !root.is_dir() {
        report.error(
            file,
            "bucket",
            format!("bucket root is not a directory: {}", root.display()),
            Some("Relative roots are resolved against the config directory."),
        );
    }
}

fn validate_delivery(config: &EdgewayConfig, file: &Path, report: &mut ValidationReport) {
    let delivery = &config.delivery;

    if !(1..=MAX_DECODE_PASSES).contains(&delivery.decode_passes) {
        report.error(
            file,
            "delivery",
            format!(
                "decode_passes must be between 1 and {MAX_DECODE_PASSES}: {}",
                delivery.decode_passes
            ),
            None,
        );
    } else if delivery.decode_passes == 1 {
        report.warning(
            file,
            "delivery",
            "decode_passes = 1 disables double-decode resolution".to_string(),
            Some("Objects requested with double-encoded names will not be found."),
        );
    }

    if delivery.negative_max_age_seconds >= delivery.default_max_age_seconds {
        report.error(
            file,
            "delivery",
            format!(
                "negative_max_age_seconds ({}) must be less than default_max_age_seconds ({})",
                delivery.negative_max_age_seconds, delivery.default_max_age_seconds
            ),
            Some("Not-found responses should expire before found ones."),
        );
    }

    if let Some(domain) = &delivery.external_domain
        && let Err(reason) = check_external_domain(domain)
    {
        report.error(
            file,
            "delivery",
            format!("invalid external_domain '{domain}': {reason}"),
            Some("Use a bare host such as \"cdn.example.com\"."),
        );
    }
}

fn check_external_domain(domain: &str) -> Result<(), &'static str> {
    let host = domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(domain)
        .trim_end_matches('/');

    if host.is_empty() {
        return Err("empty domain");
    }
    if host.contains('/') {
        return Err("must not contain a path");
    }
    if host.contains(char::is_whitespace) {
        return Err("must not contain whitespace");
    }

    Ok(())
}
