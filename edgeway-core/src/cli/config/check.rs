use crate::conf::{ConfigError, EdgewayConfig, load_config};
use crate::dispatch::{DeliveryMode, DispatcherSettings};
use std::path::PathBuf;

pub fn check(path: PathBuf, plain: bool, json: bool) -> anyhow::Result<()> {
    match load_config(&path) {
        Ok(cfg) => {
            print_summary(&cfg);
            Ok(())
        }
        Err(ConfigError::Validation { report }) => {
            if json {
                println!("{}", report.render_json()?);
            } else if plain {
                report.render_plain();
            } else {
                report.render_pretty();
            }
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("{err}");
            if let Some(hint) = config_error_hint(&err) {
                eprintln!();
                eprintln!("{hint}");
            }
            std::process::exit(1);
        }
    }
}

fn print_summary(cfg: &EdgewayConfig) {
    let settings = DispatcherSettings::from(&cfg.delivery);

    println!("✔ Config loaded successfully");
    println!("✔ listening on {} ({})", cfg.server.listen, cfg.server.scheme());
    println!("✔ bucket root {}", cfg.bucket.root.display());
    match &settings.mode {
        DeliveryMode::Redirect { external_domain } => {
            println!("✔ redirecting to {external_domain}");
        }
        DeliveryMode::Cached => println!(
            "✔ serving from cache (s-maxage={}, not-found s-maxage={})",
            settings.default_max_age_seconds, settings.negative_max_age_seconds
        ),
    }
    println!("✔ up to {} decode passes", settings.decode_passes);
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::ReadFile { .. } => Some(
            "Point the command at a directory containing edgeway.hcl.\n\
             \n\
             Example:\n\
             \n\
             server {\n  version = 1\n  listen  = \"0.0.0.0:8080\"\n}\n\
             \n\
             bucket {\n  root = \"bucket\"\n}",
        ),
        ConfigError::Parse { .. } => Some(
            "Only the server, bucket and delivery blocks are recognized.",
        ),
        ConfigError::Validation { .. } => None,
    }
}
