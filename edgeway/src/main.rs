use clap::{Parser, Subcommand};
use edgeway_core::cli::config::{self as config_cli, ConfigCmd};
use edgeway_core::conf::{ConfigError, load_config};
use edgeway_core::logging::init_logging;
use edgeway_core::server;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "edgeway",
    version,
    about = "Edgeway: Pingora-based object bucket edge proxy"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },

    /// Run the Edgeway proxy (default)
    Run {
        /// Path to the config directory
        #[arg(long, default_value = "config")]
        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Config { cmd }) => {
            if let Err(e) = config_cli::run(cmd) {
                eprintln!("config error: {e}");
                std::process::exit(1);
            }
        }

        Some(Command::Run { config }) => run(config),

        None => run(PathBuf::from("config")),
    }
}

fn run(config_dir: PathBuf) {
    init_logging();

    let cfg = match load_config(&config_dir) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, config = %config_dir.display(), "failed to load config");
            eprintln!("{e}");
            if let ConfigError::Validation { report } = &e {
                report.render_plain();
            }
            std::process::exit(1);
        }
    };

    if let Err(e) = server::run(cfg) {
        tracing::error!(error = %e, "failed to start edgeway server");
        std::process::exit(1);
    }
}
