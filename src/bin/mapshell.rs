//! Map Shell CLI
//!
//! Validates host configurations and prints what loading them would do.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use url::Url;

use mapshell::config::{HostConfig, HostOptions};
use mapshell::core::{init_tracing, LogConfig};
use mapshell::plugin::ContainerKind;

/// Map Shell plugin host
#[derive(Parser, Debug)]
#[command(name = "mapshell")]
#[command(about = "Map Shell plugin host", long_about = None)]
struct Args {
    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a configuration and print its load plan
    Check {
        /// Path to the configuration file
        config: PathBuf,

        /// Base URL relative imports are resolved against
        #[arg(long)]
        base_url: Option<Url>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut log = LogConfig::new(&args.log_level);
    if args.json_logs {
        log = log.json();
    }
    init_tracing(&log);

    let result = match args.command {
        Command::Check { config, base_url } => check(config, base_url).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_config_error() => {
            error!(error = %err, "Invalid configuration");
            ExitCode::from(2)
        }
        Err(err) => {
            error!(error = %err, "Check failed");
            ExitCode::FAILURE
        }
    }
}

async fn check(path: PathBuf, base_url: Option<Url>) -> mapshell::Result<()> {
    info!("Checking {}", path.display());
    let config = HostConfig::from_file(&path).await?;

    let mut options = HostOptions::default();
    if let Some(base) = base_url {
        options = options.with_base_url(base);
    }

    println!("imports:");
    let entries = config.import_entries();
    for (name, url) in &entries {
        let resolved = options.resolve_import(name, url)?;
        println!("  {:<20} {}", name, resolved);
    }

    println!("plugins:");
    for (index, definition) in config.plugins.iter().enumerate() {
        let declared = entries.iter().any(|(name, _)| *name == definition.import);
        let placement = match &definition.container {
            ContainerKind::Unknown(kind) => format!("dropped (unknown container '{}')", kind),
            kind => kind.to_string(),
        };
        let note = if declared { "" } else { "  [import not declared, skipped]" };
        println!("  #{:<3} {:<20} {}{}", index, definition.import, placement, note);
    }

    if config.access_local_files {
        println!("requires local file access");
    }
    Ok(())
}
