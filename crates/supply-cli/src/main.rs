//! Supply CLI - inspect and edit the locally stored wellness profile
//!
//! Every run loads the profile from the OS keychain, applies one command,
//! and persists the result. Logs go to stderr so command output stays clean.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

use commands::{configure, execute, Command};
use supply_core::{ProfileManager, SettingsManager, StoreBackend};

/// Supply - secure local profile and supplement tracker
#[derive(Parser, Debug)]
#[command(name = "supply")]
#[command(version = "0.1.0")]
#[command(about = "Supply - secure local profile and supplement tracking")]
struct Args {
    /// Directory holding settings.json
    #[arg(long, env = "SUPPLY_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Storage backend (keychain or memory); overrides settings.json
    #[arg(long, env = "SUPPLY_BACKEND")]
    backend: Option<StoreBackend>,

    /// Keychain service name; overrides settings.json
    #[arg(long, env = "SUPPLY_SERVICE")]
    service: Option<String>,

    /// Log store activity
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let config_dir = match args.config_dir {
        Some(dir) => dir,
        None => SettingsManager::default_dir()?,
    };
    let mut settings_manager = SettingsManager::new(&config_dir)
        .map_err(|e| format!("Failed to read settings: {}", e))?;

    let command = match args.command {
        Command::Config {
            service,
            profile_key,
            backend,
        } => {
            let output = configure(&mut settings_manager, service, profile_key, backend)?;
            println!("{}", output.trim_end());
            return Ok(());
        }
        command => command,
    };

    let mut settings = settings_manager.get().clone();

    if let Some(backend) = args.backend {
        settings.backend = backend;
    }
    if let Some(service) = args.service {
        settings.service_name = Some(service);
    }
    debug!("Using settings from {:?}: {:?}", config_dir, settings);

    let mut manager = ProfileManager::from_settings(&settings);
    info!(
        "Profile store: {} (hardware-backed: {})",
        manager.store().backend_name(),
        manager.store().is_hardware_backed()
    );

    manager.load_profile_on_launch();
    if let Some(message) = manager.error_message() {
        eprintln!("{}", message);
        manager.clear_error();
    }

    match execute(&mut manager, command) {
        Ok(output) => {
            println!("{}", output.trim_end());
            Ok(())
        }
        Err(e) => {
            let message = manager
                .error_message()
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string());
            Err(message.into())
        }
    }
}
