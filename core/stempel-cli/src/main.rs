//! stempel: terminal front ends for the RFID project time tracker.
//!
//! ## Subcommands
//!
//! - `simulate`: runs the device control loop against terminal-backed fake
//!   peripherals (type `scan <hex>` to present a token)
//! - `monitor`: host-side event console, mirrors the device log into a live
//!   project table
//! - `init-config`: writes the default device configuration file

use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod monitor;
mod simulate;
mod table;

#[derive(Parser)]
#[command(name = "stempel")]
#[command(about = "RFID project time tracker")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the device control loop with simulated peripherals
    Simulate {
        /// Device configuration file (defaults to ~/.stempel/config.json)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Mirror device log lines (from stdin) into a live project table
    Monitor {
        /// Emit recognized events as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write the default device configuration file
    InitConfig {
        /// Target path (defaults to ~/.stempel/config.json)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { config } => {
            if let Err(e) = simulate::run(config.as_deref()) {
                tracing::error!(error = %e, "simulate failed");
                std::process::exit(1);
            }
        }
        Commands::Monitor { json } => {
            if let Err(e) = monitor::run(json) {
                tracing::error!(error = %e, "monitor failed");
                std::process::exit(1);
            }
        }
        Commands::InitConfig { path } => {
            if let Err(e) = init_config(path) {
                tracing::error!(error = %e, "init-config failed");
                std::process::exit(1);
            }
        }
    }
}

fn init_config(path: Option<PathBuf>) -> Result<(), String> {
    let path = path
        .or_else(stempel_core::default_config_path)
        .ok_or_else(|| "Home directory not found".to_string())?;
    let config = stempel_core::DeviceConfig::default();
    stempel_core::save_device_config(&path, &config).map_err(|err| err.to_string())?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn init_logging() {
    let debug_enabled = env::var("STEMPEL_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
