// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TiffinHub - a marketplace backend for home-meal providers.
//!
//! This is the binary entry point for the TiffinHub service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod serve;

/// TiffinHub - a marketplace backend for home-meal providers.
#[derive(Parser, Debug)]
#[command(name = "tiffinhub", version, about, long_about = None)]
struct Cli {
    /// Path to an explicit config file (overrides the XDG hierarchy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the TiffinHub HTTP service.
    Serve,
    /// Print the resolved configuration summary.
    Config,
}

fn load_config(path: Option<&PathBuf>) -> tiffinhub_config::HubConfig {
    let result = match path {
        Some(path) => tiffinhub_config::load_and_validate_path(path),
        None => tiffinhub_config::load_and_validate(),
    };
    match result {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tiffinhub: {e}");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run(config).await {
                tracing::error!("serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            println!("server    {}:{}", config.server.host, config.server.port);
            println!("database  {}", config.storage.database_path);
            println!("auto_confirm {}", config.orders.auto_confirm);
            println!(
                "payments  {}",
                if config.payments.key_id.is_some() { "configured" } else { "disabled" }
            );
            println!(
                "email     {}",
                if config.email.smtp_host.is_some() { "configured" } else { "disabled" }
            );
            println!(
                "sms       {}",
                if config.sms.account_sid.is_some() { "configured" } else { "disabled" }
            );
        }
        None => {
            println!("tiffinhub: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = tiffinhub_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.server.port, 8080);
    }
}
