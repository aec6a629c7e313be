// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thoughtchain - one thought per token per UTC day.
//!
//! This is the binary entry point for the Thoughtchain service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod clear;
mod migrate;
mod serve;
mod shutdown;

use clap::{Parser, Subcommand};
use thoughtchain_config::ThoughtchainConfig;

/// Thoughtchain - one thought per token per UTC day.
#[derive(Parser, Debug)]
#[command(name = "thoughtchain", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the thoughts API until SIGINT or SIGTERM.
    Serve,
    /// Apply pending database migrations and exit.
    Migrate,
    /// Ask a running server to clear every thought (requires maintenance mode).
    Clear {
        /// Base URL of the running server.
        #[arg(long, env = "API_BASE", default_value = clear::DEFAULT_BASE_URL)]
        base_url: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => {
            let config = load_config_or_exit();
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("thoughtchain: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Migrate) => {
            let config = load_config_or_exit();
            if let Err(e) = migrate::run_migrate(&config).await {
                eprintln!("thoughtchain: migration failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Clear { base_url }) => {
            std::process::exit(clear::run_clear(&base_url).await);
        }
        None => {
            println!("thoughtchain: use --help for available commands");
        }
    }
}

/// Load and validate configuration, rendering diagnostics and exiting on failure.
fn load_config_or_exit() -> ThoughtchainConfig {
    match thoughtchain_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            thoughtchain_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}
