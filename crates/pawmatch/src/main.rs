// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PawMatch operator CLI.
//!
//! Checks the hosted store and AI key, lists schema migrations, and runs the
//! matchmaking chat against the live catalog from a terminal.

mod chat;
mod check;
mod migrations;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pawmatch_config::PawmatchConfig;

/// PawMatch - pet adoption backend tools.
#[derive(Parser, Debug)]
#[command(name = "pawmatch", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check store connectivity, table contents and AI configuration.
    Check {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// List SQL schema migrations in apply order.
    Migrations {
        /// Directory holding the `.sql` files.
        #[arg(long, default_value = "migrations")]
        dir: PathBuf,
    },
    /// Chat with the adoption assistant over the live catalog.
    Chat,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("pawmatch: use --help for available commands");
        return;
    };

    let result = match command {
        Commands::Migrations { dir } => migrations::run_migrations(&dir),
        Commands::Check { plain } => {
            let config = load_config();
            init_tracing(&config.app.log_level);
            check::run_check(&config, plain).await
        }
        Commands::Chat => {
            let config = load_config();
            init_tracing(&config.app.log_level);
            chat::run_chat(config).await
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Loads and validates configuration, exiting with rendered diagnostics on failure.
fn load_config() -> PawmatchConfig {
    match pawmatch_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            pawmatch_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pawmatch={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
