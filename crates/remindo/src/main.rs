// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remindo - a Telegram bot for themes, notes and alarms.
//!
//! This is the binary entry point.

mod serve;
mod shutdown;

use clap::{Parser, Subcommand};

/// Remindo - a Telegram bot for themes, notes and alarms.
#[derive(Parser, Debug)]
#[command(name = "remindo", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot (default).
    Serve,
    /// Validate the configuration and exit.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match remindo_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            remindo_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("remindo: {e}");
                std::process::exit(1);
            }
        }
        Commands::Check => {
            println!(
                "remindo: config ok (backend.host={}, reminders.enabled={})",
                config.backend.host.as_deref().unwrap_or_default(),
                config.reminders.enabled
            );
        }
    }
}
