//! webhook-sync - reconcile the gateway webhook from the command line.
//!
//! Usage:
//!   webhook-sync reconcile --store settings.json --enable true --events payment.authorized,order.paid
//!   webhook-sync disable --store settings.json
//!   webhook-sync show --store settings.json
//!   webhook-sync generate-secret

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        gateway_webhook_sync::init_tracing();
    }

    match cli.command {
        Commands::Reconcile(args) => commands::reconcile::run(args).await?,
        Commands::Disable(args) => commands::disable::run(args).await?,
        Commands::Show(args) => commands::show::run(args).await?,
        Commands::GenerateSecret(args) => commands::generate_secret::run(args)?,
    }

    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "→".blue(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    println!("{} {}", "✗".red().bold(), message);
}
