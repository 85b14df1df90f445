//! Show command - print the stored settings.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::StoreArgs;

/// Run the show command
pub async fn run(args: StoreArgs) -> Result<()> {
    let reconciler = super::build_reconciler(&args)?;
    let config = reconciler
        .current_config()
        .await
        .context("could not load webhook settings")?;

    println!("{}", "Webhook settings".yellow().bold());
    println!("  url:          {}", config.url);
    println!(
        "  mode:         {}",
        if reconciler.gateway().is_test_mode() { "test" } else { "live" }
    );
    println!("  enabled:      {}", config.enabled);
    println!("  remote id:    {}", config.remote_id.as_deref().unwrap_or("-"));
    println!("  secret:       {}", if config.secret.is_some() { "set" } else { "not set" });
    println!(
        "  triggered at: {}",
        config
            .triggered_at
            .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("  events:       {}", join(&config.desired_events));
    println!("  supported:    {}", join(&config.supported_events));

    Ok(())
}

fn join(events: &std::collections::BTreeSet<String>) -> String {
    if events.is_empty() {
        "-".to_string()
    } else {
        events.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}
