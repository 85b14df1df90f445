//! Reconcile command - the settings-save hook run by hand.

use anyhow::{Context, Result};
use colored::Colorize;
use gateway_webhook_sync::{ReconciliationOutcome, SubmittedFields};

use crate::cli::ReconcileArgs;
use crate::{print_error, print_info, print_success, print_warning};

/// Run the reconcile command
pub async fn run(args: ReconcileArgs) -> Result<()> {
    let reconciler = super::build_reconciler(&args.store)?;

    println!(
        "\n{} Reconciling webhook for {}\n",
        "webhook-sync".cyan().bold(),
        reconciler.target_url()
    );

    if args.enable.is_some() || args.events.is_some() || args.supported.is_some() {
        let mut submitted = SubmittedFields::from_store(reconciler.store())
            .await
            .context("could not read stored settings")?;
        if let Some(enable) = args.enable {
            submitted = submitted.enabled(enable);
        }
        if let Some(events) = args.events {
            submitted = submitted.events(events);
        }
        if let Some(supported) = args.supported {
            submitted = submitted.supported_events(supported);
        }
        submitted
            .commit(reconciler.store())
            .await
            .context("could not save settings")?;
        print_info(&format!("Saved settings to {}", args.store.store.display()));
    }

    let outcome = reconciler.reconcile_saved().await;
    let synced = outcome.is_synced();

    match outcome {
        ReconciliationOutcome::Created { webhook_id, events } => {
            print_success(&format!("Created webhook {}", webhook_id));
            print_events(&events);
        }
        ReconciliationOutcome::Updated { webhook_id, events } => {
            print_success(&format!("Updated webhook {}", webhook_id));
            print_events(&events);
        }
        ReconciliationOutcome::Skipped { reason } => {
            print_warning(&format!("Skipped: {}", reason));
        }
        ReconciliationOutcome::Failed { message } => {
            print_error(&format!("Gateway sync failed: {}", message));
        }
    }

    if args.strict && !synced {
        anyhow::bail!("webhook was not synchronised");
    }

    Ok(())
}

fn print_events(events: &std::collections::BTreeSet<String>) {
    if events.is_empty() {
        println!("  (no events subscribed)");
    }
    for event in events {
        println!("  - {}", event);
    }
}
