//! Disable command - switch the webhook off.

use anyhow::Result;
use gateway_webhook_sync::DisableOutcome;

use crate::cli::StoreArgs;
use crate::{print_error, print_success, print_warning};

/// Run the disable command
pub async fn run(args: StoreArgs) -> Result<()> {
    let reconciler = super::build_reconciler(&args)?;

    match reconciler.disable().await {
        DisableOutcome::Disabled { webhook_id } => {
            print_success(&format!("Deactivated webhook {}", webhook_id));
        }
        DisableOutcome::NotRegistered => {
            print_warning(&format!("No webhook registered for {}", reconciler.target_url()));
        }
        DisableOutcome::Failed { message } => {
            print_error(&format!("Could not disable webhook: {}", message));
        }
    }

    Ok(())
}
