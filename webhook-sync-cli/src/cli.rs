//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "webhook-sync")]
#[command(version)]
#[command(about = "Keep the payment gateway's webhook registration in step with the shop settings", long_about = None)]
pub struct Cli {
    /// Log reconciliation steps to stderr (honours RUST_LOG)
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save settings (optional) and reconcile the webhook
    Reconcile(ReconcileArgs),

    /// Clear enable_webhook and deactivate the registration
    Disable(StoreArgs),

    /// Show stored settings and the remote registration id
    Show(StoreArgs),

    /// Print a freshly generated webhook secret
    GenerateSecret(GenerateSecretArgs),
}

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// JSON file holding the payment settings
    #[arg(short, long, env = "WEBHOOK_SYNC_STORE", default_value = "settings.json")]
    pub store: PathBuf,

    /// Full webhook URL (default: SHOP_BASE_URL joined with WEBHOOK_PATH)
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Value submitted for enable_webhook; omit to reconcile what is stored
    #[arg(long)]
    pub enable: Option<bool>,

    /// Events selected in the form (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub events: Option<Vec<String>>,

    /// Supported event catalog (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub supported: Option<Vec<String>>,

    /// Exit non-zero when the sync did not succeed
    #[arg(long, default_value = "false")]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct GenerateSecretArgs {
    /// Number of secrets to print
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,
}
