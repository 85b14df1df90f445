//! Command implementations.

pub mod disable;
pub mod generate_secret;
pub mod reconcile;
pub mod show;

use anyhow::{Context, Result};
use gateway_webhook_sync::{
    ConfigBuilder, JsonFileConfigStore, LiveGatewayClient, WebhookReconciler,
};

use crate::cli::StoreArgs;

/// Reconciler over the live gateway and the JSON settings file.
pub fn build_reconciler(
    args: &StoreArgs,
) -> Result<WebhookReconciler<LiveGatewayClient, JsonFileConfigStore>> {
    let config = ConfigBuilder::new()
        .from_env()
        .build()
        .context("invalid configuration")?;

    let url = match args.url {
        Some(ref url) => url.clone(),
        None if config.webhook.shop_base_url.is_empty() => {
            anyhow::bail!("set SHOP_BASE_URL or pass --url");
        }
        None => config.webhook_url(),
    };

    let gateway = LiveGatewayClient::from_config(&config.gateway)
        .context("could not create the gateway client")?;

    Ok(WebhookReconciler::new(
        url,
        gateway,
        JsonFileConfigStore::new(&args.store),
    ))
}
