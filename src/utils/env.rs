/// Get environment variable with WEBHOOK_SYNC_ prefix, falling back to unprefixed version
///
/// # Examples
///
/// ```rust
/// use gateway_webhook_sync::utils::get_env_with_prefix;
///
/// // Checks WEBHOOK_SYNC_SHOP_BASE_URL first, then SHOP_BASE_URL
/// let base_url = get_env_with_prefix("SHOP_BASE_URL");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("WEBHOOK_SYNC_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}
