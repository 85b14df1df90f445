//! Target host validation.
//!
//! The gateway can only deliver to hosts reachable from the internet, so a
//! shop served from a private or reserved address is skipped before any API
//! call is made.

use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr};
use url::Url;

/// Resolves a host name to the IPv4 address the gateway would reach.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// First IPv4 address of `host`, or `None` if it does not resolve.
    async fn resolve_ipv4(&self, host: &str) -> Option<Ipv4Addr>;
}

/// Resolver backed by the system's DNS configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl HostResolver for SystemResolver {
    async fn resolve_ipv4(&self, host: &str) -> Option<Ipv4Addr> {
        match tokio::net::lookup_host((host, 0)).await {
            Ok(addrs) => addrs
                .filter_map(|addr| match addr.ip() {
                    IpAddr::V4(ip) => Some(ip),
                    IpAddr::V6(_) => None,
                })
                .next(),
            Err(e) => {
                tracing::debug!(
                    target: "webhook_sync::host",
                    host = host,
                    error = %e,
                    "Host lookup failed"
                );
                None
            }
        }
    }
}

/// Why a target was not eligible for registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `enable_webhook` was not part of the submitted form.
    EnableFlagMissing,
    /// The webhook URL does not parse or has no host.
    InvalidUrl { url: String },
    /// The host has no IPv4 address.
    Unresolvable { host: String },
    /// The host resolves to a private or reserved address.
    NonPublicAddress { host: String, ip: Ipv4Addr },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnableFlagMissing => write!(f, "enable_webhook was not submitted"),
            Self::InvalidUrl { url } => write!(f, "invalid webhook url '{}'", url),
            Self::Unresolvable { host } => write!(f, "{} does not resolve to an IPv4 address", host),
            Self::NonPublicAddress { host, ip } => write!(f, "{} resolves to private ip({})", host, ip),
        }
    }
}

/// Outcome of checking the webhook target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCheck {
    Public { host: String, ip: Ipv4Addr },
    Rejected(SkipReason),
}

/// Resolve the host of `url` and decide whether the gateway can reach it.
///
/// IPv4 literals are checked directly without a lookup.
pub async fn check_target<R: HostResolver + ?Sized>(resolver: &R, url: &str) -> HostCheck {
    let host = match Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) {
        Some(host) if !host.is_empty() => host,
        _ => return HostCheck::Rejected(SkipReason::InvalidUrl { url: url.to_string() }),
    };

    let ip = match host.parse::<Ipv4Addr>() {
        Ok(ip) => Some(ip),
        Err(_) => resolver.resolve_ipv4(&host).await,
    };

    match ip {
        Some(ip) if is_public_ipv4(ip) => HostCheck::Public { host, ip },
        Some(ip) => HostCheck::Rejected(SkipReason::NonPublicAddress { host, ip }),
        None => HostCheck::Rejected(SkipReason::Unresolvable { host }),
    }
}

/// Whether `ip` is a public unicast address, i.e. outside every private and
/// reserved range.
#[must_use]
pub fn is_public_ipv4(ip: Ipv4Addr) -> bool {
    let [a, b, c, _] = ip.octets();

    !(ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_documentation()
        || ip.is_unspecified()
        || ip.is_multicast()
        // "This network" (0.0.0.0/8)
        || a == 0
        // Shared address space (100.64.0.0/10) - RFC 6598
        || (a == 100 && (b & 0xC0) == 64)
        // IETF protocol assignments (192.0.0.0/24)
        || (a == 192 && b == 0 && c == 0)
        // Benchmarking (198.18.0.0/15)
        || (a == 198 && (b & 0xFE) == 18)
        // Reserved (240.0.0.0/4)
        || a >= 240)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticResolver;

    #[test]
    fn test_public_addresses() {
        for ip in ["8.8.8.8", "1.1.1.1", "52.66.10.20", "100.128.0.1", "172.32.0.1"] {
            assert!(is_public_ipv4(ip.parse().unwrap()), "{} should be public", ip);
        }
    }

    #[test]
    fn test_private_and_reserved_addresses() {
        for ip in [
            "10.0.0.5",
            "172.16.4.1",
            "192.168.1.10",
            "127.0.0.1",
            "169.254.169.254",
            "0.0.0.0",
            "0.1.2.3",
            "100.64.0.1",
            "192.0.0.8",
            "192.0.2.1",
            "198.18.0.1",
            "203.0.113.9",
            "224.0.0.1",
            "240.0.0.1",
            "255.255.255.255",
        ] {
            assert!(!is_public_ipv4(ip.parse().unwrap()), "{} should be rejected", ip);
        }
    }

    #[tokio::test]
    async fn test_check_target_resolves_host() {
        let resolver = StaticResolver::new().with_host("shop.example.com", Ipv4Addr::new(52, 66, 10, 20));

        let check = check_target(&resolver, "https://shop.example.com/razorpay/payment/webhook").await;
        assert_eq!(
            check,
            HostCheck::Public {
                host: "shop.example.com".to_string(),
                ip: Ipv4Addr::new(52, 66, 10, 20),
            }
        );
    }

    #[tokio::test]
    async fn test_check_target_rejects_private_resolution() {
        let resolver = StaticResolver::new().with_host("shop.internal.test", Ipv4Addr::new(10, 0, 0, 5));

        let check = check_target(&resolver, "http://shop.internal.test/hook").await;
        assert_eq!(
            check,
            HostCheck::Rejected(SkipReason::NonPublicAddress {
                host: "shop.internal.test".to_string(),
                ip: Ipv4Addr::new(10, 0, 0, 5),
            })
        );
    }

    #[tokio::test]
    async fn test_check_target_ip_literal_skips_resolver() {
        let resolver = StaticResolver::new();

        assert!(matches!(
            check_target(&resolver, "http://127.0.0.1:8080/hook").await,
            HostCheck::Rejected(SkipReason::NonPublicAddress { .. })
        ));
        assert!(matches!(
            check_target(&resolver, "https://8.8.8.8/hook").await,
            HostCheck::Public { .. }
        ));
    }

    #[tokio::test]
    async fn test_check_target_unresolvable_and_invalid() {
        let resolver = StaticResolver::new();

        assert_eq!(
            check_target(&resolver, "https://nowhere.example/hook").await,
            HostCheck::Rejected(SkipReason::Unresolvable { host: "nowhere.example".to_string() })
        );
        assert!(matches!(
            check_target(&resolver, "not a url").await,
            HostCheck::Rejected(SkipReason::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::NonPublicAddress {
            host: "shop.local".to_string(),
            ip: Ipv4Addr::new(192, 168, 0, 2),
        };
        assert_eq!(reason.to_string(), "shop.local resolves to private ip(192.168.0.2)");
    }
}
