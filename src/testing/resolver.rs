use async_trait::async_trait;
use std::collections::HashMap;
use std::net::Ipv4Addr;

use crate::webhook::HostResolver;

/// Resolver answering from a fixed host table. Unknown hosts don't resolve.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    hosts: HashMap<String, Ipv4Addr>,
}

impl StaticResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>, ip: Ipv4Addr) -> Self {
        self.hosts.insert(host.into(), ip);
        self
    }
}

#[async_trait]
impl HostResolver for StaticResolver {
    async fn resolve_ipv4(&self, host: &str) -> Option<Ipv4Addr> {
        self.hosts.get(host).copied()
    }
}
