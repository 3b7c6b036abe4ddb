//! Ingress CIDR filtering.
//!
//! A subnet becomes an ingress rule only if it names a concrete network.
//! Zero-length prefixes (`0.0.0.0/0`, `::/0`, `127.0.0.0/0`, ...) match
//! every address and only show up for placeholder or misconfigured subnet
//! entries, so they are never propagated. Loopback ranges are never
//! reachable from another model.
//!
//! IPv4-mapped IPv6 networks (`::ffff:0.0.0.0/96`) are classified as the
//! IPv4 network they map, so the mapped forms are excluded too.

use crate::core::config::IngressConfig;
use crate::core::error::CrossModelResult;
use crate::model::Subnet;
use ipnetwork::{IpNetwork, Ipv4Network};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a subnet was left out of the ingress rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Exclusion {
    /// Prefix length zero.
    CatchAll,
    /// Loopback network address.
    Loopback,
    /// Multicast network address.
    Multicast,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatchAll => write!(f, "catch-all"),
            Self::Loopback => write!(f, "loopback"),
            Self::Multicast => write!(f, "multicast"),
        }
    }
}

/// Which CIDRs may become ingress rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngressPolicy {
    pub exclude_catch_all: bool,
    pub exclude_loopback: bool,
    pub exclude_multicast: bool,
}

impl Default for IngressPolicy {
    fn default() -> Self {
        Self::from(&IngressConfig::default())
    }
}

impl From<&IngressConfig> for IngressPolicy {
    fn from(config: &IngressConfig) -> Self {
        Self {
            exclude_catch_all: config.exclude_catch_all,
            exclude_loopback: config.exclude_loopback,
            exclude_multicast: config.exclude_multicast,
        }
    }
}

impl IngressPolicy {
    /// Reason `network` is excluded, or `None` if it is admitted.
    ///
    /// Checks use the address as written, so `127.0.0.1/8` is loopback
    /// even though its host bits are set.
    pub fn exclusion(&self, network: &IpNetwork) -> Option<Exclusion> {
        let network = unmap_ipv4(*network);
        if self.exclude_catch_all && network.prefix() == 0 {
            return Some(Exclusion::CatchAll);
        }
        let ip = network.ip();
        if self.exclude_loopback && ip.is_loopback() {
            return Some(Exclusion::Loopback);
        }
        if self.exclude_multicast && ip.is_multicast() {
            return Some(Exclusion::Multicast);
        }
        None
    }

    /// Classify one subnet. Fails with Invalid if its CIDR does not parse.
    pub fn classify(&self, subnet: &Subnet) -> CrossModelResult<Option<Exclusion>> {
        Ok(self.exclusion(&subnet.network()?))
    }

    /// CIDRs of the admitted subnets, in input order.
    pub fn admitted_cidrs(&self, subnets: &[Subnet]) -> CrossModelResult<Vec<String>> {
        let mut cidrs = Vec::with_capacity(subnets.len());
        for subnet in subnets {
            match self.classify(subnet)? {
                None => cidrs.push(subnet.cidr.clone()),
                Some(reason) => {
                    tracing::debug!(subnet = %subnet.id, cidr = %subnet.cidr, %reason, "subnet excluded from ingress");
                }
            }
        }
        Ok(cidrs)
    }
}

/// The IPv4 network an IPv4-mapped IPv6 network covers, or `network`
/// unchanged.
fn unmap_ipv4(network: IpNetwork) -> IpNetwork {
    let IpNetwork::V6(v6) = network else {
        return network;
    };
    match v6.ip().to_ipv4_mapped() {
        Some(ip) if v6.prefix() >= 96 => Ipv4Network::new(ip, v6.prefix() - 96)
            .map(IpNetwork::V4)
            .unwrap_or(network),
        _ => network,
    }
}
