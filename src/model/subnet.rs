//! Subnets known to the local model.

use crate::core::error::{CrossModelError, CrossModelResult};
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A network range observed in the local model.
///
/// The CIDR is kept exactly as observed so that resolved ingress rules
/// carry the same text the provider reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    /// Model-local subnet id.
    pub id: String,
    /// CIDR as reported by the provider.
    pub cidr: String,
}

impl Subnet {
    pub fn new(id: impl Into<String>, cidr: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cidr: cidr.into(),
        }
    }

    /// Parse the CIDR. Host bits are allowed (`127.0.0.1/8`).
    pub fn network(&self) -> CrossModelResult<IpNetwork> {
        IpNetwork::from_str(&self.cidr).map_err(|e| {
            CrossModelError::invalid(format!("subnet {} cidr {:?}: {e}", self.id, self.cidr))
        })
    }
}
