//! Cross-model ingress resolution.
//!
//! - [`role`] - Relation role matching and local endpoint discovery
//! - [`policy`] - Which CIDRs may become ingress rules
//! - [`resolver`] - Token to ingress CIDR resolution

pub mod policy;
pub mod resolver;
pub mod role;

pub use policy::{Exclusion, IngressPolicy};
pub use resolver::{IngressResolution, IngressResolver, IngressSubnetInfo};
pub use role::{find_local_endpoint, resolve_consumer_endpoint};
