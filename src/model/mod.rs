//! Domain model.
//!
//! - [`relation`] - Relations, endpoints, roles and relation keys
//! - [`entity`] - Model tags and remote entity tokens
//! - [`subnet`] - Subnets and CIDR parsing

pub mod entity;
pub mod relation;
pub mod subnet;

pub use entity::{ModelTag, RemoteEntityToken};
pub use relation::{CharmRelation, Endpoint, EndpointRef, Relation, RelationKey, Role, Scope};
pub use subnet::Subnet;
