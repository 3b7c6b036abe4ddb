//! Remote firewaller facade.
//!
//! - [`api`] - Batch ingress queries and subnet watches
//! - [`params`] - Wire request/response shapes
//! - [`resources`] - Watcher resource registry
//! - [`auth`] - Caller authorization

pub mod api;
pub mod auth;
pub mod params;
pub mod resources;

pub use api::RemoteFirewallerApi;
pub use auth::{Authorizer, StaticAuthorizer};
pub use params::{
    IngressSubnetResult, IngressSubnetResults, RemoteEntities, RemoteEntityId, StringsWatchResult,
};
pub use resources::{Resource, Resources};
