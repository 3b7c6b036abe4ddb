//! Collaborator interfaces over the model's backing store.
//!
//! The resolver only reads through these traits, so any store that can
//! answer the lookups can back it. [`memory::MemoryState`] is the in-process
//! implementation used by the CLI and tests.
//!
//! - [`watcher`] - Strings watcher channel used for subnet notifications
//! - [`memory`] - In-memory state backend

pub mod memory;
pub mod watcher;

use crate::core::error::CrossModelResult;
use crate::model::{ModelTag, Relation, RelationKey, RemoteEntityToken, Subnet};
use serde::{Deserialize, Serialize};

pub use memory::MemoryState;
pub use watcher::StringsWatcher;

/// An application deployed in the local model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Application name.
    pub name: String,
    /// Charm the application runs, if known.
    #[serde(default)]
    pub charm: Option<String>,
}

impl Application {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            charm: None,
        }
    }
}

/// Resolves cross-model tokens to local relation keys.
pub trait RemoteEntityRegistry: Send + Sync {
    /// Fails with NotFound if `token` is not registered for `model`.
    fn lookup(&self, model: &ModelTag, token: &RemoteEntityToken) -> CrossModelResult<RelationKey>;
}

/// Looks up live relations.
pub trait RelationRegistry: Send + Sync {
    /// Fails with NotFound if the relation no longer exists.
    fn get_by_key(&self, key: &RelationKey) -> CrossModelResult<Relation>;
}

/// Looks up applications in the local model.
pub trait ApplicationRegistry: Send + Sync {
    /// Fails with NotFound if no local application has this name.
    fn get_by_name(&self, name: &str) -> CrossModelResult<Application>;
}

/// Enumerates the model's known subnets.
pub trait SubnetProvider: Send + Sync {
    /// Ordering is defined by the provider and may change between calls.
    fn list_all(&self) -> CrossModelResult<Vec<Subnet>>;
}

/// Produces subnet-change subscriptions.
pub trait SubnetWatchSource: Send + Sync {
    /// Every call returns an independent watcher whose first change is the
    /// ids of all currently known subnets.
    fn watch_subnets(&self) -> CrossModelResult<StringsWatcher>;
}

/// Everything the remote firewaller facade reads from.
pub trait FirewallerState:
    RemoteEntityRegistry + RelationRegistry + ApplicationRegistry + SubnetProvider + SubnetWatchSource
{
}

impl<T> FirewallerState for T where
    T: RemoteEntityRegistry
        + RelationRegistry
        + ApplicationRegistry
        + SubnetProvider
        + SubnetWatchSource
{
}
