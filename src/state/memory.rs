//! In-memory state backend.
//!
//! Holds the model's applications, relations, remote entity registrations
//! and subnets behind a single lock, and fans subnet changes out to every
//! live watcher. State can be built programmatically or loaded from a TOML
//! fixture:
//!
//! ```toml
//! model_uuid = "deadbeef-0bad-400d-8000-4b1d0d06f00d"
//!
//! [[applications]]
//! name = "django"
//!
//! [[relations]]
//! id = 123
//! key = "remote-db2:db django:db"
//! token = "token-db2:db django:db"
//! endpoints = [
//!   { application_name = "django", relation = { name = "db", interface = "db2", role = "requirer", limit = 1 } },
//!   { application_name = "remote-db2", relation = { name = "data", interface = "db2", role = "provider", limit = 1 } },
//! ]
//!
//! [[subnets]]
//! id = "1"
//! cidr = "10.0.0.0/24"
//! ```

use crate::core::error::{CrossModelError, CrossModelResult, EntityKind};
use crate::model::{Endpoint, ModelTag, Relation, RelationKey, RemoteEntityToken, Subnet};
use crate::state::watcher::{self, StringsWatcher, WatchSender};
use crate::state::{
    Application, ApplicationRegistry, RelationRegistry, RemoteEntityRegistry, SubnetProvider,
    SubnetWatchSource,
};
use anyhow::{Context, Result};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default)]
struct Inner {
    applications: HashMap<String, Application>,
    relations: HashMap<RelationKey, Relation>,
    remote_entities: HashMap<(ModelTag, RemoteEntityToken), RelationKey>,
    subnets: Vec<Subnet>,
}

/// In-memory implementation of every state collaborator.
#[derive(Debug, Default)]
pub struct MemoryState {
    inner: RwLock<Inner>,
    subnet_watchers: Mutex<Vec<WatchSender>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a local application.
    pub fn add_application(&self, application: Application) {
        self.inner
            .write()
            .applications
            .insert(application.name.clone(), application);
    }

    /// Remove a local application.
    pub fn remove_application(&self, name: &str) -> Option<Application> {
        self.inner.write().applications.remove(name)
    }

    /// Add or replace a relation.
    pub fn add_relation(&self, relation: Relation) {
        self.inner
            .write()
            .relations
            .insert(relation.key.clone(), relation);
    }

    /// Remove a relation together with every token registered for it.
    pub fn remove_relation(&self, key: &RelationKey) -> Option<Relation> {
        let mut inner = self.inner.write();
        inner.remote_entities.retain(|_, k| k != key);
        inner.relations.remove(key)
    }

    /// Register the token a remote model uses to refer to a relation.
    pub fn register_remote_entity(
        &self,
        model: ModelTag,
        token: RemoteEntityToken,
        key: RelationKey,
    ) -> CrossModelResult<()> {
        let mut inner = self.inner.write();
        match inner.remote_entities.get(&(model, token.clone())) {
            Some(existing) if *existing != key => Err(CrossModelError::invalid(format!(
                "token {token} already registered for relation {existing}"
            ))),
            _ => {
                inner.remote_entities.insert((model, token), key);
                Ok(())
            }
        }
    }

    /// Add a subnet and notify watchers.
    pub fn add_subnet(&self, subnet: Subnet) {
        let id = subnet.id.clone();
        {
            let mut inner = self.inner.write();
            inner.subnets.retain(|s| s.id != subnet.id);
            inner.subnets.push(subnet);
        }
        self.notify_subnets(vec![id]);
    }

    /// Remove a subnet and notify watchers.
    pub fn remove_subnet(&self, id: &str) -> Option<Subnet> {
        let removed = {
            let mut inner = self.inner.write();
            let pos = inner.subnets.iter().position(|s| s.id == id)?;
            inner.subnets.remove(pos)
        };
        self.notify_subnets(vec![removed.id.clone()]);
        Some(removed)
    }

    /// Number of live subnet watchers.
    pub fn subnet_watcher_count(&self) -> usize {
        let mut watchers = self.subnet_watchers.lock();
        watchers.retain(|w| !w.is_closed());
        watchers.len()
    }

    fn notify_subnets(&self, ids: Vec<String>) {
        let mut watchers = self.subnet_watchers.lock();
        watchers.retain(|w| w.send(ids.clone()));
        tracing::debug!(ids = ?ids, watchers = watchers.len(), "subnet change");
    }

    /// Load state from a TOML fixture file.
    pub fn from_fixture_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read state fixture: {}", path.display()))?;
        Self::from_fixture_toml(&content)
            .with_context(|| format!("invalid state fixture: {}", path.display()))
    }

    /// Load state from a TOML fixture string.
    pub fn from_fixture_toml(content: &str) -> Result<Self> {
        let fixture: StateFixture =
            toml::from_str(content).with_context(|| "failed to parse state fixture")?;
        fixture.into_state()
    }
}

/// Serialized form of [`MemoryState`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateFixture {
    /// Model that registered tokens belong to.
    #[serde(default)]
    pub model_uuid: Option<String>,
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub relations: Vec<RelationFixture>,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
}

/// Relation entry in a [`StateFixture`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationFixture {
    pub id: u64,
    pub key: String,
    /// Remote entity token registered for this relation.
    #[serde(default)]
    pub token: Option<String>,
    pub endpoints: Vec<Endpoint>,
}

impl StateFixture {
    fn into_state(self) -> Result<MemoryState> {
        let state = MemoryState::new();
        let model = self
            .model_uuid
            .as_deref()
            .map(ModelTag::parse)
            .transpose()?;

        for app in self.applications {
            state.add_application(app);
        }
        for rel in self.relations {
            let key = RelationKey::parse(&rel.key)?;
            if let Some(token) = rel.token {
                let model = model.with_context(|| {
                    format!("relation {key} has a token but model_uuid is not set")
                })?;
                state.register_remote_entity(model, RemoteEntityToken::new(token)?, key.clone())?;
            }
            state.add_relation(Relation::new(rel.id, key, rel.endpoints)?);
        }
        for subnet in self.subnets {
            subnet.network()?;
            state.add_subnet(subnet);
        }
        Ok(state)
    }
}

impl RemoteEntityRegistry for MemoryState {
    fn lookup(&self, model: &ModelTag, token: &RemoteEntityToken) -> CrossModelResult<RelationKey> {
        self.inner
            .read()
            .remote_entities
            .get(&(*model, token.clone()))
            .cloned()
            .ok_or_else(|| CrossModelError::not_found(EntityKind::RemoteEntity, token.as_str()))
    }
}

impl RelationRegistry for MemoryState {
    fn get_by_key(&self, key: &RelationKey) -> CrossModelResult<Relation> {
        self.inner
            .read()
            .relations
            .get(key)
            .cloned()
            .ok_or_else(|| CrossModelError::not_found(EntityKind::Relation, key.to_string()))
    }
}

impl ApplicationRegistry for MemoryState {
    fn get_by_name(&self, name: &str) -> CrossModelResult<Application> {
        self.inner
            .read()
            .applications
            .get(name)
            .cloned()
            .ok_or_else(|| CrossModelError::not_found(EntityKind::Application, name))
    }
}

impl SubnetProvider for MemoryState {
    fn list_all(&self) -> CrossModelResult<Vec<Subnet>> {
        Ok(self.inner.read().subnets.clone())
    }
}

impl SubnetWatchSource for MemoryState {
    fn watch_subnets(&self) -> CrossModelResult<StringsWatcher> {
        let (tx, watcher) = watcher::channel();
        // Snapshot and registration happen under the subscriber lock so no
        // change can slip between them.
        let mut watchers = self.subnet_watchers.lock();
        let ids: Vec<String> = self.inner.read().subnets.iter().map(|s| s.id.clone()).collect();
        tx.send(ids);
        watchers.push(tx);
        Ok(watcher)
    }
}
