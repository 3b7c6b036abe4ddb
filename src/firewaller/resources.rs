//! Per-connection resource registry.
//!
//! Long-lived resources such as watchers are registered here and handed
//! back to the client as opaque ids ("1", "2", ...). Ids are never reused
//! within a registry.

use crate::core::error::{CrossModelError, CrossModelResult, EntityKind};
use crate::state::StringsWatcher;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Something that can be stopped when its client goes away.
pub trait Resource: Send + Sync {
    fn stop(&self);
}

impl Resource for StringsWatcher {
    fn stop(&self) {
        StringsWatcher::stop(self);
    }
}

#[derive(Debug)]
struct Registry<R> {
    next_id: u64,
    resources: BTreeMap<u64, Arc<R>>,
}

/// Registry of live resources of one type.
#[derive(Debug)]
pub struct Resources<R> {
    inner: Mutex<Registry<R>>,
}

impl<R: Resource> Resources<R> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Registry {
                next_id: 1,
                resources: BTreeMap::new(),
            }),
        }
    }

    /// Register a resource and return its id.
    pub fn register(&self, resource: R) -> String {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.resources.insert(id, Arc::new(resource));
        id.to_string()
    }

    /// Get a registered resource.
    pub fn get(&self, id: &str) -> CrossModelResult<Arc<R>> {
        let key = parse_id(id)?;
        self.inner
            .lock()
            .resources
            .get(&key)
            .cloned()
            .ok_or_else(|| CrossModelError::not_found(EntityKind::Resource, id))
    }

    /// Stop and unregister one resource.
    pub fn stop(&self, id: &str) -> CrossModelResult<()> {
        let key = parse_id(id)?;
        let resource = self
            .inner
            .lock()
            .resources
            .remove(&key)
            .ok_or_else(|| CrossModelError::not_found(EntityKind::Resource, id))?;
        resource.stop();
        Ok(())
    }

    /// Stop and unregister every resource.
    pub fn stop_all(&self) {
        let resources = std::mem::take(&mut self.inner.lock().resources);
        for resource in resources.values() {
            resource.stop();
        }
    }

    /// Number of registered resources.
    pub fn count(&self) -> usize {
        self.inner.lock().resources.len()
    }
}

impl<R: Resource> Default for Resources<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_id(id: &str) -> CrossModelResult<u64> {
    id.parse()
        .map_err(|_| CrossModelError::invalid(format!("resource id {id:?}")))
}
