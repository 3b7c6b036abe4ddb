//! Remote firewaller facade.
//!
//! Serves remote models the information they need to open firewall ports
//! for cross-model relations: which local subnets a relation's traffic
//! originates from, and a subscription to subnet changes. Only controller
//! agents may use it.

use crate::core::error::{CrossModelError, CrossModelResult};
use crate::firewaller::auth::Authorizer;
use crate::firewaller::params::{
    IngressSubnetResult, IngressSubnetResults, RemoteEntities, RemoteEntityId, StringsWatchResult,
};
use crate::firewaller::resources::Resources;
use crate::ingress::{IngressPolicy, IngressResolution, IngressResolver};
use crate::model::{ModelTag, RemoteEntityToken};
use crate::ops::metrics::{names, MetricsRegistry};
use crate::state::{FirewallerState, StringsWatcher};
use std::sync::Arc;

/// Remote firewaller API over a model's state.
pub struct RemoteFirewallerApi<S> {
    state: Arc<S>,
    resources: Arc<Resources<StringsWatcher>>,
    resolver: IngressResolver,
    metrics: Arc<MetricsRegistry>,
}

impl<S: FirewallerState> RemoteFirewallerApi<S> {
    /// Create the facade. Fails with PermissionDenied unless the caller is
    /// a controller agent.
    pub fn new(
        state: Arc<S>,
        resources: Arc<Resources<StringsWatcher>>,
        authorizer: &dyn Authorizer,
        policy: IngressPolicy,
    ) -> CrossModelResult<Self> {
        if !authorizer.auth_controller() {
            tracing::warn!(tag = authorizer.tag(), "remote firewaller access denied");
            return Err(CrossModelError::PermissionDenied);
        }
        Ok(Self {
            state,
            resources,
            resolver: IngressResolver::new(policy),
            metrics: Arc::new(MetricsRegistry::new()),
        })
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Ingress CIDRs for each requested relation, in request order.
    ///
    /// A failure for one entity is reported in its own slot and does not
    /// affect the others.
    pub fn ingress_subnets_for_relations(&self, entities: &RemoteEntities) -> IngressSubnetResults {
        let results = entities
            .entities
            .iter()
            .map(|entity| {
                self.metrics.counter_inc(names::INGRESS_REQUESTS_TOTAL);
                let resolution = self.resolve_one(entity);
                self.record(entity, &resolution);
                IngressSubnetResult::from(resolution)
            })
            .collect();
        IngressSubnetResults { results }
    }

    fn resolve_one(&self, entity: &RemoteEntityId) -> IngressResolution {
        let model = ModelTag::parse(&entity.model_uuid)?;
        let token = RemoteEntityToken::new(entity.token.as_str())?;
        self.resolver.resolve(self.state.as_ref(), &model, &token)
    }

    fn record(&self, entity: &RemoteEntityId, resolution: &IngressResolution) {
        match resolution {
            Ok(Some(_)) => self.metrics.counter_inc(names::INGRESS_RESOLVED_TOTAL),
            Ok(None) => self.metrics.counter_inc(names::INGRESS_NO_INGRESS_TOTAL),
            Err(err) => {
                self.metrics.counter_inc(names::INGRESS_ERRORS_TOTAL);
                tracing::warn!(
                    model = %entity.model_uuid,
                    token = %entity.token,
                    error = %err,
                    retriable = err.is_retriable(),
                    "cannot resolve ingress subnets"
                );
            }
        }
    }

    /// Subscribe to subnet changes.
    ///
    /// The watcher's initial change (the ids of all known subnets) is
    /// returned together with the id the watcher is registered under.
    pub async fn watch_subnets(&self) -> StringsWatchResult {
        match self.start_subnet_watch().await {
            Ok(result) => result,
            Err(err) => StringsWatchResult::from(err),
        }
    }

    async fn start_subnet_watch(&self) -> CrossModelResult<StringsWatchResult> {
        let watcher = self.state.watch_subnets()?;
        let Some(changes) = watcher.next().await else {
            return Err(CrossModelError::WatcherClosed {
                message: "subnet watcher closed before its initial event".to_string(),
            });
        };
        let watcher_id = self.resources.register(watcher);
        self.metrics
            .gauge_set(names::WATCH_ACTIVE_WATCHERS, self.resources.count() as u64);
        tracing::info!(watcher_id = %watcher_id, subnets = changes.len(), "subnet watcher started");
        Ok(StringsWatchResult {
            watcher_id,
            changes,
            error: None,
        })
    }

    /// Wait for the next change on a registered subnet watcher.
    pub async fn next_subnet_changes(&self, watcher_id: &str) -> CrossModelResult<Vec<String>> {
        let watcher = self.resources.get(watcher_id)?;
        watcher.next().await.ok_or_else(|| CrossModelError::WatcherClosed {
            message: format!("subnet watcher {watcher_id} stopped"),
        })
    }

    /// Stop a registered subnet watcher.
    pub fn stop_watcher(&self, watcher_id: &str) -> CrossModelResult<()> {
        self.resources.stop(watcher_id)?;
        self.metrics
            .gauge_set(names::WATCH_ACTIVE_WATCHERS, self.resources.count() as u64);
        Ok(())
    }
}
