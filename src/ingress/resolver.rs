//! Ingress subnet resolution.
//!
//! Resolution of one token:
//! 1. token → relation key (remote entity registry)
//! 2. relation key → relation
//! 3. local endpoint discovery; a local provider or peer means no ingress
//! 4. all known subnets, filtered through the [`IngressPolicy`]
//!
//! The resolver holds no state of its own and reads only through the
//! collaborator traits, so it can be shared freely across requests.

use crate::core::error::CrossModelResult;
use crate::ingress::policy::IngressPolicy;
use crate::ingress::role::{find_local_endpoint, resolve_consumer_endpoint};
use crate::model::{ModelTag, RemoteEntityToken};
use crate::state::{ApplicationRegistry, RelationRegistry, RemoteEntityRegistry, SubnetProvider};
use serde::{Deserialize, Serialize};

/// CIDRs granted ingress for one relation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IngressSubnetInfo {
    pub cidrs: Vec<String>,
}

/// Outcome of resolving one token: `None` means no ingress applies.
pub type IngressResolution = CrossModelResult<Option<IngressSubnetInfo>>;

/// Resolves remote entity tokens to ingress CIDRs.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngressResolver {
    policy: IngressPolicy,
}

impl IngressResolver {
    pub fn new(policy: IngressPolicy) -> Self {
        Self { policy }
    }

    /// Resolve the ingress subnets for the relation `token` refers to.
    pub fn resolve<S>(
        &self,
        state: &S,
        model: &ModelTag,
        token: &RemoteEntityToken,
    ) -> IngressResolution
    where
        S: RemoteEntityRegistry + RelationRegistry + ApplicationRegistry + SubnetProvider + ?Sized,
    {
        let key = state.lookup(model, token)?;
        let relation = state.get_by_key(&key)?;

        let (_, local_app) = find_local_endpoint(&relation, state)?;
        let Some(consumer) = resolve_consumer_endpoint(&relation, &local_app.name) else {
            tracing::debug!(
                relation = %key,
                application = %local_app.name,
                "local side is not a requirer, no ingress"
            );
            return Ok(None);
        };

        // Subnets are not yet tracked per application, so every known
        // subnet is a candidate.
        let subnets = state.list_all()?;
        let cidrs = self.policy.admitted_cidrs(&subnets)?;
        tracing::debug!(
            relation = %key,
            application = consumer,
            candidates = subnets.len(),
            admitted = cidrs.len(),
            "resolved ingress subnets"
        );
        Ok(Some(IngressSubnetInfo { cidrs }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Endpoint, Relation, RelationKey, Role, Subnet};
    use crate::state::{Application, MemoryState};

    const MODEL: &str = "deadbeef-0bad-400d-8000-4b1d0d06f00d";

    fn setup(key: &str, endpoints: Vec<Endpoint>, local: &str, token: &str) -> MemoryState {
        let state = MemoryState::new();
        let key = RelationKey::parse(key).unwrap();
        state.add_relation(Relation::new(123, key.clone(), endpoints).unwrap());
        state.add_application(Application::new(local));
        state
            .register_remote_entity(
                ModelTag::parse(MODEL).unwrap(),
                RemoteEntityToken::new(token).unwrap(),
                key,
            )
            .unwrap();
        for (id, cidr) in [("1", "10.0.0.0/24"), ("2", "127.0.0.0/0"), ("3", "::1/0")] {
            state.add_subnet(Subnet::new(id, cidr));
        }
        state
    }

    fn resolve(state: &MemoryState, token: &str) -> IngressResolution {
        IngressResolver::default().resolve(
            state,
            &ModelTag::parse(MODEL).unwrap(),
            &RemoteEntityToken::new(token).unwrap(),
        )
    }

    #[test]
    fn test_consumer_gets_filtered_subnets() {
        let state = setup(
            "remote-db2:db django:db",
            vec![
                Endpoint::new("django", "db", "db2", Role::Requirer, 1),
                Endpoint::new("remote-db2", "data", "db2", Role::Provider, 1),
            ],
            "django",
            "token-a",
        );
        let info = resolve(&state, "token-a").unwrap().unwrap();
        assert_eq!(info.cidrs, vec!["10.0.0.0/24".to_string()]);
    }

    #[test]
    fn test_provider_gets_no_ingress() {
        let state = setup(
            "db2:db remote-django:db",
            vec![
                Endpoint::new("remote-django", "db", "db2", Role::Requirer, 1),
                Endpoint::new("db2", "data", "db2", Role::Provider, 1),
            ],
            "db2",
            "token-b",
        );
        assert_eq!(resolve(&state, "token-b").unwrap(), None);
    }

    #[test]
    fn test_only_catch_all_subnets_gives_empty_list() {
        let state = setup(
            "remote-db2:db django:db",
            vec![
                Endpoint::new("django", "db", "db2", Role::Requirer, 1),
                Endpoint::new("remote-db2", "data", "db2", Role::Provider, 1),
            ],
            "django",
            "token-a",
        );
        state.remove_subnet("1");
        let info = resolve(&state, "token-a").unwrap();
        assert_eq!(info, Some(IngressSubnetInfo { cidrs: vec![] }));
    }

    #[test]
    fn test_unknown_token_not_found() {
        let state = MemoryState::new();
        assert!(resolve(&state, "missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_no_local_application_not_found() {
        let state = setup(
            "remote-db2:db django:db",
            vec![
                Endpoint::new("django", "db", "db2", Role::Requirer, 1),
                Endpoint::new("remote-db2", "data", "db2", Role::Provider, 1),
            ],
            "django",
            "token-a",
        );
        state.remove_application("django");
        assert!(resolve(&state, "token-a").unwrap_err().is_not_found());
    }

    #[test]
    fn test_relation_removed_not_found() {
        let state = setup(
            "remote-db2:db django:db",
            vec![
                Endpoint::new("django", "db", "db2", Role::Requirer, 1),
                Endpoint::new("remote-db2", "data", "db2", Role::Provider, 1),
            ],
            "django",
            "token-a",
        );
        let key = RelationKey::parse("remote-db2:db django:db").unwrap();
        state.remove_relation(&key);
        assert!(resolve(&state, "token-a").unwrap_err().is_not_found());
    }
}
