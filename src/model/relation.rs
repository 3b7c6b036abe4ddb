//! Relations and their endpoints.
//!
//! A relation connects one endpoint per application. Provider/requirer
//! relations have exactly two endpoints with complementary roles; peer
//! relations have a single endpoint.

use crate::core::error::{CrossModelError, CrossModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role an endpoint plays in a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Offers a capability.
    Provider,
    /// Consumes a capability.
    Requirer,
    /// Symmetric; never applicable to cross-model ingress.
    Peer,
}

impl Role {
    /// The role an endpoint must have on the other side of a relation.
    pub fn counterpart(self) -> Role {
        match self {
            Self::Provider => Self::Requirer,
            Self::Requirer => Self::Provider,
            Self::Peer => Self::Peer,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider => write!(f, "provider"),
            Self::Requirer => write!(f, "requirer"),
            Self::Peer => write!(f, "peer"),
        }
    }
}

/// Scope of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Global,
    Container,
}

/// Interface descriptor of an endpoint as declared by its charm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharmRelation {
    /// Endpoint name.
    pub name: String,
    /// Interface type, e.g. "db2".
    pub interface: String,
    /// Role of this endpoint.
    pub role: Role,
    /// Maximum number of relations this endpoint accepts (0 = unlimited).
    #[serde(default)]
    pub limit: u32,
    /// Relation scope.
    #[serde(default)]
    pub scope: Scope,
}

/// One side of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Application owning this endpoint.
    pub application_name: String,
    /// Interface descriptor.
    pub relation: CharmRelation,
}

impl Endpoint {
    /// Create an endpoint with global scope.
    pub fn new(
        application_name: impl Into<String>,
        name: impl Into<String>,
        interface: impl Into<String>,
        role: Role,
        limit: u32,
    ) -> Self {
        Self {
            application_name: application_name.into(),
            relation: CharmRelation {
                name: name.into(),
                interface: interface.into(),
                role,
                limit,
                scope: Scope::Global,
            },
        }
    }

    /// Role of this endpoint.
    pub fn role(&self) -> Role {
        self.relation.role
    }

    /// Check whether this endpoint can be related to `other`.
    pub fn can_relate_to(&self, other: &Endpoint) -> bool {
        self.application_name != other.application_name
            && self.relation.interface == other.relation.interface
            && self.role() != Role::Peer
            && other.role() == self.role().counterpart()
    }
}

/// `application:endpoint` reference inside a relation key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointRef {
    pub application: String,
    pub endpoint: String,
}

impl fmt::Display for EndpointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.application, self.endpoint)
    }
}

/// Composite relation key, e.g. `"remote-db2:db django:db"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelationKey {
    endpoints: Vec<EndpointRef>,
}

impl RelationKey {
    /// Parse a relation key made of one (peer) or two `app:endpoint` pairs.
    pub fn parse(key: &str) -> CrossModelResult<Self> {
        let parts: Vec<&str> = key.split_whitespace().collect();
        if parts.is_empty() || parts.len() > 2 {
            return Err(CrossModelError::invalid(format!(
                "relation key {key:?} must have one or two endpoints"
            )));
        }

        let mut endpoints = Vec::with_capacity(parts.len());
        for part in parts {
            let (application, endpoint) = part.split_once(':').ok_or_else(|| {
                CrossModelError::invalid(format!(
                    "relation key {key:?}: {part:?} is not application:endpoint"
                ))
            })?;
            if application.is_empty() || endpoint.is_empty() || endpoint.contains(':') {
                return Err(CrossModelError::invalid(format!(
                    "relation key {key:?}: malformed endpoint {part:?}"
                )));
            }
            endpoints.push(EndpointRef {
                application: application.to_string(),
                endpoint: endpoint.to_string(),
            });
        }

        Ok(Self { endpoints })
    }

    /// Endpoint references in key order.
    pub fn endpoints(&self) -> &[EndpointRef] {
        &self.endpoints
    }

    /// Check if this key names a peer relation.
    pub fn is_peer(&self) -> bool {
        self.endpoints.len() == 1
    }
}

impl fmt::Display for RelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ep) in self.endpoints.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{ep}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for RelationKey {
    type Err = CrossModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RelationKey {
    type Error = CrossModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RelationKey> for String {
    fn from(key: RelationKey) -> Self {
        key.to_string()
    }
}

/// A relation between applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Model-local relation id.
    pub id: u64,
    /// Composite key.
    pub key: RelationKey,
    /// Endpoints in relation order.
    pub endpoints: Vec<Endpoint>,
}

impl Relation {
    /// Create a relation.
    ///
    /// The endpoint count must match the key, and the two endpoints of a
    /// provider/requirer relation must be able to relate to each other.
    pub fn new(id: u64, key: RelationKey, endpoints: Vec<Endpoint>) -> CrossModelResult<Self> {
        if endpoints.len() != key.endpoints().len() {
            return Err(CrossModelError::invalid(format!(
                "relation {key} has {} endpoints, key names {}",
                endpoints.len(),
                key.endpoints().len()
            )));
        }
        if let [a, b] = endpoints.as_slice() {
            if !a.can_relate_to(b) {
                return Err(CrossModelError::invalid(format!(
                    "relation {key}: {} endpoint {:?} ({}) cannot relate to {} endpoint {:?} ({})",
                    a.role(),
                    a.application_name,
                    a.relation.interface,
                    b.role(),
                    b.application_name,
                    b.relation.interface
                )));
            }
        }
        Ok(Self { id, key, endpoints })
    }

    /// Endpoints in relation order.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Endpoint owned by `application`, if any.
    pub fn endpoint(&self, application: &str) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|ep| ep.application_name == application)
    }

    /// Check if this is a peer relation.
    pub fn is_peer(&self) -> bool {
        self.endpoints.len() == 1 || self.endpoints.iter().any(|ep| ep.role() == Role::Peer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_endpoint_key() {
        let key = RelationKey::parse("remote-db2:db django:db").unwrap();
        assert_eq!(key.endpoints().len(), 2);
        assert_eq!(key.endpoints()[0].application, "remote-db2");
        assert_eq!(key.endpoints()[1].endpoint, "db");
        assert!(!key.is_peer());
        assert_eq!(key.to_string(), "remote-db2:db django:db");
    }

    #[test]
    fn test_parse_peer_key() {
        let key = RelationKey::parse("riak:ring").unwrap();
        assert!(key.is_peer());
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        for bad in ["", "django", "a:b c:d e:f", ":db django:db", "a: b:c", "a:b:c d:e"] {
            let err = RelationKey::parse(bad).unwrap_err();
            assert!(
                matches!(err, CrossModelError::Invalid { .. }),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_relation_rejects_endpoint_count_mismatch() {
        let key = RelationKey::parse("a:x b:x").unwrap();
        let ep = Endpoint::new("a", "x", "http", Role::Provider, 0);
        assert!(Relation::new(1, key, vec![ep]).is_err());
    }

    #[test]
    fn test_relation_rejects_incompatible_endpoints() {
        let key = RelationKey::parse("a:db b:db").unwrap();
        let two_requirers = vec![
            Endpoint::new("a", "db", "db2", Role::Requirer, 1),
            Endpoint::new("b", "db", "mysql", Role::Requirer, 1),
        ];
        let err = Relation::new(1, key.clone(), two_requirers).unwrap_err();
        assert!(matches!(err, CrossModelError::Invalid { .. }));

        let interface_mismatch = vec![
            Endpoint::new("a", "db", "db2", Role::Requirer, 1),
            Endpoint::new("b", "db", "mysql", Role::Provider, 1),
        ];
        assert!(Relation::new(1, key.clone(), interface_mismatch).is_err());

        let same_app = vec![
            Endpoint::new("a", "db", "db2", Role::Requirer, 1),
            Endpoint::new("a", "data", "db2", Role::Provider, 1),
        ];
        assert!(Relation::new(1, key.clone(), same_app).is_err());

        let valid = vec![
            Endpoint::new("a", "db", "db2", Role::Requirer, 1),
            Endpoint::new("b", "data", "db2", Role::Provider, 1),
        ];
        assert!(Relation::new(1, key, valid).is_ok());
    }

    #[test]
    fn test_can_relate_to() {
        let requirer = Endpoint::new("django", "db", "db2", Role::Requirer, 1);
        let provider = Endpoint::new("db2", "data", "db2", Role::Provider, 1);
        let other = Endpoint::new("mysql", "db", "mysql", Role::Provider, 1);
        assert!(requirer.can_relate_to(&provider));
        assert!(provider.can_relate_to(&requirer));
        assert!(!requirer.can_relate_to(&other));
        assert!(!requirer.can_relate_to(&requirer.clone()));
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&Role::Requirer).unwrap();
        assert_eq!(json, "\"requirer\"");
        let key: RelationKey = serde_json::from_str("\"a:x b:y\"").unwrap();
        assert_eq!(key.endpoints()[1].application, "b");
    }
}
