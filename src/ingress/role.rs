//! Relation role matching.
//!
//! Ingress is only computed when the local model consumes a capability
//! offered by a remote application. When the local application is the
//! provider, the remote side manages its own firewall.

use crate::core::error::{CrossModelError, CrossModelResult, EntityKind};
use crate::model::{Endpoint, Relation, Role};
use crate::state::{Application, ApplicationRegistry};

/// Application name of the local consumer, if the local side requires.
///
/// Returns `None` when `local_application` provides (or is a peer in)
/// `relation`, or has no endpoint in it.
pub fn resolve_consumer_endpoint<'a>(
    relation: &'a Relation,
    local_application: &str,
) -> Option<&'a str> {
    if relation.is_peer() {
        return None;
    }
    relation
        .endpoint(local_application)
        .filter(|ep| ep.role() == Role::Requirer)
        .map(|ep| ep.application_name.as_str())
}

/// Find the endpoint owned by the local model.
///
/// Endpoints are tried in relation order; an application missing from the
/// local registry belongs to the remote model. Any other lookup error is
/// returned as is.
pub fn find_local_endpoint<'a, A>(
    relation: &'a Relation,
    applications: &A,
) -> CrossModelResult<(&'a Endpoint, Application)>
where
    A: ApplicationRegistry + ?Sized,
{
    for ep in relation.endpoints() {
        match applications.get_by_name(&ep.application_name) {
            Ok(app) => return Ok((ep, app)),
            Err(err) if err.is_not_found() => continue,
            Err(err) => return Err(err),
        }
    }
    Err(CrossModelError::not_found(
        EntityKind::Application,
        format!("local application for relation {}", relation.key),
    ))
}
