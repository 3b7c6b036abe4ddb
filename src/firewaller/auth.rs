//! Caller authorization.

/// Identity of the agent calling the facade.
pub trait Authorizer: Send + Sync {
    /// Tag of the authenticated entity, e.g. `machine-0`.
    fn tag(&self) -> &str;

    /// Whether the caller is a controller agent.
    fn auth_controller(&self) -> bool;
}

/// Authorizer with a fixed identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAuthorizer {
    pub tag: String,
    pub controller: bool,
}

impl StaticAuthorizer {
    /// A controller machine agent.
    pub fn controller(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            controller: true,
        }
    }

    /// A non-controller agent.
    pub fn agent(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            controller: false,
        }
    }
}

impl Authorizer for StaticAuthorizer {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn auth_controller(&self) -> bool {
        self.controller
    }
}
