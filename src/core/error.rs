//! Error types and wire mapping.
//!
//! Resolution failures are reported per request slot. The error codes
//! returned by [`ErrorInfo::code`] are stable string constants that remote
//! callers match on, so they must not change.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of entity a [`CrossModelError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    /// A remote entity token unknown to the model.
    RemoteEntity,
    /// A relation key with no live relation.
    Relation,
    /// An application missing from the local model.
    Application,
    /// A watcher resource id.
    Resource,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RemoteEntity => write!(f, "remote entity"),
            Self::Relation => write!(f, "relation"),
            Self::Application => write!(f, "application"),
            Self::Resource => write!(f, "resource"),
        }
    }
}

/// Errors raised while resolving cross-model ingress.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrossModelError {
    /// Unknown token, relation, application or resource.
    #[error("{kind} {id:?} not found")]
    NotFound { kind: EntityKind, id: String },

    /// Transient failure of a backing collaborator.
    #[error("storage unavailable: {message}")]
    StorageUnavailable { message: String },

    /// Malformed token, model id, relation key or CIDR.
    #[error("invalid: {message}")]
    Invalid { message: String },

    /// Caller lacks controller access.
    #[error("permission denied")]
    PermissionDenied,

    /// A watcher closed before delivering its initial change.
    #[error("watcher closed: {message}")]
    WatcherClosed { message: String },
}

impl CrossModelError {
    /// Create a NotFound error.
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create a StorageUnavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    /// Create an Invalid error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Check if the caller may retry the whole request.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type using CrossModelError.
pub type CrossModelResult<T> = Result<T, CrossModelError>;

// ============================================================================
// Wire error mapping
// ============================================================================

/// Stable error codes carried in [`ErrorInfo`].
pub mod codes {
    pub const NOT_FOUND: &str = "not found";
    pub const UNAVAILABLE: &str = "unavailable";
    pub const INVALID: &str = "invalid";
    pub const UNAUTHORIZED: &str = "unauthorized access";
    pub const WATCHER_CLOSED: &str = "watcher closed";
}

/// Error as carried in a response slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorInfo {
    /// Map a CrossModelError to its wire representation.
    pub fn from_error(error: &CrossModelError) -> Self {
        let code = match error {
            CrossModelError::NotFound { .. } => codes::NOT_FOUND,
            CrossModelError::StorageUnavailable { .. } => codes::UNAVAILABLE,
            CrossModelError::Invalid { .. } => codes::INVALID,
            CrossModelError::PermissionDenied => codes::UNAUTHORIZED,
            CrossModelError::WatcherClosed { .. } => codes::WATCHER_CLOSED,
        };
        Self {
            code: code.to_string(),
            message: error.to_string(),
        }
    }

    /// Check if this error reports a missing entity.
    pub fn is_not_found(&self) -> bool {
        self.code == codes::NOT_FOUND
    }
}

impl From<&CrossModelError> for ErrorInfo {
    fn from(error: &CrossModelError) -> Self {
        Self::from_error(error)
    }
}

impl From<CrossModelError> for ErrorInfo {
    fn from(error: CrossModelError) -> Self {
        Self::from_error(&error)
    }
}
