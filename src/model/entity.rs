//! Cross-model entity identifiers.

use crate::core::error::{CrossModelError, CrossModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies a model by UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelTag(Uuid);

impl ModelTag {
    /// Parse a model UUID.
    pub fn parse(id: &str) -> CrossModelResult<Self> {
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|e| CrossModelError::invalid(format!("model uuid {id:?}: {e}")))
    }
}

impl fmt::Display for ModelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model-{}", self.0)
    }
}

/// Opaque token identifying a relation across model boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteEntityToken(String);

impl RemoteEntityToken {
    /// Validate and wrap a token. Tokens are opaque but never blank.
    pub fn new(token: impl Into<String>) -> CrossModelResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(CrossModelError::invalid("remote entity token is empty"));
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RemoteEntityToken {
    type Error = CrossModelError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Self::new(token)
    }
}

impl From<RemoteEntityToken> for String {
    fn from(token: RemoteEntityToken) -> Self {
        token.0
    }
}

impl fmt::Display for RemoteEntityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_tag_parse() {
        let tag = ModelTag::parse("deadbeef-0bad-400d-8000-4b1d0d06f00d").unwrap();
        assert_eq!(tag.to_string(), "model-deadbeef-0bad-400d-8000-4b1d0d06f00d");
        assert!(ModelTag::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_blank_token_rejected() {
        assert!(RemoteEntityToken::new("").is_err());
        assert!(RemoteEntityToken::new("  ").is_err());
        assert_eq!(
            RemoteEntityToken::new("token-db2:db django:db").unwrap().as_str(),
            "token-db2:db django:db"
        );
    }

    #[test]
    fn test_token_deserialize_validates() {
        let token: RemoteEntityToken = serde_json::from_str("\"token-a\"").unwrap();
        assert_eq!(token.as_str(), "token-a");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"token-a\"");

        let err = serde_json::from_str::<RemoteEntityToken>("\"   \"").unwrap_err();
        assert!(err.to_string().contains("remote entity token is empty"));
    }
}
