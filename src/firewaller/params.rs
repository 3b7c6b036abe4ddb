//! Request and response shapes of the remote firewaller facade.
//!
//! Each ingress result slot serializes as exactly one of:
//! - `{"cidrs": ["10.0.0.0/24"]}` - ingress granted (the list may be empty)
//! - `{"cidrs": null}` - no ingress applies to the relation
//! - `{"error": {"code": "...", "message": "..."}}`

use crate::core::error::{CrossModelError, ErrorInfo};
use crate::ingress::{IngressResolution, IngressSubnetInfo};
use serde::{Deserialize, Deserializer, Serialize};

/// A relation as identified by a remote model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntityId {
    pub model_uuid: String,
    pub token: String,
}

impl RemoteEntityId {
    pub fn new(model_uuid: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            model_uuid: model_uuid.into(),
            token: token.into(),
        }
    }
}

/// Batch of remote entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntities {
    pub entities: Vec<RemoteEntityId>,
}

/// Result slot of an ingress query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngressSubnetResult {
    Error { error: ErrorInfo },
    Resolved {
        /// Must be present; `null` is the "no ingress" marker.
        #[serde(deserialize_with = "required_nullable")]
        cidrs: Option<Vec<String>>,
    },
}

fn required_nullable<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer)
}

impl IngressSubnetResult {
    /// Slot for a relation that needs no ingress.
    pub fn no_ingress() -> Self {
        Self::Resolved { cidrs: None }
    }

    /// Resolved ingress info, if any.
    pub fn result(&self) -> Option<IngressSubnetInfo> {
        match self {
            Self::Resolved { cidrs: Some(cidrs) } => Some(IngressSubnetInfo {
                cidrs: cidrs.clone(),
            }),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            Self::Error { error } => Some(error),
            Self::Resolved { .. } => None,
        }
    }

    /// Check if this slot reports "no ingress" (not an error, not a list).
    pub fn is_no_ingress(&self) -> bool {
        matches!(self, Self::Resolved { cidrs: None })
    }
}

impl From<IngressResolution> for IngressSubnetResult {
    fn from(resolution: IngressResolution) -> Self {
        match resolution {
            Ok(Some(info)) => Self::Resolved {
                cidrs: Some(info.cidrs),
            },
            Ok(None) => Self::no_ingress(),
            Err(err) => Self::from(err),
        }
    }
}

impl From<CrossModelError> for IngressSubnetResult {
    fn from(err: CrossModelError) -> Self {
        Self::Error {
            error: ErrorInfo::from(err),
        }
    }
}

/// Results of an ingress query, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressSubnetResults {
    pub results: Vec<IngressSubnetResult>,
}

/// Result of subscribing to a strings watcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringsWatchResult {
    /// Resource id of the watcher; empty on error.
    pub watcher_id: String,
    /// Initial change set.
    pub changes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl From<CrossModelError> for StringsWatchResult {
    fn from(err: CrossModelError) -> Self {
        Self {
            error: Some(ErrorInfo::from(err)),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EntityKind;
    use serde_json::json;

    #[test]
    fn test_result_slot_wire_shapes() {
        let granted = IngressSubnetResult::from(Ok(Some(IngressSubnetInfo {
            cidrs: vec!["10.0.0.0/24".to_string()],
        })));
        assert_eq!(
            serde_json::to_value(&granted).unwrap(),
            json!({"cidrs": ["10.0.0.0/24"]})
        );

        let none = IngressSubnetResult::from(Ok(None));
        assert!(none.is_no_ingress());
        assert_eq!(serde_json::to_value(&none).unwrap(), json!({"cidrs": null}));

        let empty = IngressSubnetResult::from(Ok(Some(IngressSubnetInfo::default())));
        assert!(!empty.is_no_ingress());
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({"cidrs": []}));

        let failed = IngressSubnetResult::from(Err(CrossModelError::not_found(
            EntityKind::RemoteEntity,
            "t",
        )));
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["error"]["code"], "not found");
    }

    #[test]
    fn test_result_slot_deserialize() {
        let results: IngressSubnetResults = serde_json::from_value(json!({
            "results": [
                {"cidrs": ["10.0.0.0/24"]},
                {"cidrs": null},
                {"error": {"code": "invalid", "message": "bad"}},
            ]
        }))
        .unwrap();
        assert_eq!(
            results.results[0].result().unwrap().cidrs,
            vec!["10.0.0.0/24".to_string()]
        );
        assert!(results.results[1].is_no_ingress());
        assert_eq!(results.results[2].error().unwrap().code, "invalid");
    }

    #[test]
    fn test_result_slot_rejects_missing_cidrs() {
        assert!(serde_json::from_value::<IngressSubnetResult>(json!({})).is_err());
        assert!(serde_json::from_value::<IngressSubnetResult>(json!({"cidr": null})).is_err());
        assert!(serde_json::from_value::<IngressSubnetResult>(json!({"cidrs": "10.0.0.0/24"}))
            .is_err());
        let none: IngressSubnetResult = serde_json::from_value(json!({"cidrs": null})).unwrap();
        assert_eq!(none, IngressSubnetResult::no_ingress());
    }

    #[test]
    fn test_watch_result_error_omitted_when_ok() {
        let ok = StringsWatchResult {
            watcher_id: "1".to_string(),
            changes: vec!["a".to_string()],
            error: None,
        };
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"watcher_id": "1", "changes": ["a"]})
        );
    }
}
