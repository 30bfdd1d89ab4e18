//! Principal: the verified caller handed over by the authentication layer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ids::EventId;

/// Authenticated identity plus whatever it was granted.
///
/// The core only reads it; token verification happens elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Claimed identity (for event credentials this is the event id as a string).
    pub identity: String,

    /// Separate `eventId` claim, if the credential carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub scopes: BTreeSet<String>,
}

impl Principal {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            event_id: None,
            scopes: BTreeSet::new(),
        }
    }

    /// Principal of an event build credential: identity and claim both name the event.
    pub fn for_event(event_id: EventId) -> Self {
        Self::new(event_id.to_string()).with_event_claim(event_id)
    }

    pub fn with_event_claim(mut self, event_id: EventId) -> Self {
        self.event_id = Some(event_id);
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.insert(scope.into());
        self
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_principal_carries_identity_and_claim() {
        let id = EventId::new(42).unwrap();
        let p = Principal::for_event(id).with_scope("build");
        assert_eq!(p.identity, "42");
        assert_eq!(p.event_id, Some(id));
        assert!(p.has_scope("build"));
        assert!(!p.has_scope("event"));
    }

    #[test]
    fn deserializes_camel_case_claims() {
        let p: Principal = serde_json::from_value(serde_json::json!({
            "identity": "alice",
            "eventId": 9,
            "scopes": ["user", "event"]
        }))
        .unwrap();
        assert_eq!(p.event_id.map(|e| e.get()), Some(9));
        assert!(p.has_scope("event"));
    }
}
