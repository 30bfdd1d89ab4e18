//! Domain identifiers (strongly-typed IDs).
//!
//! `EventId` と `ArtifactName` は境界層で検証済みの値として core に渡されます。
//! 型として分けておくことで、event id と artifact 名の取り違えをコンパイル時に防ぎます。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::ValidationError;

/// Identifier of an Event (a build/run context that owns artifacts).
///
/// Always positive. Assigned by the outside world, never minted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct EventId(u64);

impl EventId {
    pub fn new(value: u64) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::NonPositiveEventId);
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for EventId {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EventId> for u64 {
    fn from(id: EventId) -> Self {
        id.0
    }
}

impl FromStr for EventId {
    type Err = ValidationError;

    /// Parse a path segment. Only plain ASCII digits are accepted, so `+7`,
    /// `-7` and ` 7` are all rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::MalformedEventId(s.to_string()));
        }
        let value = s
            .parse::<u64>()
            .map_err(|_| ValidationError::MalformedEventId(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Name of an artifact inside an event's namespace.
///
/// Opaque: may contain `/` or `-`, nothing is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactName(String);

impl ArtifactName {
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        if s.is_empty() {
            return Err(ValidationError::EmptyArtifactName);
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ArtifactName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ArtifactName> for String {
    fn from(name: ArtifactName) -> Self {
        name.0
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn event_id_rejects_zero() {
        assert!(matches!(
            EventId::new(0),
            Err(ValidationError::NonPositiveEventId)
        ));
        assert_eq!(EventId::new(42).unwrap().get(), 42);
    }

    #[rstest]
    #[case("42", Some(42))]
    #[case("1", Some(1))]
    #[case("0", None)]
    #[case("-7", None)]
    #[case("+7", None)]
    #[case("4.2", None)]
    #[case("abc", None)]
    #[case("", None)]
    #[case("99999999999999999999999", None)]
    fn event_id_parses_path_segments(#[case] input: &str, #[case] expected: Option<u64>) {
        let parsed = input.parse::<EventId>().ok().map(|id| id.get());
        assert_eq!(parsed, expected);
    }

    #[test]
    fn event_id_displays_as_plain_number() {
        assert_eq!(EventId::new(42).unwrap().to_string(), "42");
    }

    #[test]
    fn event_id_serde_rejects_zero() {
        assert!(serde_json::from_str::<EventId>("0").is_err());
        let id: EventId = serde_json::from_str("7").unwrap();
        assert_eq!(id.get(), 7);
    }

    #[test]
    fn artifact_name_keeps_path_segments() {
        let name = ArtifactName::new("logs/build.log").unwrap();
        assert_eq!(name.as_str(), "logs/build.log");
        assert!(matches!(
            ArtifactName::new(""),
            Err(ValidationError::EmptyArtifactName)
        ));
    }
}
