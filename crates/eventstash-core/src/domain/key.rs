//! CacheKey - (EventId, ArtifactName) を 1 つのストアキーに変換
//!
//! # アドレッシング方式
//! Flat composite key `"{eventId}-{artifactName}"` inside a single store
//! segment. The segmented form (`events/{eventId}` + name) is deliberately not
//! offered: switching schemes orphans every entry already written.
//!
//! The event id renders as digits only, so the first `-` always marks the
//! split point and the encoding stays injective even when the artifact name
//! itself contains `-`.

use std::fmt;

use super::ids::{ArtifactName, EventId};

/// Opaque store key. Recomputed per request, never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn encode(event_id: EventId, artifact: &ArtifactName) -> Self {
        Self(format!("{}-{}", event_id, artifact.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
