//! OwnershipGuard - principal と path の event id を突き合わせる
//!
//! - Write: identity が event id の文字列表現と完全一致すること
//! - Read: デプロイ単位で選んだ `ReadPolicy` のどちらか一方だけ
//!
//! The guard only decides. It never touches the store, and a denial reason
//! never contains cache contents.

use crate::app::config::ReadPolicy;
use crate::domain::{EventId, Principal};

/// What the caller is trying to do with an event's artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Read,
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Human-readable and safe to return to the caller.
    Deny(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

#[derive(Debug, Clone, Default)]
pub struct OwnershipGuard {
    read_policy: ReadPolicy,
}

impl OwnershipGuard {
    /// 読み取りポリシーを指定して作成
    pub fn new(read_policy: ReadPolicy) -> Self {
        Self { read_policy }
    }

    pub fn read_policy(&self) -> &ReadPolicy {
        &self.read_policy
    }

    /// principal が event に対して relation を行えるか判定
    pub fn authorize(&self, principal: &Principal, event_id: EventId, relation: Relation) -> Decision {
        match relation {
            Relation::Write => authorize_write(principal, event_id),
            Relation::Read => match &self.read_policy {
                ReadPolicy::EventClaim => authorize_read_by_claim(principal, event_id),
                ReadPolicy::Scope { tag } => authorize_read_by_scope(principal, event_id, tag),
            },
        }
    }
}

fn authorize_write(principal: &Principal, event_id: EventId) -> Decision {
    if principal.identity == event_id.to_string() {
        return Decision::Allow;
    }
    Decision::Deny(format!(
        "Credential only valid for {event_id}, presented identity {}",
        principal.identity
    ))
}

fn authorize_read_by_claim(principal: &Principal, event_id: EventId) -> Decision {
    match principal.event_id {
        Some(claim) if claim == event_id => Decision::Allow,
        Some(claim) => Decision::Deny(format!(
            "Credential only valid for {event_id}, presented event claim {claim}"
        )),
        None => Decision::Deny(format!(
            "Credential only valid for {event_id}, identity {} carries no event claim",
            principal.identity
        )),
    }
}

fn authorize_read_by_scope(principal: &Principal, event_id: EventId, tag: &str) -> Decision {
    if principal.has_scope(tag) {
        return Decision::Allow;
    }
    Decision::Deny(format!(
        "Credential for identity {} lacks scope '{tag}' required to read {event_id}",
        principal.identity
    ))
}
