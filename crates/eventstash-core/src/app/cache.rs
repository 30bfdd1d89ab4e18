//! EventCache - transport 層から呼ばれる唯一の入口
//!
//! read:  guard(Read)  -> CacheKey -> store.get -> BlobEnvelope::decode
//! write: guard(Write) -> size check -> BlobEnvelope::encode -> store.set(ttl = None)
//!
//! The facade holds no state of its own besides the injected store handle, so
//! concurrent calls never wait on each other here. Two writes to the same key
//! race at the store and the last one wins.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, error, info};

use crate::app::config::CacheConfig;
use crate::app::guard::{Decision, OwnershipGuard, Relation};
use crate::domain::{
    ArtifactName, BlobEnvelope, CacheError, CacheKey, EventId, Headers, Principal, select_headers,
};
use crate::impls::InMemoryCacheStore;
use crate::ports::{CacheStats, CacheStore};

/// A decoded artifact ready to go back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedArtifact {
    pub body: Bytes,
    /// Attach verbatim to the outgoing response.
    pub headers: Headers,
}

#[derive(Clone)]
pub struct EventCache {
    store: Arc<dyn CacheStore>,
    guard: OwnershipGuard,
    max_byte_size: u64,
}

impl EventCache {
    /// 注入されたストアと設定から EventCache を作成
    pub fn new(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            guard: OwnershipGuard::new(config.read_policy.clone()),
            max_byte_size: config.max_byte_size,
        }
    }

    /// Facade over a fresh [`InMemoryCacheStore`] using the config's segment and TTL.
    pub fn in_memory(config: &CacheConfig) -> Self {
        let store = InMemoryCacheStore::new(config.segment.clone(), config.ttl());
        Self::new(Arc::new(store), config)
    }

    /// 書き込みを受け付ける最大バイト数
    pub fn max_byte_size(&self) -> u64 {
        self.max_byte_size
    }

    pub fn guard(&self) -> &OwnershipGuard {
        &self.guard
    }

    /// artifact を読み出す（権限チェック → get → decode）
    pub async fn read(
        &self,
        event_id: EventId,
        artifact: &ArtifactName,
        principal: &Principal,
    ) -> Result<CachedArtifact, CacheError> {
        self.check(principal, event_id, Relation::Read)?;

        let key = CacheKey::encode(event_id, artifact);
        let stored = self.store.get(&key).await.map_err(|err| {
            error!(key = %key, error = %err, "failed to read from cache");
            CacheError::StoreUnavailable(err.to_string())
        })?;

        let Some(envelope) = stored else {
            debug!(key = %key, "cache miss");
            return Err(CacheError::NotFound);
        };

        let (body, headers) = envelope.decode();
        Ok(CachedArtifact { body, headers })
    }

    /// Store `payload` under (event, artifact). `Ok(())` means accepted.
    ///
    /// No TTL override is passed: entries live for the store-wide TTL.
    pub async fn write(
        &self,
        event_id: EventId,
        artifact: &ArtifactName,
        payload: Bytes,
        request_headers: &Headers,
        principal: &Principal,
    ) -> Result<(), CacheError> {
        self.check(principal, event_id, Relation::Write)?;

        let size = payload.len() as u64;
        if size > self.max_byte_size {
            debug!(event_id = %event_id, artifact = %artifact, size, limit = self.max_byte_size, "payload too large");
            return Err(CacheError::TooLarge {
                size,
                limit: self.max_byte_size,
            });
        }

        let selected = select_headers(request_headers);
        let envelope = BlobEnvelope::encode(payload, &selected);
        let key = CacheKey::encode(event_id, artifact);

        if let Err(err) = self.store.set(&key, envelope, None).await {
            error!(key = %key, error = %err, "failed to store in cache");
            return Err(CacheError::StoreUnavailable(err.to_string()));
        }

        info!(
            event_id = %event_id,
            artifact = %artifact,
            size,
            headers = ?selected,
            "saved artifact"
        );
        Ok(())
    }

    /// ストアのカウンタを取得
    pub async fn stats(&self) -> CacheStats {
        self.store.stats().await
    }

    fn check(&self, principal: &Principal, event_id: EventId, relation: Relation) -> Result<(), CacheError> {
        match self.guard.authorize(principal, event_id, relation) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => {
                debug!(event_id = %event_id, identity = %principal.identity, ?relation, %reason, "access denied");
                Err(CacheError::Forbidden(reason))
            }
        }
    }
}
