//! CacheStore port - 期限付き KV ストア（InMemory / Redis など）
//!
//! The store owns entry lifetime completely: it is created with one global
//! TTL and one segment, and evicts on its own. The core only ever calls
//! `get` / `set` / `stats`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{BlobEnvelope, CacheKey};

/// StoreError は下位ストアの障害
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0}")]
    OperationFailed(String),
}

/// Counters exposed for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub gets: u64,
    pub sets: u64,
    pub hits: u64,
    pub misses: u64,
    pub errors: u64,
}

/// CacheStore は BlobEnvelope を期限付きで保存
///
/// # 設計原則
/// - key 単位で get/set はアトミック（同一 key への並行 set は last-write-wins）
/// - `ttl_override = None` ならストア全体の TTL を使う
/// - 失敗した set は既存の値を壊さない
/// - `Send + Sync`: プロセス起動時に 1 度だけ作り、Arc で共有する
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<BlobEnvelope>, StoreError>;

    async fn set(
        &self,
        key: &CacheKey,
        value: BlobEnvelope,
        ttl_override: Option<Duration>,
    ) -> Result<(), StoreError>;

    async fn stats(&self) -> CacheStats;
}
