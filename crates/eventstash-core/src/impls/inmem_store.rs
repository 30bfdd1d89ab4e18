//! InMemoryCacheStore - 開発用・テスト用の期限付き KV ストア
//!
//! # 実装詳細
//! - `InMemoryBackend` が (segment, key) -> Entry を保持（複数ストアで共有可能）
//! - `InMemoryCacheStore` は 1 つの segment と全体 TTL を持つビュー
//! - 期限切れは get 時に遅延削除し、set のたびに backend 全体から掃除する
//!   （バックグラウンドの掃除ループはない）

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{BlobEnvelope, CacheKey};
use crate::ports::{CacheStats, CacheStore, Clock, StoreError, SystemClock};

#[derive(Debug, Clone)]
struct Entry {
    value: BlobEnvelope,
    expires_at: DateTime<Utc>,
}

/// Shared storage behind one or more segment views.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    entries: Arc<Mutex<HashMap<(String, String), Entry>>>,
}

impl InMemoryBackend {
    /// 空の backend を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries currently held, including ones that expired since the last write.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[derive(Debug, Default)]
struct Counters {
    gets: AtomicU64,
    sets: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
}

/// A segment of an [`InMemoryBackend`] with one store-wide TTL.
///
/// # 使用例
/// ```ignore
/// let store = InMemoryCacheStore::new("events", Duration::from_secs(86_400));
/// store.set(&key, envelope, None).await?;
/// ```
pub struct InMemoryCacheStore<C = SystemClock> {
    backend: InMemoryBackend,
    segment: String,
    default_ttl: Duration,
    clock: C,
    counters: Counters,
}

impl InMemoryCacheStore<SystemClock> {
    /// 新しい backend と SystemClock でストアを作成
    pub fn new(segment: impl Into<String>, default_ttl: Duration) -> Self {
        Self::with_clock(InMemoryBackend::new(), segment, default_ttl, SystemClock)
    }
}

impl<C: Clock> InMemoryCacheStore<C> {
    /// 既存の backend と任意の Clock でストアを作成（テストでは FixedClock）
    pub fn with_clock(
        backend: InMemoryBackend,
        segment: impl Into<String>,
        default_ttl: Duration,
        clock: C,
    ) -> Self {
        Self {
            backend,
            segment: segment.into(),
            default_ttl,
            clock,
            counters: Counters::default(),
        }
    }

    fn slot(&self, key: &CacheKey) -> (String, String) {
        (self.segment.clone(), key.as_str().to_string())
    }

    fn fail(&self, message: String) -> StoreError {
        self.counters.errors.fetch_add(1, Ordering::Relaxed);
        StoreError::OperationFailed(message)
    }
}

#[async_trait]
impl<C: Clock> CacheStore for InMemoryCacheStore<C> {
    async fn get(&self, key: &CacheKey) -> Result<Option<BlobEnvelope>, StoreError> {
        self.counters.gets.fetch_add(1, Ordering::Relaxed);
        let slot = self.slot(key);
        let now = self.clock.now();

        let mut entries = self.backend.entries.lock().await;
        let expired = entries
            .get(&slot)
            .is_some_and(|entry| entry.expires_at <= now);
        if expired {
            entries.remove(&slot);
        }
        let found = entries.get(&slot).map(|entry| entry.value.clone());
        drop(entries);

        let counter = if found.is_some() {
            &self.counters.hits
        } else {
            &self.counters.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(found)
    }

    /// A zero override means "use the store-wide TTL", same as `None`.
    async fn set(
        &self,
        key: &CacheKey,
        value: BlobEnvelope,
        ttl_override: Option<Duration>,
    ) -> Result<(), StoreError> {
        let ttl = ttl_override
            .filter(|ttl| !ttl.is_zero())
            .unwrap_or(self.default_ttl);
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| self.fail(format!("invalid ttl {ttl:?}: {e}")))?;
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| self.fail(format!("ttl {ttl} overflows the clock")))?;

        let slot = self.slot(key);
        let mut entries = self.backend.entries.lock().await;
        // 期限切れは segment を問わず掃除する
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(slot, Entry { value, expires_at });
        drop(entries);
        self.counters.sets.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats {
            gets: self.counters.gets.load(Ordering::Relaxed),
            sets: self.counters.sets.load(Ordering::Relaxed),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            errors: self.counters.errors.load(Ordering::Relaxed),
        }
    }
}
