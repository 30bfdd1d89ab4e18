//! EventCacheBuilder - 起動時のワイヤリングと検証
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）: 不正な設定ではプロセスを起動しない
//! - ストアは 1 度だけ作り、Arc で facade に注入する

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::app::cache::EventCache;
use crate::app::config::CacheConfig;
use crate::ports::CacheStore;

/// BuildError は構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),
}

/// # 使用例
/// ```ignore
/// let cache = EventCacheBuilder::new()
///     .config(CacheConfig::from_env()?)
///     .store(Arc::new(redis_store))
///     .build()?;
/// ```
///
/// `store` を省略した場合は config の segment / TTL で InMemoryCacheStore を作る。
#[derive(Default)]
pub struct EventCacheBuilder {
    config: CacheConfig,
    store: Option<Arc<dyn CacheStore>>,
}

impl EventCacheBuilder {
    /// 新しい EventCacheBuilder を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 設定を差し替え
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// ストアを注入（省略時は InMemoryCacheStore）
    pub fn store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// 設定を検証して EventCache を構築
    pub fn build(self) -> Result<EventCache, BuildError> {
        let config = self.config;
        let mut problems = Vec::new();
        if config.expires_in_sec == 0 {
            problems.push("expiresInSec must be positive");
        } else if !ttl_fits_clock(config.ttl()) {
            problems.push("expiresInSec is too large to compute an expiry time");
        }
        if config.max_byte_size == 0 {
            problems.push("maxByteSize must be positive");
        }
        if config.segment.is_empty() {
            problems.push("segment must not be empty");
        }
        if !problems.is_empty() {
            return Err(BuildError::InvalidConfig(problems.join(", ")));
        }

        Ok(match self.store {
            Some(store) => EventCache::new(store, &config),
            None => EventCache::in_memory(&config),
        })
    }
}

/// 今から TTL 後の時刻が chrono で表現できるか
fn ttl_fits_clock(ttl: Duration) -> bool {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::ReadPolicy;
    use crate::impls::InMemoryCacheStore;
    use rstest::rstest;

    #[test]
    fn test_build_with_defaults() {
        let cache = EventCacheBuilder::new().build().unwrap();
        assert_eq!(cache.max_byte_size(), 1024 * 1024 * 1024);
        assert_eq!(cache.guard().read_policy(), &ReadPolicy::EventClaim);
    }

    #[test]
    fn test_build_with_injected_store() {
        let store = Arc::new(InMemoryCacheStore::new("events", Duration::from_secs(5)));
        let cache = EventCacheBuilder::new()
            .config(CacheConfig {
                max_byte_size: 16,
                ..CacheConfig::default()
            })
            .store(store)
            .build()
            .unwrap();
        assert_eq!(cache.max_byte_size(), 16);
    }

    #[rstest]
    #[case(u64::MAX)]
    #[case(1_000_000_000_000_000)]
    fn test_build_rejects_ttl_beyond_clock_range(#[case] expires_in_sec: u64) {
        let config = CacheConfig::from_lookup(|name| {
            (name == "EVENTSTASH_EXPIRES_IN_SEC").then(|| expires_in_sec.to_string())
        })
        .unwrap();
        assert_eq!(config.expires_in_sec, expires_in_sec);

        let result = EventCacheBuilder::new().config(config).build();
        assert!(matches!(
            result,
            Err(BuildError::InvalidConfig(msg)) if msg.contains("expiresInSec")
        ));
    }

    #[test]
    fn test_build_accepts_long_but_representable_ttl() {
        let cache = EventCacheBuilder::new()
            .config(CacheConfig {
                expires_in_sec: 100 * 365 * 24 * 60 * 60,
                ..CacheConfig::default()
            })
            .build();
        assert!(cache.is_ok());
    }

    #[test]
    fn test_build_rejects_zero_limits() {
        let result = EventCacheBuilder::new()
            .config(CacheConfig {
                expires_in_sec: 0,
                max_byte_size: 0,
                ..CacheConfig::default()
            })
            .build();
        assert!(matches!(
            result,
            Err(BuildError::InvalidConfig(msg)) if msg.contains("expiresInSec") && msg.contains("maxByteSize")
        ));
    }
}
