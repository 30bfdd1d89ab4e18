//! eventstash-core
//!
//! Core building blocks for the event artifact cache.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, key, envelope, principal, errors）
//! - **ports**: 抽象化レイヤー（CacheStore, Clock）
//! - **app**: アプリケーションロジック（config, guard, cache facade, builder）
//! - **impls**: 実装（InMemoryCacheStore）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{CacheConfig, CachedArtifact, EventCache, EventCacheBuilder, ReadPolicy};
pub use domain::{ArtifactName, BlobEnvelope, CacheError, CacheKey, EventId, Headers, Principal};
pub use ports::{CacheStats, CacheStore, StoreError};
