//! App - アプリケーション層
//!
//! このモジュールは、domain と ports を組み合わせてキャッシュ操作を実装します。
//!
//! # 主要コンポーネント
//! - **EventCacheBuilder**: 構築とワイヤリング（起動時検証）
//! - **EventCache**: read / write / stats の facade
//! - **OwnershipGuard**: event 単位の所有権チェック
//! - **CacheConfig**: TTL・サイズ上限・読み取りポリシー

pub mod builder;
pub mod cache;
pub mod config;
pub mod guard;

pub use self::builder::{BuildError, EventCacheBuilder};
pub use self::cache::{CachedArtifact, EventCache};
pub use self::config::{CacheConfig, ConfigError, ReadPolicy};
pub use self::guard::{Decision, OwnershipGuard, Relation};
