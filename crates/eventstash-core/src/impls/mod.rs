//! Impls - 実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryCacheStore**: プロセス内の期限付き KV ストア
//!
//! # 本番用実装
//! Redis などネットワーク越しのストアは別クレートに配置し、`CacheStore` を実装します。

pub mod inmem_store;

pub use self::inmem_store::{InMemoryBackend, InMemoryCacheStore};
