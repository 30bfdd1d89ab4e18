//! Ports - 抽象化レイヤー
//!
//! 各 trait は外部システム（期限付き KV ストア、時計）へのインターフェースを提供し、
//! 実装の詳細を隠蔽します。

pub mod cache_store;
pub mod clock;

pub use self::cache_store::{CacheStats, CacheStore, StoreError};
pub use self::clock::{Clock, FixedClock, SystemClock};
