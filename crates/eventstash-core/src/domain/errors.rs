//! Errors - エラー型と分類
//!
//! Every failure of a cache operation maps 1:1 to one `CacheError` variant.
//! Nothing is retried inside the core.

use thiserror::Error;

/// ErrorKind は失敗の運用分類
///
/// - Client: 呼び出し側の問題（404 / 403 / 413 相当）
/// - Infrastructure: 下位ストアの障害（503 相当）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Client,
    Infrastructure,
}

/// Outcome of a failed read or write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Key absent or expired at read time.
    #[error("not found")]
    NotFound,

    /// Ownership mismatch. The reason is safe to hand back to the caller.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Payload is over the configured ceiling.
    #[error("payload of {size} bytes exceeds the limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    /// The backing store failed; carries the store's own message.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl CacheError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound | Self::Forbidden(_) | Self::TooLarge { .. } => ErrorKind::Client,
            Self::StoreUnavailable(_) => ErrorKind::Infrastructure,
        }
    }
}

/// Rejected boundary input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("event id must be a positive integer")]
    NonPositiveEventId,

    #[error("event id must be a positive integer, got '{0}'")]
    MalformedEventId(String),

    #[error("artifact name must not be empty")]
    EmptyArtifactName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_are_infrastructure_errors() {
        assert_eq!(
            CacheError::StoreUnavailable("redis down".into()).kind(),
            ErrorKind::Infrastructure
        );
        assert_eq!(CacheError::NotFound.kind(), ErrorKind::Client);
        assert_eq!(
            CacheError::TooLarge { size: 2, limit: 1 }.kind(),
            ErrorKind::Client
        );
    }

    #[test]
    fn too_large_message_names_both_sizes() {
        let msg = CacheError::TooLarge { size: 11, limit: 10 }.to_string();
        assert!(msg.contains("11"));
        assert!(msg.contains("10"));
    }
}
