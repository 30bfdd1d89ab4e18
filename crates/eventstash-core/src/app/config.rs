//! Cache configuration.
//!
//! Recognized settings, with environment overrides:
//!
//! | field          | env                          | default  |
//! |----------------|------------------------------|----------|
//! | `expiresInSec` | `EVENTSTASH_EXPIRES_IN_SEC`  | 86400    |
//! | `maxByteSize`  | `EVENTSTASH_MAX_BYTE_SIZE`   | 1 GiB    |
//! | `segment`      | `EVENTSTASH_SEGMENT`         | `events` |
//! | `readPolicy`   | `EVENTSTASH_READ_POLICY`     | `claim`  |
//!
//! Numeric values that are zero or do not parse fall back to the default.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_EXPIRES_IN_SEC: u64 = 24 * 60 * 60;
pub const DEFAULT_MAX_BYTE_SIZE: u64 = 1024 * 1024 * 1024;
pub const DEFAULT_SEGMENT: &str = "events";

pub const ENV_EXPIRES_IN_SEC: &str = "EVENTSTASH_EXPIRES_IN_SEC";
pub const ENV_MAX_BYTE_SIZE: &str = "EVENTSTASH_MAX_BYTE_SIZE";
pub const ENV_SEGMENT: &str = "EVENTSTASH_SEGMENT";
pub const ENV_READ_POLICY: &str = "EVENTSTASH_READ_POLICY";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid read policy '{0}': expected 'claim' or 'scope:<tag>'")]
    InvalidReadPolicy(String),
}

/// Who may read an event's artifacts. One policy per deployment.
///
/// Writes are always restricted to the event's own credential; this only
/// decides the read side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReadPolicy {
    /// The principal's `eventId` claim must equal the path's event id.
    #[default]
    EventClaim,

    /// The principal must hold this scope (`event`, `build`, ...).
    Scope { tag: String },
}

impl FromStr for ReadPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            None if s == "claim" => Ok(Self::EventClaim),
            Some(("scope", tag)) if !tag.is_empty() => Ok(Self::Scope {
                tag: tag.to_string(),
            }),
            _ => Err(ConfigError::InvalidReadPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for ReadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventClaim => f.write_str("claim"),
            Self::Scope { tag } => write!(f, "scope:{tag}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Store-wide TTL in seconds.
    pub expires_in_sec: u64,

    /// Largest accepted write payload, in bytes.
    pub max_byte_size: u64,

    pub segment: String,

    pub read_policy: ReadPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            expires_in_sec: DEFAULT_EXPIRES_IN_SEC,
            max_byte_size: DEFAULT_MAX_BYTE_SIZE,
            segment: DEFAULT_SEGMENT.to_string(),
            read_policy: ReadPolicy::default(),
        }
    }
}

impl CacheConfig {
    /// プロセスの環境変数から読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read_policy = match lookup(ENV_READ_POLICY) {
            Some(raw) => raw.trim().parse()?,
            None => ReadPolicy::default(),
        };
        let segment = lookup(ENV_SEGMENT)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SEGMENT.to_string());

        Ok(Self {
            expires_in_sec: positive_or(lookup(ENV_EXPIRES_IN_SEC), DEFAULT_EXPIRES_IN_SEC),
            max_byte_size: positive_or(lookup(ENV_MAX_BYTE_SIZE), DEFAULT_MAX_BYTE_SIZE),
            segment,
            read_policy,
        })
    }

    /// Zero values (e.g. from a hand-written file) are treated like unset ones.
    pub fn normalized(mut self) -> Self {
        if self.expires_in_sec == 0 {
            self.expires_in_sec = DEFAULT_EXPIRES_IN_SEC;
        }
        if self.max_byte_size == 0 {
            self.max_byte_size = DEFAULT_MAX_BYTE_SIZE;
        }
        if self.segment.is_empty() {
            self.segment = DEFAULT_SEGMENT.to_string();
        }
        self
    }

    /// ストア全体の TTL
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.expires_in_sec)
    }
}

fn positive_or(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}
