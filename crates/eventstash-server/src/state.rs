//! # Application State and Configuration

use std::path::PathBuf;

use eventstash_core::app::ConfigError;
use eventstash_core::{CacheConfig, EventCache};

pub const DEFAULT_PORT: u16 = 8080;
pub const ENV_PORT: &str = "EVENTSTASH_PORT";
pub const ENV_TOKENS_FILE: &str = "EVENTSTASH_TOKENS_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// JSON token table; without it every cache request is rejected with 401.
    pub tokens_file: Option<PathBuf>,
    pub cache: CacheConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            tokens_file: None,
            cache: CacheConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup(ENV_PORT)
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let tokens_file = lookup(ENV_TOKENS_FILE)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let cache = CacheConfig::from_lookup(&lookup)?;
        Ok(Self {
            port,
            tokens_file,
            cache,
        })
    }
}

/// Shared state handed to every route handler.
///
/// The cache facade wraps the one store handle created at startup.
#[derive(Clone)]
pub struct AppState {
    pub cache: EventCache,
}

impl AppState {
    pub fn new(cache: EventCache) -> Self {
        Self { cache }
    }
}
