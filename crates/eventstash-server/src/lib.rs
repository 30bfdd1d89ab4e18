//! # eventstash-server — HTTP front end
//!
//! Exposes [`eventstash_core::EventCache`] over HTTP.
//!
//! - `GET  /events/:id/*cache` — read an artifact (bearer auth)
//! - `PUT  /events/:id/*cache` — write an artifact (bearer auth)
//! - `GET  /stats` — store counters (bearer auth)
//! - `GET  /health/liveness` — unauthenticated probe
//!
//! Middleware: TraceLayer → auth → routes.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware::from_fn;
use eventstash_core::app::{BuildError, ConfigError};
use eventstash_core::EventCacheBuilder;
use thiserror::Error;
use tower_http::trace::TraceLayer;

pub use auth::TokenTable;
pub use error::ApiError;
pub use state::{AppState, ServerConfig};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tokens(#[from] auth::TokenFileError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Assemble the router around an already-built state.
pub fn app(state: AppState, tokens: TokenTable) -> Router {
    let max_byte_size = state.cache.max_byte_size();

    let api = Router::new()
        .merge(routes::events::router(max_byte_size))
        .merge(routes::stats::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(axum::Extension(tokens))
        .with_state(state);

    let health = Router::new().route("/health/liveness", axum::routing::get(liveness));

    Router::new()
        .merge(health)
        .merge(api)
        .layer(TraceLayer::new_for_http())
}

/// Build the cache (and its single store handle) plus the token table.
pub fn bootstrap(config: &ServerConfig) -> Result<(AppState, TokenTable), BootstrapError> {
    let cache = EventCacheBuilder::new().config(config.cache.clone()).build()?;

    let tokens = match &config.tokens_file {
        Some(path) => TokenTable::load(path)?,
        None => {
            tracing::warn!("no token file configured; every cache request will be rejected");
            TokenTable::new()
        }
    };

    Ok((AppState::new(cache), tokens))
}

async fn liveness() -> &'static str {
    "ok"
}
