//! # eventstash-server — Binary Entry Point
//!
//! Configuration comes from the environment (see `ServerConfig`), logging is
//! controlled by `RUST_LOG` and `EVENTSTASH_LOG_FORMAT=json`.

use eventstash_server::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if std::env::var("EVENTSTASH_LOG_FORMAT").is_ok_and(|f| f == "json") {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = ServerConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {e}");
        e
    })?;

    let (state, tokens) = eventstash_server::bootstrap(&config).map_err(|e| {
        tracing::error!("Bootstrap failed: {e}");
        e
    })?;
    tracing::info!(
        tokens = tokens.len(),
        expires_in_sec = config.cache.expires_in_sec,
        max_byte_size = config.cache.max_byte_size,
        read_policy = %config.cache.read_policy,
        "cache ready"
    );

    let app = eventstash_server::app(state, tokens);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("eventstash listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
