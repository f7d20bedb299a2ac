use anyhow::Context;
use std::sync::Arc;
use stock_analyzer::{api_client::ApiClient, config::Config, logging, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    logging::init_logging(config.is_production());

    let addr = config.bind_addr;
    tracing::info!(
        environment = %config.environment,
        market_data_url = %config.market_data_url,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "Starting stock analyzer"
    );
    for ticker in &config.tickers {
        tracing::info!(asset = %ticker.asset, symbol = %ticker.symbol, "Tracking ticker");
    }

    let source = Arc::new(ApiClient::new(&config.market_data_url)?);
    let state = AppState::new(config, source);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
