use anyhow::{Context, Result};
use referent_server::{AppState, ServerConfig, build_app};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,referent_core=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    if config.openrouter_api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY is not set; generation routes will fail");
    }
    if config.huggingface_api_key.is_none() {
        tracing::warn!("HUGGINGFACE_API_KEY is not set; /api/illustration will fail");
    }

    let state = AppState::from_config(&config)?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;
    tracing::info!(addr = %config.bind, "listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
