use anyhow::{Context, Result};
use qa_translate::{
    config::Config,
    metrics::TranslationMetrics,
    provider::ProviderClient,
    server::{build_router, AppState},
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("qa_translate=info".parse()?),
        )
        .init();

    info!("Starting translation service");

    let config = Config::from_env()?;

    let metrics = Arc::new(TranslationMetrics::new());
    let provider = ProviderClient::from_config(&config, Arc::clone(&metrics))
        .context("Failed to build translation provider client")?;

    if provider.is_enabled() {
        info!("DeepL translation enabled ({})", config.deepl_api_url);
    } else {
        warn!("DEEPL_API_KEY not configured, translation disabled (original text is returned)");
    }

    let app = build_router(AppState {
        translator: Arc::new(provider),
        metrics,
    });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
