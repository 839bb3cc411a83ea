use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use saarthi_api::{
    config::Config,
    db::{create_redis_client, Cache, CacheWriterHandle},
    recommender::artifact::load_model,
    routes::{create_router, AppState},
    services::{HttpLinkPreviewer, RecommendationService, RecommendationSettings},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "saarthi_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // The model is read-only from here on
    let model = load_model(Path::new(&config.model_path))
        .with_context(|| format!("Failed to load model from {}", config.model_path))?;

    let (cache, cache_handle) = match &config.redis_url {
        Some(url) => {
            let client = create_redis_client(url)?;
            let (cache, handle) = Cache::spawn(client, config.preview_timeout());
            tracing::info!("Link preview cache enabled");
            (Some(cache), Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set, link previews will not be cached");
            (None, None)
        }
    };

    let previewer = HttpLinkPreviewer::new(
        config.preview_timeout(),
        cache,
        config.preview_cache_ttl_secs,
    )?;

    let service = RecommendationService::new(
        Arc::new(model),
        Arc::new(previewer),
        RecommendationSettings {
            max_recommendations: config.max_recommendations,
            courses_per_level: config.roadmap_courses_per_level,
        },
    );

    let app = create_router(AppState::new(service));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    flush_cache(cache_handle).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

async fn flush_cache(handle: Option<CacheWriterHandle>) {
    if let Some(handle) = handle {
        handle.shutdown().await;
    }
}
