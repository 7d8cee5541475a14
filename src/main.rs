use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reelmatch_api::{
    config::Config,
    routes::{create_router, AppState},
    services::{posters::OmdbProvider, SharedIndex},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fails fast when OMDB_API_KEY is absent
    let config = Config::from_env()?;

    // Build eagerly so an empty or unreadable catalog aborts startup
    let index = SharedIndex::new(&config.catalog_path);
    index.get().await?;

    let posters = Arc::new(OmdbProvider::new(
        config.omdb_api_key.clone(),
        config.omdb_api_url.clone(),
    ));

    let app = create_router(AppState::new(index, posters));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
