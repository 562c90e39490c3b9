use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cinematch_api::{
    api::{create_router, AppState},
    config::Config,
    data::{Catalog, SimilarityLoader},
    services::{providers::tmdb::TmdbPosterProvider, recommendations::RecommendationEngine},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Both loads are fatal on failure: the service is unusable without its
    // catalog and matrix.
    let catalog = Arc::new(Catalog::load(&config.catalog_path)?);

    let loader = SimilarityLoader::new(config.similarity_url.clone());
    let similarity = loader.load().await?;

    let posters = Arc::new(TmdbPosterProvider::new(&config));
    let engine = Arc::new(RecommendationEngine::new(
        catalog.clone(),
        similarity,
        posters,
    )?);

    let state = AppState::new(catalog, engine);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
