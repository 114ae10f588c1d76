use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use journal_rank::api;
use journal_rank::config::Config;
use journal_rank::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("Catalog: {}", config.catalog_path().display());

    let state = AppState::new(config.clone())?;

    let app = Router::new()
        .route("/api/profiles", get(api::catalog::list_profiles))
        .route("/api/fields", get(api::catalog::list_fields))
        .route("/api/recommend", post(api::recommend::recommend))
        .route("/api/pool", post(api::pool::export_pool))
        .route("/api/pool/validate", post(api::pool::validate))
        .route(
            "/api/config",
            get(api::config::get_config).put(api::config::update_config),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
