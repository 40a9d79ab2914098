mod config;
mod routes;
mod state;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env is normal in deployed environments.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "no .env loaded");
    }

    let config = config::ServerConfig::from_env().expect("invalid server configuration");
    let dataset = config.dataset_file();
    if dataset.is_file() {
        tracing::info!(path = %dataset.display(), url = atlas::view::DATASET_URL, "boundary dataset present");
    } else {
        tracing::warn!(path = %dataset.display(), "boundary dataset missing; parish layer will stay empty");
    }
    if routes::key::resolve_key(|var| std::env::var(var).ok()).is_none() {
        tracing::warn!("map key not configured; clients will not be able to build the base map");
    }

    let port = config.port;
    let state = state::AppState::new(config);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "galileo listening");
    axum::serve(listener, app).await.expect("server failed");
}
