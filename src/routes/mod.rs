//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server holds no map state. It hands out the map credential, answers
//! health checks, and serves the web bundle plus the boundary dataset as
//! static files. Login and signup exist only as redirects to the map.

pub mod key;


use axum::Router;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use atlas::view::DATASET_URL;

use crate::state::AppState;

fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/key", get(key::get_key))
        .route("/login", get(redirect_to_map))
        .route("/signup", get(redirect_to_map))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// API routes, the boundary dataset, and the static bundle at `/`.
///
/// The dataset is mounted at the URL the map client requests, backed by the
/// configured file, so `DATASET_PATH` can point anywhere under `STATIC_DIR`.
pub fn app(state: AppState) -> Router {
    let static_service = ServeDir::new(&state.config.static_dir).append_index_html_on_directories(true);
    let dataset_service = ServeFile::new(state.config.dataset_file());
    api_routes(state)
        .route_service(DATASET_URL, dataset_service)
        .fallback_service(static_service)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn redirect_to_map() -> Redirect {
    Redirect::temporary("/")
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
