use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{posters::PosterProvider, SharedIndex},
};

pub mod posters;
pub mod recommendations;
pub mod titles;

/// Shared handler state
///
/// The index and the poster provider are independent: poster lookups never
/// touch the index or its initialization barrier.
pub struct AppState {
    pub index: SharedIndex,
    pub posters: Arc<dyn PosterProvider>,
}

impl AppState {
    pub fn new(index: SharedIndex, posters: Arc<dyn PosterProvider>) -> Self {
        Self { index, posters }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommendations", get(recommendations::recommend))
        .route("/titles/:title", get(titles::lookup))
        .route("/genres", get(titles::genres))
        .route("/years", get(titles::years))
        .route("/posters", get(posters::poster))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "index_ready": state.index.is_built(),
        })),
    )
}
