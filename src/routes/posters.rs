use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::Poster,
    routes::AppState,
    services::posters,
};

#[derive(Debug, Deserialize)]
pub struct PosterQuery {
    title: String,
}

/// Handler for poster lookups; misses resolve to a placeholder image
pub async fn poster(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PosterQuery>,
) -> AppResult<Json<Poster>> {
    if params.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
    }
    let poster = posters::fetch_poster(state.posters.as_ref(), &params.title).await;
    Ok(Json(poster))
}
