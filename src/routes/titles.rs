use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::TitleDetails,
    routes::AppState,
};

/// Case-insensitive catalog lookup; lets callers tell an unknown seed apart
/// from filters that matched nothing
pub async fn lookup(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> AppResult<Json<TitleDetails>> {
    let index = state.index.get().await?;
    index
        .catalog()
        .find(&title)
        .map(|item| Json(TitleDetails::from(item)))
        .ok_or_else(|| AppError::NotFound(format!("Title '{}' is not in the catalog", title)))
}

/// Distinct category tags for the genre filter
pub async fn genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<String>>> {
    let index = state.index.get().await?;
    Ok(Json(index.catalog().genres()))
}

/// Distinct release years for the year filter
pub async fn years(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<i32>>> {
    let index = state.index.get().await?;
    Ok(Json(index.catalog().years()))
}
