use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::Recommendation,
    routes::AppState,
    services::RecommendationFilters,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub year: Option<i32>,
}

/// Treats `year=` (an unselected filter) as absent rather than a parse error
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    if query.title.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Please enter a title to search".to_string(),
        ));
    }

    let index = state.index.get().await?;
    let filters = RecommendationFilters::new(query.genre, query.year);
    let recommendations = index.recommend(&query.title, &filters);

    tracing::info!(
        request_id = %request_id,
        seed = %query.title,
        genre = ?filters.category,
        year = ?filters.year,
        results = recommendations.len(),
        "Recommendations served"
    );

    Ok(Json(recommendations))
}
