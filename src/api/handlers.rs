use axum::{extract::State, http::StatusCode, response::Html, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::Recommendation,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// Catalog index of the selected movie. Preferred: indices are unique
    /// where titles are not.
    pub index: Option<usize>,
    /// Title fallback; resolves to the first matching catalog entry
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub generated_at: DateTime<Utc>,
    pub recommendations: Vec<Recommendation>,
}

/// One selector entry
#[derive(Debug, Serialize)]
pub struct MovieOption {
    pub index: usize,
    pub title: String,
}

// Handlers

/// Serves the single interactive page
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Lists all catalog movies for the selector, in catalog order
///
/// Duplicate titles are included as-is; the index disambiguates them.
pub async fn get_movies(State(state): State<AppState>) -> Json<Vec<MovieOption>> {
    let movies = state
        .catalog
        .iter()
        .enumerate()
        .map(|(index, movie)| MovieOption {
            index,
            title: movie.title.clone(),
        })
        .collect();

    Json(movies)
}

/// Runs a recommendation for the selected movie
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let recommendations = match (request.index, request.title) {
        (Some(index), _) => state.engine.recommend(index).await?,
        (None, Some(title)) => state.engine.recommend_by_title(&title).await?,
        (None, None) => {
            return Err(AppError::InvalidInput(
                "Request must carry a movie index or title".to_string(),
            ))
        }
    };

    Ok(Json(RecommendationResponse {
        generated_at: Utc::now(),
        recommendations,
    }))
}
