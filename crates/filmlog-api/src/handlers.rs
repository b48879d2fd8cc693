use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use filmlog_models::{MovieCredits, MovieWatchEvent};
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "time": Utc::now().to_rfc3339(),
    }))
}

pub async fn list_movies(State(state): State<AppState>) -> ApiResult<Json<Vec<MovieWatchEvent>>> {
    let events = state.store.list_all().await?;
    Ok(Json(events))
}

/// Ingest the configured feed, then return every stored event
pub async fn refresh_feed(State(state): State<AppState>) -> ApiResult<Json<Vec<MovieWatchEvent>>> {
    let report = state.ingest.run(&state.feed).await?;
    info!(
        operation = "api_refresh",
        inserted = report.inserted(),
        skipped = report.skipped(),
        "Feed refreshed"
    );
    Ok(Json(report.events))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> ApiResult<Json<MovieWatchEvent>> {
    let event = state.store.find_by_guid(&guid).await?;
    Ok(Json(event))
}

pub async fn get_movie_credits(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> ApiResult<Json<MovieCredits>> {
    let event = state.store.find_by_guid(&guid).await?;
    let tmdb_id = event
        .tmdb_id
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingTmdbId { guid })?;

    let credits = state.provider.credits(&tmdb_id).await?;
    Ok(Json(credits))
}
