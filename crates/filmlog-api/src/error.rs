use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use filmlog_core::{IngestError, StoreError};
use filmlog_sources::SourceError;
use serde_json::json;

/// Error type for HTTP handlers, rendered as `{"error": ..., "code": ...}`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("metadata lookup failed: {0}")]
    Upstream(#[from] SourceError),

    /// Credits were requested for an event that was never linked to a TMDB movie
    #[error("watch event {guid} has no TMDB id")]
    MissingTmdbId { guid: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn internal(&self) -> (StatusCode, &'static str, String) {
        tracing::error!(error = %self, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred".to_string(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Store(e) if e.is_not_found() => (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
            ApiError::MissingTmdbId { .. } => (StatusCode::BAD_REQUEST, "MISSING_TMDB_ID", self.to_string()),
            ApiError::Store(_) | ApiError::Ingest(_) | ApiError::Upstream(_) => self.internal(),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::from(StoreError::NotFound {
            guid: "g".to_string(),
        });
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let missing = ApiError::MissingTmdbId {
            guid: "g".to_string(),
        };
        assert_eq!(missing.into_response().status(), StatusCode::BAD_REQUEST);

        let upstream = ApiError::from(SourceError::UpstreamStatus {
            status: 404,
            body: String::new(),
        });
        assert_eq!(upstream.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let timeout = ApiError::from(StoreError::Timeout {
            operation: "list_all",
            seconds: 10,
        });
        assert_eq!(timeout.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
