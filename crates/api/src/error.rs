use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sentiment_core::error::SentimentError;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl From<SentimentError> for ApiError {
    fn from(err: SentimentError) -> Self {
        match err {
            SentimentError::UnknownProgram(_)
            | SentimentError::RangeTooLong { .. }
            | SentimentError::InvalidHorizon(_) => ApiError::BadRequest(err.to_string()),
            SentimentError::MissingDataFile { .. } | SentimentError::EmptyAggregateResult => {
                ApiError::NotFound(err.to_string())
            }
            other => ApiError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Internal(e) => {
                sentry_anyhow::capture_anyhow(&e);
                tracing::error!(error = %format!("{e:#}"), "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
