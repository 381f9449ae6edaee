use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Token exchange failed: {0}")]
    Auth(#[source] reqwest::Error),

    #[error("Search request failed: {0}")]
    Upstream(#[source] reqwest::Error),
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "upstream call failed");

        let status = match self {
            SearchError::Auth { .. } | SearchError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },
}
