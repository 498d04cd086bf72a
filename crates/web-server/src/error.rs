use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Analytics(#[from] analytics::AnalyticsError),
    /// The request body or query string could not be read into a form.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Failed to render chart: {0}")]
    Render(#[from] chart::RenderError),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Analytics(analytics_err) => {
                tracing::warn!(error = %analytics_err, "Rejected Z-test input.");
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            AppError::InvalidRequest(reason) => {
                tracing::warn!(%reason, "Malformed API request.");
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            AppError::Render(render_err) => {
                tracing::error!(error = ?render_err, "Chart rendering error.");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}
