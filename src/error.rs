use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures surfaced to API clients. Bodies are plain text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    /// The request body could not be read, e.g. it exceeded the size limit.
    #[error("{message}")]
    Body { status: StatusCode, message: String },
    /// Raw store error text, including its cause chain.
    #[error("{:#}", .0)]
    Store(#[from] anyhow::Error),
}

impl ApiError {
    pub fn invalid_id() -> Self {
        ApiError::BadRequest("Invalid ID".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Body { status, .. } => *status,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Store(e) => tracing::error!(error = %format!("{e:#}"), "store call failed"),
            _ => tracing::info!(status = status.as_u16(), error = %self, "rejected request"),
        }
        (status, self.to_string()).into_response()
    }
}
