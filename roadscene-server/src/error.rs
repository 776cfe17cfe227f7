use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Error returned by the JSON endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<roadscene_core::Error> for ApiError {
    fn from(error: roadscene_core::Error) -> Self {
        use roadscene_core::Error;

        let status = match &error {
            Error::UnresolvedAddress { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NoPath { .. } => StatusCode::NOT_FOUND,
            Error::EmptyNetwork => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {error}");
        }
        Self::new(status, error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: &self.message,
            }),
        )
            .into_response()
    }
}
