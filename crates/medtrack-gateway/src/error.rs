//! Error responses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medtrack_core::error::MedTrackError;

/// Every failure is rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// Store, validation or transport failure.
    Domain(MedTrackError),
    /// Request could not be decoded (body, path or query).
    Rejected { status: StatusCode, message: String },
}

impl From<MedTrackError> for ApiError {
    fn from(e: MedTrackError) -> Self {
        Self::Domain(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        Self::Rejected { status: r.status(), message: r.body_text() }
    }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self {
        Self::Rejected { status: r.status(), message: r.body_text() }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self {
        Self::Rejected { status: r.status(), message: r.body_text() }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(MedTrackError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Domain(MedTrackError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected { status, .. } => *status,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Domain(e) => e.to_string(),
            ApiError::Rejected { message, .. } => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!("Request failed: {message}");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
