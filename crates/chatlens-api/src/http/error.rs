//! Application error type mapping to HTTP status codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatlens_types::error::{AnalysisError, SessionError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Session(SessionError),
    Analysis(AnalysisError),
    /// Nothing to return for an otherwise valid request.
    NotFound(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        AppError::Analysis(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Session(SessionError::InvalidState(msg)) => {
                (StatusCode::BAD_REQUEST, "INVALID_STATE", msg.clone())
            }
            AppError::Session(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_FAILURE",
                e.to_string(),
            ),
            AppError::Analysis(AnalysisError::Unauthenticated) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "No active session".to_string(),
            ),
            AppError::Analysis(AnalysisError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone())
            }
            AppError::Analysis(AnalysisError::Upstream(msg)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_FAILURE",
                msg.clone(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, Json(json!({ "code": code, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn error_kinds_map_to_statuses() {
        assert_eq!(
            status_of(SessionError::InvalidState("no active session".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(SessionError::Upstream("bridge down".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AnalysisError::Unauthenticated.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AnalysisError::NotFound("chat".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AnalysisError::Upstream("timeout".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::NotFound("qr".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn upstream_message_is_attached() {
        let (_, code, message) =
            AppError::from(AnalysisError::Upstream("HTTP 503: overloaded".into())).parts();
        assert_eq!(code, "UPSTREAM_FAILURE");
        assert_eq!(message, "HTTP 503: overloaded");
    }
}
