use super::state::ApiStateError;
use crate::security::resource::ResourceGuardError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ogs_derive::api_model;
use std::borrow::Cow;
use tracing::error;

/// Error payload returned by every endpoint.
#[api_model]
pub struct ErrorBody {
    /// Always `"error"`
    #[schema(example = "error")]
    pub status: Cow<'static, str>,
    /// Human-readable reason
    pub error: String,
}

/// An error ready to be rendered as an HTTP response.
///
/// Slices convert their own error enums into this type, choosing the status code per
/// variant. Server errors are logged with their full message and answered generically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: Cow<'static, str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "Request failed");
            "Internal server error".to_owned()
        } else {
            self.message.into_owned()
        };

        (self.status, Json(ErrorBody { status: Cow::Borrowed("error"), error })).into_response()
    }
}

impl From<ApiStateError> for ApiError {
    fn from(err: ApiStateError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<ResourceGuardError> for ApiError {
    fn from(err: ResourceGuardError) -> Self {
        match err {
            ResourceGuardError::Validation { message, .. } => Self::bad_request(message),
        }
    }
}
