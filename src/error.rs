use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Terminal request outcomes. Handlers never recover from these locally;
/// each maps straight to one HTTP response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("User already exists")]
    DuplicateEmail,
    /// Single outcome for unknown email and wrong password alike.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthorized(String),
    /// Valid token, wrong owner. Answered with 401 rather than 403 to stay
    /// wire-compatible with the original API.
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

/// JSON body sent for every failure. `stack` carries the diagnostic chain in
/// debug builds only.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::DuplicateEmail => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials
            | ApiError::Unauthorized(_)
            | ApiError::Forbidden(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let stack = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "unhandled error");
                if cfg!(debug_assertions) {
                    Some(format!("{e:?}"))
                } else {
                    None
                }
            }
            _ => None,
        };
        let body = ErrorBody {
            message: self.to_string(),
            stack,
        };
        (status, Json(body)).into_response()
    }
}
