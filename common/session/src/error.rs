use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::capabilities::Capability;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("token does not have three dot-separated segments")]
    MalformedToken,
    #[error("token payload is not valid base64: {0}")]
    PayloadEncoding(String),
    #[error("token payload is not valid JSON: {0}")]
    PayloadJson(String),
    #[error("invalid claim '{0}' with value '{1}'")]
    InvalidClaim(&'static str, String),
    #[error("role lacks the {0:?} capability")]
    MissingCapability(Capability),
    #[error("no resolved session on this request")]
    MissingContext,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            SessionError::MalformedToken
            | SessionError::PayloadEncoding(_)
            | SessionError::PayloadJson(_) => (StatusCode::UNAUTHORIZED, "SESSION_TOKEN"),
            SessionError::InvalidClaim(_, _) => (StatusCode::UNAUTHORIZED, "SESSION_CLAIMS"),
            SessionError::MissingCapability(_) => (StatusCode::FORBIDDEN, "SESSION_CAPABILITY"),
            SessionError::MissingContext => (StatusCode::UNAUTHORIZED, "SESSION_CONTEXT"),
        };

        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
