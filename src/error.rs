//! Error type shared by the store, the auth core and the HTTP handlers.
//!
//! Every failure mode stays distinguishable by variant; the HTTP mapping
//! lives in the `IntoResponse` impl below.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum Error {
    /// Backing file could not be read or written.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file is not a valid snapshot, or a snapshot failed to encode.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Password did not match the stored hash.
    #[error("invalid credentials")]
    Authentication,

    /// Missing, malformed, expired or wrong-purpose token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Signing(String),

    /// Request payload rejected by the API layer.
    #[error("{0}")]
    BadRequest(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Io(_) | Error::Serialization(_) | Error::Hashing(_) | Error::Signing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidArgument(_) | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Authentication | Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, %status, "request failed");
            // Internals stay in the log.
            "Something went wrong".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_distinct_statuses() {
        assert_eq!(Error::NotFound("chirp").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::InvalidArgument("id".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::Authentication.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::Unauthorized("expired".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::Hashing("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(Error::from(io).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn response_body_carries_error_message() {
        let res = Error::NotFound("chirp").into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(json["error"], "chirp not found");
    }

    #[tokio::test]
    async fn server_errors_hide_details() {
        let res = Error::Hashing("secret detail".into()).into_response();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = String::from_utf8(bytes.to_vec()).expect("utf8");
        assert!(!body.contains("secret detail"));
    }
}
