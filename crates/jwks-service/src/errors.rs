use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JwksError {
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Duplicate key id: {0}")]
    DuplicateKeyId(String),

    #[error("No signing key matches requested validity (expired: {expired})")]
    NoMatchingKey { expired: bool },

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl JwksError {
    /// Status code and client-facing message for this error.
    ///
    /// Messages are fixed strings; the inner detail only goes to the logs.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            JwksError::KeyGeneration(_) | JwksError::DuplicateKeyId(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Signing keys are not available",
            ),
            JwksError::NoMatchingKey { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "No suitable key found")
            }
            JwksError::Signing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to sign token"),
            JwksError::InvalidToken(_) => (
                StatusCode::UNAUTHORIZED,
                "The access token is invalid or expired",
            ),
        }
    }
}

impl IntoResponse for JwksError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(target: "jwks.errors", error = %self, "Request failed");
        } else {
            tracing::debug!(target: "jwks.errors", error = %self, "Request rejected");
        }

        (status, [(CONTENT_TYPE, "text/plain")], message).into_response()
    }
}
