//! WebServer-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use generator::GenerationError;
use shared::{ErrorDetail, SharedError};
use thiserror::Error;
use tracing::error;

pub const GENERIC_FAILURE: &str = "Request failed, please contact the administrator.";

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Invalid request format: {details}")]
    InvalidRequest { details: String },

    #[error("Invalid image: {message}")]
    InvalidImage { message: String },

    #[error("Image service failure: {message}")]
    ImageService { message: String },

    #[error("Invalid API Key")]
    InvalidApiKey,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type WebServerResult<T> = Result<T, WebServerError>;

impl WebServerError {
    pub fn config(message: impl Into<String>) -> Self {
        WebServerError::Config { message: message.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebServerError::Generation(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::IM_A_TEAPOT)
            }
            WebServerError::InvalidRequest { .. } | WebServerError::InvalidImage { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            WebServerError::ImageService { .. } => StatusCode::FAILED_DEPENDENCY,
            WebServerError::InvalidApiKey => StatusCode::FORBIDDEN,
            WebServerError::Config { .. }
            | WebServerError::ServerStartup(_)
            | WebServerError::Internal(_)
            | WebServerError::IoError(_) => {
                StatusCode::IM_A_TEAPOT
            }
        }
    }

    /// Body text for the caller; internal details stay in the logs
    pub fn detail(&self) -> String {
        match self {
            WebServerError::Generation(e) => e.user_message(),
            WebServerError::InvalidRequest { details } => details.clone(),
            WebServerError::InvalidImage { message } => message.clone(),
            WebServerError::ImageService { .. } => {
                "Image service failure, please contact the administrator.".to_string()
            }
            WebServerError::InvalidApiKey => "Invalid API Key".to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

impl From<SharedError> for WebServerError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::InvalidInput { message } => WebServerError::InvalidRequest { details: message },
            other => WebServerError::Config { message: other.to_string() },
        }
    }
}

impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() || status == StatusCode::IM_A_TEAPOT || status == StatusCode::FAILED_DEPENDENCY {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }

        (status, Json(ErrorDetail::new(self.detail()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ProviderId;

    #[test]
    fn test_generation_errors_keep_their_status() {
        let err = WebServerError::from(GenerationError::RetriesExhausted {
            provider: ProviderId::Cohere,
            attempts: 3,
        });
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.detail(), "Too many requests, please try again later.");

        let err = WebServerError::from(GenerationError::Unclassified {
            message: "socket closed".into(),
        });
        assert_eq!(err.status_code(), StatusCode::IM_A_TEAPOT);
        assert!(!err.detail().contains("socket"));
    }

    #[test]
    fn test_local_errors() {
        assert_eq!(WebServerError::InvalidApiKey.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            WebServerError::ImageService { message: "500".into() }.status_code(),
            StatusCode::FAILED_DEPENDENCY
        );

        let err = WebServerError::from(SharedError::InvalidInput {
            message: "Missing image input".into(),
        });
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.detail(), "Missing image input");
    }
}
