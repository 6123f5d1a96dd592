use actix_web::{error, http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::StoreError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Errors returned to HTTP callers
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("{0}")]
    MissingField(String),

    #[error("{0}")]
    InvalidPetData(String),

    #[error("{0}")]
    InvalidUpload(String),

    /// The upstream store rejected the request; the message is passed through
    #[error("{0}")]
    Rejected(String),

    #[error("Upstream failure: {0}")]
    Upstream(#[source] StoreError),

    #[error("Pet index update for {0} kept conflicting")]
    IndexContention(String),

    #[error("Invalid {kind}: {message}")]
    Payload { kind: &'static str, message: String },
}

impl From<StoreError> for ProxyError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserErrors(message) => ProxyError::Rejected(message),
            other => ProxyError::Upstream(other),
        }
    }
}

impl ProxyError {
    fn error_code(&self) -> &'static str {
        match self {
            ProxyError::MissingField(_) => "missing_field",
            ProxyError::InvalidPetData(_) => "invalid_pet_data",
            ProxyError::InvalidUpload(_) => "invalid_upload",
            ProxyError::Rejected(_) => "rejected",
            ProxyError::Upstream(_) | ProxyError::IndexContention(_) => "upstream_error",
            ProxyError::Payload { kind, .. } => *kind,
        }
    }
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Upstream(_) | ProxyError::IndexContention(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            INTERNAL_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: self.error_code().to_string(),
            message,
            status_code: status.as_u16(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ProxyError::Payload {
        kind: "invalid_json",
        message: err.to_string(),
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    ProxyError::Payload {
        kind: "invalid_query",
        message: err.to_string(),
    }
    .into()
}
