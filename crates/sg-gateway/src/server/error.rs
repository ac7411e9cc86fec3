//! HTTP error responses

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use sg_core::api::ErrorBody;
use sg_core::error::{AuditError, DocumentError};
use sg_protocol::ProtocolError;

/// Errors returned by API handlers, rendered as `{"detail": ...}`
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body could not be used
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Request was well-formed but failed a check
    #[error("{0}")]
    BadRequest(String),

    /// Resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Something on the gateway side failed
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Rejected { status, .. } => *status,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(ErrorBody { detail: self.to_string() })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<ProtocolError> for ApiError {
    fn from(err: ProtocolError) -> Self {
        ApiError::Rejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: err.to_string(),
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::InvalidName(_) => ApiError::BadRequest(err.to_string()),
            DocumentError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DocumentError::Read { .. } | DocumentError::Parse { .. } => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<AuditError> for ApiError {
    fn from(err: AuditError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
