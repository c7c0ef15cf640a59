//! # HTTP Errors
//!
//! Every failure is converted to an [`ErrorResponse`] here. The response
//! carries the real HTTP status matching its `code`. Store details are
//! logged and never sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::observability::{Event, Logger};
use crate::store::StoreError;

/// Result type for request handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Request handling errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Body is not a valid subscription JSON document
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// Path id is not an integer
    #[error("invalid subscription id: '{0}'")]
    InvalidId(String),

    /// Update carried no present fields
    #[error("no fields to update")]
    NoFieldsToUpdate,

    /// Lookup returned the zero record
    #[error("subscription {0} not found")]
    NotFound(i64),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Store operation failed
    #[error("{operation}: {source}")]
    Store {
        operation: &'static str,
        source: StoreError,
    },
}

impl ApiError {
    /// Wrap a store failure, keeping caller errors as client errors
    pub fn store(operation: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| {
            if source.is_caller_error() {
                ApiError::NoFieldsToUpdate
            } else {
                ApiError::Store { operation, source }
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_)
            | ApiError::InvalidId(_)
            | ApiError::NoFieldsToUpdate
            | ApiError::NotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client
    pub fn public_message(&self) -> String {
        match self {
            ApiError::InvalidBody(_) => "invalid request body".to_string(),
            ApiError::InvalidId(_) => "invalid subscription id".to_string(),
            ApiError::NoFieldsToUpdate => "no fields to update".to_string(),
            ApiError::NotFound(_) => "subscription not found".to_string(),
            ApiError::Store { operation, .. } => format!("failed to {}", operation),
        }
    }
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        ErrorResponse::new(err.public_message(), err.status_code().as_u16())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();
        let code = status.as_u16().to_string();
        if status.is_server_error() {
            Logger::error(
                Event::RequestFailed.as_str(),
                &[("code", code.as_str()), ("error", detail.as_str())],
            );
        } else {
            Logger::warn(
                Event::RequestRejected.as_str(),
                &[("code", code.as_str()), ("error", detail.as_str())],
            );
        }

        (status, Json(ErrorResponse::from(self))).into_response()
    }
}
