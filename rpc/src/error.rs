//! RPC error types and their HTTP mapping.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use heritage_governance::GovernanceError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("admin access required")]
    Forbidden,

    #[error("storage unavailable")]
    Storage(String),

    #[error("internal error")]
    Internal(String),

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RpcError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::NotFound(_) => StatusCode::NOT_FOUND,
            RpcError::Conflict(_) => StatusCode::CONFLICT,
            RpcError::Forbidden => StatusCode::FORBIDDEN,
            RpcError::Storage(_) | RpcError::Internal(_) | RpcError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<GovernanceError> for RpcError {
    fn from(e: GovernanceError) -> Self {
        match e {
            GovernanceError::InvalidArgument(msg) => RpcError::InvalidRequest(msg),
            GovernanceError::NotFound(what) => RpcError::NotFound(what),
            GovernanceError::Conflict(msg) => RpcError::Conflict(msg),
            GovernanceError::StorageUnavailable(msg) => RpcError::Storage(msg),
            GovernanceError::EntropyUnavailable(msg) => RpcError::Internal(msg),
        }
    }
}

impl From<heritage_types::TypeError> for RpcError {
    fn from(e: heritage_types::TypeError) -> Self {
        RpcError::InvalidRequest(e.to_string())
    }
}

impl From<JsonRejection> for RpcError {
    fn from(e: JsonRejection) -> Self {
        RpcError::InvalidRequest(e.body_text())
    }
}

impl From<QueryRejection> for RpcError {
    fn from(e: QueryRejection) -> Self {
        RpcError::InvalidRequest(e.body_text())
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Backend details stay in the log; the client gets the generic message.
        match &self {
            RpcError::Storage(detail) => tracing::error!(%detail, "storage failure"),
            RpcError::Internal(detail) | RpcError::Server(detail) => {
                tracing::error!(%detail, "internal failure")
            }
            _ => tracing::debug!(status = status.as_u16(), error = %self, "request rejected"),
        }
        let body = Json(json!({ "status": "error", "message": self.to_string() }));
        (status, body).into_response()
    }
}
