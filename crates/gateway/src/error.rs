//! Gateway error type and its HTTP translation (§6/§7: 400 on missing
//! fields, 404 on not-found/ring-empty, 500 on uncaught handler errors).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("ring is empty")]
    RingEmpty,

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::MissingField(_) => StatusCode::BAD_REQUEST,
            GatewayError::RingEmpty | GatewayError::UnknownNode(_) => StatusCode::NOT_FOUND,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
