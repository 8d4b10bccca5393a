//! Axum HTTP handlers for the web server
//!
//! Provides the Model Context Protocol endpoint and a liveness probe.

use std::borrow::Cow;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::mcp::envelope::{session_id, validate_envelope};
use crate::mcp::server::handle_request;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn mcp_endpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let session_id = session_id(&headers);
    let raw_body = if body.is_empty() {
        Cow::Borrowed("Empty")
    } else {
        String::from_utf8_lossy(&body)
    };

    info!(session_id = %session_id, "received request");
    info!(session_id = %session_id, headers = ?headers, "request headers");
    info!(session_id = %session_id, raw = %raw_body, "request body");

    let outcome = match validate_envelope(&headers) {
        Ok(()) => handle_request(&state, &body, &session_id).await,
        Err(err) => Err(err),
    };

    match outcome {
        Ok(response) => response,
        Err(err @ AppError::Internal(_)) => {
            error!(session_id = %session_id, error = %err, "request failed with internal error");
            err.into_response()
        }
        Err(err) => {
            warn!(
                session_id = %session_id,
                code = err.code(),
                error = %err,
                "request rejected"
            );
            err.into_response()
        }
    }
}
