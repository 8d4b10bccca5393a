//! The central Model Context Protocol engine
//!
//! Decodes the JSON-RPC body, resolves the method and routes it to its handler.
//! Only `tools/call` streams; every other method answers with a plain JSON body.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::domain::tools::{handle_tools_call, handle_tools_list};
use crate::errors::AppError;
use crate::mcp::rpc::{is_truthy, json_rpc_result, McpMethod};
use crate::AppState;

pub const SERVER_NAME: &str = "Linux CPU Monitor";
pub const SERVER_VERSION: &str = "1.0.0";

pub async fn handle_request(
    state: &AppState,
    body: &[u8],
    session_id: &str,
) -> Result<Response, AppError> {
    let request = parse_request_body(body)?;
    let method = McpMethod::from_request(&request)?;

    info!(session_id = %session_id, method = %method, "processing method");

    match method {
        McpMethod::Initialize => Ok(json_response(handle_initialize(&request))),
        McpMethod::NotificationsInitialized => {
            Ok(json_response(handle_notifications_initialized(&request)))
        }
        McpMethod::ToolsList => handle_tools_list(&request).map(json_response),
        McpMethod::ToolsCall => handle_tools_call(state, &request, session_id).await,
        McpMethod::Unrecognized(name) => Err(AppError::method_not_found(format!(
            "Unknown method: {name}"
        ))),
    }
}

pub fn parse_request_body(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::invalid_request("Empty request data"));
    }

    let payload: Value =
        serde_json::from_slice(body).map_err(|err| AppError::internal(err.to_string()))?;

    if !is_truthy(&payload) {
        return Err(AppError::invalid_request("Empty request data"));
    }

    match payload {
        Value::Object(request) => Ok(request),
        other => Err(AppError::internal(format!(
            "request body must be a JSON object, got {other}"
        ))),
    }
}

pub fn handle_initialize(request: &Map<String, Value>) -> Value {
    let id = request.get("id").cloned().unwrap_or(json!(0));
    let response = json_rpc_result(
        id,
        json!({
            "capabilities": {
                "toolUse": true,
                "streaming": true,
                "supportedMethods": ["tools/list", "tools/call"]
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            }
        }),
    );

    info!(response = %response, "initialize response");
    response
}

/// The id is echoed as received, `null` when absent.
pub fn handle_notifications_initialized(request: &Map<String, Value>) -> Value {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let response = json_rpc_result(
        id,
        json!({
            "status": "ready",
            "capabilities": {
                "notificationTypes": ["log", "status"]
            }
        }),
    );

    info!(response = %response, "initialized notification response");
    response
}

fn json_response(body: Value) -> Response {
    Json(body).into_response()
}
