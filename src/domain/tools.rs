//! The CPU utilization tool exposed via Model Context Protocol
//!
//! `tools/call` answers with a single server-sent event and then closes the stream.

use std::convert::Infallible;

use axum::response::{
    sse::{Event, Sse},
    IntoResponse, Response,
};
use futures_util::stream;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::errors::AppError;
use crate::mcp::rpc::{display_value, is_truthy, json_rpc_result};
use crate::AppState;

pub const CPU_TOOL_NAME: &str = "get_cpu_utilization";
pub const CPU_TOOL_PROVIDER: &str = "linux_monitor";

#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub provider_name: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    pub enabled: bool,
}

/// `interval` is advertised but the call handler never reads it.
pub fn cpu_utilization_tool() -> ToolDescriptor {
    ToolDescriptor {
        provider_name: CPU_TOOL_PROVIDER,
        name: CPU_TOOL_NAME,
        description: "Get current CPU utilization metrics",
        input_schema: json!({
            "type": "object",
            "properties": {
                "interval": {
                    "type": "number",
                    "description": "Sampling interval in seconds",
                    "default": 1
                }
            },
            "required": []
        }),
        enabled: true,
    }
}

pub fn build_tools_list() -> Vec<ToolDescriptor> {
    vec![cpu_utilization_tool()]
}

pub fn handle_tools_list(request: &Map<String, Value>) -> Result<Value, AppError> {
    let id = request.get("id").cloned().unwrap_or(json!(1));
    let tools = serde_json::to_value(build_tools_list())
        .map_err(|err| AppError::internal(format!("tools list serialization failed: {err}")))?;

    Ok(json_rpc_result(id, json!({ "tools": tools })))
}

pub async fn handle_tools_call(
    state: &AppState,
    request: &Map<String, Value>,
    session_id: &str,
) -> Result<Response, AppError> {
    let id = match request.get("id") {
        Some(id) if is_truthy(id) => id.clone(),
        _ => return Err(AppError::invalid_request("Tools call must include an id")),
    };

    let tool_name = match request.get("params") {
        None => Value::Null,
        Some(Value::Object(params)) => params.get("name").cloned().unwrap_or(Value::Null),
        Some(other) => {
            return Err(AppError::internal(format!(
                "params must be an object, got {other}"
            )))
        }
    };

    if tool_name.as_str() != Some(CPU_TOOL_NAME) {
        return Err(AppError::method_not_found(format!(
            "Unknown tool: {}",
            display_value(&tool_name)
        )));
    }

    let reading = state.cpu_provider.sample().await?;
    let frame = json_rpc_result(
        id,
        json!({ "content": [{ "cpu_utilization": reading }] }),
    )
    .to_string();

    let session_id = session_id.to_string();
    let events = stream::once(async move {
        info!(session_id = %session_id, "sent sse response and closed stream");
        Ok::<Event, Infallible>(Event::default().data(frame))
    });

    Ok(Sse::new(events).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn tools_list_advertises_single_cpu_tool() {
        let response =
            handle_tools_list(&request(json!({"id": 4, "method": "tools/list"}))).expect("list");

        assert_eq!(response["id"], 4);
        let tools = response["result"]["tools"].as_array().expect("tools array");
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], CPU_TOOL_NAME);
        assert_eq!(tools[0]["provider_name"], CPU_TOOL_PROVIDER);
        assert_eq!(tools[0]["enabled"], true);
        assert_eq!(tools[0]["inputSchema"]["properties"]["interval"]["default"], 1);
        assert_eq!(tools[0]["inputSchema"]["required"], json!([]));
    }

    #[test]
    fn tools_list_defaults_id_to_one() {
        let response = handle_tools_list(&request(json!({"method": "tools/list"}))).expect("list");
        assert_eq!(response["id"], 1);
    }

    #[test]
    fn tools_list_passes_explicit_null_id() {
        let response =
            handle_tools_list(&request(json!({"id": null, "method": "tools/list"}))).expect("list");
        assert!(response["id"].is_null());
    }
}
