//! JSON-RPC envelopes and method identification
//!
//! Error bodies carry no `id` member. Result bodies echo whatever id the handler
//! resolved, including `null`.

use std::fmt;

use serde_json::{json, Map, Value};

use crate::errors::AppError;

pub const JSONRPC_VERSION: &str = "2.0";

pub fn json_rpc_error(code: i32, message: &str) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "error": {
            "code": code,
            "message": message
        }
    })
}

pub fn json_rpc_result(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "result": result
    })
}

/// Loose truthiness: `null`, `false`, zero, and empty strings, arrays or objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Renders a value for an error message: strings verbatim, everything else as JSON text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum McpMethod {
    Initialize,
    NotificationsInitialized,
    ToolsList,
    ToolsCall,
    Unrecognized(String),
}

impl McpMethod {
    pub fn from_request(request: &Map<String, Value>) -> Result<Self, AppError> {
        let method = request
            .get("method")
            .filter(|value| is_truthy(value))
            .ok_or_else(|| AppError::method_not_found("Missing method in request"))?;

        Ok(match method.as_str() {
            Some("initialize") => Self::Initialize,
            Some("notifications/initialized") => Self::NotificationsInitialized,
            Some("tools/list") => Self::ToolsList,
            Some("tools/call") => Self::ToolsCall,
            _ => Self::Unrecognized(display_value(method)),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Initialize => "initialize",
            Self::NotificationsInitialized => "notifications/initialized",
            Self::ToolsList => "tools/list",
            Self::ToolsCall => "tools/call",
            Self::Unrecognized(name) => name,
        }
    }
}

impl fmt::Display for McpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn truthiness_matches_loose_semantics() {
        for falsy in [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!([]),
            json!({}),
        ] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }

        for truthy in [json!(true), json!(-1), json!("0"), json!([0]), json!({"a": null})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn error_envelope_has_no_id() {
        let error = json_rpc_error(-32601, "Unknown method: x");
        assert_eq!(
            error,
            json!({"jsonrpc": "2.0", "error": {"code": -32601, "message": "Unknown method: x"}})
        );
        assert!(error.get("id").is_none());
    }

    #[test]
    fn routes_known_methods() {
        let cases = [
            ("initialize", McpMethod::Initialize),
            ("notifications/initialized", McpMethod::NotificationsInitialized),
            ("tools/list", McpMethod::ToolsList),
            ("tools/call", McpMethod::ToolsCall),
        ];

        for (name, expected) in cases {
            let method = McpMethod::from_request(&request(json!({"method": name})))
                .expect("method should parse");
            assert_eq!(method, expected);
            assert_eq!(method.as_str(), name);
        }
    }

    #[test]
    fn unrecognized_method_keeps_its_name() {
        let method = McpMethod::from_request(&request(json!({"method": "foo/bar"})))
            .expect("method should parse");
        assert_eq!(method, McpMethod::Unrecognized("foo/bar".to_string()));

        let method =
            McpMethod::from_request(&request(json!({"method": 5}))).expect("method should parse");
        assert_eq!(method.to_string(), "5");
    }

    #[test]
    fn missing_or_empty_method_is_rejected() {
        for body in [json!({"id": 1}), json!({"method": ""}), json!({"method": null})] {
            let error = McpMethod::from_request(&request(body)).expect_err("must fail");
            assert_eq!(error.code(), -32601);
            assert_eq!(error.to_string(), "Missing method in request");
        }
    }
}
