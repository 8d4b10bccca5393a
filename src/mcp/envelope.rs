//! Transport envelope checks run before any JSON-RPC processing

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::errors::AppError;

pub const MCP_PROTOCOL: &str = "streamable_http";
pub const MCP_VERSION: &str = "1.0";

pub const PROTOCOL_HEADER: &str = "x-mcp-protocol";
pub const VERSION_HEADER: &str = "x-mcp-version";
pub const SESSION_HEADER: &str = "mcp-session-id";

/// Protocol is checked before version; the first mismatch wins.
pub fn validate_envelope(headers: &HeaderMap) -> Result<(), AppError> {
    if header_str(headers, PROTOCOL_HEADER) != Some(MCP_PROTOCOL) {
        return Err(AppError::invalid_request("Unsupported protocol"));
    }

    if header_str(headers, VERSION_HEADER) != Some(MCP_VERSION) {
        return Err(AppError::invalid_request("Unsupported version"));
    }

    Ok(())
}

/// Caller-supplied session id, or a fresh UUID. Used for log correlation only.
pub fn session_id(headers: &HeaderMap) -> String {
    header_str(headers, SESSION_HEADER)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn accepts_expected_envelope() {
        let map = headers(&[(PROTOCOL_HEADER, MCP_PROTOCOL), (VERSION_HEADER, MCP_VERSION)]);
        assert!(validate_envelope(&map).is_ok());
    }

    #[test]
    fn protocol_is_checked_before_version() {
        let map = headers(&[(PROTOCOL_HEADER, "websocket"), (VERSION_HEADER, "2.0")]);
        let error = validate_envelope(&map).expect_err("must fail");
        assert_eq!(error.code(), -32600);
        assert_eq!(error.to_string(), "Unsupported protocol");
    }

    #[test]
    fn missing_version_is_rejected() {
        let map = headers(&[(PROTOCOL_HEADER, MCP_PROTOCOL)]);
        let error = validate_envelope(&map).expect_err("must fail");
        assert_eq!(error.to_string(), "Unsupported version");
    }

    #[test]
    fn header_values_are_case_sensitive() {
        let map = headers(&[(PROTOCOL_HEADER, "Streamable_HTTP"), (VERSION_HEADER, MCP_VERSION)]);
        assert!(validate_envelope(&map).is_err());
    }

    #[test]
    fn session_id_prefers_caller_value() {
        let map = headers(&[(SESSION_HEADER, "session-42")]);
        assert_eq!(session_id(&map), "session-42");
    }

    #[test]
    fn session_id_is_generated_when_absent() {
        let generated = session_id(&HeaderMap::new());
        assert!(Uuid::parse_str(&generated).is_ok());
        assert_ne!(generated, session_id(&HeaderMap::new()));
    }
}
