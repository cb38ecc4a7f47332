use serde::{Deserialize, Serialize};
use serde_json::Value;

use hypercalc_core::CalcResult;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 message types
// ---------------------------------------------------------------------------

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
pub struct JsonRpcMessage {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: Option<String>,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Value, code: i64, message: String) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(JsonRpcError { code, message }),
        }
    }

    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::err(Value::Null, PARSE_ERROR, format!("parse error: {detail}"))
    }

    pub fn method_not_found(id: Value, method: &str) -> Self {
        Self::err(id, METHOD_NOT_FOUND, format!("method not found: {method}"))
    }

    pub fn invalid_params(id: Value, message: &str) -> Self {
        Self::err(id, INVALID_PARAMS, message.to_string())
    }
}

// ---------------------------------------------------------------------------
// MCP tool result
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

#[derive(Debug, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ToolResult {
    fn with(text: String, is_error: bool) -> Self {
        Self {
            content: vec![TextContent {
                content_type: "text".into(),
                text,
            }],
            is_error,
        }
    }

    pub fn text(text: String) -> Self {
        Self::with(text, false)
    }

    pub fn error(text: String) -> Self {
        Self::with(text, true)
    }

    /// Calculation failures become error results carrying the message.
    pub fn from_calc(result: CalcResult<String>) -> Self {
        match result {
            Ok(text) => Self::text(text),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypercalc_core::CalcError;
    use serde_json::json;

    #[test]
    fn test_error_response_shape() {
        let resp = JsonRpcResponse::method_not_found(json!(7), "tools/run");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["error"]["code"], json!(-32601));
        assert_eq!(value["id"], json!(7));
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_tool_result_flags_errors_only() {
        let ok = serde_json::to_value(ToolResult::text("3".into())).unwrap();
        assert!(ok.get("isError").is_none());
        assert_eq!(ok["content"][0]["type"], json!("text"));
        let failed = ToolResult::from_calc(Err(CalcError::UnknownIdentifier("x".into())));
        let failed = serde_json::to_value(failed).unwrap();
        assert_eq!(failed["isError"], json!(true));
        assert_eq!(failed["content"][0]["text"], json!("unknown identifier: x"));
    }
}
