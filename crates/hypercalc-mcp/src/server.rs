use std::io::{self, BufRead, Write};

use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::protocol::{JsonRpcMessage, JsonRpcResponse};
use crate::tools::{self, Session, SessionOptions};

const SERVER_NAME: &str = "hypercalc";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const PROTOCOL_VERSION: &str = "2024-11-05";

const INSTRUCTIONS: &str = "\
Use hypercalc for exact work with complex (ⅈ² = -1), binary (ⅉ² = 1) and dual (ε² = 0) numbers.\n\
\n\
EVALUATE (hc_eval): mode 'ultra' lets units mix freely, mode 'direct' stays inside one algebra \
and offers dot, abs, det, angle, length, eulerangle, eulerlength, normalized, IM, round, ceil, floor.\n\
\n\
FORMULAS (hc_formula_new, hc_formula_set, hc_formula_result): identifiers in a template are \
parameters; bind them with 'name = value', or with an expression that introduces new identifiers.";

/// Run the tool server on stdio. Blocks until stdin is closed.
pub fn run_server(options: SessionOptions) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(stdin.lock(), stdout.lock(), options)
}

/// Serve newline-delimited JSON-RPC from `input`, answering on `output`.
pub fn serve<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    options: SessionOptions,
) -> anyhow::Result<()> {
    let mut session = Session::new(options);

    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("stdin read error: {e}");
                break;
            }
        };

        if let Some(response) = handle_line(&mut session, &line) {
            write_response(&mut output, &response)?;
        }
    }

    Ok(())
}

/// Answer one request line. Notifications and blank lines get no response.
pub fn handle_line(session: &mut Session, line: &str) -> Option<JsonRpcResponse> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let msg: JsonRpcMessage = match serde_json::from_str(line) {
        Ok(m) => m,
        Err(e) => {
            warn!("invalid JSON-RPC: {e}");
            return Some(JsonRpcResponse::parse_error(e));
        }
    };

    let method = msg.method.as_deref().unwrap_or("");
    debug!("request: {method}");

    let id = msg.id?;

    Some(match method {
        "initialize" => handle_initialize(id),
        "ping" => JsonRpcResponse::ok(id, json!({})),
        "tools/list" => JsonRpcResponse::ok(id, tools::tool_definitions()),
        "tools/call" => handle_tools_call(id, msg.params.as_ref(), session),
        other => {
            warn!("unsupported method: {other}");
            JsonRpcResponse::method_not_found(id, other)
        }
    })
}

fn write_response<W: Write>(output: &mut W, resp: &JsonRpcResponse) -> anyhow::Result<()> {
    let json = serde_json::to_string(resp)?;
    writeln!(output, "{json}")?;
    output.flush()?;
    Ok(())
}

fn handle_initialize(id: Value) -> JsonRpcResponse {
    JsonRpcResponse::ok(
        id,
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            },
            "instructions": INSTRUCTIONS
        }),
    )
}

fn handle_tools_call(id: Value, params: Option<&Value>, session: &mut Session) -> JsonRpcResponse {
    let Some(params) = params else {
        return JsonRpcResponse::invalid_params(id, "missing params");
    };
    let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
        return JsonRpcResponse::invalid_params(id, "missing tool name");
    };

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    let result = tools::call_tool(session, tool_name, &args);
    if result.is_error {
        debug!(tool = tool_name, "tool reported an error");
    }
    JsonRpcResponse::ok(id, serde_json::to_value(result).unwrap_or(json!(null)))
}
