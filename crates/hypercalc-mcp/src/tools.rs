use serde_json::{json, Value};
use tracing::debug;

use hypercalc_core::{CalcError, MAX_ROOT_DEGREE};
use hypercalc_parse::{
    eval_formatted, format_value, roots_formatted, Binding, EvalMode, FormulaOptions,
    FormulaSystem, ParserOptions,
};

use crate::protocol::ToolResult;

/// Settings the server applies to every tool call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub mode: EvalMode,
    pub parser: ParserOptions,
    pub formula: FormulaOptions,
    pub digits: Option<usize>,
}

/// State kept between tool calls: at most one formula system.
#[derive(Debug, Default)]
pub struct Session {
    options: SessionOptions,
    system: Option<FormulaSystem>,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            system: None,
        }
    }

    pub fn system(&self) -> Option<&FormulaSystem> {
        self.system.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Tool schemas for tools/list
// ---------------------------------------------------------------------------

pub fn tool_definitions() -> Value {
    let mode = json!({
        "type": "string",
        "enum": ["ultra", "direct"],
        "description": "ultra = 8-dimensional algebra (units may mix), direct = one complex, binary or dual number"
    });
    json!({ "tools": [
        {
            "name": "hc_eval",
            "description": "Evaluate an expression over hypercomplex numbers. Units: ⅈ (ⅈ²=-1), ⅉ (ⅉ²=1), ε (ε²=0). Operators: + - * / ^ _log, functions such as sin, exp, ln, sqrt, conjugate, inverse.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "expression": {
                        "type": "string",
                        "description": "Expression, e.g. '(1 + 2ⅈ) * exp(ε)'"
                    },
                    "mode": mode.clone()
                },
                "required": ["expression"]
            }
        },
        {
            "name": "hc_roots",
            "description": "List every n-th root of the value of an expression.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "value": {
                        "type": "string",
                        "description": "Expression whose roots are wanted"
                    },
                    "n": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": MAX_ROOT_DEGREE,
                        "description": "Root degree"
                    },
                    "mode": mode
                },
                "required": ["value", "n"]
            }
        },
        {
            "name": "hc_formula_new",
            "description": "Start a formula session. Identifiers in the template and '?' placeholders become parameters (0 until bound).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Formula name" },
                    "template": { "type": "string", "description": "Template, e.g. 'rate * ? + base'" }
                },
                "required": ["name", "template"]
            }
        },
        {
            "name": "hc_formula_set",
            "description": "Bind identifiers of the current formula, e.g. 'rate = 0.5, base := x + 1'. Non-literal values become sub-formulas whose identifiers can be bound in turn.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "bindings": { "type": "string", "description": "Assignments separated by ',' or ';'" }
                },
                "required": ["bindings"]
            }
        },
        {
            "name": "hc_formula_result",
            "description": "Evaluate the current formula with its bindings.",
            "inputSchema": { "type": "object", "properties": {} }
        },
        {
            "name": "hc_formula_show",
            "description": "Show the current formula, its identifiers and their bindings.",
            "inputSchema": { "type": "object", "properties": {} }
        }
    ]})
}

// ---------------------------------------------------------------------------
// Tool dispatch
// ---------------------------------------------------------------------------

pub fn call_tool(session: &mut Session, name: &str, args: &Value) -> ToolResult {
    debug!(tool = name, "call");
    match name {
        "hc_eval" => tool_eval(session, args),
        "hc_roots" => tool_roots(session, args),
        "hc_formula_new" => tool_formula_new(session, args),
        "hc_formula_set" => tool_formula_set(session, args),
        "hc_formula_result" => tool_formula_result(session),
        "hc_formula_show" => tool_formula_show(session),
        _ => ToolResult::error(format!("unknown tool: {name}")),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn get_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}

fn get_mode(session: &Session, args: &Value) -> Result<EvalMode, ToolResult> {
    match get_str(args, "mode") {
        Some(text) => text.parse().map_err(|e: CalcError| ToolResult::error(e.to_string())),
        None => Ok(session.options.mode),
    }
}

fn current(session: &Session) -> Result<&FormulaSystem, ToolResult> {
    session
        .system
        .as_ref()
        .ok_or_else(|| ToolResult::error("no formula session; call hc_formula_new first".into()))
}

fn describe(system: &FormulaSystem, digits: Option<usize>) -> String {
    let mut out = format!("{system}\n");
    for name in system.identifiers() {
        let binding = system
            .binding(name)
            .map(|b| match b {
                Binding::Literal(v) => format_value(v, digits),
                Binding::Formula(f) => format!("{f} (formula)"),
            })
            .unwrap_or_default();
        out.push_str(&format!("  {name} = {binding}\n"));
    }
    out
}

// ---------------------------------------------------------------------------
// Tool handlers
// ---------------------------------------------------------------------------

fn tool_eval(session: &Session, args: &Value) -> ToolResult {
    let expression = match get_str(args, "expression") {
        Some(e) => e,
        None => return ToolResult::error("missing required field: expression".into()),
    };
    let mode = match get_mode(session, args) {
        Ok(m) => m,
        Err(e) => return e,
    };
    let SessionOptions { parser, digits, .. } = session.options;
    ToolResult::from_calc(eval_formatted(expression, mode, parser, digits))
}

fn tool_roots(session: &Session, args: &Value) -> ToolResult {
    let value = match get_str(args, "value") {
        Some(v) => v,
        None => return ToolResult::error("missing required field: value".into()),
    };
    let n = match args.get("n").and_then(|v| v.as_u64()) {
        Some(n) if (1..=u64::from(MAX_ROOT_DEGREE)).contains(&n) => n as u32,
        _ => {
            return ToolResult::error(format!(
                "n must be an integer between 1 and {MAX_ROOT_DEGREE}"
            ))
        }
    };
    let mode = match get_mode(session, args) {
        Ok(m) => m,
        Err(e) => return e,
    };
    let SessionOptions { parser, digits, .. } = session.options;
    ToolResult::from_calc(roots_formatted(value, n, mode, parser, digits).map(|r| r.join("\n")))
}

fn tool_formula_new(session: &mut Session, args: &Value) -> ToolResult {
    let name = match get_str(args, "name") {
        Some(n) => n,
        None => return ToolResult::error("missing required field: name".into()),
    };
    let template = match get_str(args, "template") {
        Some(t) => t,
        None => return ToolResult::error("missing required field: template".into()),
    };
    match FormulaSystem::with_options(name, template, session.options.formula) {
        Ok(system) => {
            let text = describe(&system, session.options.digits);
            session.system = Some(system);
            ToolResult::text(text)
        }
        Err(e) => ToolResult::error(e.to_string()),
    }
}

fn tool_formula_set(session: &mut Session, args: &Value) -> ToolResult {
    let bindings = match get_str(args, "bindings") {
        Some(b) => b,
        None => return ToolResult::error("missing required field: bindings".into()),
    };
    let digits = session.options.digits;
    let system = match session.system.as_mut() {
        Some(s) => s,
        None => return ToolResult::error("no formula session; call hc_formula_new first".into()),
    };
    match system.apply(bindings) {
        Ok(()) => ToolResult::text(describe(system, digits)),
        Err(e) => ToolResult::error(e.to_string()),
    }
}

fn tool_formula_result(session: &Session) -> ToolResult {
    let system = match current(session) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let digits = session.options.digits;
    ToolResult::from_calc(system.result().map(|v| format_value(&v, digits)))
}

fn tool_formula_show(session: &Session) -> ToolResult {
    match current(session) {
        Ok(system) => ToolResult::text(describe(system, session.options.digits)),
        Err(e) => e,
    }
}
