use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use hypercalc_core::{CalcError, CalcResult, MAX_ROOT_DEGREE};

use crate::domain::{ScalarDomain, UltraDomain};
use crate::parser::ParserOptions;

/// Which algebra an expression is evaluated in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalMode {
    /// The 8-dimensional Ultra algebra; mixed units are fine.
    #[default]
    Ultra,
    /// A single complex, binary or dual number.
    Direct,
}

impl fmt::Display for EvalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalMode::Ultra => write!(f, "ultra"),
            EvalMode::Direct => write!(f, "direct"),
        }
    }
}

impl FromStr for EvalMode {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ultra" => Ok(EvalMode::Ultra),
            "direct" | "scalar" => Ok(EvalMode::Direct),
            _ => Err(CalcError::Binding(format!("unknown evaluation mode: {s}"))),
        }
    }
}

/// Formats `value` rounded to `digits` decimals, or exactly.
pub fn format_value(value: &impl fmt::Display, digits: Option<usize>) -> String {
    match digits {
        Some(d) => format!("{value:.d$}"),
        None => value.to_string(),
    }
}

/// Evaluates `text` in `mode` and prints the result.
pub fn eval_formatted(
    text: &str,
    mode: EvalMode,
    options: ParserOptions,
    digits: Option<usize>,
) -> CalcResult<String> {
    Ok(match mode {
        EvalMode::Ultra => format_value(&crate::evaluate(text, &UltraDomain, options)?, digits),
        EvalMode::Direct => format_value(&crate::evaluate(text, &ScalarDomain, options)?, digits),
    })
}

/// All `n`-th roots of the value of `text`, one formatted value each.
/// `n` must lie in `1..=MAX_ROOT_DEGREE`.
pub fn roots_formatted(
    text: &str,
    n: u32,
    mode: EvalMode,
    options: ParserOptions,
    digits: Option<usize>,
) -> CalcResult<Vec<String>> {
    if !(1..=MAX_ROOT_DEGREE).contains(&n) {
        return Err(CalcError::Binding(format!(
            "root degree must be between 1 and {MAX_ROOT_DEGREE}, got {n}"
        )));
    }
    let no_roots = || CalcError::no_result(format!("{n}-th roots of {}", text.trim()));
    let roots: Vec<String> = match mode {
        EvalMode::Ultra => crate::evaluate(text, &UltraDomain, options)?
            .roots(n)
            .ok_or_else(no_roots)?
            .iter()
            .map(|r| format_value(r, digits))
            .collect(),
        EvalMode::Direct => crate::evaluate(text, &ScalarDomain, options)?
            .roots(n)
            .ok_or_else(no_roots)?
            .iter()
            .map(|r| format_value(r, digits))
            .collect(),
    };
    Ok(roots)
}
