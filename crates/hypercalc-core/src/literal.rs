//! Real-valued literal parsing shared by the scalar text form and the
//! expression parser's leaves.

use std::f64::consts::{E, PI};

use crate::error::{CalcError, CalcResult};

/// Parse a real literal: standard floating point syntax or one of the named
/// constants `pi` (any capitalisation) and `e`/`E`.
pub fn parse_real(text: &str) -> CalcResult<f64> {
    let t = text.trim();
    if t.is_empty() {
        return Err(CalcError::literal(text, "empty literal"));
    }
    if let Some(c) = named_constant(t) {
        return Ok(c);
    }
    if let Some(c) = t.strip_prefix('-').and_then(named_constant) {
        return Ok(-c);
    }
    // f64::from_str accepts "inf"/"nan"; those are not part of the grammar.
    if !t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return Err(CalcError::literal(text, "not a number"));
    }
    t.parse::<f64>()
        .map_err(|e| CalcError::literal(text, e.to_string()))
}

/// Value of a named constant, if `text` is one.
pub fn named_constant(text: &str) -> Option<f64> {
    match text {
        "pi" | "PI" | "Pi" | "pI" => Some(PI),
        "e" | "E" => Some(E),
        _ => None,
    }
}

/// True when `text` is a complete real literal or named constant.
pub fn is_real_literal(text: &str) -> bool {
    parse_real(text).is_ok()
}

/// Shortest text that parses back to `x`, or `x` rounded to `digits`
/// decimals with trailing zeros dropped. Negative zero prints as `0`.
pub fn format_real(x: f64, digits: Option<usize>) -> String {
    let x = x + 0.0;
    match digits {
        None => x.to_string(),
        Some(d) => {
            let text = format!("{x:.d$}");
            let text = if text.contains('.') {
                text.trim_end_matches('0').trim_end_matches('.')
            } else {
                &text
            };
            match text {
                "-0" => "0".to_string(),
                t => t.to_string(),
            }
        }
    }
}

/// True when the `+`/`-` at byte `i` belongs to a literal exponent like
/// `1e-5` rather than separating two terms.
pub fn is_exponent_sign(bytes: &[u8], i: usize) -> bool {
    i >= 2
        && matches!(bytes[i - 1], b'e' | b'E')
        && (bytes[i - 2].is_ascii_digit() || bytes[i - 2] == b'.')
}
