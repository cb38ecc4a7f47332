pub mod ast;
pub mod domain;
pub mod formula;
pub mod mode;
pub mod operator;
pub mod parser;
pub mod scanner;
pub mod system;

pub use ast::{Ast, Node};
pub use domain::{EvalDomain, ScalarDomain, UltraDomain};
pub use formula::{Binding, Formula, FormulaOptions, Parameter};
pub use mode::{eval_formatted, format_value, roots_formatted, EvalMode};
pub use operator::{Fixity, OpCode, Operator, DIRECT_OPERATORS, ULTRA_OPERATORS};
pub use parser::{Parser, ParserOptions, DEFAULT_MAX_DEPTH};
pub use system::FormulaSystem;

use hypercalc_core::{CalcError, CalcResult, Scalar, Ultra};

/// Parses `text` with the operator table of `domain` and evaluates it.
pub fn evaluate<D: EvalDomain>(
    text: &str,
    domain: &D,
    options: ParserOptions,
) -> CalcResult<D::Value> {
    let ast = Parser::for_domain(domain)
        .with_options(options)
        .parse::<D::Value>(text)?;
    ast.evaluate(domain)
        .ok_or_else(|| CalcError::no_result(text.trim()))
}

/// Evaluates `text` in the Ultra algebra.
pub fn eval(text: &str) -> CalcResult<Ultra> {
    evaluate(text, &UltraDomain, ParserOptions::default())
}

/// Evaluates `text` directly on complex, binary or dual numbers.
pub fn eval_direct(text: &str) -> CalcResult<Scalar> {
    evaluate(text, &ScalarDomain, ParserOptions::default())
}

pub fn parse_ultra(text: &str) -> CalcResult<Ast<Ultra>> {
    Parser::new(&ULTRA_OPERATORS).parse(text)
}
