//! Operator records and the two operator tables.
//!
//! Rank orders binding looseness: the valid depth-0 hit with the highest
//! rank becomes the outermost node of a substring.

use std::fmt;

use hypercalc_core::{Elementary, Kind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Prefix,
    Infix,
    Suffix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    /// `base _log x`
    Log,
    Neg,
    Pos,
    Square,
    Cube,
    /// Coefficient times an imaginary unit.
    Unit(Kind),
    Function(Elementary),
    Exp,
    Ln,
    Sqrt,
    Conjugate,
    Inverse,
    Re,
    // Direct scalar evaluation only.
    Dot,
    Abs,
    Det,
    Angle,
    Length,
    EulerAngle,
    EulerLength,
    Normalized,
    Im,
    Round,
    Ceil,
    Floor,
    NegFn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operator {
    pub code: OpCode,
    pub symbol: &'static str,
    pub fixity: Fixity,
    pub rank: u8,
    pub right_assoc: bool,
}

pub const RANK_SUM: u8 = 6;
pub const RANK_PRODUCT: u8 = 5;
pub const RANK_NEGATION: u8 = 4;
pub const RANK_POWER: u8 = 3;
pub const RANK_FUNCTION: u8 = 2;
pub const RANK_SUFFIX: u8 = 1;

impl Operator {
    const fn new(code: OpCode, symbol: &'static str, fixity: Fixity, rank: u8) -> Self {
        Self {
            code,
            symbol,
            fixity,
            rank,
            right_assoc: false,
        }
    }

    const fn infix(code: OpCode, symbol: &'static str, rank: u8) -> Self {
        Self::new(code, symbol, Fixity::Infix, rank)
    }

    const fn function(code: OpCode, symbol: &'static str) -> Self {
        Self::new(code, symbol, Fixity::Prefix, RANK_FUNCTION)
    }

    const fn suffix(code: OpCode, symbol: &'static str) -> Self {
        Self::new(code, symbol, Fixity::Suffix, RANK_SUFFIX)
    }

    const fn elementary(f: Elementary, symbol: &'static str) -> Self {
        Self::function(OpCode::Function(f), symbol)
    }

    pub fn arity(&self) -> usize {
        match self.fixity {
            Fixity::Infix => 2,
            Fixity::Prefix | Fixity::Suffix => 1,
        }
    }

    /// Units may stand alone, meaning coefficient 1.
    pub fn allows_empty_operand(&self) -> bool {
        matches!(self.code, OpCode::Unit(_))
    }

    /// Symbols spelled with ASCII letters must sit on word boundaries.
    pub fn is_word(&self) -> bool {
        self.symbol
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)
    }
}

macro_rules! operator_table {
    ($($extra:expr),* $(,)?) => {
        [
            Operator::infix(OpCode::Add, "+", RANK_SUM),
            Operator::infix(OpCode::Sub, "-", RANK_SUM),
            Operator::infix(OpCode::Mul, "*", RANK_PRODUCT),
            Operator::infix(OpCode::Div, "/", RANK_PRODUCT),
            Operator::new(OpCode::Neg, "-", Fixity::Prefix, RANK_NEGATION),
            Operator::new(OpCode::Pos, "+", Fixity::Prefix, RANK_NEGATION),
            Operator {
                right_assoc: true,
                ..Operator::infix(OpCode::Pow, "^", RANK_POWER)
            },
            Operator::infix(OpCode::Log, "_log", RANK_FUNCTION),
            Operator::elementary(Elementary::Sin, "sin"),
            Operator::elementary(Elementary::Cos, "cos"),
            Operator::elementary(Elementary::Tan, "tan"),
            Operator::elementary(Elementary::Cot, "cot"),
            Operator::elementary(Elementary::Sec, "sec"),
            Operator::elementary(Elementary::Csc, "csc"),
            Operator::elementary(Elementary::Asin, "asin"),
            Operator::elementary(Elementary::Acos, "acos"),
            Operator::elementary(Elementary::Atan, "atan"),
            Operator::elementary(Elementary::Acot, "acot"),
            Operator::elementary(Elementary::Asec, "asec"),
            Operator::elementary(Elementary::Acsc, "acsc"),
            Operator::elementary(Elementary::Sinh, "sinh"),
            Operator::elementary(Elementary::Cosh, "cosh"),
            Operator::elementary(Elementary::Tanh, "tanh"),
            Operator::elementary(Elementary::Coth, "coth"),
            Operator::elementary(Elementary::Sech, "sech"),
            Operator::elementary(Elementary::Csch, "csch"),
            Operator::elementary(Elementary::Asinh, "asinh"),
            Operator::elementary(Elementary::Acosh, "acosh"),
            Operator::elementary(Elementary::Atanh, "atanh"),
            Operator::elementary(Elementary::Acoth, "acoth"),
            Operator::elementary(Elementary::Asech, "asech"),
            Operator::elementary(Elementary::Acsch, "acsch"),
            Operator::function(OpCode::Exp, "exp"),
            Operator::function(OpCode::Ln, "ln"),
            Operator::function(OpCode::Sqrt, "sqrt"),
            Operator::function(OpCode::Conjugate, "conjugate"),
            Operator::function(OpCode::Inverse, "inverse"),
            Operator::function(OpCode::Re, "RE"),
            Operator::suffix(OpCode::Square, "²"),
            Operator::suffix(OpCode::Cube, "³"),
            Operator::suffix(OpCode::Unit(Kind::Complex), "ⅈ"),
            Operator::suffix(OpCode::Unit(Kind::Binary), "ⅉ"),
            Operator::suffix(OpCode::Unit(Kind::Dual), "ε"),
            $($extra,)*
        ]
    };
}

/// Operators understood by Ultra evaluation.
pub static ULTRA_OPERATORS: [Operator; 43] = operator_table!();

/// Ultra operators plus the scalar-only ones of direct evaluation.
pub static DIRECT_OPERATORS: [Operator; 56] = operator_table!(
    Operator::infix(OpCode::Dot, "dot", RANK_PRODUCT),
    Operator::function(OpCode::Abs, "abs"),
    Operator::function(OpCode::Det, "det"),
    Operator::function(OpCode::Angle, "angle"),
    Operator::function(OpCode::Length, "length"),
    Operator::function(OpCode::EulerAngle, "eulerangle"),
    Operator::function(OpCode::EulerLength, "eulerlength"),
    Operator::function(OpCode::Normalized, "normalized"),
    Operator::function(OpCode::Im, "IM"),
    Operator::function(OpCode::Round, "round"),
    Operator::function(OpCode::Ceil, "ceil"),
    Operator::function(OpCode::Floor, "floor"),
    Operator::function(OpCode::NegFn, "neg"),
);

/// Operators spelled `symbol` in `table`.
pub fn lookup<'t>(table: &'t [Operator], symbol: &'t str) -> impl Iterator<Item = &'t Operator> {
    table.iter().filter(move |op| op.symbol == symbol)
}
