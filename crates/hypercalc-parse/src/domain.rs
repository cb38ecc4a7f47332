//! Evaluation domains: what each operator code means for a value type.

use std::fmt;

use hypercalc_core::{Dim, Kind, Scalar, Ultra};

use crate::operator::{OpCode, Operator, DIRECT_OPERATORS, ULTRA_OPERATORS};

pub trait EvalDomain {
    type Value: Clone + fmt::Display;

    fn name(&self) -> &'static str;

    /// Operator table the parser scans with.
    fn operators(&self) -> &'static [Operator];

    fn literal(&self, x: f64) -> Self::Value;

    /// Applies `code` to already evaluated operands. `None` when the
    /// operation has no result or the domain does not support it.
    fn apply(&self, code: OpCode, args: &[Self::Value]) -> Option<Self::Value>;
}

/// Evaluation in the 8-dimensional Ultra algebra.
#[derive(Debug, Clone, Copy, Default)]
pub struct UltraDomain;

fn unit_dim(kind: Kind) -> Dim {
    match kind {
        Kind::Complex => Dim::I,
        Kind::Binary => Dim::J,
        Kind::Dual => Dim::E,
    }
}

impl EvalDomain for UltraDomain {
    type Value = Ultra;

    fn name(&self) -> &'static str {
        "ultra"
    }

    fn operators(&self) -> &'static [Operator] {
        &ULTRA_OPERATORS
    }

    fn literal(&self, x: f64) -> Ultra {
        Ultra::real(x)
    }

    fn apply(&self, code: OpCode, args: &[Ultra]) -> Option<Ultra> {
        let value = match (code, args) {
            (OpCode::Add, [a, b]) => Some(a.plus(b)),
            (OpCode::Sub, [a, b]) => Some(a.minus(b)),
            (OpCode::Mul, [a, b]) => Some(a.times(b)),
            (OpCode::Div, [a, b]) => a.by(b),
            (OpCode::Pow, [a, b]) => a.pow(b),
            (OpCode::Log, [base, x]) => x.log(base),
            (OpCode::Neg, [a]) => Some(a.negate()),
            (OpCode::Pos, [a]) => Some(*a),
            (OpCode::Square, [a]) => Some(a.times(a)),
            (OpCode::Cube, [a]) => Some(a.times(a).times(a)),
            (OpCode::Unit(kind), []) => Some(Ultra::unit(unit_dim(kind))),
            (OpCode::Unit(kind), [a]) => Some(a.times(&Ultra::unit(unit_dim(kind)))),
            (OpCode::Function(f), [a]) => a.elementary(f),
            (OpCode::Exp, [a]) => Some(a.exp()),
            (OpCode::Ln, [a]) => a.ln(),
            (OpCode::Sqrt, [a]) => a.sqrt(),
            (OpCode::Conjugate, [a]) => Some(a.conjugate()),
            (OpCode::Inverse, [a]) => a.inverse(),
            (OpCode::Re, [a]) => Some(Ultra::real(a.real_part())),
            _ => None,
        };
        value.filter(Ultra::is_finite)
    }
}

/// Direct evaluation on a single complex, binary or dual number.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarDomain;

impl EvalDomain for ScalarDomain {
    type Value = Scalar;

    fn name(&self) -> &'static str {
        "direct"
    }

    fn operators(&self) -> &'static [Operator] {
        &DIRECT_OPERATORS
    }

    fn literal(&self, x: f64) -> Scalar {
        Scalar::real(x)
    }

    fn apply(&self, code: OpCode, args: &[Scalar]) -> Option<Scalar> {
        let real = |x: f64| Some(Scalar::real(x));
        let value = match (code, args) {
            (OpCode::Add, [a, b]) => a.plus(b),
            (OpCode::Sub, [a, b]) => a.minus(b),
            (OpCode::Mul, [a, b]) => a.times(b),
            (OpCode::Div, [a, b]) => a.by(b),
            (OpCode::Pow, [a, b]) => a.pow(b),
            (OpCode::Log, [base, x]) => x.log(base),
            (OpCode::Dot, [a, b]) => real(a.dot(b)),
            (OpCode::Neg | OpCode::NegFn, [a]) => Some(a.negate()),
            (OpCode::Pos, [a]) => Some(*a),
            (OpCode::Square, [a]) => a.times(a),
            (OpCode::Cube, [a]) => a.times(a)?.times(a),
            (OpCode::Unit(kind), []) => Some(Scalar::unit(kind)),
            (OpCode::Unit(kind), [a]) => a.times(&Scalar::unit(kind)),
            (OpCode::Function(f), [a]) => a.elementary(f),
            (OpCode::Exp, [a]) => Some(a.exp()),
            (OpCode::Ln, [a]) => a.ln(),
            (OpCode::Sqrt, [a]) => a.sqrt(),
            (OpCode::Conjugate, [a]) => Some(a.conjugate()),
            (OpCode::Inverse, [a]) => a.inverse(),
            (OpCode::Re, [a]) => real(a.re()),
            (OpCode::Im, [a]) => real(a.im()),
            (OpCode::Abs, [a]) => real(a.det().abs().sqrt()),
            (OpCode::Det, [a]) => real(a.det()),
            (OpCode::Angle, [a]) => real(a.angle()),
            (OpCode::Length, [a]) => real(a.length()),
            (OpCode::EulerAngle, [a]) => a.euler_angle().and_then(real),
            (OpCode::EulerLength, [a]) => a.euler_length().and_then(real),
            (OpCode::Normalized, [a]) => {
                let length = a.length();
                (length > 0.0).then(|| a.scale(1.0 / length))
            }
            (OpCode::Round, [a]) => Some(a.round()),
            (OpCode::Ceil, [a]) => Some(a.ceil()),
            (OpCode::Floor, [a]) => Some(a.floor()),
            _ => None,
        };
        value.filter(Scalar::is_finite)
    }
}
