//! The circular and hyperbolic function family.
//!
//! Every algebra evaluates the same 24 functions. Complex scalars and Ultra
//! numbers derive them from `exp`/`ln` through the usual identities
//! (`sin x = (e^(ⅈx) − e^(−ⅈx)) / 2ⅈ`, `asin x = −ⅈ ln(ⅈx + √(1 − x²))`, ...);
//! binary and dual scalars lift the real functions below.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Elementary {
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
    Asin,
    Acos,
    Atan,
    Acot,
    Asec,
    Acsc,
    Sinh,
    Cosh,
    Tanh,
    Coth,
    Sech,
    Csch,
    Asinh,
    Acosh,
    Atanh,
    Acoth,
    Asech,
    Acsch,
}

impl Elementary {
    pub const ALL: [Elementary; 24] = [
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Cot,
        Self::Sec,
        Self::Csc,
        Self::Asin,
        Self::Acos,
        Self::Atan,
        Self::Acot,
        Self::Asec,
        Self::Acsc,
        Self::Sinh,
        Self::Cosh,
        Self::Tanh,
        Self::Coth,
        Self::Sech,
        Self::Csch,
        Self::Asinh,
        Self::Acosh,
        Self::Atanh,
        Self::Acoth,
        Self::Asech,
        Self::Acsch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Cot => "cot",
            Self::Sec => "sec",
            Self::Csc => "csc",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Acot => "acot",
            Self::Asec => "asec",
            Self::Acsc => "acsc",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Coth => "coth",
            Self::Sech => "sech",
            Self::Csch => "csch",
            Self::Asinh => "asinh",
            Self::Acosh => "acosh",
            Self::Atanh => "atanh",
            Self::Acoth => "acoth",
            Self::Asech => "asech",
            Self::Acsch => "acsch",
        }
    }

    /// The real-valued function. NaN or infinity outside its domain.
    pub fn real(self, x: f64) -> f64 {
        match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Cot => 1.0 / x.tan(),
            Self::Sec => 1.0 / x.cos(),
            Self::Csc => 1.0 / x.sin(),
            Self::Asin => x.asin(),
            Self::Acos => x.acos(),
            Self::Atan => x.atan(),
            Self::Acot => (1.0 / x).atan(),
            Self::Asec => (1.0 / x).acos(),
            Self::Acsc => (1.0 / x).asin(),
            Self::Sinh => x.sinh(),
            Self::Cosh => x.cosh(),
            Self::Tanh => x.tanh(),
            Self::Coth => 1.0 / x.tanh(),
            Self::Sech => 1.0 / x.cosh(),
            Self::Csch => 1.0 / x.sinh(),
            Self::Asinh => x.asinh(),
            Self::Acosh => x.acosh(),
            Self::Atanh => x.atanh(),
            Self::Acoth => (1.0 / x).atanh(),
            Self::Asech => (1.0 / x).acosh(),
            Self::Acsch => (1.0 / x).asinh(),
        }
    }

    /// First derivative of [`Elementary::real`].
    pub fn derivative(self, x: f64) -> f64 {
        match self {
            Self::Sin => x.cos(),
            Self::Cos => -x.sin(),
            Self::Tan => 1.0 / (x.cos() * x.cos()),
            Self::Cot => -1.0 / (x.sin() * x.sin()),
            Self::Sec => x.sin() / (x.cos() * x.cos()),
            Self::Csc => -x.cos() / (x.sin() * x.sin()),
            Self::Asin => 1.0 / (1.0 - x * x).sqrt(),
            Self::Acos => -1.0 / (1.0 - x * x).sqrt(),
            Self::Atan => 1.0 / (1.0 + x * x),
            Self::Acot => -1.0 / (1.0 + x * x),
            Self::Asec => 1.0 / (x.abs() * (x * x - 1.0).sqrt()),
            Self::Acsc => -1.0 / (x.abs() * (x * x - 1.0).sqrt()),
            Self::Sinh => x.cosh(),
            Self::Cosh => x.sinh(),
            Self::Tanh => 1.0 / (x.cosh() * x.cosh()),
            Self::Coth => -1.0 / (x.sinh() * x.sinh()),
            Self::Sech => -x.tanh() / x.cosh(),
            Self::Csch => -1.0 / (x.tanh() * x.sinh()),
            Self::Asinh => 1.0 / (x * x + 1.0).sqrt(),
            Self::Acosh => 1.0 / (x * x - 1.0).sqrt(),
            Self::Atanh | Self::Acoth => 1.0 / (1.0 - x * x),
            Self::Asech => -1.0 / (x * (1.0 - x * x).sqrt()),
            Self::Acsch => -1.0 / (x.abs() * (1.0 + x * x).sqrt()),
        }
    }
}

impl fmt::Display for Elementary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Elementary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| format!("unknown function: {s}"))
    }
}

/// Arithmetic needed to derive the function family from `exp` and `ln`.
pub(crate) trait ExpLn: Copy {
    fn one() -> Self;
    /// The unit whose exponential rotates: `ⅈ`.
    fn rotation_unit() -> Self;
    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    fn scale(self, k: f64) -> Self;
    fn div(self, rhs: Self) -> Option<Self>;
    fn exp(self) -> Self;
    fn ln(self) -> Option<Self>;
    fn sqrt(self) -> Option<Self>;
}

pub(crate) fn via_exp_ln<T: ExpLn>(f: Elementary, x: T) -> Option<T> {
    let one = T::one();
    let i = T::rotation_unit();
    let recip = |v: T| one.div(v);
    Some(match f {
        Elementary::Sin => {
            let ix = i.mul(x);
            ix.exp().sub(ix.scale(-1.0).exp()).mul(i.scale(-0.5))
        }
        Elementary::Cos => {
            let ix = i.mul(x);
            ix.exp().add(ix.scale(-1.0).exp()).scale(0.5)
        }
        Elementary::Tan => via_exp_ln(Elementary::Sin, x)?.div(via_exp_ln(Elementary::Cos, x)?)?,
        Elementary::Cot => via_exp_ln(Elementary::Cos, x)?.div(via_exp_ln(Elementary::Sin, x)?)?,
        Elementary::Sec => recip(via_exp_ln(Elementary::Cos, x)?)?,
        Elementary::Csc => recip(via_exp_ln(Elementary::Sin, x)?)?,
        Elementary::Asin => {
            let root = one.sub(x.mul(x)).sqrt()?;
            i.mul(x).add(root).ln()?.mul(i.scale(-1.0))
        }
        Elementary::Acos => {
            let root = one.sub(x.mul(x)).sqrt()?;
            x.add(i.mul(root)).ln()?.mul(i.scale(-1.0))
        }
        Elementary::Atan => {
            let ix = i.mul(x);
            one.sub(ix).ln()?.sub(one.add(ix).ln()?).mul(i.scale(0.5))
        }
        Elementary::Acot => via_exp_ln(Elementary::Atan, recip(x)?)?,
        Elementary::Asec => via_exp_ln(Elementary::Acos, recip(x)?)?,
        Elementary::Acsc => via_exp_ln(Elementary::Asin, recip(x)?)?,
        Elementary::Sinh => x.exp().sub(x.scale(-1.0).exp()).scale(0.5),
        Elementary::Cosh => x.exp().add(x.scale(-1.0).exp()).scale(0.5),
        Elementary::Tanh => {
            via_exp_ln(Elementary::Sinh, x)?.div(via_exp_ln(Elementary::Cosh, x)?)?
        }
        Elementary::Coth => {
            via_exp_ln(Elementary::Cosh, x)?.div(via_exp_ln(Elementary::Sinh, x)?)?
        }
        Elementary::Sech => recip(via_exp_ln(Elementary::Cosh, x)?)?,
        Elementary::Csch => recip(via_exp_ln(Elementary::Sinh, x)?)?,
        Elementary::Asinh => x.add(x.mul(x).add(one).sqrt()?).ln()?,
        Elementary::Acosh => {
            let root = x.add(one).sqrt()?.mul(x.sub(one).sqrt()?);
            x.add(root).ln()?
        }
        Elementary::Atanh => one.add(x).ln()?.sub(one.sub(x).ln()?).scale(0.5),
        Elementary::Acoth => via_exp_ln(Elementary::Atanh, recip(x)?)?,
        Elementary::Asech => via_exp_ln(Elementary::Acosh, recip(x)?)?,
        Elementary::Acsch => via_exp_ln(Elementary::Asinh, recip(x)?)?,
    })
}
