//! Two-dimensional hypercomplex numbers: complex, binary (split-complex)
//! and dual.
//!
//! A [`Scalar`] is `re + im·u` where the unit `u` squares to −1, +1 or 0
//! depending on its [`Kind`]. Every operation matches on the kind; results
//! outside an algebra's domain are `None`.

mod binary;
mod complex;
mod dual;
pub(crate) mod text;

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use crate::function::{self, Elementary};
use crate::ultra::MAX_ROOT_DEGREE;

/// Default relative tolerance of `==` on hypercomplex values.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Complex,
    Binary,
    Dual,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Complex, Kind::Binary, Kind::Dual];

    /// Square of the imaginary unit.
    pub const fn unit_square(self) -> f64 {
        match self {
            Kind::Complex => -1.0,
            Kind::Binary => 1.0,
            Kind::Dual => 0.0,
        }
    }

    /// Suffix character marking this kind's imaginary unit in text.
    pub const fn unit_char(self) -> char {
        match self {
            Kind::Complex => 'ⅈ',
            Kind::Binary => 'ⅉ',
            Kind::Dual => 'ε',
        }
    }

    pub fn from_unit_char(c: char) -> Option<Kind> {
        Self::ALL.into_iter().find(|k| k.unit_char() == c)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complex => write!(f, "complex"),
            Self::Binary => write!(f, "binary"),
            Self::Dual => write!(f, "dual"),
        }
    }
}

impl std::str::FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "complex" => Ok(Self::Complex),
            "binary" | "split" | "split-complex" => Ok(Self::Binary),
            "dual" => Ok(Self::Dual),
            _ => Err(format!("invalid algebra: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Scalar {
    kind: Kind,
    re: f64,
    im: f64,
}

impl Scalar {
    pub const ZERO: Scalar = Scalar::real(0.0);
    pub const ONE: Scalar = Scalar::real(1.0);
    pub const I: Scalar = Scalar::new(Kind::Complex, 0.0, 1.0);
    pub const J: Scalar = Scalar::new(Kind::Binary, 0.0, 1.0);
    pub const EPSILON: Scalar = Scalar::new(Kind::Dual, 0.0, 1.0);

    pub const fn new(kind: Kind, re: f64, im: f64) -> Self {
        Self { kind, re, im }
    }

    /// A real number. Reals are carried by the complex algebra.
    pub const fn real(re: f64) -> Self {
        Self::new(Kind::Complex, re, 0.0)
    }

    pub const fn complex(re: f64, im: f64) -> Self {
        Self::new(Kind::Complex, re, im)
    }

    pub const fn binary(re: f64, im: f64) -> Self {
        Self::new(Kind::Binary, re, im)
    }

    pub const fn dual(re: f64, im: f64) -> Self {
        Self::new(Kind::Dual, re, im)
    }

    pub const fn unit(kind: Kind) -> Self {
        Self::new(kind, 0.0, 1.0)
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn re(&self) -> f64 {
        self.re
    }

    pub fn im(&self) -> f64 {
        self.im
    }

    pub fn is_real(&self) -> bool {
        self.im == 0.0
    }

    pub fn is_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    /// Same coordinates, reinterpreted in another algebra.
    pub fn with_kind(self, kind: Kind) -> Self {
        Self::new(kind, self.re, self.im)
    }

    fn with(self, re: f64, im: f64) -> Self {
        Self::new(self.kind, re, im)
    }

    /// Kind shared by two operands: a real operand adopts the other's kind.
    fn common_kind(self, other: Scalar) -> Option<Kind> {
        if self.kind == other.kind || other.is_real() {
            Some(self.kind)
        } else if self.is_real() {
            Some(other.kind)
        } else {
            None
        }
    }

    // -----------------------------------------------------------------------
    // Polar and Euler forms
    // -----------------------------------------------------------------------

    /// Euclidean length of (re, im).
    pub fn length(&self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Euclidean angle of (re, im), in (−π, π].
    pub fn angle(&self) -> f64 {
        let a = self.im.atan2(self.re);
        if a == -PI {
            PI
        } else {
            a
        }
    }

    pub fn from_polar(kind: Kind, length: f64, angle: f64) -> Self {
        Self::new(kind, length * angle.cos(), length * angle.sin())
    }

    /// Modulus `r` of the algebra's Euler form `r·d·e^(φu)`.
    pub fn euler_length(&self) -> Option<f64> {
        match self.kind {
            Kind::Complex => Some(self.length()),
            Kind::Binary => binary::euler(*self).map(|(r, _, _)| r),
            Kind::Dual => (self.re != 0.0).then(|| self.re.abs()),
        }
    }

    /// Argument `φ` of the algebra's Euler form `r·d·e^(φu)`.
    pub fn euler_angle(&self) -> Option<f64> {
        match self.kind {
            Kind::Complex => Some(self.angle()),
            Kind::Binary => binary::euler(*self).map(|(_, _, phi)| phi),
            Kind::Dual => (self.re != 0.0).then(|| self.im / self.re),
        }
    }

    /// `r·e^(φu)`: rotation, hyperbolic rotation or shear by `φ`.
    pub fn from_euler(kind: Kind, length: f64, angle: f64) -> Self {
        match kind {
            Kind::Complex => Self::from_polar(kind, length, angle),
            Kind::Binary => Self::new(kind, length * angle.cosh(), length * angle.sinh()),
            Kind::Dual => Self::new(kind, length, length * angle),
        }
    }

    // -----------------------------------------------------------------------
    // Arithmetic
    // -----------------------------------------------------------------------

    /// Quadratic form `x² − u²·y²`.
    pub fn det(&self) -> f64 {
        self.re * self.re - self.kind.unit_square() * self.im * self.im
    }

    pub fn conjugate(&self) -> Self {
        self.with(self.re, -self.im)
    }

    pub fn negate(&self) -> Self {
        self.with(-self.re, -self.im)
    }

    pub fn scale(&self, k: f64) -> Self {
        self.with(self.re * k, self.im * k)
    }

    pub fn plus(&self, other: &Scalar) -> Option<Scalar> {
        let kind = self.common_kind(*other)?;
        Some(Self::new(kind, self.re + other.re, self.im + other.im))
    }

    pub fn minus(&self, other: &Scalar) -> Option<Scalar> {
        let kind = self.common_kind(*other)?;
        Some(Self::new(kind, self.re - other.re, self.im - other.im))
    }

    pub fn times(&self, other: &Scalar) -> Option<Scalar> {
        let kind = self.common_kind(*other)?;
        Some(Self::new(kind, self.re, self.im).mul_same(other.with_kind(kind)))
    }

    /// Product of two values already known to share `self.kind`.
    fn mul_same(self, o: Scalar) -> Scalar {
        let u2 = self.kind.unit_square();
        self.with(
            self.re * o.re + u2 * self.im * o.im,
            self.re * o.im + self.im * o.re,
        )
    }

    /// `conjugate / det`; `None` on the null cone.
    pub fn inverse(&self) -> Option<Scalar> {
        let det = self.det();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(self.conjugate().scale(1.0 / det))
    }

    /// Division.
    pub fn by(&self, other: &Scalar) -> Option<Scalar> {
        self.times(&other.inverse()?)
    }

    /// Multiply by the unit-length Euler number of `angle`.
    pub fn turned_by(&self, angle: f64) -> Scalar {
        self.mul_same(Self::from_euler(self.kind, 1.0, angle))
    }

    /// Euclidean dot product of the coordinate pairs.
    pub fn dot(&self, other: &Scalar) -> f64 {
        self.re * other.re + self.im * other.im
    }

    /// Projection of (re, im) onto the direction of `direction`.
    pub fn part_in_direction(&self, direction: &Scalar) -> Option<Scalar> {
        let kind = self.common_kind(*direction)?;
        let norm = direction.dot(direction);
        if norm == 0.0 {
            return None;
        }
        let k = self.dot(direction) / norm;
        Some(Self::new(kind, direction.re * k, direction.im * k))
    }

    pub fn part_orthogonally_to(&self, direction: &Scalar) -> Option<Scalar> {
        self.minus(&self.part_in_direction(direction)?)
    }

    pub fn round(&self) -> Scalar {
        self.with(self.re.round(), self.im.round())
    }

    pub fn ceil(&self) -> Scalar {
        self.with(self.re.ceil(), self.im.ceil())
    }

    pub fn floor(&self) -> Scalar {
        self.with(self.re.floor(), self.im.floor())
    }

    /// Integer value of a real scalar, if it is one.
    pub fn as_integer(&self) -> Option<i32> {
        let x = self.re;
        (self.is_real() && x.fract() == 0.0 && x.abs() <= i32::MAX as f64).then(|| x as i32)
    }

    // -----------------------------------------------------------------------
    // Transcendental functions
    // -----------------------------------------------------------------------

    pub fn exp(&self) -> Scalar {
        let scale = self.re.exp();
        match self.kind {
            Kind::Complex => self.with(scale * self.im.cos(), scale * self.im.sin()),
            Kind::Binary => self.with(scale * self.im.cosh(), scale * self.im.sinh()),
            Kind::Dual => self.with(scale, scale * self.im),
        }
    }

    /// Principal logarithm.
    pub fn ln(&self) -> Option<Scalar> {
        match self.kind {
            Kind::Complex => complex::ln(*self),
            Kind::Binary => binary::ln(*self),
            Kind::Dual => dual::ln(*self),
        }
    }

    /// Principal power `self^exponent`.
    pub fn pow(&self, exponent: &Scalar) -> Option<Scalar> {
        let kind = self.common_kind(*exponent)?;
        let base = self.with_kind(kind);
        let exponent = exponent.with_kind(kind);
        match kind {
            Kind::Complex => complex::pow(base, exponent),
            Kind::Binary => binary::pow(base, exponent),
            Kind::Dual => dual::pow(base, exponent),
        }
    }

    pub fn powf(&self, exponent: f64) -> Option<Scalar> {
        self.pow(&Scalar::real(exponent))
    }

    /// Logarithm of `self` to `base`.
    pub fn log(&self, base: &Scalar) -> Option<Scalar> {
        self.ln()?.by(&base.ln()?)
    }

    /// Principal square root.
    pub fn sqrt(&self) -> Option<Scalar> {
        match self.kind {
            Kind::Complex => Some(complex::sqrt(*self)),
            Kind::Binary => binary::sqrt(*self),
            Kind::Dual => dual::sqrt(*self),
        }
    }

    /// All `n`-th roots inside the algebra.
    /// The `n`-th roots. `None` for a degree outside `1..=MAX_ROOT_DEGREE`.
    pub fn roots(&self, n: u32) -> Option<Vec<Scalar>> {
        if n == 0 || n > MAX_ROOT_DEGREE {
            return None;
        }
        let roots = match self.kind {
            Kind::Complex => complex::roots(*self, n),
            Kind::Binary => binary::roots(*self, n),
            Kind::Dual => dual::roots(*self, n),
        };
        (!roots.is_empty()).then_some(roots)
    }

    pub fn elementary(&self, f: Elementary) -> Option<Scalar> {
        let value = match self.kind {
            Kind::Complex => complex::elementary(*self, f)?,
            Kind::Binary => binary::lift(*self, |x| f.real(x))?,
            Kind::Dual => dual::lift(*self, |x| f.real(x), |x| f.derivative(x))?,
        };
        value.is_finite().then_some(value)
    }

    // -----------------------------------------------------------------------
    // Comparison
    // -----------------------------------------------------------------------

    /// Coordinates equal within `tolerance`, relative to the larger length.
    pub fn approx_eq(&self, other: &Scalar, tolerance: f64) -> bool {
        if self.kind != other.kind && !(self.is_real() && other.is_real()) {
            return false;
        }
        let scale = self.length().max(other.length()).max(1.0);
        (self.re - other.re).abs() <= tolerance * scale
            && (self.im - other.im).abs() <= tolerance * scale
    }
}

macro_rules! elementary_methods {
    ($($name:ident => $f:ident),* $(,)?) => {
        impl Scalar {
            $(
                pub fn $name(&self) -> Option<Scalar> {
                    self.elementary(Elementary::$f)
                }
            )*
        }
    };
}

elementary_methods!(
    sin => Sin, cos => Cos, tan => Tan, cot => Cot, sec => Sec, csc => Csc,
    asin => Asin, acos => Acos, atan => Atan, acot => Acot, asec => Asec, acsc => Acsc,
    sinh => Sinh, cosh => Cosh, tanh => Tanh, coth => Coth, sech => Sech, csch => Csch,
    asinh => Asinh, acosh => Acosh, atanh => Atanh, acoth => Acoth, asech => Asech, acsch => Acsch,
);

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, DEFAULT_TOLERANCE)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::real(x)
    }
}

impl std::ops::Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        self.negate()
    }
}

impl std::ops::Mul<f64> for Scalar {
    type Output = Scalar;
    fn mul(self, k: f64) -> Scalar {
        self.scale(k)
    }
}

/// Complex-kind arithmetic for the identity-derived functions.
impl function::ExpLn for Scalar {
    fn one() -> Self {
        Scalar::ONE
    }

    fn rotation_unit() -> Self {
        Scalar::I
    }

    fn add(self, rhs: Self) -> Self {
        self.with(self.re + rhs.re, self.im + rhs.im)
    }

    fn sub(self, rhs: Self) -> Self {
        self.with(self.re - rhs.re, self.im - rhs.im)
    }

    fn mul(self, rhs: Self) -> Self {
        self.mul_same(rhs)
    }

    fn scale(self, k: f64) -> Self {
        Scalar::scale(&self, k)
    }

    fn div(self, rhs: Self) -> Option<Self> {
        Some(self.mul_same(rhs.inverse()?))
    }

    fn exp(self) -> Self {
        Scalar::exp(&self)
    }

    fn ln(self) -> Option<Self> {
        Scalar::ln(&self)
    }

    fn sqrt(self) -> Option<Self> {
        Scalar::sqrt(&self)
    }
}
