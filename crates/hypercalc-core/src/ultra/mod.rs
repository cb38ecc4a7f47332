//! The eight-dimensional Ultra algebra spanned by `1, ⅈ, ⅉ, ε` and their
//! products, with `ⅈ² = −1`, `ⅉ² = 1`, `ε² = 0`.
//!
//! The algebra is commutative and associative. Every [`Scalar`] embeds into
//! it, so the parser can evaluate any mix of units in one number system.

mod dim;
mod transcendental;

pub use dim::{Component, Dim, CLOSURE, SIGN, ZERO_PRODUCT};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use crate::error::{CalcError, CalcResult};
use crate::literal::{format_real, parse_real};
use crate::scalar::text::{parse_coefficient, split_point, write_term};
use crate::scalar::{Kind, Scalar, DEFAULT_TOLERANCE};

/// Geometric-mean magnitude below which a value counts as singular.
pub const SINGULAR_EPS: f64 = 1e-10;

/// Largest degree `roots` accepts, for scalars and Ultra numbers alike.
pub const MAX_ROOT_DEGREE: u32 = 64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ultra {
    coefficients: [f64; 8],
}

impl Ultra {
    pub const ZERO: Ultra = Ultra::new([0.0; 8]);
    pub const ONE: Ultra = Ultra::real(1.0);

    pub const fn new(coefficients: [f64; 8]) -> Self {
        Self { coefficients }
    }

    pub const fn real(x: f64) -> Self {
        let mut coefficients = [0.0; 8];
        coefficients[0] = x;
        Self { coefficients }
    }

    /// `value` times the basis element `dim`.
    pub fn component(dim: Dim, value: f64) -> Self {
        let mut coefficients = [0.0; 8];
        coefficients[dim.index()] = value;
        Self { coefficients }
    }

    pub fn unit(dim: Dim) -> Self {
        Self::component(dim, 1.0)
    }

    pub fn coefficients(&self) -> &[f64; 8] {
        &self.coefficients
    }

    pub fn get(&self, dim: Dim) -> f64 {
        self.coefficients[dim.index()]
    }

    /// The eight coefficients paired with their dimensions.
    pub fn components(&self) -> impl Iterator<Item = Component> + '_ {
        Dim::ALL.into_iter().map(|dim| Component::new(dim, self.get(dim)))
    }

    /// Places a carrier-algebra number back on `dim`: its real part on the
    /// real dimension, its imaginary part on `dim`.
    pub fn embed(dim: Dim, value: &Scalar) -> Ultra {
        if dim.is_real() {
            return Ultra::real(value.re());
        }
        Ultra::real(value.re()).plus(&Ultra::component(dim, value.im()))
    }

    pub fn real_part(&self) -> f64 {
        self.coefficients[0]
    }

    pub fn is_real(&self) -> bool {
        self.coefficients[1..].iter().all(|&c| c == 0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(|&c| c == 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.coefficients.iter().all(|c| c.is_finite())
    }

    /// Integer value of a real number, if it is one.
    pub fn as_integer(&self) -> Option<i32> {
        let x = self.real_part();
        (self.is_real() && x.fract() == 0.0 && x.abs() <= i32::MAX as f64).then(|| x as i32)
    }

    /// Largest absolute coefficient.
    pub fn max_abs(&self) -> f64 {
        self.coefficients.iter().fold(0.0, |m, c| m.max(c.abs()))
    }

    /// Sum of absolute coefficients.
    pub fn l1_norm(&self) -> f64 {
        self.coefficients.iter().map(|c| c.abs()).sum()
    }

    /// Nonzero dimensions other than the real one.
    fn active_dims(&self) -> Vec<Dim> {
        Dim::ALL
            .into_iter()
            .skip(1)
            .filter(|d| self.get(*d) != 0.0)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Arithmetic
    // -----------------------------------------------------------------------

    pub fn plus(&self, other: &Ultra) -> Ultra {
        let mut out = self.coefficients;
        for (o, c) in out.iter_mut().zip(other.coefficients) {
            *o += c;
        }
        Ultra::new(out)
    }

    pub fn minus(&self, other: &Ultra) -> Ultra {
        self.plus(&other.negate())
    }

    pub fn times(&self, other: &Ultra) -> Ultra {
        let mut out = [0.0; 8];
        for (a, &x) in self.coefficients.iter().enumerate() {
            if x == 0.0 {
                continue;
            }
            for (b, &y) in other.coefficients.iter().enumerate() {
                let target = CLOSURE[a][b];
                if target == ZERO_PRODUCT || y == 0.0 {
                    continue;
                }
                let product = x * y;
                out[target as usize] += if SIGN[a][b] == 1 { -product } else { product };
            }
        }
        Ultra::new(out)
    }

    pub fn scale(&self, k: f64) -> Ultra {
        Ultra::new(self.coefficients.map(|c| c * k))
    }

    pub fn negate(&self) -> Ultra {
        self.scale(-1.0)
    }

    /// Product of every copy of `self` with a nonempty subset of its
    /// non-real dimensions negated, and the active dimension count. Times
    /// `self` it gives a real number.
    fn adjugate(&self) -> (Ultra, u32) {
        let dims = self.active_dims();
        let n = dims.len() as u32;
        let factors = (1u32..1 << n)
            .map(|mask| {
                let mut flipped = self.coefficients;
                for (bit, dim) in dims.iter().enumerate() {
                    if mask & (1 << bit) != 0 {
                        flipped[dim.index()] = -flipped[dim.index()];
                    }
                }
                Ultra::new(flipped)
            })
            .collect();
        (balanced_product(factors), n)
    }

    /// Generalized conjugate: `x · x.conjugate()` is real. A real number is
    /// its own conjugate.
    pub fn conjugate(&self) -> Ultra {
        if self.is_real() {
            return *self;
        }
        self.adjugate().0
    }

    /// Real part of `x · x.conjugate()`: a norm of degree `2^n` in the `n`
    /// active non-real dimensions, `x²` for a real number.
    pub fn det(&self) -> f64 {
        self.times(&self.conjugate()).real_part()
    }

    pub fn inverse(&self) -> Option<Ultra> {
        let scale = self.max_abs();
        if scale == 0.0 || !scale.is_finite() {
            return None;
        }
        let y = self.scale(1.0 / scale);
        let (adjugate, n) = y.adjugate();
        let det = y.times(&adjugate).real_part();
        let mean = det.abs().powf(1.0 / f64::from(1u32 << n));
        if !(mean >= SINGULAR_EPS) {
            return None;
        }
        Some(adjugate.scale(1.0 / (det * scale)))
    }

    /// Division.
    pub fn by(&self, other: &Ultra) -> Option<Ultra> {
        Some(self.times(&other.inverse()?))
    }

    pub fn approx_eq(&self, other: &Ultra, tolerance: f64) -> bool {
        let scale = self.max_abs().max(other.max_abs()).max(1.0);
        self.coefficients
            .iter()
            .zip(other.coefficients.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance * scale)
    }

    /// The value as a two-dimensional scalar, when at most one unit carries
    /// weight and that unit is `ⅈ`, `ⅉ` or `ε`.
    pub fn to_scalar(&self) -> Option<Scalar> {
        let re = self.real_part();
        match self.active_dims().as_slice() {
            [] => Some(Scalar::real(re)),
            [d] if *d == Dim::I => Some(Scalar::complex(re, self.get(*d))),
            [d] if *d == Dim::J => Some(Scalar::binary(re, self.get(*d))),
            [d] if *d == Dim::E => Some(Scalar::dual(re, self.get(*d))),
            _ => None,
        }
    }
}

/// Multiplies in a balanced tree: neighbours pairwise, then the halves.
pub(crate) fn balanced_product(mut factors: Vec<Ultra>) -> Ultra {
    if factors.is_empty() {
        return Ultra::ONE;
    }
    while factors.len() > 1 {
        factors = factors
            .chunks(2)
            .map(|pair| match pair {
                [a, b] => a.times(b),
                [a] => *a,
                _ => Ultra::ONE,
            })
            .collect();
    }
    factors[0]
}

impl PartialEq for Ultra {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, DEFAULT_TOLERANCE)
    }
}

impl From<f64> for Ultra {
    fn from(x: f64) -> Self {
        Ultra::real(x)
    }
}

impl From<Scalar> for Ultra {
    fn from(z: Scalar) -> Self {
        let dim = match z.kind() {
            Kind::Complex => Dim::I,
            Kind::Binary => Dim::J,
            Kind::Dual => Dim::E,
        };
        Ultra::real(z.re()).plus(&Ultra::component(dim, z.im()))
    }
}

impl Add for Ultra {
    type Output = Ultra;
    fn add(self, rhs: Ultra) -> Ultra {
        self.plus(&rhs)
    }
}

impl Sub for Ultra {
    type Output = Ultra;
    fn sub(self, rhs: Ultra) -> Ultra {
        self.minus(&rhs)
    }
}

impl Mul for Ultra {
    type Output = Ultra;
    fn mul(self, rhs: Ultra) -> Ultra {
        self.times(&rhs)
    }
}

impl Mul<f64> for Ultra {
    type Output = Ultra;
    fn mul(self, k: f64) -> Ultra {
        self.scale(k)
    }
}

impl Neg for Ultra {
    type Output = Ultra;
    fn neg(self) -> Ultra {
        self.negate()
    }
}

// ---------------------------------------------------------------------------
// Text form
// ---------------------------------------------------------------------------

impl fmt::Display for Ultra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = f.precision();
        let mut out = String::new();
        let re = format_real(self.real_part(), digits);
        if re != "0" {
            out.push_str(&re);
        }
        for dim in Dim::ALL.into_iter().skip(1) {
            let c = self.get(dim);
            if format_real(c, digits) != "0" {
                let first = out.is_empty();
                write_term(&mut out, c, dim.symbol(), first, digits);
            }
        }
        if out.is_empty() {
            out.push('0');
        }
        f.write_str(&out)
    }
}

impl FromStr for Ultra {
    type Err = CalcError;

    /// Parses a sum of unit terms such as `1+2ⅈ-ⅈⅉε`.
    fn from_str(s: &str) -> CalcResult<Ultra> {
        let mut rest = s.trim();
        if rest.is_empty() {
            return Err(CalcError::literal(s, "empty literal"));
        }
        let mut sum = Ultra::ZERO;
        loop {
            let (head, term) = match split_point(rest) {
                Some(i) => (&rest[..i], &rest[i..]),
                None => ("", rest),
            };
            sum = sum.plus(&parse_term(term)?);
            if head.is_empty() {
                return Ok(sum);
            }
            rest = head;
        }
    }
}

/// One signed term: a coefficient followed by the longest matching unit.
fn parse_term(term: &str) -> CalcResult<Ultra> {
    let unit = Dim::ALL
        .into_iter()
        .skip(1)
        .filter(|d| term.ends_with(d.symbol()))
        .max_by_key(|d| d.symbol().len());
    match unit {
        Some(dim) => {
            let coefficient = &term[..term.len() - dim.symbol().len()];
            Ok(Ultra::component(dim, parse_coefficient(coefficient)?))
        }
        None => Ok(Ultra::real(parse_real(term.strip_prefix('+').unwrap_or(term))?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ultra {
        Ultra::new([0.5, -1.25, 0.75, 0.3, 2.0, -0.4, 0.1, 1.5])
    }

    #[test]
    fn test_units_and_embedding() {
        let i = Ultra::unit(Dim::I);
        assert_eq!(i * i, Ultra::real(-1.0));
        let ij = Ultra::unit(Dim::I) * Ultra::unit(Dim::J);
        assert_eq!(ij, Ultra::unit(Dim::IJ));
        assert_eq!(ij * ij, Ultra::real(-1.0));
        let z = Scalar::binary(1.0, 2.0);
        assert_eq!(Ultra::from(z).to_scalar().unwrap(), z);
        assert!(ij.to_scalar().is_none());
    }

    #[test]
    fn test_commutative_and_associative() {
        let a = sample();
        let b = Ultra::new([1.0, 0.2, -0.3, 0.0, 0.7, 0.0, 1.1, -0.5]);
        let c = Ultra::new([-2.0, 0.0, 1.0, 0.4, 0.0, 0.9, 0.0, 0.3]);
        assert_eq!(a * b, b * a);
        assert_eq!((a * b) * c, a * (b * c));
    }

    #[test]
    fn test_conjugate_product_is_real() {
        let a = sample();
        let product = a * a.conjugate();
        assert!(product.approx_eq(&Ultra::real(product.real_part()), 1e-9));
        assert_eq!(product.real_part(), a.det());
    }

    #[test]
    fn test_conjugate_of_simple_values() {
        let z = Ultra::from(Scalar::complex(3.0, 4.0));
        assert_eq!(z.conjugate(), Ultra::from(Scalar::complex(3.0, -4.0)));
        assert_eq!(z.det(), 25.0);
        assert_eq!(Ultra::real(-2.0).conjugate(), Ultra::real(-2.0));
    }

    #[test]
    fn test_det_of_real_values() {
        for x in [3.0, -2.0, 0.5, 0.0] {
            let u = Ultra::real(x);
            assert_eq!(u.det(), (u * u.conjugate()).real_part());
            assert_eq!(u.det(), x * x);
        }
        assert_eq!(Ultra::real(4.0).inverse().unwrap(), Ultra::real(0.25));
    }

    #[test]
    fn test_inverse() {
        let a = sample();
        assert_eq!(a * a.inverse().unwrap(), Ultra::ONE);
        assert_eq!(Ultra::real(4.0).inverse().unwrap(), Ultra::real(0.25));
        assert!(Ultra::ZERO.inverse().is_none());
        assert!(Ultra::unit(Dim::E).inverse().is_none());
        let cone = Ultra::ONE + Ultra::unit(Dim::J);
        assert!(cone.inverse().is_none());
    }

    #[test]
    fn test_balanced_product_matches_fold() {
        let factors: Vec<Ultra> = (0..5).map(|k| sample() * (0.3 * k as f64 + 0.5)).collect();
        let folded = factors.iter().fold(Ultra::ONE, |acc, f| acc * *f);
        assert_eq!(balanced_product(factors), folded);
        assert_eq!(balanced_product(Vec::new()), Ultra::ONE);
    }

    #[test]
    fn test_display() {
        assert_eq!(Ultra::ZERO.to_string(), "0");
        assert_eq!(Ultra::unit(Dim::I).to_string(), "ⅈ");
        let u = Ultra::new([1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0]);
        assert_eq!(u.to_string(), "1+2ⅈ-ⅈⅉε");
        assert_eq!(Ultra::component(Dim::JE, -2.5).to_string(), "-2.5ⅉε");
    }

    #[test]
    fn test_parse_text_form() {
        let u: Ultra = "1+2ⅈ-ⅈⅉε".parse().unwrap();
        assert_eq!(u, Ultra::new([1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0]));
        let v: Ultra = "-ⅉ+1e-3ε+ⅈε".parse().unwrap();
        assert_eq!(v, Ultra::new([0.0, 0.0, -1.0, 0.0, 0.001, 1.0, 0.0, 0.0]));
        assert!("1+xⅈ".parse::<Ultra>().is_err());
        assert!("".parse::<Ultra>().is_err());
    }

    #[test]
    fn test_text_round_trip() {
        for u in [Ultra::ZERO, Ultra::ONE, sample(), Ultra::unit(Dim::IJE)] {
            let back: Ultra = u.to_string().parse().unwrap();
            assert_eq!(back, u, "{u}");
        }
    }
}
