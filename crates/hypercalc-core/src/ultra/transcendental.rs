//! exp, ln and everything derived from them on Ultra numbers.
//!
//! `exp` factors exactly over the basis. `ln` has no closed form: it scales
//! the argument near 1, takes repeated principal square roots until the
//! Gregory series `ln y = 2 Σ u^(2k+1)/(2k+1)`, `u = (y−1)/(y+1)`, converges
//! fast, and undoes the scaling afterwards.

use std::f64::consts::{FRAC_PI_2, PI};

use tracing::debug;

use super::{balanced_product, Dim, Ultra, MAX_ROOT_DEGREE, SINGULAR_EPS};
use crate::function::{via_exp_ln, Elementary, ExpLn};

const MAX_HALVINGS: u32 = 64;
const MAX_NEWTON_STEPS: usize = 64;
const MAX_SERIES_TERMS: usize = 400;
const NEWTON_TOLERANCE: f64 = 1e-13;
const SERIES_CUTOFF: f64 = 1e-18;
/// `‖y − 1‖₁` under which the series is summed directly.
const SERIES_RADIUS: f64 = 0.5;

impl Ultra {
    /// Each component's exponential in its carrier algebra, embedded back
    /// and multiplied together.
    pub fn exp(&self) -> Ultra {
        let factors = self
            .components()
            .filter(|c| c.dim.is_real() || c.value != 0.0)
            .map(|c| Ultra::embed(c.dim, &c.scalar().exp()))
            .collect();
        balanced_product(factors)
    }

    /// Principal logarithm, up to multiples of 2π along `ⅈ` and `ⅈⅉ`.
    pub fn ln(&self) -> Option<Ultra> {
        if self.is_real() {
            let x = self.real_part();
            return match x {
                x if x > 0.0 => Some(Ultra::real(x.ln())),
                x if x < 0.0 => Some(Ultra::new([(-x).ln(), PI, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])),
                _ => None,
            };
        }
        if !self.is_finite() {
            return None;
        }
        let scale = self.max_abs();
        let y = self.scale(1.0 / scale);
        let (adjugate, n) = y.adjugate();
        let det = y.times(&adjugate).real_part();
        let mean = det.abs().powf(1.0 / f64::from(1u32 << n));
        if !(mean >= SINGULAR_EPS) {
            return None;
        }
        let y = y.scale(1.0 / mean);
        let offset = Ultra::real((scale * mean).ln());

        // An eigencomponent on the negative real axis stalls the square
        // roots; a quarter turn moves it off.
        let rotations = [
            (Ultra::ONE, Ultra::ZERO),
            (Ultra::component(Dim::I, -1.0), Ultra::component(Dim::I, -FRAC_PI_2)),
            (Ultra::unit(Dim::I), Ultra::component(Dim::I, FRAC_PI_2)),
        ];
        for (rotation, rotation_ln) in rotations {
            if let Some(ln) = unit_ln(&y.times(&rotation)) {
                return Some(offset.plus(&ln).minus(&rotation_ln));
            }
            debug!(value = %self, rotation = %rotation, "ln retrying with rotated argument");
        }
        None
    }

    /// Power with any exponent: integers by repeated squaring, everything
    /// else as `exp(b·ln a)`.
    pub fn pow(&self, exponent: &Ultra) -> Option<Ultra> {
        if let Some(n) = exponent.as_integer() {
            return self.pow_int(n);
        }
        if self.is_zero() {
            return (exponent.real_part() > 0.0).then_some(Ultra::ZERO);
        }
        let out = self.ln()?.times(exponent).exp();
        out.is_finite().then_some(out)
    }

    pub fn pow_int(&self, n: i32) -> Option<Ultra> {
        let base = if n < 0 { self.inverse()? } else { *self };
        let mut e = n.unsigned_abs();
        let mut square = base;
        let mut out = Ultra::ONE;
        while e > 0 {
            if e & 1 == 1 {
                out = out.times(&square);
            }
            e >>= 1;
            if e > 0 {
                square = square.times(&square);
            }
        }
        out.is_finite().then_some(out)
    }

    pub fn sqrt(&self) -> Option<Ultra> {
        if self.is_zero() {
            return Some(Ultra::ZERO);
        }
        Some(self.ln()?.scale(0.5).exp())
    }

    /// Logarithm of `self` to `base`.
    pub fn log(&self, base: &Ultra) -> Option<Ultra> {
        self.ln()?.by(&base.ln()?)
    }

    /// The `n²` values whose `n`-th power is `self`: one per pair of
    /// branches of the two complex eigencomponents. `None` for a degree
    /// outside `1..=MAX_ROOT_DEGREE`.
    pub fn roots(&self, n: u32) -> Option<Vec<Ultra>> {
        if n == 0 || n > MAX_ROOT_DEGREE {
            return None;
        }
        let degree = usize::try_from(n).ok()?;
        let count = degree.checked_mul(degree)?;
        if self.is_zero() {
            return Some(vec![Ultra::ZERO]);
        }
        let ln = self.ln()?;
        let k = 1.0 / f64::from(n);
        let mut roots = Vec::with_capacity(count);
        for k1 in 0..n {
            for k2 in 0..n {
                let turn = Ultra::component(Dim::I, PI * f64::from(k1 + k2))
                    .plus(&Ultra::component(Dim::IJ, PI * (f64::from(k1) - f64::from(k2))));
                roots.push(ln.plus(&turn).scale(k).exp());
            }
        }
        Some(roots)
    }

    pub fn elementary(&self, f: Elementary) -> Option<Ultra> {
        // Exactly real while the real function is defined.
        if self.is_real() {
            let y = f.real(self.real_part());
            if y.is_finite() {
                return Some(Ultra::real(y));
            }
        }
        via_exp_ln(f, *self).filter(Ultra::is_finite)
    }
}

/// `ln y` for `y` of unit geometric-mean magnitude. `None` when a square
/// root does not converge.
fn unit_ln(y: &Ultra) -> Option<Ultra> {
    let mut y = *y;
    let mut halvings = 0;
    while y.minus(&Ultra::ONE).l1_norm() > SERIES_RADIUS {
        if halvings == MAX_HALVINGS {
            return None;
        }
        y = newton_sqrt(&y)?;
        halvings += 1;
    }
    let u = y.minus(&Ultra::ONE).by(&y.plus(&Ultra::ONE))?;
    let u2 = u.times(&u);
    let mut power = u;
    let mut sum = Ultra::ZERO;
    for k in 0..MAX_SERIES_TERMS {
        let term = power.scale(1.0 / (2 * k + 1) as f64);
        sum = sum.plus(&term);
        if term.l1_norm() < SERIES_CUTOFF {
            break;
        }
        power = power.times(&u2);
    }
    Some(sum.scale(2f64.powi(halvings as i32 + 1)))
}

/// Principal square root by Newton's iteration from 1.
fn newton_sqrt(y: &Ultra) -> Option<Ultra> {
    let mut s = Ultra::ONE;
    for _ in 0..MAX_NEWTON_STEPS {
        let next = s.plus(&y.times(&s.inverse()?)).scale(0.5);
        let delta = next.minus(&s).l1_norm();
        s = next;
        if delta <= NEWTON_TOLERANCE * s.l1_norm() {
            return Some(s);
        }
    }
    None
}

impl ExpLn for Ultra {
    fn one() -> Self {
        Ultra::ONE
    }

    fn rotation_unit() -> Self {
        Ultra::unit(Dim::I)
    }

    fn add(self, rhs: Self) -> Self {
        self.plus(&rhs)
    }

    fn sub(self, rhs: Self) -> Self {
        self.minus(&rhs)
    }

    fn mul(self, rhs: Self) -> Self {
        self.times(&rhs)
    }

    fn scale(self, k: f64) -> Self {
        Ultra::scale(&self, k)
    }

    fn div(self, rhs: Self) -> Option<Self> {
        self.by(&rhs)
    }

    fn exp(self) -> Self {
        Ultra::exp(&self)
    }

    fn ln(self) -> Option<Self> {
        Ultra::ln(&self)
    }

    fn sqrt(self) -> Option<Self> {
        Ultra::sqrt(&self)
    }
}
