use std::f64::consts::PI;

use super::{Kind, Scalar};
use crate::function::{via_exp_ln, Elementary};

pub(super) fn ln(z: Scalar) -> Option<Scalar> {
    if z.is_zero() {
        return None;
    }
    Some(Scalar::complex(z.length().ln(), z.angle()))
}

pub(super) fn sqrt(z: Scalar) -> Scalar {
    if z.is_zero() {
        return Scalar::ZERO;
    }
    let t = ((z.length() + z.re.abs()) / 2.0).sqrt();
    if z.re >= 0.0 {
        Scalar::complex(t, z.im / (2.0 * t))
    } else if z.im < 0.0 {
        Scalar::complex(z.im.abs() / (2.0 * t), -t)
    } else {
        Scalar::complex(z.im.abs() / (2.0 * t), t)
    }
}

pub(super) fn pow(base: Scalar, exponent: Scalar) -> Option<Scalar> {
    if base.is_zero() {
        return (exponent.re > 0.0).then_some(Scalar::ZERO);
    }
    if exponent.is_real() {
        let a = exponent.re;
        return Some(Scalar::from_polar(
            Kind::Complex,
            base.length().powf(a),
            a * base.angle(),
        ));
    }
    let ln = ln(base)?;
    Some(ln.mul_same(exponent).exp())
}

pub(super) fn roots(z: Scalar, n: u32) -> Vec<Scalar> {
    let r = z.length().powf(1.0 / n as f64);
    let phi = z.angle();
    (0..n)
        .map(|k| Scalar::from_polar(Kind::Complex, r, (phi + 2.0 * PI * k as f64) / n as f64))
        .collect()
}

pub(super) fn elementary(z: Scalar, f: Elementary) -> Option<Scalar> {
    // Stay exactly real while the real function is defined.
    if z.is_real() {
        let y = f.real(z.re);
        if y.is_finite() {
            return Some(Scalar::real(y));
        }
    }
    let (a, b) = (z.re, z.im);
    let sin = || Scalar::complex(a.sin() * b.cosh(), a.cos() * b.sinh());
    let cos = || Scalar::complex(a.cos() * b.cosh(), -a.sin() * b.sinh());
    let sinh = || Scalar::complex(a.sinh() * b.cos(), a.cosh() * b.sin());
    let cosh = || Scalar::complex(a.cosh() * b.cos(), a.sinh() * b.sin());
    match f {
        Elementary::Sin => Some(sin()),
        Elementary::Cos => Some(cos()),
        Elementary::Tan => sin().by(&cos()),
        Elementary::Cot => cos().by(&sin()),
        Elementary::Sec => cos().inverse(),
        Elementary::Csc => sin().inverse(),
        Elementary::Sinh => Some(sinh()),
        Elementary::Cosh => Some(cosh()),
        Elementary::Tanh => sinh().by(&cosh()),
        Elementary::Coth => cosh().by(&sinh()),
        Elementary::Sech => cosh().inverse(),
        Elementary::Csch => sinh().inverse(),
        _ => via_exp_ln(f, z),
    }
}
