//! Dual numbers `a + bε`, `ε² = 0`. Every function reduces to its
//! first-order expansion `f(a + bε) = f(a) + b·f'(a)·ε`.

use super::Scalar;

pub(super) fn lift(
    z: Scalar,
    f: impl Fn(f64) -> f64,
    df: impl Fn(f64) -> f64,
) -> Option<Scalar> {
    let value = f(z.re);
    let slope = if z.im == 0.0 { 0.0 } else { z.im * df(z.re) };
    let out = Scalar::dual(value, slope);
    out.is_finite().then_some(out)
}

pub(super) fn ln(z: Scalar) -> Option<Scalar> {
    (z.re > 0.0).then(|| Scalar::dual(z.re.ln(), z.im / z.re))
}

pub(super) fn sqrt(z: Scalar) -> Option<Scalar> {
    if z.re > 0.0 {
        let root = z.re.sqrt();
        Some(Scalar::dual(root, z.im / (2.0 * root)))
    } else if z.is_zero() {
        Some(z)
    } else {
        None
    }
}

pub(super) fn pow(base: Scalar, exponent: Scalar) -> Option<Scalar> {
    if base.re > 0.0 {
        return Some(ln(base)?.mul_same(exponent).exp());
    }
    if base.is_zero() && exponent.is_real() && exponent.re > 0.0 {
        return Some(base);
    }
    let n = exponent.as_integer()?;
    if base.re == 0.0 && n < 0 {
        return None;
    }
    let a = base.re;
    let slope = if n == 0 { 0.0 } else { n as f64 * a.powi(n - 1) * base.im };
    let out = Scalar::dual(a.powi(n), slope);
    out.is_finite().then_some(out)
}

/// `w + b/(n·w^(n−1))·ε` for every real root `w` of the real part.
pub(super) fn roots(z: Scalar, n: u32) -> Vec<Scalar> {
    let (a, b) = (z.re, z.im);
    if a == 0.0 {
        return if b == 0.0 { vec![z] } else { Vec::new() };
    }
    let n_f = n as f64;
    let ws = if n % 2 == 1 {
        vec![a.signum() * a.abs().powf(1.0 / n_f)]
    } else if a > 0.0 {
        let w = a.powf(1.0 / n_f);
        vec![w, -w]
    } else {
        Vec::new()
    };
    ws.into_iter()
        .map(|w| Scalar::dual(w, b / (n_f * w.powi(n as i32 - 1))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_order_expansion() {
        let z = Scalar::dual(0.5, 2.0);
        let s = z.sin().unwrap();
        assert_eq!(s, Scalar::dual(0.5f64.sin(), 2.0 * 0.5f64.cos()));
        assert_eq!(z.exp(), Scalar::dual(0.5f64.exp(), 2.0 * 0.5f64.exp()));
    }

    #[test]
    fn test_ln_needs_positive_real_part() {
        assert_eq!(ln(Scalar::dual(2.0, 4.0)).unwrap(), Scalar::dual(2f64.ln(), 2.0));
        assert!(ln(Scalar::dual(0.0, 1.0)).is_none());
        assert!(ln(Scalar::dual(-1.0, 1.0)).is_none());
    }

    #[test]
    fn test_pow() {
        let z = Scalar::dual(4.0, 1.0);
        assert_eq!(pow(z, Scalar::real(0.5)).unwrap(), Scalar::dual(2.0, 0.25));
        let neg = Scalar::dual(-2.0, 1.0);
        assert_eq!(pow(neg, Scalar::real(3.0)).unwrap(), Scalar::dual(-8.0, 12.0));
        assert!(pow(neg, Scalar::real(0.5)).is_none());
        assert_eq!(pow(Scalar::EPSILON, Scalar::real(2.0)).unwrap(), Scalar::ZERO);
        assert_eq!(pow(Scalar::EPSILON, Scalar::real(1.0)).unwrap(), Scalar::EPSILON);
        assert!(pow(Scalar::EPSILON, Scalar::real(-1.0)).is_none());
    }

    #[test]
    fn test_roots() {
        let z = Scalar::dual(9.0, 3.0);
        let roots = roots(z, 2);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0], Scalar::dual(3.0, 0.5));
        for r in &roots {
            assert_eq!(r.times(r).unwrap(), z);
        }
        assert!(super::roots(Scalar::EPSILON, 3).is_empty());
    }

    #[test]
    fn test_euler_form() {
        let z = Scalar::dual(2.0, 3.0);
        assert_eq!(z.euler_length(), Some(2.0));
        assert_eq!(z.euler_angle(), Some(1.5));
        assert_eq!(Scalar::from_euler(crate::scalar::Kind::Dual, 2.0, 1.5), z);
        assert!(Scalar::EPSILON.euler_angle().is_none());
    }
}
