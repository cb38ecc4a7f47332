//! Split-complex numbers `x + yⅉ`, `ⅉ² = 1`.
//!
//! With the idempotents `(1 ± ⅉ)/2` every binary number splits into two
//! independent reals `u = x + y` and `v = x − y`, and an analytic `f` acts on
//! each separately. The Euler form `r·d·e^(φⅉ)` covers the four sectors
//! between the light-cone diagonals `|x| = |y|`.

use super::{Kind, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Sector {
    Right,
    Left,
    Upper,
    Lower,
}

impl Sector {
    /// The sector's direction `d` raised to the `n`-th power.
    fn unit_pow(self, n: i32) -> Scalar {
        let even = n % 2 == 0;
        match self {
            Sector::Right => Scalar::binary(1.0, 0.0),
            Sector::Left if even => Scalar::binary(1.0, 0.0),
            Sector::Left => Scalar::binary(-1.0, 0.0),
            Sector::Upper | Sector::Lower if even => Scalar::binary(1.0, 0.0),
            Sector::Upper => Scalar::J,
            Sector::Lower => Scalar::binary(0.0, -1.0),
        }
    }
}

/// `(r, d, φ)` of the Euler form; `None` on the light cone.
pub(super) fn euler(z: Scalar) -> Option<(f64, Sector, f64)> {
    let det = z.det();
    if det > 0.0 {
        let sector = if z.re > 0.0 { Sector::Right } else { Sector::Left };
        Some((det.sqrt(), sector, (z.im / z.re).atanh()))
    } else if det < 0.0 {
        let sector = if z.im > 0.0 { Sector::Upper } else { Sector::Lower };
        Some(((-det).sqrt(), sector, (z.re / z.im).atanh()))
    } else {
        None
    }
}

fn idempotents(z: Scalar) -> (f64, f64) {
    (z.re + z.im, z.re - z.im)
}

fn from_idempotents(u: f64, v: f64) -> Scalar {
    Scalar::binary((u + v) / 2.0, (u - v) / 2.0)
}

/// Applies a real function through the idempotent decomposition.
pub(super) fn lift(z: Scalar, f: impl Fn(f64) -> f64) -> Option<Scalar> {
    let (u, v) = idempotents(z);
    let out = from_idempotents(f(u), f(v));
    out.is_finite().then_some(out)
}

pub(super) fn ln(z: Scalar) -> Option<Scalar> {
    let (u, v) = idempotents(z);
    if u <= 0.0 || v <= 0.0 {
        return None;
    }
    lift(z, f64::ln)
}

pub(super) fn sqrt(z: Scalar) -> Option<Scalar> {
    let (u, v) = idempotents(z);
    if u < 0.0 || v < 0.0 {
        return None;
    }
    lift(z, f64::sqrt)
}

pub(super) fn pow(base: Scalar, exponent: Scalar) -> Option<Scalar> {
    if !exponent.is_real() {
        let ln = ln(base)?;
        return Some(ln.mul_same(exponent).exp());
    }
    let a = exponent.re;
    if base.is_zero() {
        return (a > 0.0).then_some(base);
    }
    match euler(base) {
        Some((r, Sector::Right, phi)) => Some(Scalar::from_euler(Kind::Binary, r.powf(a), a * phi)),
        Some((r, sector, phi)) => {
            let n = exponent.as_integer()?;
            let rotated = Scalar::from_euler(Kind::Binary, r.powi(n), n as f64 * phi);
            let out = sector.unit_pow(n).mul_same(rotated);
            out.is_finite().then_some(out)
        }
        None => {
            let n = exponent.as_integer()?;
            lift(base, |x| x.powi(n))
        }
    }
}

/// Real `n`-th roots of `x`, in ascending order.
fn real_roots(x: f64, n: u32) -> Vec<f64> {
    let n_f = n as f64;
    if n % 2 == 1 {
        vec![x.signum() * x.abs().powf(1.0 / n_f)]
    } else if x > 0.0 {
        let r = x.powf(1.0 / n_f);
        vec![-r, r]
    } else if x == 0.0 {
        vec![0.0]
    } else {
        Vec::new()
    }
}

/// Every combination of real roots of the two idempotent components.
pub(super) fn roots(z: Scalar, n: u32) -> Vec<Scalar> {
    let (u, v) = idempotents(z);
    let us = real_roots(u, n);
    let vs = real_roots(v, n);
    us.iter()
        .flat_map(|&ru| vs.iter().map(move |&rv| from_idempotents(ru, rv)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euler_sectors() {
        let right = euler(Scalar::binary(2.0, 1.0)).unwrap();
        assert_eq!(right.1, Sector::Right);
        assert!((right.0 - 3f64.sqrt()).abs() < 1e-12);
        assert_eq!(euler(Scalar::binary(-2.0, 1.0)).unwrap().1, Sector::Left);
        assert_eq!(euler(Scalar::binary(1.0, 2.0)).unwrap().1, Sector::Upper);
        assert_eq!(euler(Scalar::binary(1.0, -2.0)).unwrap().1, Sector::Lower);
        assert!(euler(Scalar::binary(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_euler_form_reconstructs() {
        for z in [
            Scalar::binary(2.0, 1.0),
            Scalar::binary(-2.0, 1.0),
            Scalar::binary(1.0, 2.0),
            Scalar::binary(0.5, -2.0),
        ] {
            let (r, sector, phi) = euler(z).unwrap();
            let back = sector.unit_pow(1).times(&Scalar::from_euler(Kind::Binary, r, phi));
            assert_eq!(back.unwrap(), z, "{z}");
        }
    }

    #[test]
    fn test_ln_main_sector_only() {
        let z = Scalar::binary(2.0, 1.0);
        assert_eq!(ln(z).unwrap().exp(), z);
        assert!(ln(Scalar::binary(1.0, 2.0)).is_none());
        assert!(ln(Scalar::binary(-2.0, 0.5)).is_none());
        assert!(ln(Scalar::binary(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_pow_sectors() {
        let main = Scalar::binary(2.0, 1.0);
        assert_eq!(pow(main, Scalar::real(0.5)).unwrap(), sqrt(main).unwrap());
        let upper = Scalar::binary(1.0, 2.0);
        let cube = upper.times(&upper).unwrap().times(&upper).unwrap();
        assert_eq!(pow(upper, Scalar::real(3.0)).unwrap(), cube);
        assert!(pow(upper, Scalar::real(0.5)).is_none());
        let left = Scalar::binary(-3.0, 1.0);
        assert_eq!(pow(left, Scalar::real(2.0)).unwrap(), left.times(&left).unwrap());
    }

    #[test]
    fn test_pow_light_cone() {
        let z = Scalar::binary(1.0, 1.0);
        assert_eq!(pow(z, Scalar::real(3.0)).unwrap(), Scalar::binary(4.0, 4.0));
        assert!(pow(z, Scalar::real(-1.0)).is_none());
        assert!(pow(z, Scalar::real(1.5)).is_none());
    }

    #[test]
    fn test_roots_count() {
        // u = 5, v = 3: two square roots each
        let roots = roots(Scalar::binary(4.0, 1.0), 2);
        assert_eq!(roots.len(), 4);
        for r in &roots {
            assert_eq!(r.times(r).unwrap(), Scalar::binary(4.0, 1.0));
        }
        assert!(super::roots(Scalar::binary(1.0, 2.0), 2).is_empty());
        assert_eq!(super::roots(Scalar::binary(1.0, 2.0), 3).len(), 1);
    }

    #[test]
    fn test_lifted_functions() {
        let z = Scalar::binary(0.4, 0.3);
        let s = z.sinh().unwrap();
        assert_eq!(s.asinh().unwrap(), z);
        // cosh² − sinh² = 1 holds in every algebra
        let c = z.cosh().unwrap();
        let one = c.times(&c).unwrap().minus(&s.times(&s).unwrap()).unwrap();
        assert_eq!(one, Scalar::ONE);
    }
}
