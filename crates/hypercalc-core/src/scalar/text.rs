use std::fmt;
use std::str::FromStr;

use super::{Kind, Scalar};
use crate::error::{CalcError, CalcResult};
use crate::literal::{format_real, is_exponent_sign, parse_real};

/// Writes `coefficient·unit` as a signed term: `ⅈ`, `-ⅈ`, `2.5ⅈ`.
/// `leading` suppresses the `+` of a positive first term.
pub(crate) fn write_term(
    out: &mut String,
    coefficient: f64,
    unit: &str,
    leading: bool,
    digits: Option<usize>,
) {
    let number = format_real(coefficient.abs(), digits);
    if coefficient < 0.0 && number != "0" {
        out.push('-');
    } else if !leading {
        out.push('+');
    }
    if number != "1" || unit.is_empty() {
        out.push_str(&number);
    }
    out.push_str(unit);
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = f.precision();
        let re = format_real(self.re, digits);
        let im = format_real(self.im, digits);
        let mut out = String::new();
        if im == "0" {
            out.push_str(&re);
        } else {
            let unit = self.kind.unit_char().to_string();
            if re != "0" {
                out.push_str(&re);
            }
            write_term(&mut out, self.im, &unit, re == "0", digits);
        }
        f.write_str(&out)
    }
}

/// Index of the sign separating the real and imaginary parts: the last
/// `+`/`-` that is neither leading nor an exponent sign.
pub(crate) fn split_point(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    (1..bytes.len()).rev().find(|&i| {
        matches!(bytes[i], b'+' | b'-') && !is_exponent_sign(bytes, i)
    })
}

/// Coefficient text in front of a unit: empty or a bare sign means ±1.
pub(crate) fn parse_coefficient(text: &str) -> CalcResult<f64> {
    match text.trim() {
        "" | "+" => Ok(1.0),
        "-" => Ok(-1.0),
        t => parse_real(t.strip_prefix('+').unwrap_or(t)),
    }
}

impl FromStr for Scalar {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Scalar> {
        let text = s.trim();
        let Some(last) = text.chars().last() else {
            return Err(CalcError::literal(s, "empty literal"));
        };
        let Some(kind) = Kind::from_unit_char(last) else {
            return Ok(Scalar::real(parse_real(text)?));
        };
        let body = &text[..text.len() - last.len_utf8()];
        let (re, im) = match split_point(body) {
            Some(i) => (parse_real(&body[..i])?, parse_coefficient(&body[i..])?),
            None => (0.0, parse_coefficient(body)?),
        };
        Ok(Scalar::new(kind, re, im))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Scalar::ZERO.to_string(), "0");
        assert_eq!(Scalar::real(-2.5).to_string(), "-2.5");
        assert_eq!(Scalar::I.to_string(), "ⅈ");
        assert_eq!(Scalar::complex(0.0, -1.0).to_string(), "-ⅈ");
        assert_eq!(Scalar::complex(0.0, 2.0).to_string(), "2ⅈ");
        assert_eq!(Scalar::complex(1.0, 2.0).to_string(), "1+2ⅈ");
        assert_eq!(Scalar::binary(1.0, -1.0).to_string(), "1-ⅉ");
        assert_eq!(Scalar::dual(0.5, 3.0).to_string(), "0.5+3ε");
        assert_eq!(Scalar::complex(-0.0, 0.0).to_string(), "0");
    }

    #[test]
    fn test_display_precision() {
        let z = Scalar::complex(1.0 / 3.0, -2.0 / 3.0);
        assert_eq!(format!("{z:.3}"), "0.333-0.667ⅈ");
        let tiny = Scalar::complex(2.0, 1e-12);
        assert_eq!(format!("{tiny:.6}"), "2");
    }

    #[test]
    fn test_parse() {
        assert_eq!("3".parse::<Scalar>().unwrap(), Scalar::real(3.0));
        assert_eq!("ⅈ".parse::<Scalar>().unwrap(), Scalar::I);
        assert_eq!("-ⅈ".parse::<Scalar>().unwrap(), Scalar::complex(0.0, -1.0));
        assert_eq!("1-ⅉ".parse::<Scalar>().unwrap(), Scalar::binary(1.0, -1.0));
        assert_eq!("1e-3+2e+1ε".parse::<Scalar>().unwrap(), Scalar::dual(0.001, 20.0));
        assert_eq!("-pi+ⅈ".parse::<Scalar>().unwrap(), Scalar::complex(-std::f64::consts::PI, 1.0));
    }

    #[test]
    fn test_parse_errors_carry_text() {
        let err = "1+xⅈ".parse::<Scalar>().unwrap_err();
        assert!(matches!(err, CalcError::Literal { ref text, .. } if text == "x"));
        assert!("".parse::<Scalar>().is_err());
        assert!("1+2".parse::<Scalar>().is_err());
    }

    #[test]
    fn test_round_trip() {
        for z in [
            Scalar::ZERO,
            Scalar::I,
            Scalar::J,
            Scalar::EPSILON,
            Scalar::complex(1.25, -3.5),
            Scalar::binary(-0.1, 0.2),
            Scalar::dual(7.0, 1e-7),
        ] {
            let back: Scalar = z.to_string().parse().unwrap();
            assert_eq!(back, z, "{z}");
            assert_eq!(back.kind(), z.kind());
        }
    }
}
