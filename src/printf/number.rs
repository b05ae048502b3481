//! Numeric conversions (`d i u o x X` and `f F e E g G`)
//!
//! Each function returns a `Formatted` split into sign, prefix and body so
//! the caller can place zero padding between prefix and digits. Runs of
//! precision zeros are kept as counts, never materialized here.

use super::directive::Flags;
use crate::constants::{DEFAULT_FLOAT_PRECISION, EXACT_FLOAT_DIGITS};

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Formatted {
    pub sign: &'static str,
    pub prefix: &'static str,
    /// Zeros before `digits` (integer precision)
    pub leading_zeros: usize,
    pub digits: String,
    /// Zeros after `digits` (fraction digits past `EXACT_FLOAT_DIGITS`)
    pub trailing_zeros: usize,
    /// `e+03` style suffix
    pub exponent: String,
    /// `0` flag may pad this value
    pub zero_pad: bool,
}

impl Formatted {
    pub fn len(&self) -> usize {
        (self.sign.len() + self.prefix.len() + self.digits.len() + self.exponent.len())
            .saturating_add(self.leading_zeros)
            .saturating_add(self.trailing_zeros)
    }
}

fn sign_of(negative: bool, flags: Flags) -> &'static str {
    if negative {
        "-"
    } else if flags.plus {
        "+"
    } else if flags.space {
        " "
    } else {
        ""
    }
}

/// Apply integer precision: minimum digit count, `.0` with zero prints nothing
///
/// Returns the number of zeros to put in front of the digits.
fn with_precision(digits: String, precision: Option<usize>) -> (usize, String) {
    match precision {
        Some(0) if digits == "0" => (0, String::new()),
        Some(p) => (p.saturating_sub(digits.len()), digits),
        None => (0, digits),
    }
}

/// `%d` / `%i`
pub(crate) fn signed(value: i64, flags: Flags, precision: Option<usize>) -> Formatted {
    let (leading_zeros, digits) = with_precision(value.unsigned_abs().to_string(), precision);
    Formatted {
        sign: sign_of(value < 0, flags),
        leading_zeros,
        digits,
        zero_pad: precision.is_none(),
        ..Formatted::default()
    }
}

/// `%u`, `%o`, `%x`, `%X`
pub(crate) fn unsigned(
    value: u64,
    conversion: char,
    flags: Flags,
    precision: Option<usize>,
) -> Formatted {
    let raw = match conversion {
        'o' => format!("{:o}", value),
        'x' => format!("{:x}", value),
        'X' => format!("{:X}", value),
        _ => value.to_string(),
    };
    let (leading_zeros, mut digits) = with_precision(raw, precision);

    let prefix = match conversion {
        'o' if flags.alt && leading_zeros == 0 && !digits.starts_with('0') => {
            digits.insert(0, '0');
            ""
        }
        'x' if flags.alt && value != 0 => "0x",
        'X' if flags.alt && value != 0 => "0X",
        _ => "",
    };

    Formatted {
        prefix,
        leading_zeros,
        digits,
        zero_pad: precision.is_none(),
        ..Formatted::default()
    }
}

/// `%f %F %e %E %g %G`
pub(crate) fn float(
    value: f64,
    conversion: char,
    flags: Flags,
    precision: Option<usize>,
) -> Formatted {
    let upper = conversion.is_ascii_uppercase();
    let sign = sign_of(value.is_sign_negative(), flags);

    if !value.is_finite() {
        let text = match (value.is_nan(), upper) {
            (true, false) => "nan",
            (true, true) => "NAN",
            (false, false) => "inf",
            (false, true) => "INF",
        };
        return Formatted {
            sign,
            digits: text.to_string(),
            ..Formatted::default()
        };
    }

    let magnitude = value.abs();
    let precision = precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
    let mut formatted = match conversion.to_ascii_lowercase() {
        'f' => fixed(magnitude, precision, flags.alt),
        'e' => exponent(magnitude, precision, flags.alt),
        _ => general(magnitude, precision, flags.alt),
    };

    if upper {
        formatted.digits.make_ascii_uppercase();
        formatted.exponent.make_ascii_uppercase();
    }
    formatted.sign = sign;
    formatted.zero_pad = true;
    formatted
}

/// Split a fraction digit count into the part worth formatting and the
/// zeros that follow it
fn split_precision(precision: usize) -> (usize, usize) {
    let exact = precision.min(EXACT_FLOAT_DIGITS);
    (exact, precision - exact)
}

fn fixed(magnitude: f64, precision: usize, alt: bool) -> Formatted {
    let (exact, extra) = split_precision(precision);
    let mut digits = format!("{:.*}", exact, magnitude);
    if alt && precision == 0 {
        digits.push('.');
    }
    Formatted {
        digits,
        trailing_zeros: extra,
        ..Formatted::default()
    }
}

/// Split Rust's `{:e}` output into mantissa and decimal exponent
fn split_exponent(magnitude: f64, precision: usize) -> (String, i32) {
    let text = format!("{:.*e}", precision, magnitude);
    match text.split_once('e') {
        Some((mantissa, exp)) => (mantissa.to_string(), exp.parse().unwrap_or(0)),
        None => (text, 0),
    }
}

fn exponent_suffix(exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("e{}{:02}", sign, exp.unsigned_abs())
}

fn exponent(magnitude: f64, precision: usize, alt: bool) -> Formatted {
    let (exact, extra) = split_precision(precision);
    let (mut mantissa, exp) = split_exponent(magnitude, exact);
    if alt && precision == 0 {
        mantissa.push('.');
    }
    Formatted {
        digits: mantissa,
        trailing_zeros: extra,
        exponent: exponent_suffix(exp),
        ..Formatted::default()
    }
}

fn strip_fraction_zeros(text: &mut String) {
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
}

/// `#` keeps the point and every zero; otherwise trailing zeros go
fn general_fraction(digits: &mut String, extra: usize, alt: bool) -> usize {
    if alt {
        if !digits.contains('.') {
            digits.push('.');
        }
        extra
    } else {
        strip_fraction_zeros(digits);
        0
    }
}

/// `%g`: shortest of `%e`/`%f` style per the C rules, trailing zeros removed
fn general(magnitude: f64, precision: usize, alt: bool) -> Formatted {
    let p = precision.max(1);
    let (_, exp) = split_exponent(magnitude, (p - 1).min(EXACT_FLOAT_DIGITS));

    let x = i64::from(exp);
    let wide = i64::try_from(p).unwrap_or(i64::MAX);
    if wide > x && x >= -4 {
        let (exact, extra) = split_precision((wide - 1 - x) as usize);
        let mut digits = format!("{:.*}", exact, magnitude);
        let trailing_zeros = general_fraction(&mut digits, extra, alt);
        Formatted {
            digits,
            trailing_zeros,
            ..Formatted::default()
        }
    } else {
        let (exact, extra) = split_precision(p - 1);
        let (mut mantissa, exp) = split_exponent(magnitude, exact);
        let trailing_zeros = general_fraction(&mut mantissa, extra, alt);
        Formatted {
            digits: mantissa,
            trailing_zeros,
            exponent: exponent_suffix(exp),
            ..Formatted::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> Flags {
        Flags::default()
    }

    fn text(f: Formatted) -> String {
        format!(
            "{}{}{}{}{}{}",
            f.sign,
            f.prefix,
            "0".repeat(f.leading_zeros),
            f.digits,
            "0".repeat(f.trailing_zeros),
            f.exponent
        )
    }

    #[test]
    fn test_signed_basic() {
        assert_eq!(text(signed(-42, flags(), None)), "-42");
        assert_eq!(text(signed(7, Flags { plus: true, ..flags() }, None)), "+7");
        assert_eq!(text(signed(7, Flags { space: true, ..flags() }, None)), " 7");
    }

    #[test]
    fn test_signed_min_value() {
        assert_eq!(text(signed(i64::MIN, flags(), None)), i64::MIN.to_string());
    }

    #[test]
    fn test_integer_precision() {
        assert_eq!(text(signed(5, flags(), Some(3))), "005");
        assert_eq!(text(signed(0, flags(), Some(0))), "");
        assert!(!signed(5, flags(), Some(3)).zero_pad);
    }

    #[test]
    fn test_unsigned_radixes() {
        assert_eq!(text(unsigned(255, 'x', flags(), None)), "ff");
        assert_eq!(text(unsigned(255, 'X', flags(), None)), "FF");
        assert_eq!(text(unsigned(8, 'o', flags(), None)), "10");
        assert_eq!(text(unsigned(8, 'u', flags(), None)), "8");
    }

    #[test]
    fn test_alternate_forms() {
        let alt = Flags { alt: true, ..flags() };
        assert_eq!(text(unsigned(255, 'x', alt, None)), "0xff");
        assert_eq!(text(unsigned(0, 'x', alt, None)), "0");
        assert_eq!(text(unsigned(8, 'o', alt, None)), "010");
        assert_eq!(text(unsigned(0, 'o', alt, Some(0))), "0");
    }

    #[test]
    fn test_fixed() {
        assert_eq!(text(float(3.14159, 'f', flags(), None)), "3.141590");
        assert_eq!(text(float(2.5, 'f', flags(), Some(0))), "2");
        assert_eq!(text(float(-0.0, 'f', flags(), Some(1))), "-0.0");
        assert_eq!(
            text(float(3.0, 'f', Flags { alt: true, ..flags() }, Some(0))),
            "3."
        );
    }

    #[test]
    fn test_exponent() {
        assert_eq!(text(float(1234.5, 'e', flags(), None)), "1.234500e+03");
        assert_eq!(text(float(0.00012, 'E', flags(), Some(2))), "1.20E-04");
        assert_eq!(text(float(0.0, 'e', flags(), None)), "0.000000e+00");
    }

    #[test]
    fn test_general() {
        assert_eq!(text(float(100000.0, 'g', flags(), None)), "100000");
        assert_eq!(text(float(1000000.0, 'g', flags(), None)), "1e+06");
        assert_eq!(text(float(0.0001, 'g', flags(), None)), "0.0001");
        assert_eq!(text(float(0.00001, 'g', flags(), None)), "1e-05");
        assert_eq!(text(float(1.5, 'g', flags(), None)), "1.5");
        assert_eq!(text(float(0.0, 'g', flags(), None)), "0");
        assert_eq!(text(float(123.456, 'G', flags(), Some(2))), "1.2E+02");
    }

    #[test]
    fn test_precision_zeros_are_counted() {
        let f = signed(5, flags(), Some(crate::constants::MAX_COUNT));
        assert_eq!(f.leading_zeros, crate::constants::MAX_COUNT - 1);
        assert_eq!(f.digits, "5");
        assert_eq!(f.len(), crate::constants::MAX_COUNT);
    }

    #[test]
    fn test_octal_alt_with_precision() {
        let alt = Flags { alt: true, ..flags() };
        assert_eq!(text(unsigned(8, 'o', alt, Some(4))), "0010");
    }

    #[test]
    fn test_fraction_past_exact_digits() {
        let f = float(0.25, 'f', flags(), Some(70_000));
        assert_eq!(f.digits.len(), 2 + EXACT_FLOAT_DIGITS);
        assert!(f.digits.starts_with("0.25000"));
        assert_eq!(f.trailing_zeros, 70_000 - EXACT_FLOAT_DIGITS);

        let f = float(1.5, 'E', flags(), Some(70_000));
        assert_eq!(f.exponent, "E+00");
        assert_eq!(f.len(), 70_006);
    }

    #[test]
    fn test_general_past_exact_digits() {
        assert_eq!(text(float(1.5, 'g', flags(), Some(70_000))), "1.5");
        assert_eq!(text(float(1e300, 'g', flags(), Some(70_000))).len(), 301);

        let alt = Flags { alt: true, ..flags() };
        let f = float(2.0, 'g', alt, Some(70_000));
        assert_eq!(f.len(), 70_001);
        assert!(f.exponent.is_empty());
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(text(float(f64::INFINITY, 'f', flags(), None)), "inf");
        assert_eq!(text(float(f64::NEG_INFINITY, 'F', flags(), None)), "-INF");
        assert!(!float(f64::NAN, 'g', flags(), None).zero_pad);
    }
}
