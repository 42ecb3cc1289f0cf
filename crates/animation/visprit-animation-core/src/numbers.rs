//! Numeric text helpers shared by the transform, style and spring paths.
//!
//! Keyframe values travel as CSS-like text (`translateY(-10px) scale(1.2)`).
//! The spring path pulls every number out of such a template, integrates
//! them, and writes them back in order, so extraction and replacement must
//! agree on what counts as a number.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+-]?\d+(\.\d+)?").expect("number pattern should compile"));

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(Infinity|\d+\.?\d*(?:[eE][+-]?\d+)?|\.\d+(?:[eE][+-]?\d+)?)")
        .expect("float prefix pattern should compile")
});

/// All numbers in `text`, in order of appearance.
pub fn extract_numbers(text: &str) -> Vec<f64> {
    NUMBER
        .find_iter(text)
        .map(|m| m.as_str().parse::<f64>().unwrap_or(f64::NAN))
        .collect()
}

/// Replace the n-th number in `template` with `values[n]`.
/// Numbers past the end of `values` are left as they are.
pub fn replace_numbers(template: &str, values: &[f64]) -> String {
    let mut index = 0usize;
    NUMBER
        .replace_all(template, |caps: &Captures| {
            let out = match values.get(index) {
                Some(v) => format_number(*v),
                None => caps[0].to_string(),
            };
            index += 1;
            out
        })
        .into_owned()
}

/// Format a number the way CSS text expects it: no exponent, no `-0`,
/// `NaN`/`Infinity` spelled out.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value}")
    }
}

/// Leading-prefix float parse: `"12.5px"` -> 12.5, `"px"` -> NaN.
pub fn parse_float(text: &str) -> f64 {
    match FLOAT_PREFIX.captures(text) {
        Some(caps) => {
            let raw = caps[0].trim();
            if raw.ends_with("Infinity") {
                if raw.starts_with('-') {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }
            } else {
                raw.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        None => f64::NAN,
    }
}

/// Leading-prefix integer parse: `"1,204 visitors"` -> Some(1).
pub fn parse_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| n * sign)
}

/// Round half up (towards positive infinity), as browsers round degrees.
#[inline]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// `max` that propagates NaN instead of ignoring it.
#[inline]
pub fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// `min` that propagates NaN instead of ignoring it.
#[inline]
pub fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_signed_and_decimal_numbers() {
        let nums = extract_numbers("translateY(-10px) scale(1.25) rotateX(+3deg)");
        assert_eq!(nums, vec![-10.0, 1.25, 3.0]);
    }

    #[test]
    fn property_names_carry_no_numbers() {
        assert!(extract_numbers("scaleX skewY rotateX").is_empty());
    }

    #[test]
    fn replaces_in_order_and_keeps_overflow() {
        let out = replace_numbers("inset(0 0 0 0)", &[12.5, -3.0]);
        assert_eq!(out, "inset(12.5 -3 0 0)");
    }

    #[test]
    fn formats_like_css_text() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.6), "0.6");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn parse_float_reads_leading_prefix() {
        assert_eq!(parse_float("12.5px"), 12.5);
        assert_eq!(parse_float("  -4"), -4.0);
        assert_eq!(parse_float("40%"), 40.0);
        assert!(parse_float("px").is_nan());
        assert!(parse_float("").is_nan());
    }

    #[test]
    fn parse_int_reads_leading_digits() {
        assert_eq!(parse_int("1204 visitors"), Some(1204));
        assert_eq!(parse_int("-7"), Some(-7));
        assert_eq!(parse_int("visitors"), None);
    }

    #[test]
    fn round_half_up_matches_browser_rounding() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }
}
