//! Serving scaling
//!
//! Scales ingredient amounts linearly with the serving count and applies the
//! single display rounding rule shared by every render path.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An ingredient amount as stored: a number, or free text such as "1/2" or
/// "a pinch"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    /// Numeric value, parsing text if it holds a finite number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawAmount::Number(n) if n.is_finite() => Some(*n),
            RawAmount::Number(_) => None,
            RawAmount::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

impl From<f64> for RawAmount {
    fn from(n: f64) -> Self {
        RawAmount::Number(n)
    }
}

impl From<&str> for RawAmount {
    fn from(s: &str) -> Self {
        RawAmount::Text(s.to_string())
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAmount::Number(n) => f.write_str(&format_amount(*n)),
            RawAmount::Text(s) => f.write_str(s),
        }
    }
}

/// Round for display: whole numbers stay whole, everything else gets one
/// decimal place
pub fn round_display(value: f64) -> f64 {
    if value.fract() == 0.0 {
        value
    } else {
        (value * 10.0).round() / 10.0
    }
}

/// Format an amount with the display rounding rule (`150`, `133.3`)
pub fn format_amount(value: f64) -> String {
    let rounded = round_display(value);
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

/// Scale an amount from `original_servings` to `current_servings`
///
/// Never fails. Missing amounts, a zero original serving count, and amounts
/// that are not usable numbers are handed back unchanged, as is the input
/// when the scaled value would overflow.
///
/// Numeric text such as `"100"` always comes back as a number, so with equal
/// serving counts `Text("100")` becomes `Number(100.0)`.
///
/// # Examples
/// - `scale(Some(&100.0.into()), 4, 6)` -> `Some(Number(150.0))`
/// - `scale(Some(&100.0.into()), 3, 4)` -> `Some(Number(133.3))`
/// - `scale(Some(&"abc".into()), 4, 6)` -> `Some(Text("abc"))`
pub fn scale(
    amount: Option<&RawAmount>,
    original_servings: u32,
    current_servings: u32,
) -> Option<RawAmount> {
    let amount = amount?;

    if original_servings == 0 {
        return Some(amount.clone());
    }

    let value = match amount.as_number() {
        Some(v) if v >= 0.0 => v,
        _ => {
            tracing::debug!("Amount '{}' is not scalable, passing through", amount);
            return Some(amount.clone());
        }
    };

    let scaled = value * f64::from(current_servings) / f64::from(original_servings);
    if !scaled.is_finite() {
        tracing::debug!("Scaling '{}' overflowed, passing through", amount);
        return Some(amount.clone());
    }
    Some(RawAmount::Number(round_display(scaled)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> RawAmount {
        RawAmount::Number(n)
    }

    #[test]
    fn test_identity_when_servings_unchanged() {
        assert_eq!(scale(Some(&num(200.0)), 4, 4), Some(num(200.0)));
        assert_eq!(scale(Some(&num(0.5)), 2, 2), Some(num(0.5)));
    }

    #[test]
    fn test_whole_result_stays_whole() {
        assert_eq!(scale(Some(&num(100.0)), 4, 6), Some(num(150.0)));
        assert_eq!(scale(Some(&num(200.0)), 4, 8), Some(num(400.0)));
    }

    #[test]
    fn test_fractional_result_gets_one_decimal() {
        assert_eq!(scale(Some(&num(100.0)), 3, 4), Some(num(133.3)));
        assert_eq!(scale(Some(&num(1.0)), 3, 1), Some(num(0.3)));
    }

    #[test]
    fn test_missing_amount_passes_through() {
        assert_eq!(scale(None, 4, 6), None);
    }

    #[test]
    fn test_unparseable_text_passes_through() {
        let text = RawAmount::from("abc");
        assert_eq!(scale(Some(&text), 4, 6), Some(text));
    }

    #[test]
    fn test_numeric_text_is_scaled() {
        let text = RawAmount::from(" 100 ");
        assert_eq!(scale(Some(&text), 4, 6), Some(num(150.0)));
    }

    #[test]
    fn test_zero_original_servings_passes_through() {
        assert_eq!(scale(Some(&num(100.0)), 0, 6), Some(num(100.0)));
    }

    #[test]
    fn test_negative_and_non_finite_pass_through() {
        assert_eq!(scale(Some(&num(-5.0)), 2, 4), Some(num(-5.0)));
        let nan = scale(Some(&num(f64::NAN)), 2, 4);
        assert!(matches!(nan, Some(RawAmount::Number(n)) if n.is_nan()));
        let inf_text = RawAmount::from("inf");
        assert_eq!(scale(Some(&inf_text), 2, 4), Some(inf_text));
    }

    #[test]
    fn test_overflowing_scale_passes_through() {
        assert_eq!(scale(Some(&num(1e308)), 1, 10), Some(num(1e308)));
        let text = RawAmount::from("1e308");
        assert_eq!(scale(Some(&text), 1, 10), Some(text));
    }

    #[test]
    fn test_numeric_text_becomes_number_when_unchanged() {
        assert_eq!(scale(Some(&RawAmount::from("100")), 4, 4), Some(num(100.0)));
    }

    #[test]
    fn test_scale_to_zero_servings() {
        assert_eq!(scale(Some(&num(100.0)), 4, 0), Some(num(0.0)));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(150.0), "150");
        assert_eq!(format_amount(133.333), "133.3");
        assert_eq!(format_amount(13.5256), "13.5");
        assert_eq!(format_amount(2.96), "3");
        assert_eq!(format_amount(0.04), "0");
    }

    #[test]
    fn test_raw_amount_deserializes_number_or_text() {
        let amounts: Vec<Option<RawAmount>> =
            serde_json::from_str(r#"[200, 1.5, "a pinch", null]"#).unwrap();
        assert_eq!(
            amounts,
            vec![
                Some(num(200.0)),
                Some(num(1.5)),
                Some(RawAmount::from("a pinch")),
                None,
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(num(133.333).to_string(), "133.3");
        assert_eq!(RawAmount::from("1/2").to_string(), "1/2");
    }
}
