//! Unit conversion and amount rendering
//!
//! Converts quantities across measurement systems according to the caller's
//! display preference and produces the final display string.

use serde::Serialize;

use super::scaling::{format_amount, round_display, RawAmount};
use super::units::{conversion_factor, Unit};

/// Convert `amount` from one unit to another
///
/// Returns None if the pair is not in the conversion table.
pub fn convert(amount: f64, from: Unit, to: Unit) -> Option<f64> {
    conversion_factor(from, to).map(|factor| amount * factor)
}

/// Convert using unit strings; unknown units yield None
pub fn convert_str(amount: f64, from: &str, to: &str) -> Option<f64> {
    convert(amount, Unit::parse(from)?, Unit::parse(to)?)
}

/// Whether a unit should be switched to its counterpart for this preference
///
/// With alternative units on, metric units are shown as imperial; with them
/// off, imperial units are shown as metric. Count-style and unknown units are
/// never switched.
pub fn should_convert(unit: Unit, show_alternative: bool) -> bool {
    (show_alternative && unit.is_metric()) || (!show_alternative && unit.is_imperial())
}

/// A rendered amount with the pieces that went into the display string
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedAmount {
    pub amount: Option<RawAmount>,
    pub unit: Option<String>,
    pub converted: bool,
    pub display: String,
}

impl RenderedAmount {
    fn unconverted(amount: Option<&RawAmount>, unit: Option<&str>, display: String) -> Self {
        Self {
            amount: amount.cloned(),
            unit: unit.map(str::to_string),
            converted: false,
            display,
        }
    }
}

fn display_amount(amount: &RawAmount) -> String {
    amount
        .as_number()
        .map(format_amount)
        .unwrap_or_else(|| amount.to_string())
}

/// Render an amount and unit, converting to the other system when the
/// preference asks for it
pub fn render_amount_parts(
    amount: Option<&RawAmount>,
    unit: Option<&str>,
    show_alternative: bool,
) -> RenderedAmount {
    let unit = unit.map(str::trim).filter(|u| !u.is_empty());

    let (amount, unit) = match (amount, unit) {
        (Some(a), Some(u)) => (a, u),
        (Some(a), None) => {
            return RenderedAmount::unconverted(Some(a), None, display_amount(a));
        }
        (None, Some(u)) => return RenderedAmount::unconverted(None, Some(u), u.to_string()),
        (None, None) => return RenderedAmount::unconverted(None, None, String::new()),
    };

    let plain = || {
        RenderedAmount::unconverted(
            Some(amount),
            Some(unit),
            format!("{} {}", display_amount(amount), unit),
        )
    };

    let Some(from) = Unit::parse(unit) else {
        return plain();
    };
    if !should_convert(from, show_alternative) {
        return plain();
    }
    let Some(to) = from.alternative() else {
        return plain();
    };
    let Some(value) = amount.as_number().filter(|v| *v >= 0.0) else {
        return plain();
    };
    let Some(converted) = convert(value, from, to) else {
        tracing::debug!("No conversion factor for {} -> {}", from, to);
        return plain();
    };
    if !converted.is_finite() {
        tracing::debug!("Converting {} {} overflowed, keeping {}", value, from, from);
        return plain();
    }

    RenderedAmount {
        amount: Some(RawAmount::Number(round_display(converted))),
        unit: Some(to.tag().to_string()),
        converted: true,
        display: format!("≈ {} {}", format_amount(converted), to),
    }
}

/// Render an amount and unit for display
///
/// # Examples
/// - `render_amount(Some(&100.0.into()), Some("g"), true)` -> `"≈ 3.5 oz"`
/// - `render_amount(Some(&100.0.into()), Some("g"), false)` -> `"100 g"`
/// - `render_amount(None, Some("g"), false)` -> `"g"`
pub fn render_amount(amount: Option<&RawAmount>, unit: Option<&str>, show_alternative: bool) -> String {
    render_amount_parts(amount, unit, show_alternative).display
}
