//! Measurement MCP Tools
//!
//! Direct access to serving scaling, unit conversion, and amount rendering.

use serde::Serialize;

use crate::measure::{
    convert, render_amount_parts, round_display, scale, MeasurementSystem, RawAmount,
    RenderedAmount, Unit,
};

/// Response for scale_amount
#[derive(Debug, Serialize)]
pub struct ScaleAmountResponse {
    pub amount: Option<RawAmount>,
    pub original_servings: u32,
    pub current_servings: u32,
    pub scaled_amount: Option<RawAmount>,
}

/// Response for convert_amount
#[derive(Debug, Serialize)]
pub struct ConvertAmountResponse {
    pub amount: f64,
    pub from_unit: String,
    pub to_unit: Option<String>,
    /// None when the pair is not in the conversion table
    pub converted_amount: Option<f64>,
    pub rounded_amount: Option<f64>,
}

/// One row of the unit table
#[derive(Debug, Serialize)]
pub struct UnitInfo {
    pub tag: &'static str,
    pub system: Option<MeasurementSystem>,
    pub alternative: Option<&'static str>,
}

/// Response for list_units
#[derive(Debug, Serialize)]
pub struct ListUnitsResponse {
    pub units: Vec<UnitInfo>,
}

/// Scale a single amount between serving counts
pub fn scale_amount(
    amount: Option<RawAmount>,
    original_servings: u32,
    current_servings: u32,
) -> ScaleAmountResponse {
    let scaled_amount = scale(amount.as_ref(), original_servings, current_servings);
    ScaleAmountResponse {
        amount,
        original_servings,
        current_servings,
        scaled_amount,
    }
}

/// Convert an amount between units
///
/// Without a target unit the source unit's cross-system counterpart is used.
pub fn convert_amount(
    amount: f64,
    from_unit: &str,
    to_unit: Option<&str>,
) -> Result<ConvertAmountResponse, String> {
    let from = Unit::parse(from_unit).ok_or_else(|| format!("Unknown unit: {}", from_unit))?;
    let to = match to_unit {
        Some(u) => Some(Unit::parse(u).ok_or_else(|| format!("Unknown unit: {}", u))?),
        None => from.alternative(),
    };

    let converted_amount = to.and_then(|to| convert(amount, from, to));

    Ok(ConvertAmountResponse {
        amount,
        from_unit: from.tag().to_string(),
        to_unit: to.map(|u| u.tag().to_string()),
        converted_amount,
        rounded_amount: converted_amount.map(round_display),
    })
}

/// Render an amount for display in the preferred measurement system
pub fn render_amount(
    amount: Option<RawAmount>,
    unit: Option<&str>,
    show_alternative: bool,
) -> RenderedAmount {
    render_amount_parts(amount.as_ref(), unit, show_alternative)
}

/// List every known unit with its system and counterpart
pub fn list_units() -> ListUnitsResponse {
    let units = Unit::ALL
        .iter()
        .map(|unit| UnitInfo {
            tag: unit.tag(),
            system: unit.system(),
            alternative: unit.alternative().map(|u| u.tag()),
        })
        .collect();

    ListUnitsResponse { units }
}
