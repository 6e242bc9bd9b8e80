//! Ingredient measurement module
//!
//! Serving scaling and metric/imperial unit conversion for recipe display.

pub mod converter;
pub mod scaling;
pub mod units;

pub use converter::{
    convert, convert_str, render_amount, render_amount_parts, should_convert, RenderedAmount,
};
pub use scaling::{format_amount, round_display, scale, RawAmount};
pub use units::{
    alternative_unit, conversion_factor, is_imperial, is_metric, MeasurementSystem, Unit,
};
