//! Unit types and conversion constants
//!
//! Classifies kitchen units into measurement systems and holds the fixed
//! conversion-factor table used when switching a quantity between them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Measurement system a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    Metric,
    Imperial,
}

/// A kitchen measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "l")]
    Liter,
    #[serde(rename = "oz")]
    Ounce,
    #[serde(rename = "lb")]
    Pound,
    #[serde(rename = "fl oz")]
    FluidOunce,
    #[serde(rename = "cup")]
    Cup,
    #[serde(rename = "tbsp")]
    Tablespoon,
    #[serde(rename = "tsp")]
    Teaspoon,
    #[serde(rename = "piece")]
    Piece,
    #[serde(rename = "bunch")]
    Bunch,
    #[serde(rename = "handful")]
    Handful,
    #[serde(rename = "package")]
    Package,
    #[serde(rename = "can")]
    Can,
    #[serde(rename = "glass")]
    Glass,
    #[serde(rename = "dash")]
    Dash,
    #[serde(rename = "pinch")]
    Pinch,
}

impl Unit {
    /// Every unit, metric first, then imperial, then count-style
    pub const ALL: [Unit; 18] = [
        Unit::Gram,
        Unit::Kilogram,
        Unit::Milliliter,
        Unit::Liter,
        Unit::Ounce,
        Unit::Pound,
        Unit::FluidOunce,
        Unit::Cup,
        Unit::Tablespoon,
        Unit::Teaspoon,
        Unit::Piece,
        Unit::Bunch,
        Unit::Handful,
        Unit::Package,
        Unit::Can,
        Unit::Glass,
        Unit::Dash,
        Unit::Pinch,
    ];

    /// Canonical tag as stored on ingredients
    pub fn tag(&self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Milliliter => "ml",
            Unit::Liter => "l",
            Unit::Ounce => "oz",
            Unit::Pound => "lb",
            Unit::FluidOunce => "fl oz",
            Unit::Cup => "cup",
            Unit::Tablespoon => "tbsp",
            Unit::Teaspoon => "tsp",
            Unit::Piece => "piece",
            Unit::Bunch => "bunch",
            Unit::Handful => "handful",
            Unit::Package => "package",
            Unit::Can => "can",
            Unit::Glass => "glass",
            Unit::Dash => "dash",
            Unit::Pinch => "pinch",
        }
    }

    /// Parse a unit string, accepting the tag or a spelled-out name
    pub fn parse(unit: &str) -> Option<Self> {
        let lower = unit.to_lowercase();
        let trimmed = lower.trim();

        let unit = match trimmed {
            "g" | "gram" | "grams" => Unit::Gram,
            "kg" | "kilogram" | "kilograms" => Unit::Kilogram,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Unit::Milliliter
            }
            "l" | "liter" | "liters" | "litre" | "litres" => Unit::Liter,
            "oz" | "ounce" | "ounces" => Unit::Ounce,
            "lb" | "lbs" | "pound" | "pounds" => Unit::Pound,
            "fl oz" | "floz" | "fl_oz" | "fluid ounce" | "fluid ounces" => Unit::FluidOunce,
            "cup" | "cups" => Unit::Cup,
            "tbsp" | "tablespoon" | "tablespoons" => Unit::Tablespoon,
            "tsp" | "teaspoon" | "teaspoons" => Unit::Teaspoon,
            "piece" | "pieces" => Unit::Piece,
            "bunch" | "bunches" => Unit::Bunch,
            "handful" | "handfuls" => Unit::Handful,
            "package" | "packages" => Unit::Package,
            "can" | "cans" => Unit::Can,
            "glass" | "glasses" => Unit::Glass,
            "dash" | "dashes" => Unit::Dash,
            "pinch" | "pinches" => Unit::Pinch,
            _ => return None,
        };
        Some(unit)
    }

    /// Measurement system of this unit; count-style units have none
    pub fn system(&self) -> Option<MeasurementSystem> {
        match self {
            Unit::Gram | Unit::Kilogram | Unit::Milliliter | Unit::Liter => {
                Some(MeasurementSystem::Metric)
            }
            Unit::Ounce
            | Unit::Pound
            | Unit::FluidOunce
            | Unit::Cup
            | Unit::Tablespoon
            | Unit::Teaspoon => Some(MeasurementSystem::Imperial),
            _ => None,
        }
    }

    pub fn is_metric(&self) -> bool {
        self.system() == Some(MeasurementSystem::Metric)
    }

    pub fn is_imperial(&self) -> bool {
        self.system() == Some(MeasurementSystem::Imperial)
    }

    /// Preferred counterpart in the other measurement system
    ///
    /// Not an involution: cups map to milliliters, but milliliters map to
    /// fluid ounces.
    pub fn alternative(&self) -> Option<Unit> {
        match self {
            Unit::Gram => Some(Unit::Ounce),
            Unit::Kilogram => Some(Unit::Pound),
            Unit::Milliliter => Some(Unit::FluidOunce),
            Unit::Liter => Some(Unit::Cup),
            Unit::Ounce => Some(Unit::Gram),
            Unit::Pound => Some(Unit::Kilogram),
            Unit::FluidOunce => Some(Unit::Milliliter),
            Unit::Cup => Some(Unit::Milliliter),
            Unit::Tablespoon => Some(Unit::Milliliter),
            Unit::Teaspoon => Some(Unit::Milliliter),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ============================================================================
// Conversion Factors
// ============================================================================
//
// Each entry is authored on its own; G_TO_OZ * OZ_TO_G is close to, but not
// exactly, 1.

pub const G_TO_OZ: f64 = 0.035274;
pub const G_TO_KG: f64 = 0.001;
pub const KG_TO_LB: f64 = 2.20462;
pub const KG_TO_G: f64 = 1000.0;
pub const ML_TO_FL_OZ: f64 = 0.033814;
pub const ML_TO_L: f64 = 0.001;
pub const L_TO_CUP: f64 = 4.22675;
pub const L_TO_ML: f64 = 1000.0;
pub const OZ_TO_G: f64 = 28.3495;
pub const OZ_TO_LB: f64 = 0.0625;
pub const LB_TO_KG: f64 = 0.453592;
pub const LB_TO_OZ: f64 = 16.0;
pub const FL_OZ_TO_ML: f64 = 29.5735;
pub const CUP_TO_ML: f64 = 236.588;
pub const CUP_TO_TBSP: f64 = 16.0;
pub const TBSP_TO_ML: f64 = 14.7868;
pub const TBSP_TO_CUP: f64 = 0.0625;
pub const TBSP_TO_TSP: f64 = 3.0;
pub const TSP_TO_ML: f64 = 4.92892;
pub const TSP_TO_TBSP: f64 = 0.333333;

/// Look up the multiplier converting `from` into `to`
///
/// Identity pairs always resolve to 1. Pairs missing from the table return
/// `None`, which callers treat as "display unconverted".
pub fn conversion_factor(from: Unit, to: Unit) -> Option<f64> {
    if from == to {
        return Some(1.0);
    }

    let factor = match (from, to) {
        (Unit::Gram, Unit::Ounce) => G_TO_OZ,
        (Unit::Gram, Unit::Kilogram) => G_TO_KG,
        (Unit::Kilogram, Unit::Pound) => KG_TO_LB,
        (Unit::Kilogram, Unit::Gram) => KG_TO_G,
        (Unit::Milliliter, Unit::FluidOunce) => ML_TO_FL_OZ,
        (Unit::Milliliter, Unit::Liter) => ML_TO_L,
        (Unit::Liter, Unit::Cup) => L_TO_CUP,
        (Unit::Liter, Unit::Milliliter) => L_TO_ML,
        (Unit::Ounce, Unit::Gram) => OZ_TO_G,
        (Unit::Ounce, Unit::Pound) => OZ_TO_LB,
        (Unit::Pound, Unit::Kilogram) => LB_TO_KG,
        (Unit::Pound, Unit::Ounce) => LB_TO_OZ,
        (Unit::FluidOunce, Unit::Milliliter) => FL_OZ_TO_ML,
        (Unit::Cup, Unit::Milliliter) => CUP_TO_ML,
        (Unit::Cup, Unit::Tablespoon) => CUP_TO_TBSP,
        (Unit::Tablespoon, Unit::Milliliter) => TBSP_TO_ML,
        (Unit::Tablespoon, Unit::Cup) => TBSP_TO_CUP,
        (Unit::Tablespoon, Unit::Teaspoon) => TBSP_TO_TSP,
        (Unit::Teaspoon, Unit::Milliliter) => TSP_TO_ML,
        (Unit::Teaspoon, Unit::Tablespoon) => TSP_TO_TBSP,
        _ => return None,
    };
    Some(factor)
}

// ============================================================================
// String-level helpers
// ============================================================================

/// True if `unit` names a metric unit
pub fn is_metric(unit: &str) -> bool {
    Unit::parse(unit).is_some_and(|u| u.is_metric())
}

/// True if `unit` names an imperial/US unit
pub fn is_imperial(unit: &str) -> bool {
    Unit::parse(unit).is_some_and(|u| u.is_imperial())
}

/// Cross-system counterpart for a unit string
pub fn alternative_unit(unit: &str) -> Option<Unit> {
    Unit::parse(unit).and_then(|u| u.alternative())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_units() {
        assert!(is_metric("g"));
        assert!(!is_imperial("g"));
        assert!(!is_metric("cup"));
        assert!(is_imperial("cup"));
        assert!(!is_metric("piece"));
        assert!(!is_imperial("piece"));
        assert!(!is_metric("scoop"));
        assert!(!is_imperial("scoop"));
    }

    #[test]
    fn test_systems_are_disjoint() {
        for unit in Unit::ALL {
            assert!(!(unit.is_metric() && unit.is_imperial()), "{unit}");
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Unit::parse("Grams"), Some(Unit::Gram));
        assert_eq!(Unit::parse("  fl oz "), Some(Unit::FluidOunce));
        assert_eq!(Unit::parse("Tablespoons"), Some(Unit::Tablespoon));
        assert_eq!(Unit::parse("lbs"), Some(Unit::Pound));
        assert_eq!(Unit::parse("scoop"), None);
        assert_eq!(Unit::parse(""), None);
    }

    #[test]
    fn test_tag_parses_back() {
        for unit in Unit::ALL {
            assert_eq!(Unit::parse(unit.tag()), Some(unit));
        }
    }

    #[test]
    fn test_alternative_unit() {
        assert_eq!(alternative_unit("g"), Some(Unit::Ounce));
        assert_eq!(alternative_unit("l"), Some(Unit::Cup));
        assert_eq!(alternative_unit("cup"), Some(Unit::Milliliter));
        assert_eq!(alternative_unit("ml"), Some(Unit::FluidOunce));
        assert_eq!(alternative_unit("pinch"), None);
        assert_eq!(alternative_unit("unknown"), None);
    }

    #[test]
    fn test_unclassified_units_have_no_alternative() {
        for unit in Unit::ALL {
            if unit.system().is_none() {
                assert_eq!(unit.alternative(), None, "{unit}");
            }
        }
    }

    #[test]
    fn test_every_alternative_has_a_factor() {
        for unit in Unit::ALL {
            if let Some(alt) = unit.alternative() {
                assert!(conversion_factor(unit, alt).is_some(), "{unit} -> {alt}");
                assert_ne!(unit.system(), alt.system(), "{unit} -> {alt}");
            }
        }
    }

    #[test]
    fn test_identity_factor() {
        for unit in Unit::ALL {
            assert_eq!(conversion_factor(unit, unit), Some(1.0));
        }
    }

    #[test]
    fn test_missing_pair() {
        assert_eq!(conversion_factor(Unit::Gram, Unit::Cup), None);
        assert_eq!(conversion_factor(Unit::Piece, Unit::Gram), None);
    }

    #[test]
    fn test_round_trip_is_close_but_not_guaranteed_exact() {
        let there = conversion_factor(Unit::Gram, Unit::Ounce).unwrap();
        let back = conversion_factor(Unit::Ounce, Unit::Gram).unwrap();
        assert!((there * back - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_serde_uses_tags() {
        let json = serde_json::to_string(&Unit::FluidOunce).unwrap();
        assert_eq!(json, "\"fl oz\"");
        let unit: Unit = serde_json::from_str("\"tbsp\"").unwrap();
        assert_eq!(unit, Unit::Tablespoon);
    }
}
