//! Portion units and conversion constants
//!
//! Per-100 nutrition values refer to 100 g for solids and 100 ml for
//! liquids, so an eaten amount is reduced to one of those two bases.

use serde::{Deserialize, Serialize};

/// Base a per-100 value refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseUnit {
    /// Per 100 grams
    Grams,
    /// Per 100 milliliters
    Milliliters,
}

impl BaseUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            BaseUnit::Grams => "g",
            BaseUnit::Milliliters => "ml",
        }
    }
}

// ============================================================================
// Weight Conversion Constants (to grams)
// ============================================================================

pub const G_PER_MG: f64 = 0.001;
pub const G_PER_KG: f64 = 1000.0;
pub const G_PER_OZ: f64 = 28.3495;
pub const G_PER_LB: f64 = 453.592;

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

pub const ML_PER_L: f64 = 1000.0;
pub const ML_PER_CL: f64 = 10.0;
pub const ML_PER_TSP: f64 = 4.92892;
pub const ML_PER_TBSP: f64 = 14.7868;
pub const ML_PER_FL_OZ: f64 = 29.5735;
pub const ML_PER_CUP: f64 = 236.588;

/// Conversion factor to grams for a weight unit
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    match unit.trim().to_lowercase().as_str() {
        "g" | "gram" | "grams" => Some(1.0),
        "mg" | "milligram" | "milligrams" => Some(G_PER_MG),
        "kg" | "kilogram" | "kilograms" => Some(G_PER_KG),
        "oz" | "ounce" | "ounces" => Some(G_PER_OZ),
        "lb" | "lbs" | "pound" | "pounds" => Some(G_PER_LB),
        _ => None,
    }
}

/// Conversion factor to milliliters for a volume unit
pub fn ml_per_unit(unit: &str) -> Option<f64> {
    match unit.trim().to_lowercase().as_str() {
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Some(1.0),
        "cl" | "centiliter" | "centiliters" => Some(ML_PER_CL),
        "l" | "liter" | "liters" | "litre" | "litres" => Some(ML_PER_L),
        "tsp" | "teaspoon" | "teaspoons" => Some(ML_PER_TSP),
        "tbsp" | "tablespoon" | "tablespoons" => Some(ML_PER_TBSP),
        "fl oz" | "floz" | "fluid ounce" | "fluid ounces" => Some(ML_PER_FL_OZ),
        "cup" | "cups" => Some(ML_PER_CUP),
        _ => None,
    }
}

/// Reduce a quantity to its base amount (grams or milliliters)
///
/// Returns `None` for units that aren't weights or volumes.
pub fn to_base_amount(quantity: f64, unit: &str) -> Option<(f64, BaseUnit)> {
    if let Some(factor) = grams_per_unit(unit) {
        return Some((quantity * factor, BaseUnit::Grams));
    }
    ml_per_unit(unit).map(|factor| (quantity * factor, BaseUnit::Milliliters))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grams_per_unit() {
        assert_eq!(grams_per_unit("g"), Some(1.0));
        assert_eq!(grams_per_unit(" KG "), Some(G_PER_KG));
        assert_eq!(grams_per_unit("oz"), Some(G_PER_OZ));
        assert_eq!(grams_per_unit("ml"), None);
    }

    #[test]
    fn test_ml_per_unit() {
        assert_eq!(ml_per_unit("ml"), Some(1.0));
        assert_eq!(ml_per_unit("l"), Some(ML_PER_L));
        assert_eq!(ml_per_unit("cup"), Some(ML_PER_CUP));
        assert_eq!(ml_per_unit("g"), None);
    }

    #[test]
    fn test_to_base_amount() {
        assert_eq!(to_base_amount(0.25, "kg"), Some((250.0, BaseUnit::Grams)));
        assert_eq!(to_base_amount(0.5, "l"), Some((500.0, BaseUnit::Milliliters)));
        assert_eq!(to_base_amount(1.0, "slice"), None);
    }
}
