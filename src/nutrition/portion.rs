//! Portion scaling
//!
//! Turns a per-100 record and an eaten amount into the macros that get
//! logged.

use serde::Serialize;

use super::normalizer::NutritionRecord;
use super::units::{to_base_amount, BaseUnit};
use crate::models::Macros;

/// An eaten amount of a product, scaled from its per-100 values
#[derive(Debug, Clone, Serialize)]
pub struct Portion {
    pub amount: f64,
    pub unit: String,
    pub base_amount: f64,
    pub base_unit: BaseUnit,
    pub macros: Macros,
}

impl NutritionRecord {
    /// Per-100 values as macros
    pub fn per_100(&self) -> Macros {
        Macros {
            kcal: self.kcal_per_100,
            protein: self.protein_per_100,
            fat: self.fat_per_100,
            carbs: self.carbs_per_100,
        }
    }

    /// Reject per-100 values that are negative or not finite
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("kcal_per_100", self.kcal_per_100),
            ("protein_per_100", self.protein_per_100),
            ("fat_per_100", self.fat_per_100),
            ("carbs_per_100", self.carbs_per_100),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be 0 or greater, got {}", field, value));
            }
        }
        Ok(())
    }

    /// Scale to an eaten amount, e.g. `portion(150.0, "g")`
    ///
    /// Per-100 values are taken to refer to whichever base the unit reduces
    /// to (grams or milliliters). Energy is rounded to whole kcal, macros
    /// to one decimal.
    pub fn portion(&self, amount: f64, unit: &str) -> Result<Portion, String> {
        self.validate()?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(format!("Amount must be greater than 0, got {}", amount));
        }
        let (base_amount, base_unit) = to_base_amount(amount, unit).ok_or_else(|| {
            format!(
                "Unknown unit '{}'. Use a weight (g, kg, oz, lb) or volume (ml, l, cup, tbsp) unit",
                unit
            )
        })?;

        Ok(Portion {
            amount,
            unit: unit.trim().to_string(),
            base_amount,
            base_unit,
            macros: self.per_100().scale(base_amount / 100.0).rounded(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oats() -> NutritionRecord {
        NutritionRecord {
            name: "Rolled oats".to_string(),
            brand: None,
            kcal_per_100: 372.0,
            protein_per_100: 13.5,
            fat_per_100: 7.0,
            carbs_per_100: 58.7,
            quantity_label: Some("500 g".to_string()),
        }
    }

    #[test]
    fn test_portion_in_grams() {
        let portion = oats().portion(40.0, "g").unwrap();
        assert_eq!(portion.base_unit, BaseUnit::Grams);
        assert_eq!(portion.macros.kcal, 149.0); // 148.8
        assert!((portion.macros.protein - 5.4).abs() < 1e-9);
        assert!((portion.macros.fat - 2.8).abs() < 1e-9);
        assert!((portion.macros.carbs - 23.5).abs() < 1e-9); // 23.48
    }

    #[test]
    fn test_portion_in_other_units() {
        let portion = oats().portion(0.1, "kg").unwrap();
        assert!((portion.base_amount - 100.0).abs() < 1e-9);
        assert_eq!(portion.macros.kcal, 372.0);

        let drink = oats().portion(250.0, "ml").unwrap();
        assert_eq!(drink.base_unit, BaseUnit::Milliliters);
        assert_eq!(drink.macros.kcal, 930.0);
    }

    #[test]
    fn test_portion_rejects_bad_input() {
        assert!(oats().portion(0.0, "g").is_err());
        assert!(oats().portion(-5.0, "g").is_err());
        assert!(oats().portion(1.0, "handful").is_err());
    }

    #[test]
    fn test_portion_rejects_negative_or_nan_per_100() {
        let mut record = oats();
        record.fat_per_100 = -0.5;
        let err = record.portion(100.0, "g").unwrap_err();
        assert!(err.contains("fat_per_100"));

        let mut record = oats();
        record.kcal_per_100 = f64::NAN;
        assert!(record.portion(100.0, "g").is_err());
    }
}
