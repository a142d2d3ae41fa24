//! Nutrition module
//!
//! Product payload normalization, portion scaling and unit conversions.

pub mod normalizer;
pub mod portion;
pub mod units;

pub use normalizer::{
    energy_like_keys, extract_kcal, normalize, EnergyStrategy, EnergyUnit, NutritionRecord,
    ENERGY_STRATEGIES, UNNAMED_PRODUCT,
};
pub use portion::Portion;
pub use units::{grams_per_unit, ml_per_unit, to_base_amount, BaseUnit};
