//! MET-based energy expenditure
//!
//! Calories = MET × weight_kg × duration_hours

use serde::Serialize;

/// Body weight substituted when the user's weight is unknown
pub const REFERENCE_WEIGHT_KG: f64 = 70.0;

/// Calories burned, rounded to whole kcal
///
/// Inputs are not validated: non-positive inputs produce a zero or
/// negative result, which callers must reject before persisting.
pub fn estimate(met: f64, weight_kg: f64, duration_minutes: f64) -> i64 {
    (met * weight_kg * duration_minutes / 60.0).round() as i64
}

/// A burn estimate together with the weight it was computed for
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BurnEstimate {
    pub kcal: i64,
    pub weight_kg: f64,
    /// True when the reference weight stood in for the user's own
    pub weight_is_reference: bool,
}

impl BurnEstimate {
    /// Whether the estimate can be stored as a logged activity
    pub fn is_loggable(&self) -> bool {
        self.kcal > 0
    }
}

/// Estimate with the user's weight, or the reference weight when unknown
pub fn estimate_burn(met: f64, weight_kg: Option<f64>, duration_minutes: f64) -> BurnEstimate {
    let known = weight_kg.filter(|w| w.is_finite() && *w > 0.0);
    let weight = known.unwrap_or(REFERENCE_WEIGHT_KG);
    BurnEstimate {
        kcal: estimate(met, weight, duration_minutes),
        weight_kg: weight,
        weight_is_reference: known.is_none(),
    }
}
