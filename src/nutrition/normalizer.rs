//! Product payload normalization
//!
//! Maps a raw product record from the external food database into a
//! canonical per-100 nutrition record. Field names for energy differ from
//! product to product, so energy is read through an ordered table of
//! extraction strategies: the first one that yields a positive number wins.
//! New spellings go into the table, not into control flow.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::round1;

/// Name used when a product carries no usable name
pub const UNNAMED_PRODUCT: &str = "unnamed product";

/// Kilojoules per kilocalorie
pub const KJ_PER_KCAL: f64 = 4.184;

/// Canonical per-100 (g or ml) nutrition record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub name: String,
    pub brand: Option<String>,
    pub kcal_per_100: f64,
    pub protein_per_100: f64,
    pub fat_per_100: f64,
    pub carbs_per_100: f64,
    pub quantity_label: Option<String>,
}

/// Unit an energy field is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyUnit {
    Kcal,
    Kj,
}

impl EnergyUnit {
    fn to_kcal(self, value: f64) -> f64 {
        match self {
            EnergyUnit::Kcal => value,
            EnergyUnit::Kj => value / KJ_PER_KCAL,
        }
    }
}

/// One way of reading energy out of `nutriments`
#[derive(Debug, Clone, Copy)]
pub struct EnergyStrategy {
    pub field: &'static str,
    pub unit: EnergyUnit,
}

const fn kcal(field: &'static str) -> EnergyStrategy {
    EnergyStrategy { field, unit: EnergyUnit::Kcal }
}

const fn kj(field: &'static str) -> EnergyStrategy {
    EnergyStrategy { field, unit: EnergyUnit::Kj }
}

/// Energy strategies in priority order; every kcal spelling is tried
/// before any kJ spelling. kcal and kJ values are not cross-checked.
pub const ENERGY_STRATEGIES: &[EnergyStrategy] = &[
    kcal("energy-kcal_100g"),
    kcal("energy_kcal_100g"),
    kcal("energy-kcal"),
    kcal("energy_kcal"),
    kcal("energy-kcal-value"),
    kcal("energy_kcal_value"),
    kj("energy_100g"),
    kj("energy-100g"),
    kj("energy"),
    kj("energy-value"),
    kj("energy_value"),
];

const PROTEIN_FIELD: &str = "proteins_100g";
const FAT_FIELD: &str = "fat_100g";
const CARBS_FIELD: &str = "carbohydrates_100g";

/// Normalize a raw product payload
///
/// Returns `None` only when there is no product at all (`null` or a
/// non-object). Missing names, energy or macros never fail: they fall
/// back to a placeholder or zero.
pub fn normalize(raw: &Value) -> Option<NutritionRecord> {
    let product = raw.as_object()?;
    let nutriments = product.get("nutriments").and_then(Value::as_object);

    let name = first_text(product, &["product_name", "product_name_en"])
        .unwrap_or_else(|| UNNAMED_PRODUCT.to_string());

    let brand = text(product, "brands").and_then(|brands| {
        brands
            .split(',')
            .next()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(String::from)
    });

    let kcal_per_100 = nutriments.map(extract_kcal).unwrap_or(0.0);

    Some(NutritionRecord {
        name,
        brand,
        kcal_per_100: kcal_per_100.round(),
        protein_per_100: round1(macro_value(nutriments, PROTEIN_FIELD)),
        fat_per_100: round1(macro_value(nutriments, FAT_FIELD)),
        carbs_per_100: round1(macro_value(nutriments, CARBS_FIELD)),
        quantity_label: first_text(product, &["quantity", "serving_size"]),
    })
}

/// Kilocalories per 100 from the first strategy yielding a positive number
pub fn extract_kcal(nutriments: &Map<String, Value>) -> f64 {
    ENERGY_STRATEGIES
        .iter()
        .find_map(|strategy| {
            positive_number(nutriments.get(strategy.field)).map(|v| strategy.unit.to_kcal(v))
        })
        .unwrap_or(0.0)
}

/// Keys in `nutriments` that look energy-related, for diagnostics
pub fn energy_like_keys(raw: &Value) -> Vec<String> {
    raw.get("nutriments")
        .and_then(Value::as_object)
        .map(|n| {
            n.keys()
                .filter(|k| {
                    let k = k.to_lowercase();
                    k.contains("energy") || k.contains("kcal") || k.contains("calorie")
                })
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

fn positive_number(value: Option<&Value>) -> Option<f64> {
    value
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn macro_value(nutriments: Option<&Map<String, Value>>, field: &str) -> f64 {
    positive_number(nutriments.and_then(|n| n.get(field))).unwrap_or(0.0)
}

fn text(object: &Map<String, Value>, field: &str) -> Option<String> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn first_text(object: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| text(object, field))
}
