//! Meal Tools
//!
//! Logging meals from a product record or from manual values.

use chrono::Local;
use serde::Serialize;

use crate::calendar::{format_timestamp, resolve_timestamp};
use crate::db::Database;
use crate::models::{LoggedMeal, LoggedMealCreate, Macros};
use crate::nutrition::{NutritionRecord, Portion};

// ============================================================================
// Response Structs
// ============================================================================

/// Response for log_meal and log_manual_meal
#[derive(Debug, Serialize)]
pub struct LogMealResponse {
    pub meal: LoggedMeal,
    /// Present when the meal was scaled from a product
    pub portion: Option<Portion>,
}

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Log an eaten amount of a product
#[allow(clippy::too_many_arguments)]
pub fn log_meal(
    db: &Database,
    product: &NutritionRecord,
    amount: f64,
    unit: &str,
    date: Option<&str>,
    time: Option<&str>,
    note: Option<&str>,
) -> Result<LogMealResponse, String> {
    let portion = product.portion(amount, unit)?;
    let eaten_at = resolve_timestamp(date, time, &Local)?;

    let name = match product.name.trim() {
        "" => crate::nutrition::UNNAMED_PRODUCT.to_string(),
        name => name.to_string(),
    };

    let data = LoggedMealCreate {
        name,
        macros: portion.macros,
        amount: Some(portion.amount),
        unit: Some(portion.unit.clone()),
        eaten_at: format_timestamp(eaten_at),
        note: clean_note(note),
    };

    let meal = db
        .with_conn(|conn| LoggedMeal::create(conn, &data))
        .map_err(|e| format!("Database error: {}", e))?;

    tracing::info!("Logged meal '{}' ({} kcal)", meal.name, meal.kcal);

    Ok(LogMealResponse {
        meal,
        portion: Some(portion),
    })
}

/// Log a meal from values the user entered
#[allow(clippy::too_many_arguments)]
pub fn log_manual_meal(
    db: &Database,
    name: &str,
    kcal: f64,
    protein: Option<f64>,
    fat: Option<f64>,
    carbs: Option<f64>,
    date: Option<&str>,
    time: Option<&str>,
    note: Option<&str>,
) -> Result<LogMealResponse, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Meal name must not be empty".to_string());
    }

    let macros = Macros {
        kcal: non_negative("kcal", kcal)?,
        protein: non_negative("protein", protein.unwrap_or(0.0))?,
        fat: non_negative("fat", fat.unwrap_or(0.0))?,
        carbs: non_negative("carbs", carbs.unwrap_or(0.0))?,
    }
    .rounded();

    let eaten_at = resolve_timestamp(date, time, &Local)?;

    let data = LoggedMealCreate {
        name: name.to_string(),
        macros,
        amount: None,
        unit: None,
        eaten_at: format_timestamp(eaten_at),
        note: clean_note(note),
    };

    let meal = db
        .with_conn(|conn| LoggedMeal::create(conn, &data))
        .map_err(|e| format!("Database error: {}", e))?;

    tracing::info!("Logged manual meal '{}' ({} kcal)", meal.name, meal.kcal);

    Ok(LogMealResponse { meal, portion: None })
}

/// Delete a logged meal
pub fn delete_meal(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let deleted = db
        .with_conn(|conn| LoggedMeal::delete(conn, id))
        .map_err(|e| format!("Database error: {}", e))?;

    if !deleted {
        return Err(format!("Meal with id {} not found", id));
    }

    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn non_negative(field: &str, value: f64) -> Result<f64, String> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{} must be a number >= 0, got {}", field, value))
    }
}

pub(crate) fn clean_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim).filter(|n| !n.is_empty()).map(String::from)
}
