//! Water Tools

use chrono::Local;
use serde::Serialize;

use crate::calendar::resolve_date;
use crate::db::Database;
use crate::models::{DailyState, Profile};

/// Quick-add amounts offered for a glass of water, in ml
pub const WATER_QUICK_AMOUNTS_ML: [f64; 3] = [100.0, 200.0, 300.0];

/// Response for add_water
#[derive(Debug, Serialize)]
pub struct AddWaterResponse {
    pub date: String,
    pub added_ml: f64,
    pub water_intake_ml: f64,
    pub water_goal_ml: f64,
    /// Progress toward the goal, capped at 100
    pub percent: f64,
}

/// Add water to a day's intake
pub fn add_water(db: &Database, amount_ml: f64, date: Option<&str>) -> Result<AddWaterResponse, String> {
    if !amount_ml.is_finite() || amount_ml <= 0.0 {
        return Err(format!("Water amount must be greater than 0 ml, got {}", amount_ml));
    }
    let date = resolve_date(date, &Local)?.to_string();

    let (profile, state) = db
        .with_conn(|conn| {
            let profile = Profile::load(conn)?;
            let state = DailyState::add_water(conn, &date, amount_ml, profile.water_goal_ml)?;
            Ok((profile, state))
        })
        .map_err(|e| format!("Database error: {}", e))?;

    let water_goal_ml = profile.water_goal_for_day(state.water_goal_ml);
    let percent = if water_goal_ml > 0.0 {
        (state.water_intake_ml / water_goal_ml * 100.0).min(100.0)
    } else {
        0.0
    };

    tracing::info!("Added {} ml water on {} (total {} ml)", amount_ml, date, state.water_intake_ml);

    Ok(AddWaterResponse {
        date: state.date,
        added_ml: amount_ml,
        water_intake_ml: state.water_intake_ml,
        water_goal_ml,
        percent,
    })
}
