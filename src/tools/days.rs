//! Day Tools
//!
//! The daily balance view: a day's meals and activities folded against the
//! profile's goals.

use chrono::{Local, NaiveDate, TimeZone};
use serde::Serialize;

use crate::balance::{aggregate, BalanceStatus, DailyBalance};
use crate::calendar::{day_window, resolve_date};
use crate::db::Database;
use crate::models::{DailyState, LoggedActivity, LoggedMeal, Profile};

/// Response for get_day_balance
#[derive(Debug, Serialize)]
pub struct DayBalanceResponse {
    pub date: String,
    pub window_start: String,
    pub window_end: String,
    pub balance: DailyBalance,
    pub status: BalanceStatus,
    pub water_percent: f64,
    pub meals: Vec<LoggedMeal>,
    pub activities: Vec<LoggedActivity>,
}

/// Balance for a date in local time (today when omitted)
pub fn get_day_balance(db: &Database, date: Option<&str>) -> Result<DayBalanceResponse, String> {
    let date = resolve_date(date, &Local)?;
    day_balance_in(db, date, &Local)
}

/// Balance for a calendar date in an explicit time zone
pub fn day_balance_in<Tz: TimeZone>(
    db: &Database,
    date: NaiveDate,
    tz: &Tz,
) -> Result<DayBalanceResponse, String> {
    let window = day_window(date, tz);
    let date_str = date.to_string();

    let (meals, activities, profile, water) = db
        .with_conn(|conn| {
            let meals = LoggedMeal::list_in_window(conn, &window)?;
            let activities = LoggedActivity::list_in_window(conn, &window)?;
            let profile = Profile::load(conn)?;
            let water = DailyState::get_by_date(conn, &date_str)?;
            Ok((meals, activities, profile, water))
        })
        .map_err(|e| format!("Database error: {}", e))?;

    let water_goal = profile.water_goal_for_day(water.as_ref().and_then(|w| w.water_goal_ml));
    let water_ml = water.map(|w| w.water_intake_ml).unwrap_or(0.0);

    let balance = aggregate(
        &meals,
        &activities,
        profile.calorie_goal_or_default(),
        water_goal,
        water_ml,
    );

    Ok(DayBalanceResponse {
        date: date_str,
        window_start: window.start_str(),
        window_end: window.end_str(),
        status: balance.status(),
        water_percent: balance.water_percent(),
        balance,
        meals,
        activities,
    })
}
