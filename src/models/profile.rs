//! Profile model
//!
//! The single local profile: body measurements, weight target and daily
//! goals.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Calorie goal used until the user sets one
pub const DEFAULT_CALORIE_GOAL: f64 = 1900.0;

/// Water goal used until the user sets one
pub const DEFAULT_WATER_GOAL_ML: f64 = 2000.0;

/// Stored profile; unset fields stay `None`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub height_cm: Option<f64>,
    pub start_weight_kg: Option<f64>,
    pub current_weight_kg: Option<f64>,
    pub goal_weight_kg: Option<f64>,
    pub calorie_goal: Option<f64>,
    pub water_goal_ml: Option<f64>,
    pub updated_at: Option<String>,
}

/// Partial profile update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub height_cm: Option<f64>,
    pub start_weight_kg: Option<f64>,
    pub current_weight_kg: Option<f64>,
    pub goal_weight_kg: Option<f64>,
    pub calorie_goal: Option<f64>,
    pub water_goal_ml: Option<f64>,
}

impl Profile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            height_cm: row.get("height_cm")?,
            start_weight_kg: row.get("start_weight_kg")?,
            current_weight_kg: row.get("current_weight_kg")?,
            goal_weight_kg: row.get("goal_weight_kg")?,
            calorie_goal: row.get("calorie_goal")?,
            water_goal_ml: row.get("water_goal_ml")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Load the profile; a fresh database yields an empty one
    pub fn load(conn: &Connection) -> DbResult<Self> {
        let mut stmt = conn.prepare("SELECT * FROM profile WHERE id = 1")?;

        match stmt.query_row([], Self::from_row) {
            Ok(profile) => Ok(profile),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update(conn: &Connection, data: &ProfileUpdate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO profile (
                id, height_cm, start_weight_kg, current_weight_kg, goal_weight_kg,
                calorie_goal, water_goal_ml
            )
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                height_cm = COALESCE(excluded.height_cm, height_cm),
                start_weight_kg = COALESCE(excluded.start_weight_kg, start_weight_kg),
                current_weight_kg = COALESCE(excluded.current_weight_kg, current_weight_kg),
                goal_weight_kg = COALESCE(excluded.goal_weight_kg, goal_weight_kg),
                calorie_goal = COALESCE(excluded.calorie_goal, calorie_goal),
                water_goal_ml = COALESCE(excluded.water_goal_ml, water_goal_ml),
                updated_at = datetime('now')
            "#,
            params![
                data.height_cm,
                data.start_weight_kg,
                data.current_weight_kg,
                data.goal_weight_kg,
                data.calorie_goal,
                data.water_goal_ml,
            ],
        )?;

        let profile = Self::load(conn)?;
        if profile.updated_at.is_none() {
            return Err(DbError::MissingAfterWrite("profile"));
        }
        Ok(profile)
    }

    pub fn calorie_goal_or_default(&self) -> f64 {
        self.calorie_goal.unwrap_or(DEFAULT_CALORIE_GOAL)
    }

    pub fn water_goal_or_default(&self) -> f64 {
        self.water_goal_ml.unwrap_or(DEFAULT_WATER_GOAL_ML)
    }

    /// Water goal for a day: the profile goal, then the goal stored with
    /// the day, then the default
    pub fn water_goal_for_day(&self, day_goal_ml: Option<f64>) -> f64 {
        self.water_goal_ml
            .or(day_goal_ml)
            .unwrap_or(DEFAULT_WATER_GOAL_ML)
    }

    /// Kilograms left to the goal weight; negative once below it
    pub fn to_goal_kg(&self) -> Option<f64> {
        match (self.current_weight_kg, self.goal_weight_kg) {
            (Some(current), Some(goal)) => Some(current - goal),
            _ => None,
        }
    }
}
