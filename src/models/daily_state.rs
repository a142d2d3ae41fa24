//! Daily state model
//!
//! One row per calendar date holding the day's water intake.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Water intake for one date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyState {
    pub date: String, // ISO date: "2025-01-09"
    pub water_intake_ml: f64,
    pub water_goal_ml: Option<f64>,
    pub updated_at: String,
}

impl DailyState {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get("date")?,
            water_intake_ml: row.get("water_intake_ml")?,
            water_goal_ml: row.get("water_goal_ml")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn get_by_date(conn: &Connection, date: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM daily_states WHERE date = ?1")?;

        match stmt.query_row([date], Self::from_row) {
            Ok(state) => Ok(Some(state)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Add water to a date, creating the row on first use
    ///
    /// The increment happens inside the upsert so concurrent additions
    /// can't overwrite each other. A `None` goal keeps the stored one.
    pub fn add_water(
        conn: &Connection,
        date: &str,
        amount_ml: f64,
        water_goal_ml: Option<f64>,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO daily_states (date, water_intake_ml, water_goal_ml)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(date) DO UPDATE SET
                water_intake_ml = water_intake_ml + excluded.water_intake_ml,
                water_goal_ml = COALESCE(excluded.water_goal_ml, water_goal_ml),
                updated_at = datetime('now')
            "#,
            params![date, amount_ml, water_goal_ml],
        )?;

        Self::get_by_date(conn, date)?.ok_or(DbError::MissingAfterWrite("daily_states"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_add_water_accumulates_per_date() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            DailyState::add_water(conn, "2025-01-09", 200.0, Some(2000.0))?;
            let state = DailyState::add_water(conn, "2025-01-09", 300.0, None)?;
            assert_eq!(state.water_intake_ml, 500.0);
            assert_eq!(state.water_goal_ml, Some(2000.0));

            let other = DailyState::add_water(conn, "2025-01-10", 100.0, None)?;
            assert_eq!(other.water_goal_ml, None);
            assert_eq!(other.water_intake_ml, 100.0);
            assert!(DailyState::get_by_date(conn, "2025-01-11")?.is_none());
            Ok(())
        })
        .unwrap();
    }
}
