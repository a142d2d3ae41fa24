//! Activity model
//!
//! Logged physical activity with the calories it burned.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::calendar::DayWindow;
use crate::db::{DbError, DbResult};

/// Intensity tag stored for activities entered without a catalog type
pub const MANUAL_INTENSITY: &str = "manual";

/// A logged activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedActivity {
    pub id: i64,
    pub activity_name: String,
    pub duration_minutes: f64,
    pub calories: f64,
    pub occurred_at: String,
    pub intensity: Option<String>,
    pub created_at: String,
}

/// Data for logging an activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedActivityCreate {
    pub activity_name: String,
    pub duration_minutes: f64,
    pub calories: f64,
    pub occurred_at: String,
    pub intensity: Option<String>,
}

impl LoggedActivity {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            activity_name: row.get("activity_name")?,
            duration_minutes: row.get("duration_minutes")?,
            calories: row.get("calories")?,
            occurred_at: row.get("occurred_at")?,
            intensity: row.get("intensity")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new activity
    pub fn create(conn: &Connection, data: &LoggedActivityCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO activities (activity_name, duration_minutes, calories, occurred_at, intensity)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.activity_name,
                data.duration_minutes,
                data.calories,
                data.occurred_at,
                data.intensity,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::MissingAfterWrite("activities"))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM activities WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(activity) => Ok(Some(activity)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Activities inside the window, newest first
    pub fn list_in_window(conn: &Connection, window: &DayWindow) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM activities
            WHERE occurred_at >= ?1 AND occurred_at <= ?2
            ORDER BY occurred_at DESC
            "#,
        )?;
        let activities = stmt
            .query_map(params![window.start_str(), window.end_str()], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(activities)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM activities WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::day_window;
    use crate::db::Database;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_create_and_list() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let created = LoggedActivity::create(conn, &LoggedActivityCreate {
                activity_name: "Running, slow".to_string(),
                duration_minutes: 30.0,
                calories: 280.0,
                occurred_at: "2025-01-09T07:15:00.000Z".to_string(),
                intensity: None,
            })?;
            assert_eq!(created.calories, 280.0);

            let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
            let listed = LoggedActivity::list_in_window(conn, &day_window(date, &Utc))?;
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].activity_name, "Running, slow");

            let other = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
            assert!(LoggedActivity::list_in_window(conn, &day_window(other, &Utc))?.is_empty());
            Ok(())
        })
        .unwrap();
    }
}
