//! Meal entry model
//!
//! A meal as it was logged: already scaled to the eaten portion. The day a
//! meal belongs to is derived from `eaten_at`, never stored.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::calendar::DayWindow;
use crate::db::{DbError, DbResult};
use super::Macros;

/// A logged meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedMeal {
    pub id: i64,
    pub name: String,
    pub kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub eaten_at: String,
    pub note: Option<String>,
    pub created_at: String,
}

/// Data for logging a meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedMealCreate {
    pub name: String,
    pub macros: Macros,
    /// Eaten quantity as entered; absent for manual meals
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub eaten_at: String,
    pub note: Option<String>,
}

impl LoggedMeal {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            kcal: row.get("kcal")?,
            protein: row.get("protein")?,
            fat: row.get("fat")?,
            carbs: row.get("carbs")?,
            amount: row.get("amount")?,
            unit: row.get("unit")?,
            eaten_at: row.get("eaten_at")?,
            note: row.get("note")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn macros(&self) -> Macros {
        Macros {
            kcal: self.kcal,
            protein: self.protein,
            fat: self.fat,
            carbs: self.carbs,
        }
    }

    /// Insert a new meal entry
    pub fn create(conn: &Connection, data: &LoggedMealCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO meal_entries (name, kcal, protein, fat, carbs, amount, unit, eaten_at, note)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.name,
                data.macros.kcal,
                data.macros.protein,
                data.macros.fat,
                data.macros.carbs,
                data.amount,
                data.unit,
                data.eaten_at,
                data.note,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::MissingAfterWrite("meal_entries"))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_entries WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(meal) => Ok(Some(meal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Meals eaten inside the window, newest first
    pub fn list_in_window(conn: &Connection, window: &DayWindow) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM meal_entries
            WHERE eaten_at >= ?1 AND eaten_at <= ?2
            ORDER BY eaten_at DESC
            "#,
        )?;
        let meals = stmt
            .query_map(params![window.start_str(), window.end_str()], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meal_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::day_window;
    use crate::db::Database;
    use chrono::{NaiveDate, Utc};

    fn meal(name: &str, kcal: f64, eaten_at: &str) -> LoggedMealCreate {
        LoggedMealCreate {
            name: name.to_string(),
            macros: Macros { kcal, protein: 1.0, fat: 2.0, carbs: 3.0 },
            amount: None,
            unit: None,
            eaten_at: eaten_at.to_string(),
            note: None,
        }
    }

    #[test]
    fn test_list_in_window_uses_inclusive_bounds() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            LoggedMeal::create(conn, &meal("Late snack", 120.0, "2025-01-08T23:59:59.999Z"))?;
            LoggedMeal::create(conn, &meal("Porridge", 320.0, "2025-01-09T00:00:00.000Z"))?;
            LoggedMeal::create(conn, &meal("Soup", 540.0, "2025-01-09T23:59:59.999Z"))?;
            LoggedMeal::create(conn, &meal("Midnight", 80.0, "2025-01-10T00:00:00.000Z"))?;

            let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
            let meals = LoggedMeal::list_in_window(conn, &day_window(date, &Utc))?;
            let names: Vec<_> = meals.iter().map(|m| m.name.as_str()).collect();
            assert_eq!(names, vec!["Soup", "Porridge"]);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_create_and_delete() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let created = LoggedMeal::create(conn, &meal("Apple", 52.0, "2025-01-09T10:00:00.000Z"))?;
            assert_eq!(created.macros().kcal, 52.0);
            assert!(LoggedMeal::delete(conn, created.id)?);
            assert!(!LoggedMeal::delete(conn, created.id)?);
            assert!(LoggedMeal::get_by_id(conn, created.id)?.is_none());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_amount_and_unit_round_trip() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let mut data = meal("Milk", 128.0, "2025-01-09T07:00:00.000Z");
            data.amount = Some(250.0);
            data.unit = Some("ml".to_string());
            let created = LoggedMeal::create(conn, &data)?;

            let loaded = LoggedMeal::get_by_id(conn, created.id)?.unwrap();
            assert_eq!(loaded.amount, Some(250.0));
            assert_eq!(loaded.unit.as_deref(), Some("ml"));

            let manual = LoggedMeal::create(conn, &meal("Cake", 300.0, "2025-01-09T15:00:00.000Z"))?;
            assert_eq!(manual.amount, None);
            assert_eq!(manual.unit, None);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_negative_macros_are_refused_by_the_store() {
        let db = Database::open_in_memory().unwrap();
        let mut data = meal("Broken", 100.0, "2025-01-09T07:00:00.000Z");
        data.macros.protein = -4.0;
        assert!(db.with_conn(|conn| LoggedMeal::create(conn, &data)).is_err());
    }
}
