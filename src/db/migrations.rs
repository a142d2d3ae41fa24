//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- MEAL ENTRIES
        -- What was eaten, already scaled to the portion
        -- ============================================
        CREATE TABLE meal_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            kcal REAL NOT NULL DEFAULT 0 CHECK(kcal >= 0),
            protein REAL NOT NULL DEFAULT 0 CHECK(protein >= 0),  -- grams
            fat REAL NOT NULL DEFAULT 0 CHECK(fat >= 0),          -- grams
            carbs REAL NOT NULL DEFAULT 0 CHECK(carbs >= 0),      -- grams
            amount REAL,                         -- eaten quantity, NULL for manual meals
            unit TEXT,
            eaten_at TEXT NOT NULL,              -- UTC, %Y-%m-%dT%H:%M:%S%.3fZ
            note TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meal_entries_eaten_at ON meal_entries(eaten_at);

        -- ============================================
        -- ACTIVITIES
        -- ============================================
        CREATE TABLE activities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            activity_name TEXT NOT NULL,
            duration_minutes REAL NOT NULL CHECK(duration_minutes > 0),
            calories REAL NOT NULL CHECK(calories >= 0),
            occurred_at TEXT NOT NULL,           -- UTC, %Y-%m-%dT%H:%M:%S%.3fZ
            intensity TEXT,                      -- "manual" when not from the catalog
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_activities_occurred_at ON activities(occurred_at);

        -- ============================================
        -- DAILY STATES
        -- One row per calendar date (water intake)
        -- ============================================
        CREATE TABLE daily_states (
            date TEXT PRIMARY KEY,               -- ISO date: "2025-01-09"
            water_intake_ml REAL NOT NULL DEFAULT 0,
            water_goal_ml REAL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- PROFILE
        -- Single row holding body measurements and goals
        -- ============================================
        CREATE TABLE profile (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            height_cm REAL,
            start_weight_kg REAL,
            current_weight_kg REAL,
            goal_weight_kg REAL,
            calorie_goal REAL,
            water_goal_ml REAL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration; a fresh file always does
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let tracked: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations')",
        [],
        |row| row.get(0),
    )?;
    if !tracked {
        return Ok(true);
    }
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
