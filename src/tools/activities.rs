//! Activity Tools
//!
//! Browsing the activity catalog, estimating burns and logging activities.

use chrono::Local;
use serde::Serialize;

use crate::calendar::{format_timestamp, resolve_timestamp};
use crate::db::Database;
use crate::energy::{catalog, estimate_burn, ActivityType, BurnEstimate};
use crate::models::{LoggedActivity, LoggedActivityCreate, Profile, MANUAL_INTENSITY};

use super::meals::DeleteResponse;

// ============================================================================
// Response Structs
// ============================================================================

/// A catalog category and its activities
#[derive(Debug, Serialize)]
pub struct ActivityCategory {
    pub category: &'static str,
    pub activities: Vec<ActivityType>,
}

/// Response for list_activity_types
#[derive(Debug, Serialize)]
pub struct ListActivityTypesResponse {
    pub categories: Vec<ActivityCategory>,
    pub total: usize,
}

/// Response for estimate_activity
#[derive(Debug, Serialize)]
pub struct EstimateActivityResponse {
    pub activity: ActivityType,
    pub duration_minutes: f64,
    pub estimate: BurnEstimate,
    pub loggable: bool,
}

/// Response for log_activity
#[derive(Debug, Serialize)]
pub struct LogActivityResponse {
    pub activity: LoggedActivity,
    /// Present when calories were estimated from the catalog
    pub estimate: Option<BurnEstimate>,
}

/// What to log: a catalog activity or a manually entered one
#[derive(Debug, Clone, Copy)]
pub enum ActivitySource<'a> {
    Catalog { activity_id: &'a str },
    Manual { name: &'a str, calories: f64 },
}

// ============================================================================
// Tool Functions
// ============================================================================

/// List catalog activities grouped by category, optionally filtered
pub fn list_activity_types(query: Option<&str>) -> ListActivityTypesResponse {
    let matches = catalog::search(query.unwrap_or(""));
    let total = matches.len();

    let categories = catalog::by_category(&matches)
        .into_iter()
        .map(|(category, members)| ActivityCategory {
            category,
            activities: members.into_iter().copied().collect(),
        })
        .collect();

    ListActivityTypesResponse { categories, total }
}

/// Estimate the burn for a catalog activity with the profile's weight
pub fn estimate_activity(
    db: &Database,
    activity_id: &str,
    duration_minutes: f64,
) -> Result<EstimateActivityResponse, String> {
    let activity = find_activity(activity_id)?;
    let profile = db
        .with_conn(Profile::load)
        .map_err(|e| format!("Database error: {}", e))?;

    let estimate = estimate_burn(activity.met, profile.current_weight_kg, duration_minutes);

    Ok(EstimateActivityResponse {
        activity: *activity,
        duration_minutes,
        loggable: duration_minutes > 0.0 && estimate.is_loggable(),
        estimate,
    })
}

/// Log an activity
///
/// Catalog activities get their calories from the MET estimate; manual
/// activities carry their own. Either way a non-positive duration or
/// calorie figure is rejected before anything is stored.
pub fn log_activity(
    db: &Database,
    source: ActivitySource<'_>,
    duration_minutes: f64,
    date: Option<&str>,
    time: Option<&str>,
) -> Result<LogActivityResponse, String> {
    if !duration_minutes.is_finite() || duration_minutes <= 0.0 {
        return Err(format!("Duration must be greater than 0 minutes, got {}", duration_minutes));
    }

    let (activity_name, calories, intensity, estimate) = match source {
        ActivitySource::Catalog { activity_id } => {
            let activity = find_activity(activity_id)?;
            let profile = db
                .with_conn(Profile::load)
                .map_err(|e| format!("Database error: {}", e))?;
            let estimate = estimate_burn(activity.met, profile.current_weight_kg, duration_minutes);
            if estimate.weight_is_reference {
                tracing::debug!(
                    "No weight on profile, estimating '{}' with reference weight",
                    activity.id
                );
            }
            (
                activity.name.to_string(),
                estimate.kcal as f64,
                Some(activity.category.to_string()),
                Some(estimate),
            )
        }
        ActivitySource::Manual { name, calories } => {
            let name = name.trim();
            if name.is_empty() {
                return Err("Activity name must not be empty".to_string());
            }
            (
                name.to_string(),
                calories.round(),
                Some(MANUAL_INTENSITY.to_string()),
                None,
            )
        }
    };

    if !calories.is_finite() || calories <= 0.0 {
        return Err(format!(
            "Calories burned must be greater than 0, got {} for '{}'",
            calories, activity_name
        ));
    }

    let occurred_at = resolve_timestamp(date, time, &Local)?;
    let data = LoggedActivityCreate {
        activity_name,
        duration_minutes,
        calories,
        occurred_at: format_timestamp(occurred_at),
        intensity,
    };

    let activity = db
        .with_conn(|conn| LoggedActivity::create(conn, &data))
        .map_err(|e| format!("Database error: {}", e))?;

    tracing::info!(
        "Logged activity '{}' ({} min, {} kcal)",
        activity.activity_name,
        activity.duration_minutes,
        activity.calories
    );

    Ok(LogActivityResponse { activity, estimate })
}

/// Delete a logged activity
pub fn delete_activity(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let deleted = db
        .with_conn(|conn| LoggedActivity::delete(conn, id))
        .map_err(|e| format!("Database error: {}", e))?;

    if !deleted {
        return Err(format!("Activity with id {} not found", id));
    }

    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

fn find_activity(activity_id: &str) -> Result<&'static ActivityType, String> {
    catalog::find(activity_id).ok_or_else(|| {
        format!(
            "Unknown activity type '{}'. Use list_activity_types to see valid ids",
            activity_id
        )
    })
}
