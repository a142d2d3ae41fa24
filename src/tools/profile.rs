//! Profile Tools
//!
//! Body measurements, weight target and daily goals.

use serde::Serialize;

use crate::db::Database;
use crate::energy::REFERENCE_WEIGHT_KG;
use crate::models::{round1, Profile, ProfileUpdate};

/// Response for get_profile and set_profile
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub height_cm: Option<f64>,
    pub start_weight_kg: Option<f64>,
    pub current_weight_kg: Option<f64>,
    pub goal_weight_kg: Option<f64>,
    /// Current minus goal weight, when both are set
    pub to_goal_kg: Option<f64>,
    /// Weight used for burn estimates
    pub effective_weight_kg: f64,
    pub calorie_goal: f64,
    pub water_goal_ml: f64,
    pub calorie_goal_is_default: bool,
    pub water_goal_is_default: bool,
    pub updated_at: Option<String>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            to_goal_kg: profile.to_goal_kg().map(round1),
            height_cm: profile.height_cm,
            start_weight_kg: profile.start_weight_kg,
            current_weight_kg: profile.current_weight_kg,
            goal_weight_kg: profile.goal_weight_kg,
            effective_weight_kg: profile.current_weight_kg.unwrap_or(REFERENCE_WEIGHT_KG),
            calorie_goal: profile.calorie_goal_or_default(),
            water_goal_ml: profile.water_goal_or_default(),
            calorie_goal_is_default: profile.calorie_goal.is_none(),
            water_goal_is_default: profile.water_goal_ml.is_none(),
            updated_at: profile.updated_at,
        }
    }
}

/// Get the profile with defaults filled in
pub fn get_profile(db: &Database) -> Result<ProfileResponse, String> {
    db.with_conn(Profile::load)
        .map(ProfileResponse::from)
        .map_err(|e| format!("Database error: {}", e))
}

/// Update any subset of the profile fields; unset fields are kept
pub fn set_profile(db: &Database, update: ProfileUpdate) -> Result<ProfileResponse, String> {
    let data = ProfileUpdate {
        height_cm: positive("height_cm", update.height_cm)?,
        start_weight_kg: positive("start_weight_kg", update.start_weight_kg)?,
        current_weight_kg: positive("current_weight_kg", update.current_weight_kg)?,
        goal_weight_kg: positive("goal_weight_kg", update.goal_weight_kg)?,
        calorie_goal: positive("calorie_goal", update.calorie_goal)?,
        water_goal_ml: positive("water_goal_ml", update.water_goal_ml)?,
    };

    let fields = [
        data.height_cm,
        data.start_weight_kg,
        data.current_weight_kg,
        data.goal_weight_kg,
        data.calorie_goal,
        data.water_goal_ml,
    ];
    if fields.iter().all(Option::is_none) {
        return Err(
            "Nothing to update. Provide a height, weight, goal weight, calorie goal or water goal"
                .to_string(),
        );
    }

    let profile = db
        .with_conn(|conn| Profile::update(conn, &data))
        .map_err(|e| format!("Database error: {}", e))?;

    tracing::info!("Profile updated");
    Ok(profile.into())
}

fn positive(field: &str, value: Option<f64>) -> Result<Option<f64>, String> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => {
            Err(format!("{} must be greater than 0, got {}", field, v))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_profile_defaults() {
        let db = Database::open_in_memory().unwrap();
        let profile = get_profile(&db).unwrap();
        assert_eq!(profile.current_weight_kg, None);
        assert_eq!(profile.effective_weight_kg, 70.0);
        assert_eq!(profile.calorie_goal, 1900.0);
        assert_eq!(profile.water_goal_ml, 2000.0);
        assert!(profile.calorie_goal_is_default);
        assert_eq!(profile.to_goal_kg, None);
    }

    #[test]
    fn test_partial_updates_keep_other_fields() {
        let db = Database::open_in_memory().unwrap();
        set_profile(&db, ProfileUpdate { current_weight_kg: Some(82.5), ..Default::default() }).unwrap();
        let profile =
            set_profile(&db, ProfileUpdate { calorie_goal: Some(2200.0), ..Default::default() }).unwrap();

        assert_eq!(profile.current_weight_kg, Some(82.5));
        assert_eq!(profile.calorie_goal, 2200.0);
        assert!(profile.water_goal_is_default);
        assert!(profile.updated_at.is_some());
    }

    #[test]
    fn test_set_profile_validation() {
        let db = Database::open_in_memory().unwrap();
        assert!(set_profile(&db, ProfileUpdate::default()).is_err());
        assert!(set_profile(&db, ProfileUpdate { current_weight_kg: Some(0.0), ..Default::default() }).is_err());
        assert!(set_profile(&db, ProfileUpdate { calorie_goal: Some(-100.0), ..Default::default() }).is_err());
        assert!(set_profile(&db, ProfileUpdate { water_goal_ml: Some(f64::INFINITY), ..Default::default() }).is_err());
        assert!(set_profile(&db, ProfileUpdate { goal_weight_kg: Some(-60.0), ..Default::default() }).is_err());
    }

    #[test]
    fn test_weight_target_reports_distance_to_goal() {
        let db = Database::open_in_memory().unwrap();
        let profile = set_profile(
            &db,
            ProfileUpdate {
                height_cm: Some(168.0),
                start_weight_kg: Some(72.0),
                current_weight_kg: Some(68.4),
                goal_weight_kg: Some(60.0),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(profile.height_cm, Some(168.0));
        assert_eq!(profile.start_weight_kg, Some(72.0));
        assert_eq!(profile.to_goal_kg, Some(8.4));
        assert_eq!(profile.effective_weight_kg, 68.4);
    }
}
