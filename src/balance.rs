//! Daily energy balance
//!
//! Folds a day's meals and activities into consumed, burned and balance
//! figures against the user's goals. Calendar-agnostic: callers decide
//! which entries belong to the day (see [`crate::calendar::day_window`]).

use serde::Serialize;

use crate::models::{LoggedActivity, LoggedMeal, Macros};

/// Balance at or below this share of the goal is "good"
pub const GOOD_UPPER_RATIO: f64 = 0.9;
/// Balance at or below this share of the goal (and above good) is "borderline"
pub const BORDERLINE_UPPER_RATIO: f64 = 1.1;

/// Presentation band for a day's balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    Good,
    Borderline,
    Over,
}

/// Derived daily figures; recomputed on every read, never stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBalance {
    pub consumed: f64,
    pub burned: f64,
    pub balance: f64,
    pub target: f64,
    pub progress_ratio: f64,
    pub consumed_macros: Macros,
    pub water_ml: f64,
    pub water_goal_ml: f64,
    pub water_ratio: f64,
}

impl DailyBalance {
    pub fn status(&self) -> BalanceStatus {
        band(self.balance, self.target)
    }

    /// Water progress in percent, capped at 100 for display
    pub fn water_percent(&self) -> f64 {
        (self.water_ratio * 100.0).min(100.0)
    }
}

/// Band a balance against a goal; both thresholds are inclusive
pub fn band(balance: f64, goal_kcal: f64) -> BalanceStatus {
    if balance <= GOOD_UPPER_RATIO * goal_kcal {
        BalanceStatus::Good
    } else if balance <= BORDERLINE_UPPER_RATIO * goal_kcal {
        BalanceStatus::Borderline
    } else {
        BalanceStatus::Over
    }
}

/// Fold meals and activities into a daily balance
pub fn aggregate(
    meals: &[LoggedMeal],
    activities: &[LoggedActivity],
    goal_kcal: f64,
    goal_water_ml: f64,
    water_logged_ml: f64,
) -> DailyBalance {
    let consumed_macros: Macros = meals.iter().map(LoggedMeal::macros).sum();
    let consumed = consumed_macros.kcal;
    let burned: f64 = activities.iter().map(|a| a.calories).sum();
    let balance = consumed - burned;

    DailyBalance {
        consumed,
        burned,
        balance,
        target: goal_kcal,
        progress_ratio: ratio(balance, goal_kcal).clamp(0.0, 1.0),
        consumed_macros,
        water_ml: water_logged_ml,
        water_goal_ml: goal_water_ml,
        water_ratio: ratio(water_logged_ml, goal_water_ml),
    }
}

/// `value / goal`, or 0 when the goal is zero or not a number
fn ratio(value: f64, goal: f64) -> f64 {
    if goal == 0.0 || !goal.is_finite() {
        0.0
    } else {
        value / goal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(kcal: f64) -> LoggedMeal {
        LoggedMeal {
            id: 0,
            name: "meal".to_string(),
            kcal,
            protein: 10.0,
            fat: 5.0,
            carbs: 20.0,
            eaten_at: "2025-01-09T12:00:00.000Z".to_string(),
            note: None,
            amount: None,
            unit: None,
            created_at: String::new(),
        }
    }

    fn activity(calories: f64) -> LoggedActivity {
        LoggedActivity {
            id: 0,
            activity_name: "walk".to_string(),
            duration_minutes: 30.0,
            calories,
            occurred_at: "2025-01-09T18:00:00.000Z".to_string(),
            intensity: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_aggregate_example_day() {
        let day = aggregate(
            &[meal(320.0), meal(540.0)],
            &[activity(110.0), activity(45.0)],
            1900.0,
            2000.0,
            900.0,
        );
        assert_eq!(day.consumed, 860.0);
        assert_eq!(day.burned, 155.0);
        assert_eq!(day.balance, 705.0);
        assert_eq!(day.status(), BalanceStatus::Good);
        assert!((day.progress_ratio - 705.0 / 1900.0).abs() < 1e-9);
        assert_eq!(day.consumed_macros.protein, 20.0);
        assert!((day.water_ratio - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_empty_day() {
        let day = aggregate(&[], &[], 1900.0, 2000.0, 0.0);
        assert_eq!(day.consumed, 0.0);
        assert_eq!(day.burned, 0.0);
        assert_eq!(day.balance, 0.0);
        assert_eq!(day.progress_ratio, 0.0);
    }

    #[test]
    fn test_negative_balance_clamps_progress() {
        let day = aggregate(&[meal(100.0)], &[activity(400.0)], 1900.0, 2000.0, 0.0);
        assert_eq!(day.balance, -300.0);
        assert_eq!(day.progress_ratio, 0.0);
        assert_eq!(day.status(), BalanceStatus::Good);
    }

    #[test]
    fn test_progress_caps_at_one() {
        let day = aggregate(&[meal(2500.0)], &[], 1900.0, 2000.0, 0.0);
        assert_eq!(day.progress_ratio, 1.0);
        assert_eq!(day.status(), BalanceStatus::Over);
    }

    #[test]
    fn test_zero_goals_do_not_divide() {
        let day = aggregate(&[meal(500.0)], &[], 0.0, 0.0, 300.0);
        assert_eq!(day.progress_ratio, 0.0);
        assert_eq!(day.water_ratio, 0.0);
    }

    #[test]
    fn test_band_boundaries() {
        let goal = 2000.0;
        assert_eq!(band(1800.0, goal), BalanceStatus::Good);
        assert_eq!(band(1800.5, goal), BalanceStatus::Borderline);
        assert_eq!(band(2200.0, goal), BalanceStatus::Borderline);
        assert_eq!(band(2200.5, goal), BalanceStatus::Over);
    }

    #[test]
    fn test_water_is_independent_of_balance() {
        let dry = aggregate(&[meal(700.0)], &[], 1900.0, 2000.0, 0.0);
        let wet = aggregate(&[meal(700.0)], &[], 1900.0, 2000.0, 3000.0);
        assert_eq!(dry.balance, wet.balance);
        assert_eq!(dry.progress_ratio, wet.progress_ratio);
        assert!((wet.water_ratio - 1.5).abs() < 1e-9);
        assert_eq!(wet.water_percent(), 100.0);
    }
}
