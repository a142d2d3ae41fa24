//! Data models
//!
//! Rust structs representing database entities.

mod activity;
mod daily_state;
mod meal_entry;
mod nutrition;
mod profile;

pub use activity::{LoggedActivity, LoggedActivityCreate, MANUAL_INTENSITY};
pub use daily_state::DailyState;
pub use meal_entry::{LoggedMeal, LoggedMealCreate};
pub use nutrition::{round1, Macros};
pub use profile::{Profile, ProfileUpdate, DEFAULT_CALORIE_GOAL, DEFAULT_WATER_GOAL_ML};
