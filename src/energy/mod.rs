//! Energy expenditure module
//!
//! MET-based calorie estimation and the activity catalog.

pub mod catalog;
pub mod met;

pub use catalog::{ActivityType, ACTIVITY_TYPES};
pub use met::{estimate, estimate_burn, BurnEstimate, REFERENCE_WEIGHT_KG};
