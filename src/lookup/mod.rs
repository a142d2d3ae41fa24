//! Product lookup
//!
//! Sources of normalized nutrition records: by barcode and by name.

pub mod open_food_facts;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::nutrition::NutritionRecord;

pub use open_food_facts::OpenFoodFacts;

/// Product lookup errors
///
/// A product that does not exist is not an error; lookups return `None`
/// or an empty list for that.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A product database
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Look up one product by barcode
    async fn by_barcode(&self, code: &str) -> Result<Option<NutritionRecord>, LookupError>;

    /// Search products by name
    async fn search(&self, term: &str, limit: u32) -> Result<Vec<NutritionRecord>, LookupError>;
}

/// Result of a name search, ready for selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "products", rename_all = "snake_case")]
pub enum SearchOutcome {
    NoMatch,
    /// Exactly one product; callers can select it without asking
    Single(NutritionRecord),
    /// Several products; the user picks one
    Choices(Vec<NutritionRecord>),
}

impl From<Vec<NutritionRecord>> for SearchOutcome {
    fn from(mut records: Vec<NutritionRecord>) -> Self {
        match records.len() {
            0 => SearchOutcome::NoMatch,
            1 => SearchOutcome::Single(records.remove(0)),
            _ => SearchOutcome::Choices(records),
        }
    }
}

impl SearchOutcome {
    pub fn len(&self) -> usize {
        match self {
            SearchOutcome::NoMatch => 0,
            SearchOutcome::Single(_) => 1,
            SearchOutcome::Choices(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
