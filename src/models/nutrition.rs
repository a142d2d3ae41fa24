//! Shared macro totals
//!
//! Used by meal entries, portions and day balances.

use serde::{Deserialize, Serialize};

/// Energy and macronutrients of something eaten
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub kcal: f64,
    pub protein: f64, // grams
    pub fat: f64,     // grams
    pub carbs: f64,   // grams
}

impl Macros {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale all values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            kcal: self.kcal * multiplier,
            protein: self.protein * multiplier,
            fat: self.fat * multiplier,
            carbs: self.carbs * multiplier,
        }
    }

    /// Energy to whole kcal, macros to one decimal
    pub fn rounded(&self) -> Self {
        Self {
            kcal: self.kcal.round(),
            protein: round1(self.protein),
            fat: round1(self.fat),
            carbs: round1(self.carbs),
        }
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros {
            kcal: self.kcal + other.kcal,
            protein: self.protein + other.protein,
            fat: self.fat + other.fat,
            carbs: self.carbs + other.carbs,
        }
    }
}

impl std::ops::Mul<f64> for Macros {
    type Output = Macros;

    fn mul(self, multiplier: f64) -> Macros {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Macros::zero(), |acc, m| acc + m)
    }
}
