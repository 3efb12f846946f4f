//! Database repositories
//!
//! Data access for foods, log entries and goals. Nutrient columns are
//! `NUMERIC` and read through `rust_decimal`; conversion to the engine's
//! `f64` values happens at this boundary.

pub mod foods;
pub mod goals;
pub mod log_entries;

pub use foods::{CreateFood, CreateServing, FoodRepository, FoodRow, ServingRow};
pub use goals::{GoalsRepository, GoalsRow};
pub use log_entries::{
    FoodUsageRow, LogEntryChanges, LogEntryRepository, LogEntryRow, NewLogEntry,
};

use macrotrack_shared::NutrientProfile;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Convert a NUMERIC column value to f64
pub(crate) fn dec_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Convert an engine value to a NUMERIC bind parameter
pub(crate) fn f64_to_dec(f: f64) -> Decimal {
    Decimal::try_from(f).unwrap_or(Decimal::ZERO)
}

/// Nutrient columns shared by `foods` and `log_entries`
pub(crate) struct NutrientColumns {
    pub calories: Decimal,
    pub carbs: Decimal,
    pub protein: Decimal,
    pub fat: Decimal,
    pub sugar: Option<Decimal>,
    pub sodium: Option<Decimal>,
    pub fiber: Option<Decimal>,
}

impl NutrientColumns {
    pub fn from_profile(profile: &NutrientProfile) -> Self {
        Self {
            calories: f64_to_dec(profile.calories),
            carbs: f64_to_dec(profile.carbs),
            protein: f64_to_dec(profile.protein),
            fat: f64_to_dec(profile.fat),
            sugar: profile.sugar.map(f64_to_dec),
            sodium: profile.sodium.map(f64_to_dec),
            fiber: profile.fiber.map(f64_to_dec),
        }
    }

    pub fn into_profile(self) -> NutrientProfile {
        NutrientProfile {
            calories: dec_to_f64(self.calories),
            carbs: dec_to_f64(self.carbs),
            protein: dec_to_f64(self.protein),
            fat: dec_to_f64(self.fat),
            sugar: self.sugar.map(dec_to_f64),
            sodium: self.sodium.map(dec_to_f64),
            fiber: self.fiber.map(dec_to_f64),
        }
    }
}
