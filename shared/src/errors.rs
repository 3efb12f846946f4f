//! Error types for the nutrition engine

use chrono::NaiveDate;
use thiserror::Error;

/// Precondition failures raised by the conversion, resolution, aggregation
/// and goal functions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NutritionError {
    #[error("Invalid serving weight: {0} g")]
    InvalidServingWeight(f64),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(f64),

    #[error("Macro percentages must total 100% (got {total}%)")]
    InvalidGoalPercentageSplit { total: f64 },

    #[error("Missing required nutrient: {0}")]
    MissingRequiredNutrient(&'static str),

    #[error("Nutrient {0} must be a non-negative number")]
    NegativeNutrient(&'static str),

    #[error("Date range starting {start} runs past the supported calendar")]
    DateOutOfRange { start: NaiveDate },
}

impl NutritionError {
    /// Input field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidServingWeight(_) => "serving_grams",
            Self::InvalidQuantity(_) => "quantity",
            Self::InvalidGoalPercentageSplit { .. } => "split",
            Self::MissingRequiredNutrient(name) | Self::NegativeNutrient(name) => name,
            Self::DateOutOfRange { .. } => "start",
        }
    }
}

/// Result alias used throughout the engine
pub type NutritionResult<T> = Result<T, NutritionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            NutritionError::InvalidServingWeight(0.0).to_string(),
            "Invalid serving weight: 0 g"
        );
        assert_eq!(
            NutritionError::InvalidGoalPercentageSplit { total: 105.0 }.to_string(),
            "Macro percentages must total 100% (got 105%)"
        );
        assert_eq!(
            NutritionError::MissingRequiredNutrient("calories").to_string(),
            "Missing required nutrient: calories"
        );
    }

    #[test]
    fn test_error_fields() {
        assert_eq!(NutritionError::InvalidQuantity(0.0).field(), "quantity");
        assert_eq!(NutritionError::NegativeNutrient("sodium").field(), "sodium");
        assert_eq!(
            NutritionError::DateOutOfRange { start: NaiveDate::MAX }.field(),
            "start"
        );
    }
}
