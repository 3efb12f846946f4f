//! Input validation functions
//!
//! Field-level checks for user input, run before anything is persisted.
//! Request types in [`crate::types`] also derive `validator::Validate` for the
//! simple bounds; the checks here cover the rest.

/// Upper bound for a single serving weight
pub const MAX_SERVING_GRAMS: f64 = 5000.0;

/// Upper bound for servings in one log entry
pub const MAX_QUANTITY: f64 = 100.0;

/// Decimal places a stored quantity keeps
pub const QUANTITY_DECIMALS: i32 = 3;

/// Upper bound for a calorie amount or goal
pub const MAX_CALORIES: f64 = 50000.0;

/// Validate a serving weight in grams
pub fn validate_serving_grams(grams: f64) -> Result<(), String> {
    if grams.is_nan() || grams.is_infinite() {
        return Err("Serving weight must be a valid number".to_string());
    }
    if grams <= 0.0 {
        return Err("Serving weight must be greater than 0 g".to_string());
    }
    if grams > MAX_SERVING_GRAMS {
        return Err(format!("Serving weight must be at most {MAX_SERVING_GRAMS} g"));
    }
    Ok(())
}

/// Validate a number of servings
pub fn validate_quantity(quantity: f64) -> Result<(), String> {
    if quantity.is_nan() || quantity.is_infinite() {
        return Err("Quantity must be a valid number".to_string());
    }
    if quantity <= 0.0 {
        return Err("Quantity must be greater than 0".to_string());
    }
    if quantity > MAX_QUANTITY {
        return Err(format!("Quantity must be at most {MAX_QUANTITY}"));
    }
    let scale = 10f64.powi(QUANTITY_DECIMALS);
    if (quantity * scale).round() / scale != quantity {
        return Err(format!("Quantity can have at most {QUANTITY_DECIMALS} decimal places"));
    }
    Ok(())
}

/// Validate calorie value
pub fn validate_calories(calories: f64) -> Result<(), String> {
    if calories.is_nan() || calories.is_infinite() {
        return Err("Calories must be a valid number".to_string());
    }
    if calories < 0.0 {
        return Err("Calories cannot be negative".to_string());
    }
    if calories > MAX_CALORIES {
        return Err("Calorie value unreasonably high".to_string());
    }
    Ok(())
}

/// Validate a daily calorie goal, which unlike a logged amount must be positive
pub fn validate_calorie_goal(calories: f64) -> Result<(), String> {
    validate_calories(calories)?;
    if calories == 0.0 {
        return Err("Calorie goal must be greater than 0".to_string());
    }
    Ok(())
}

/// Validate a macro gram goal
pub fn validate_macro_goal(grams: f64) -> Result<(), String> {
    if grams.is_nan() || grams.is_infinite() {
        return Err("Goal must be a valid number".to_string());
    }
    if grams < 0.0 {
        return Err("Goal cannot be negative".to_string());
    }
    Ok(())
}

/// Validate percentage value (0-100)
pub fn validate_percentage(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Percentage must be a valid number".to_string());
    }
    if !(0.0..=100.0).contains(&value) {
        return Err("Percentage must be between 0 and 100".to_string());
    }
    Ok(())
}

/// Validate a serving name such as "1 cup"
pub fn validate_serving_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Serving name cannot be empty".to_string());
    }
    if trimmed.len() > 100 {
        return Err("Serving name too long".to_string());
    }
    Ok(())
}

/// Validate a meal identifier
pub fn validate_meal_id(meal_id: &str) -> Result<(), String> {
    if meal_id.trim().is_empty() {
        return Err("Meal cannot be empty".to_string());
    }
    if meal_id.len() > 64 {
        return Err("Meal identifier too long".to_string());
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "calories" => "Calories",
        "carbs" => "Carbohydrates",
        "protein" => "Protein",
        "fat" => "Fat",
        "sugar" => "Sugar",
        "sodium" => "Sodium",
        "fiber" => "Fiber",
        "serving_grams" | "grams" => "Serving Weight",
        "serving_name" => "Serving Name",
        "quantity" => "Quantity",
        "meal_id" => "Meal",
        "carb_pct" => "Carbohydrate %",
        "protein_pct" => "Protein %",
        "fat_pct" => "Fat %",
        "split" => "Macro Split",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Run a field check, attaching the field name on failure
    pub fn check(field: &str, result: Result<(), String>) -> Result<(), Self> {
        result.map_err(|message| Self::new(field, &message))
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_serving_grams() {
        assert!(validate_serving_grams(170.0).is_ok());
        assert!(validate_serving_grams(0.5).is_ok());
        assert!(validate_serving_grams(0.0).is_err());
        assert!(validate_serving_grams(-10.0).is_err());
        assert!(validate_serving_grams(6000.0).is_err());
        assert!(validate_serving_grams(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1.0).is_ok());
        assert!(validate_quantity(0.25).is_ok());
        assert!(validate_quantity(0.0).is_err());
        assert!(validate_quantity(-1.0).is_err());
        assert!(validate_quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_quantity_decimals() {
        assert!(validate_quantity(1.125).is_ok());
        assert!(validate_quantity(0.001).is_ok());
        assert!(validate_quantity(0.1).is_ok());
        assert!(validate_quantity(0.0004).is_err());
        assert!(validate_quantity(1.23456).is_err());
        let err = validate_quantity(0.0004).unwrap_err();
        assert!(err.contains("3 decimal places"));
    }

    #[test]
    fn test_validate_calories() {
        assert!(validate_calories(0.0).is_ok());
        assert!(validate_calories(2000.0).is_ok());
        assert!(validate_calories(-1.0).is_err());
        assert!(validate_calories(100000.0).is_err());
    }

    #[test]
    fn test_validate_calorie_goal() {
        assert!(validate_calorie_goal(1800.0).is_ok());
        assert!(validate_calorie_goal(0.0).is_err());
        assert!(validate_calorie_goal(-100.0).is_err());
    }

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage(0.0).is_ok());
        assert!(validate_percentage(50.0).is_ok());
        assert!(validate_percentage(100.0).is_ok());
        assert!(validate_percentage(-1.0).is_err());
        assert!(validate_percentage(101.0).is_err());
    }

    #[test]
    fn test_validate_names() {
        assert!(validate_serving_name("1 cup").is_ok());
        assert!(validate_serving_name("   ").is_err());
        assert!(validate_serving_name(&"x".repeat(101)).is_err());
        assert!(validate_meal_id("breakfast").is_ok());
        assert!(validate_meal_id("").is_err());
    }

    #[test]
    fn test_field_display_labels() {
        assert_eq!(get_field_display_label("carbs"), "Carbohydrates");
        assert_eq!(get_field_display_label("serving_grams"), "Serving Weight");
        assert_eq!(get_field_display_label("unknown_field"), "unknown_field");
    }

    #[test]
    fn test_validation_error() {
        let err = ValidationError::check("quantity", validate_quantity(0.0)).unwrap_err();
        assert_eq!(err.field, "quantity");
        assert_eq!(err.display_label, "Quantity");
        assert_eq!(err.user_message(), "Quantity: Quantity must be greater than 0");
        assert!(ValidationError::check("quantity", validate_quantity(2.0)).is_ok());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_serving_grams(grams in 0.1f64..=5000.0) {
            prop_assert!(validate_serving_grams(grams).is_ok());
        }

        #[test]
        fn prop_valid_quantity(quantity in (1u32..=100_000).prop_map(|n| f64::from(n) / 1000.0)) {
            prop_assert!(validate_quantity(quantity).is_ok());
        }

        #[test]
        fn prop_valid_percentage_range(pct in 0.0f64..=100.0) {
            prop_assert!(validate_percentage(pct).is_ok());
        }
    }
}
