//! API request and response types

use crate::goals::{DailyGoals, GoalSettings, MacroSplit};
use crate::models::{AbsoluteNutrition, NutrientProfile, ServingDefinition};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Conversion Types
// ============================================================================

/// Nutrients on one basis plus the serving weight to convert with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub nutrients: NutrientProfile,
    pub serving_grams: f64,
}

/// Resolve the nutrition of a quantity of servings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResolveRequest {
    pub per_100g: NutrientProfile,
    /// Omitted means the implicit 100 g serving
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub serving_grams: Option<f64>,
    #[validate(range(min = 0.0))]
    pub quantity: f64,
}

/// Absolute nutrition for a resolved serving
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub grams: f64,
    pub nutrition: AbsoluteNutrition,
}

/// Serving display query parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServingDisplayQuery {
    pub quantity: f64,
    #[serde(default)]
    pub serving_name: Option<String>,
}

/// Serving display response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServingDisplayResponse {
    pub display: String,
}

// ============================================================================
// Food Types
// ============================================================================

/// Which basis the nutrients of a new food are entered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NutrientBasis {
    #[default]
    PerServing,
    Per100g,
}

/// Serving input when creating a food
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServingInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub grams: f64,
    #[serde(default)]
    pub is_default: bool,
}

/// Create food request.
///
/// With the per-serving basis, `nutrients` describe the first serving and are
/// converted to per-100g before storage.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFoodRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub brand: Option<String>,
    #[serde(default)]
    pub basis: NutrientBasis,
    pub nutrients: NutrientProfile,
    #[serde(default)]
    #[validate(nested)]
    pub servings: Vec<ServingInput>,
}

/// Food response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub per_100g: NutrientProfile,
    pub servings: Vec<ServingDefinition>,
    /// Default serving, or the implicit 100 g one
    pub default_serving: ServingDefinition,
}

// ============================================================================
// Log Types
// ============================================================================

/// Log food request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogFoodRequest {
    pub food_id: String,
    #[validate(length(min = 1, max = 64))]
    pub meal_id: String,
    /// Omitted means the food's default serving
    #[serde(default)]
    pub serving_id: Option<String>,
    pub quantity: f64,
    /// Defaults to today (UTC)
    #[serde(default)]
    pub log_date: Option<NaiveDate>,
    /// Defaults to now
    #[serde(default)]
    pub log_time: Option<DateTime<Utc>>,
}

/// Quick add request: raw nutrient amounts with no food record
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuickAddRequest {
    #[validate(length(min = 1, max = 64))]
    pub meal_id: String,
    #[serde(flatten)]
    pub nutrition: AbsoluteNutrition,
    #[serde(default)]
    pub log_date: Option<NaiveDate>,
    #[serde(default)]
    pub log_time: Option<DateTime<Utc>>,
}

/// Edit a logged food; omitted fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateLogRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub meal_id: Option<String>,
    #[serde(default)]
    pub serving_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
}

/// Date query parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Week query parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekQuery {
    #[serde(default)]
    pub start: Option<NaiveDate>,
}

// ============================================================================
// Goal Types
// ============================================================================

/// Allocate gram goals from a percentage split
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AllocateRequest {
    #[validate(range(min = 0.0, max = 50000.0))]
    pub calories: f64,
    pub split: MacroSplit,
}

/// Result of checking a percentage split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitValidationResponse {
    pub total: f64,
    pub is_valid: bool,
}

/// Saved goals together with both representations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsResponse {
    pub settings: GoalSettings,
    pub daily_goals: DailyGoals,
    pub split: MacroSplit,
}
