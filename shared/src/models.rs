//! Data models for nutrition records

use crate::errors::NutritionError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Nutrient amounts for some basis (per 100 g, per serving, or absolute).
///
/// `calories`, `carbs`, `protein` and `fat` are always known. The optional
/// nutrients distinguish "unknown" (`None`) from "measured as none" (`Some(0.0)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNutrients")]
pub struct NutrientProfile {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
}

/// Absolute nutrient amounts for a log entry
pub type AbsoluteNutrition = NutrientProfile;

/// Wire form of a nutrient profile before validation
#[derive(Deserialize)]
struct RawNutrients {
    calories: Option<f64>,
    #[serde(default)]
    carbs: f64,
    #[serde(default)]
    protein: f64,
    #[serde(default)]
    fat: f64,
    #[serde(default)]
    sugar: Option<f64>,
    #[serde(default)]
    sodium: Option<f64>,
    #[serde(default)]
    fiber: Option<f64>,
}

impl TryFrom<RawNutrients> for NutrientProfile {
    type Error = NutritionError;

    fn try_from(raw: RawNutrients) -> Result<Self, Self::Error> {
        let calories = raw
            .calories
            .ok_or(NutritionError::MissingRequiredNutrient("calories"))?;

        let profile = Self {
            calories,
            carbs: raw.carbs,
            protein: raw.protein,
            fat: raw.fat,
            sugar: raw.sugar,
            sodium: raw.sodium,
            fiber: raw.fiber,
        };
        profile.validate()?;
        Ok(profile)
    }
}

impl NutrientProfile {
    /// Create a profile with the required nutrients and no optional ones
    pub fn new(calories: f64, carbs: f64, protein: f64, fat: f64) -> Self {
        Self {
            calories,
            carbs,
            protein,
            fat,
            sugar: None,
            sodium: None,
            fiber: None,
        }
    }

    pub fn with_sugar(mut self, sugar: f64) -> Self {
        self.sugar = Some(sugar);
        self
    }

    pub fn with_sodium(mut self, sodium: f64) -> Self {
        self.sodium = Some(sodium);
        self
    }

    pub fn with_fiber(mut self, fiber: f64) -> Self {
        self.fiber = Some(fiber);
        self
    }

    /// Check every present value is a finite, non-negative number
    pub fn validate(&self) -> Result<(), NutritionError> {
        let required = [
            ("calories", self.calories),
            ("carbs", self.carbs),
            ("protein", self.protein),
            ("fat", self.fat),
        ];
        let optional = [
            ("sugar", self.sugar),
            ("sodium", self.sodium),
            ("fiber", self.fiber),
        ];

        let present = required
            .into_iter()
            .chain(optional.into_iter().filter_map(|(name, v)| v.map(|v| (name, v))));

        for (name, value) in present {
            if !value.is_finite() || value < 0.0 {
                return Err(NutritionError::NegativeNutrient(name));
            }
        }
        Ok(())
    }
}

/// A named serving with a fixed gram weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServingDefinition {
    pub id: String,
    pub name: String,
    pub grams: f64,
    #[serde(default)]
    pub is_default: bool,
}

impl ServingDefinition {
    /// Name of the synthetic serving used when a food has no default
    pub const IMPLICIT_NAME: &'static str = "100g";

    /// The synthetic 100 g serving
    pub fn implicit_100g() -> Self {
        Self {
            id: String::new(),
            name: Self::IMPLICIT_NAME.to_string(),
            grams: 100.0,
            is_default: true,
        }
    }
}

/// Pick the default-flagged serving, falling back to the implicit 100 g serving
pub fn default_serving(servings: &[ServingDefinition]) -> ServingDefinition {
    servings
        .iter()
        .find(|s| s.is_default)
        .cloned()
        .unwrap_or_else(ServingDefinition::implicit_100g)
}

/// Nutrients scaled to one serving, paired with the serving weight used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServingNutrition {
    pub grams: f64,
    #[serde(flatten)]
    pub nutrients: NutrientProfile,
}

/// A food record as currently stored (per-100g profile plus its servings)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub per_100g: NutrientProfile,
    #[serde(default)]
    pub servings: Vec<ServingDefinition>,
}

impl Food {
    /// Look up one of this food's servings by id
    pub fn serving(&self, serving_id: &str) -> Option<&ServingDefinition> {
        self.servings.iter().find(|s| s.id == serving_id)
    }
}

/// A logged food or quick add
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    /// `None` for quick adds
    #[serde(default)]
    pub food_id: Option<String>,
    pub meal_id: String,
    #[serde(default)]
    pub serving_id: Option<String>,
    pub quantity: f64,
    #[serde(default)]
    pub grams: f64,
    #[serde(flatten)]
    pub nutrition: AbsoluteNutrition,
    pub log_date: NaiveDate,
    pub log_time: DateTime<Utc>,
    #[serde(default)]
    pub is_quick_add: bool,
}

/// Closed nutrient totals; unknown optional nutrients count as zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub sodium: f64,
}

/// A frequently logged food with its most recent serving configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteFoodSummary {
    pub food_id: String,
    pub food_name: String,
    pub log_count: usize,
    pub last_logged_date: NaiveDate,
    pub last_logged_quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_logged_serving: Option<ServingDefinition>,
    /// Nutrition of the last configuration against the current food record
    pub nutrition: AbsoluteNutrition,
    pub serving_display: String,
}
