//! Daily goals and macro allocation
//!
//! Users set macro targets either as grams or as a percentage of the calorie
//! goal. Percentages convert to grams through the caloric density of each
//! macro (4 kcal/g for carbs and protein, 9 kcal/g for fat).

use crate::errors::{NutritionError, NutritionResult};
use crate::units::round1;
use serde::{Deserialize, Serialize};

pub const CARB_KCAL_PER_GRAM: f64 = 4.0;
pub const PROTEIN_KCAL_PER_GRAM: f64 = 4.0;
pub const FAT_KCAL_PER_GRAM: f64 = 9.0;

/// Allowed distance of a percentage split from 100
pub const SPLIT_TOLERANCE: f64 = 0.1;

/// Daily targets in kcal and grams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyGoals {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

/// Macro targets as percentages of the calorie goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub carb_pct: f64,
    pub protein_pct: f64,
    pub fat_pct: f64,
}

/// How the user expresses macro targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    #[default]
    Grams,
    Percentage,
}

/// Goal settings as saved on the user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSettings {
    #[serde(default)]
    pub goal_type: GoalType,
    pub calories: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<MacroSplit>,
}

/// Grams of a macro providing `percent` of `calorie_goal`
pub fn grams_from_percent(percent: f64, calorie_goal: f64, calories_per_gram: f64) -> f64 {
    if calories_per_gram <= 0.0 {
        return 0.0;
    }
    (percent / 100.0 * calorie_goal / calories_per_gram).round()
}

/// Share of `calorie_goal` supplied by `grams` of a macro, to one decimal
pub fn percent_from_grams(grams: f64, calorie_goal: f64, calories_per_gram: f64) -> f64 {
    if !calorie_goal.is_finite() || calorie_goal <= 0.0 {
        return 0.0;
    }
    round1(grams * calories_per_gram / calorie_goal * 100.0)
}

/// Whether three macro percentages total 100 within [`SPLIT_TOLERANCE`]
pub fn validate_percentage_split(carb_pct: f64, protein_pct: f64, fat_pct: f64) -> bool {
    (carb_pct + protein_pct + fat_pct - 100.0).abs() < SPLIT_TOLERANCE
}

impl MacroSplit {
    pub fn total(&self) -> f64 {
        self.carb_pct + self.protein_pct + self.fat_pct
    }

    pub fn is_valid(&self) -> bool {
        validate_percentage_split(self.carb_pct, self.protein_pct, self.fat_pct)
    }

    pub fn validate(&self) -> NutritionResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(NutritionError::InvalidGoalPercentageSplit { total: self.total() })
        }
    }

    /// Express gram goals as percentages of their calorie goal
    pub fn from_goals(goals: &DailyGoals) -> Self {
        Self {
            carb_pct: percent_from_grams(goals.carbs, goals.calories, CARB_KCAL_PER_GRAM),
            protein_pct: percent_from_grams(goals.protein, goals.calories, PROTEIN_KCAL_PER_GRAM),
            fat_pct: percent_from_grams(goals.fat, goals.calories, FAT_KCAL_PER_GRAM),
        }
    }
}

impl DailyGoals {
    /// Gram goals for a validated percentage split
    pub fn from_split(calories: f64, split: &MacroSplit) -> NutritionResult<Self> {
        split.validate()?;
        Ok(Self {
            calories,
            carbs: grams_from_percent(split.carb_pct, calories, CARB_KCAL_PER_GRAM),
            protein: grams_from_percent(split.protein_pct, calories, PROTEIN_KCAL_PER_GRAM),
            fat: grams_from_percent(split.fat_pct, calories, FAT_KCAL_PER_GRAM),
        })
    }
}

impl GoalSettings {
    /// Gram goals for whichever representation `goal_type` selects.
    ///
    /// Percentage settings without a split fail like a split totalling 0%.
    pub fn daily_goals(&self) -> NutritionResult<DailyGoals> {
        match self.goal_type {
            GoalType::Grams => Ok(DailyGoals {
                calories: self.calories,
                carbs: self.carbs,
                protein: self.protein,
                fat: self.fat,
            }),
            GoalType::Percentage => {
                let split = self
                    .split
                    .ok_or(NutritionError::InvalidGoalPercentageSplit { total: 0.0 })?;
                DailyGoals::from_split(self.calories, &split)
            }
        }
    }
}
