//! Macrotrack Shared Library
//!
//! Nutrition engine and wire types shared by the backend and WASM modules:
//! unit conversion between per-serving and per-100g values, serving
//! resolution, daily aggregation, favorite ranking and goal allocation.

pub mod aggregation;
pub mod errors;
pub mod favorites;
pub mod goals;
pub mod models;
pub mod serving;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::*;
pub use types::*;

pub use aggregation::{
    group_by_meal, percent_of_goal, range_end, summarize_day, summarize_range, sum_entries,
    DailySummary, DayTotals, GoalProgress, MealGroup, RangeSummary,
};
pub use favorites::{format_serving_display, rank, rank_usage, FoodUsage, FAVORITES_LIMIT};
pub use goals::{
    grams_from_percent, percent_from_grams, validate_percentage_split, DailyGoals, GoalSettings,
    GoalType, MacroSplit,
};
pub use serving::{resolve, total_grams};
pub use units::{round1, to_per_100g, to_per_serving};
