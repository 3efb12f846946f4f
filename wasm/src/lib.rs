//! Macrotrack WASM Module
//!
//! Browser bindings for the nutrition engine so the food and log forms can
//! preview conversions without a round trip. Structured values cross the
//! boundary as JSON strings.

use chrono::NaiveDate;
use macrotrack_shared::{
    DailyGoals, Food, LogEntry, NutrientProfile, NutritionError,
};
use serde::Serialize;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

fn parse<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid input: {e}"))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn engine_error(err: NutritionError) -> String {
    err.to_string()
}

fn per_100g(nutrients_json: &str, serving_grams: f64) -> Result<String, String> {
    let nutrients: NutrientProfile = parse(nutrients_json)?;
    let converted =
        macrotrack_shared::to_per_100g(&nutrients, serving_grams).map_err(engine_error)?;
    to_json(&converted)
}

fn per_serving(per_100g_json: &str, serving_grams: f64) -> Result<String, String> {
    let per_100g: NutrientProfile = parse(per_100g_json)?;
    let converted =
        macrotrack_shared::to_per_serving(&per_100g, serving_grams).map_err(engine_error)?;
    to_json(&converted)
}

fn resolved(per_100g_json: &str, serving_grams: f64, quantity: f64) -> Result<String, String> {
    let per_100g: NutrientProfile = parse(per_100g_json)?;
    let nutrition =
        macrotrack_shared::resolve(&per_100g, serving_grams, quantity).map_err(engine_error)?;
    to_json(&nutrition)
}

fn summed(entries_json: &str) -> Result<String, String> {
    let entries: Vec<LogEntry> = parse(entries_json)?;
    let totals = macrotrack_shared::sum_entries(&entries).map_err(engine_error)?;
    to_json(&totals)
}

fn day_summary(
    date: &str,
    entries_json: &str,
    goals_json: Option<String>,
) -> Result<String, String> {
    let date: NaiveDate = date.parse().map_err(|e| format!("Invalid date: {e}"))?;
    let entries: Vec<LogEntry> = parse(entries_json)?;
    let goals: Option<DailyGoals> = goals_json.as_deref().map(parse).transpose()?;
    let summary =
        macrotrack_shared::summarize_day(date, &entries, goals.as_ref()).map_err(engine_error)?;
    to_json(&summary)
}

fn favorites(entries_json: &str, foods_json: &str) -> Result<String, String> {
    let entries: Vec<LogEntry> = parse(entries_json)?;
    let foods: Vec<Food> = parse(foods_json)?;
    let catalog: HashMap<String, Food> = foods.into_iter().map(|f| (f.id.clone(), f)).collect();
    let ranked = macrotrack_shared::rank(&entries, &catalog).map_err(engine_error)?;
    to_json(&ranked)
}

/// Per-serving nutrients (JSON) to per-100g values (JSON)
#[wasm_bindgen]
pub fn convert_to_per_100g(nutrients_json: &str, serving_grams: f64) -> Result<String, JsError> {
    per_100g(nutrients_json, serving_grams).map_err(|e| JsError::new(&e))
}

/// Per-100g nutrients (JSON) to one serving (JSON, includes `grams`)
#[wasm_bindgen]
pub fn convert_to_per_serving(per_100g_json: &str, serving_grams: f64) -> Result<String, JsError> {
    per_serving(per_100g_json, serving_grams).map_err(|e| JsError::new(&e))
}

/// Absolute whole-number nutrients for `quantity` servings
#[wasm_bindgen]
pub fn resolve_serving(
    per_100g_json: &str,
    serving_grams: f64,
    quantity: f64,
) -> Result<String, JsError> {
    resolved(per_100g_json, serving_grams, quantity).map_err(|e| JsError::new(&e))
}

/// Totals for a JSON array of log entries
#[wasm_bindgen]
pub fn sum_log_entries(entries_json: &str) -> Result<String, JsError> {
    summed(entries_json).map_err(|e| JsError::new(&e))
}

/// Daily summary for `date` (YYYY-MM-DD), with progress when goals are given
#[wasm_bindgen]
pub fn summarize_day(
    date: &str,
    entries_json: &str,
    goals_json: Option<String>,
) -> Result<String, JsError> {
    day_summary(date, entries_json, goals_json).map_err(|e| JsError::new(&e))
}

/// Ranked favorites from log history and the current food records
#[wasm_bindgen]
pub fn rank_favorites(entries_json: &str, foods_json: &str) -> Result<String, JsError> {
    favorites(entries_json, foods_json).map_err(|e| JsError::new(&e))
}

#[wasm_bindgen]
pub fn format_serving(quantity: f64, serving_name: Option<String>) -> String {
    macrotrack_shared::format_serving_display(quantity, serving_name.as_deref())
}

#[wasm_bindgen]
pub fn grams_from_percent(percent: f64, calorie_goal: f64, calories_per_gram: f64) -> f64 {
    macrotrack_shared::grams_from_percent(percent, calorie_goal, calories_per_gram)
}

#[wasm_bindgen]
pub fn is_valid_percentage_split(carb_pct: f64, protein_pct: f64, fat_pct: f64) -> bool {
    macrotrack_shared::validate_percentage_split(carb_pct, protein_pct, fat_pct)
}

#[wasm_bindgen]
pub fn percent_of_goal(amount: f64, goal: f64) -> f64 {
    macrotrack_shared::percent_of_goal(amount, goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn value(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    fn entry(food_id: &str, meal: &str, calories: f64, date: &str) -> Value {
        json!({
            "id": format!("{food_id}-{meal}-{date}"),
            "food_id": food_id,
            "meal_id": meal,
            "quantity": 1,
            "grams": 100,
            "calories": calories,
            "carbs": 10,
            "protein": 5,
            "fat": 1,
            "log_date": date,
            "log_time": format!("{date}T08:00:00Z"),
        })
    }

    #[test]
    fn test_per_100g_conversion() {
        let label = r#"{"calories": 150, "protein": 5, "fat": 2}"#;
        let result = value(&per_100g(label, 56.0).unwrap());
        assert_eq!(result["calories"], 268.0);
        assert_eq!(result["protein"], 8.9);
    }

    #[test]
    fn test_per_100g_rejects_zero_weight() {
        let err = per_100g(r#"{"calories": 150}"#, 0.0).unwrap_err();
        assert_eq!(err, "Invalid serving weight: 0 g");
    }

    #[test]
    fn test_invalid_json_is_reported() {
        assert!(per_100g("not json", 100.0).unwrap_err().starts_with("Invalid input"));
    }

    #[test]
    fn test_per_serving_includes_grams() {
        let result = value(&per_serving(r#"{"calories": 150, "carbs": 12}"#, 170.0).unwrap());
        assert_eq!(result["grams"], 170.0);
        assert_eq!(result["calories"], 255.0);
        assert_eq!(result["carbs"], 20.4);
    }

    #[test]
    fn test_resolve_serving_rounds_to_integers() {
        let result = value(&resolved(r#"{"calories": 389, "carbs": 66.3}"#, 40.0, 2.5).unwrap());
        assert_eq!(result["calories"], 389.0);
        assert_eq!(result["carbs"], 66.0);
    }

    #[test]
    fn test_sum_log_entries() {
        let entries = json!([
            entry("oats", "breakfast", 150.0, "2024-03-04"),
            entry("rice", "lunch", 200.0, "2024-03-04"),
        ]);
        let totals = value(&summed(&entries.to_string()).unwrap());
        assert_eq!(totals["calories"], 350.0);
        assert_eq!(totals["carbs"], 20.0);
        assert_eq!(totals["fiber"], 0.0);
    }

    #[test]
    fn test_day_summary_with_goals() {
        let entries = json!([
            entry("oats", "breakfast", 500.0, "2024-03-04"),
            entry("oats", "breakfast", 700.0, "2024-03-05"),
        ]);
        let goals = json!({"calories": 2000, "carbs": 250, "protein": 125, "fat": 56});
        let json = day_summary("2024-03-04", &entries.to_string(), Some(goals.to_string()));
        let summary = value(&json.unwrap());

        assert_eq!(summary["entry_count"], 1);
        assert_eq!(summary["progress"]["calories_pct"], 25.0);
        assert_eq!(summary["progress"]["remaining_calories"], 1500.0);
    }

    #[test]
    fn test_day_summary_rejects_bad_date() {
        assert!(day_summary("03/04/2024", "[]", None).unwrap_err().starts_with("Invalid date"));
    }

    #[test]
    fn test_rank_favorites() {
        let entries = json!([
            entry("oats", "breakfast", 150.0, "2024-03-01"),
            entry("oats", "breakfast", 150.0, "2024-03-02"),
            entry("rice", "lunch", 200.0, "2024-03-03"),
        ]);
        let foods = json!([
            {"id": "oats", "name": "Oats", "per_100g": {"calories": 389}},
            {"id": "rice", "name": "Rice", "per_100g": {"calories": 130}},
        ]);
        let ranked = value(&favorites(&entries.to_string(), &foods.to_string()).unwrap());
        let ranked = ranked.as_array().unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0]["food_name"], "Oats");
        assert_eq!(ranked[0]["log_count"], 2);
        assert_eq!(ranked[0]["nutrition"]["calories"], 389.0);
        assert_eq!(ranked[1]["food_name"], "Rice");
    }

    #[test]
    fn test_scalar_helpers() {
        assert_eq!(format_serving(2.0, Some("1 cup".to_string())), "2 cups");
        assert_eq!(format_serving(1.0, None), "1 serving");
        assert_eq!(grams_from_percent(25.0, 2000.0, 9.0), 56.0);
        assert!(is_valid_percentage_split(40.0, 30.0, 30.0));
        assert!(!is_valid_percentage_split(40.0, 30.0, 20.0));
        assert_eq!(percent_of_goal(500.0, 2000.0), 25.0);
        assert_eq!(percent_of_goal(500.0, 0.0), 0.0);
    }
}
