//! Absolute nutrition for a logged serving
//!
//! Log entries store whole-number nutrient amounts even though the food's
//! per-100g profile carries decimals, so every field is rounded to an integer
//! here.

use crate::errors::{NutritionError, NutritionResult};
use crate::models::{AbsoluteNutrition, NutrientProfile};

/// Total grams eaten for `quantity` servings of `serving_grams` each
pub fn total_grams(serving_grams: f64, quantity: f64) -> f64 {
    quantity * serving_grams
}

/// Compute the absolute nutrients of `quantity` servings weighing `serving_grams`.
///
/// Callers without a chosen serving pass the implicit 100 g serving; this
/// function does not pick defaults.
pub fn resolve(
    per_100g: &NutrientProfile,
    serving_grams: f64,
    quantity: f64,
) -> NutritionResult<AbsoluteNutrition> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(NutritionError::InvalidQuantity(quantity));
    }
    if !serving_grams.is_finite() || serving_grams < 0.0 {
        return Err(NutritionError::InvalidServingWeight(serving_grams));
    }

    let multiplier = total_grams(serving_grams, quantity) / 100.0;
    let scale = |value: f64| (value * multiplier).round();

    Ok(AbsoluteNutrition {
        calories: scale(per_100g.calories),
        carbs: scale(per_100g.carbs),
        protein: scale(per_100g.protein),
        fat: scale(per_100g.fat),
        sugar: per_100g.sugar.map(scale),
        sodium: per_100g.sodium.map(scale),
        fiber: per_100g.fiber.map(scale),
    })
}
