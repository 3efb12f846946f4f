//! Per-serving and per-100g conversion
//!
//! Food records are stored per 100 g; forms show and accept per-serving
//! values. Rounding differs by direction:
//!
//! | direction      | calories        | other nutrients |
//! |----------------|-----------------|-----------------|
//! | to per-100g    | whole number    | one decimal     |
//! | to per-serving | one decimal     | one decimal     |
//!
//! Optional nutrients keep their presence: an absent input stays absent.

use crate::errors::{NutritionError, NutritionResult};
use crate::models::{NutrientProfile, ServingNutrition};

/// Round to one decimal place, half away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Convert a per-serving profile to the per-100g basis
pub fn to_per_100g(
    per_serving: &NutrientProfile,
    serving_grams: f64,
) -> NutritionResult<NutrientProfile> {
    if !serving_grams.is_finite() || serving_grams <= 0.0 {
        return Err(NutritionError::InvalidServingWeight(serving_grams));
    }
    let multiplier = 100.0 / serving_grams;
    let scale = |value: f64| round1(value * multiplier);

    Ok(NutrientProfile {
        calories: (per_serving.calories * multiplier).round(),
        carbs: scale(per_serving.carbs),
        protein: scale(per_serving.protein),
        fat: scale(per_serving.fat),
        sugar: per_serving.sugar.map(scale),
        sodium: per_serving.sodium.map(scale),
        fiber: per_serving.fiber.map(scale),
    })
}

/// Convert a per-100g profile to one serving of `serving_grams`.
///
/// A 0 g serving is valid and yields zeros.
pub fn to_per_serving(
    per_100g: &NutrientProfile,
    serving_grams: f64,
) -> NutritionResult<ServingNutrition> {
    if !serving_grams.is_finite() || serving_grams < 0.0 {
        return Err(NutritionError::InvalidServingWeight(serving_grams));
    }
    let multiplier = serving_grams / 100.0;
    let scale = |value: f64| round1(value * multiplier);

    Ok(ServingNutrition {
        grams: serving_grams,
        nutrients: NutrientProfile {
            calories: scale(per_100g.calories),
            carbs: scale(per_100g.carbs),
            protein: scale(per_100g.protein),
            fat: scale(per_100g.fat),
            sugar: per_100g.sugar.map(scale),
            sodium: per_100g.sodium.map(scale),
            fiber: per_100g.fiber.map(scale),
        },
    })
}
