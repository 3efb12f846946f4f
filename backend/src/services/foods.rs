//! Food service - creating and loading food records

use crate::error::ApiError;
use crate::repositories::{CreateFood, CreateServing, FoodRepository};
use macrotrack_shared::types::{CreateFoodRequest, FoodResponse, NutrientBasis};
use macrotrack_shared::validation::{validate_serving_grams, validate_serving_name, ValidationError};
use macrotrack_shared::{default_serving, to_per_100g, Food, NutrientProfile};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Food service
pub struct FoodService;

impl FoodService {
    /// Validate a create request and normalize its nutrients to per-100g.
    ///
    /// Per-serving input is converted with the default serving (or the first
    /// one when none is flagged).
    pub fn prepare(
        request: &CreateFoodRequest,
    ) -> Result<(NutrientProfile, Vec<CreateServing>), ApiError> {
        request.validate()?;

        for serving in &request.servings {
            ValidationError::check("serving_name", validate_serving_name(&serving.name))?;
            ValidationError::check("serving_grams", validate_serving_grams(serving.grams))?;
        }
        if request.servings.iter().filter(|s| s.is_default).count() > 1 {
            return Err(ApiError::invalid_field(
                "servings",
                "Only one serving can be the default",
            ));
        }

        let per_100g = match request.basis {
            NutrientBasis::Per100g => request.nutrients.clone(),
            NutrientBasis::PerServing => {
                let basis = request
                    .servings
                    .iter()
                    .find(|s| s.is_default)
                    .or_else(|| request.servings.first())
                    .ok_or_else(|| {
                        ApiError::invalid_field("servings", "Per-serving nutrients need a serving")
                    })?;
                to_per_100g(&request.nutrients, basis.grams)?
            }
        };

        let servings = request
            .servings
            .iter()
            .map(|s| CreateServing {
                name: s.name.trim().to_string(),
                grams: s.grams,
                is_default: s.is_default,
            })
            .collect();

        Ok((per_100g, servings))
    }

    /// Create a food for the user
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        request: CreateFoodRequest,
    ) -> Result<Food, ApiError> {
        let (per_100g, servings) = Self::prepare(&request)?;

        let food = FoodRepository::create(
            db,
            CreateFood {
                user_id,
                name: request.name.trim().to_string(),
                brand: request.brand,
                per_100g,
                servings,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, food_id = %food.id, "Food created");
        Ok(food)
    }

    /// Load one of the user's foods
    pub async fn get(db: &PgPool, user_id: Uuid, food_id: Uuid) -> Result<Food, ApiError> {
        FoodRepository::find_by_id(db, user_id, food_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Food not found".to_string()))
    }

    /// Response shape with the effective default serving
    pub fn to_response(food: Food) -> FoodResponse {
        let default_serving = default_serving(&food.servings);
        FoodResponse {
            id: food.id,
            name: food.name,
            brand: food.brand,
            per_100g: food.per_100g,
            servings: food.servings,
            default_serving,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macrotrack_shared::types::ServingInput;

    fn request(basis: NutrientBasis, servings: Vec<ServingInput>) -> CreateFoodRequest {
        CreateFoodRequest {
            name: "Bread".to_string(),
            brand: None,
            basis,
            nutrients: NutrientProfile::new(150.0, 27.3, 5.0, 2.0),
            servings,
        }
    }

    fn serving(name: &str, grams: f64, is_default: bool) -> ServingInput {
        ServingInput {
            name: name.to_string(),
            grams,
            is_default,
        }
    }

    #[test]
    fn test_prepare_converts_per_serving_input() {
        let req = request(
            NutrientBasis::PerServing,
            vec![serving("1 slice", 28.0, false), serving("2 slices", 56.0, true)],
        );
        let (per_100g, servings) = FoodService::prepare(&req).unwrap();

        assert_eq!(per_100g.calories, 268.0);
        assert_eq!(per_100g.carbs, 48.8);
        assert_eq!(servings.len(), 2);
    }

    #[test]
    fn test_prepare_keeps_per_100g_input() {
        let req = request(NutrientBasis::Per100g, vec![]);
        let (per_100g, servings) = FoodService::prepare(&req).unwrap();
        assert_eq!(per_100g, req.nutrients);
        assert!(servings.is_empty());
    }

    #[test]
    fn test_prepare_rejects_per_serving_without_serving() {
        let err = FoodService::prepare(&request(NutrientBasis::PerServing, vec![])).unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: Some(f), .. } if f == "servings"));
    }

    #[test]
    fn test_prepare_rejects_bad_servings() {
        let zero = request(NutrientBasis::Per100g, vec![serving("1 cup", 0.0, false)]);
        assert!(FoodService::prepare(&zero).is_err());

        let two_defaults = request(
            NutrientBasis::Per100g,
            vec![serving("1 cup", 240.0, true), serving("1 tbsp", 15.0, true)],
        );
        assert!(FoodService::prepare(&two_defaults).is_err());
    }

    #[test]
    fn test_response_falls_back_to_implicit_serving() {
        let food = Food {
            id: "f1".to_string(),
            name: "Apple".to_string(),
            brand: None,
            per_100g: NutrientProfile::new(52.0, 13.8, 0.3, 0.2),
            servings: vec![],
        };
        let response = FoodService::to_response(food);
        assert_eq!(response.default_serving.name, "100g");
        assert_eq!(response.default_serving.grams, 100.0);
    }
}
