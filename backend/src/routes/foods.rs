//! Food API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::FoodService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use macrotrack_shared::types::{CreateFoodRequest, FoodResponse};
use uuid::Uuid;

/// Create food routes
pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_food))
        .route("/:id", get(get_food))
}

/// POST /api/v1/foods - Create a food
async fn create_food(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFoodRequest>,
) -> Result<(StatusCode, Json<FoodResponse>), ApiError> {
    let food = FoodService::create(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(FoodService::to_response(food))))
}

/// GET /api/v1/foods/:id - Get a food with its servings
async fn get_food(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<FoodResponse>, ApiError> {
    let food_id = Uuid::parse_str(&id).map_err(|_| ApiError::validation("Invalid food ID"))?;
    let food = FoodService::get(state.db(), auth.user_id, food_id).await?;
    Ok(Json(FoodService::to_response(food)))
}
