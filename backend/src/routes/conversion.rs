//! Conversion and serving routes
//!
//! Stateless calculations used by the food and log forms.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::Query, routing::get, routing::post, Json, Router};
use macrotrack_shared::types::{
    ConvertRequest, ResolveRequest, ResolveResponse, ServingDisplayQuery, ServingDisplayResponse,
};
use macrotrack_shared::{
    format_serving_display, resolve, to_per_100g, to_per_serving, total_grams, NutrientProfile,
    ServingDefinition, ServingNutrition,
};
use validator::Validate;

/// Create conversion routes
pub fn convert_routes() -> Router<AppState> {
    Router::new()
        .route("/per-100g", post(convert_to_per_100g))
        .route("/per-serving", post(convert_to_per_serving))
}

/// Create serving routes
pub fn serving_routes() -> Router<AppState> {
    Router::new()
        .route("/resolve", post(resolve_serving))
        .route("/display", get(serving_display))
}

/// POST /api/v1/convert/per-100g - Per-serving values to per-100g
async fn convert_to_per_100g(
    Json(req): Json<ConvertRequest>,
) -> Result<Json<NutrientProfile>, ApiError> {
    Ok(Json(to_per_100g(&req.nutrients, req.serving_grams)?))
}

/// POST /api/v1/convert/per-serving - Per-100g values to one serving
async fn convert_to_per_serving(
    Json(req): Json<ConvertRequest>,
) -> Result<Json<ServingNutrition>, ApiError> {
    Ok(Json(to_per_serving(&req.nutrients, req.serving_grams)?))
}

/// POST /api/v1/servings/resolve - Absolute nutrition for a quantity of servings
async fn resolve_serving(
    Json(req): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, ApiError> {
    req.validate()?;
    let serving_grams = req
        .serving_grams
        .unwrap_or_else(|| ServingDefinition::implicit_100g().grams);
    let nutrition = resolve(&req.per_100g, serving_grams, req.quantity)?;

    Ok(Json(ResolveResponse {
        grams: total_grams(serving_grams, req.quantity),
        nutrition,
    }))
}

/// GET /api/v1/servings/display - Display string such as "2 cups"
async fn serving_display(Query(query): Query<ServingDisplayQuery>) -> Json<ServingDisplayResponse> {
    Json(ServingDisplayResponse {
        display: format_serving_display(query.quantity, query.serving_name.as_deref()),
    })
}
