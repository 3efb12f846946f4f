//! Goal API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::GoalService;
use crate::state::AppState;
use axum::{extract::State, routing::{get, post}, Json, Router};
use macrotrack_shared::types::{AllocateRequest, GoalsResponse, SplitValidationResponse};
use macrotrack_shared::{DailyGoals, GoalSettings, MacroSplit};

/// Create goal routes
pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_goals).put(save_goals))
        .route("/allocate", post(allocate))
        .route("/validate-split", post(validate_split))
}

/// GET /api/v1/goals - The user's goals
async fn get_goals(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<GoalsResponse>, ApiError> {
    Ok(Json(GoalService::get(state.db(), auth.user_id).await?))
}

/// PUT /api/v1/goals - Save the user's goals
async fn save_goals(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(settings): Json<GoalSettings>,
) -> Result<Json<GoalsResponse>, ApiError> {
    Ok(Json(GoalService::save(state.db(), auth.user_id, settings).await?))
}

/// POST /api/v1/goals/allocate - Gram goals from a percentage split
async fn allocate(Json(req): Json<AllocateRequest>) -> Result<Json<DailyGoals>, ApiError> {
    Ok(Json(GoalService::allocate(&req)?))
}

/// POST /api/v1/goals/validate-split - Check that a split totals 100%
async fn validate_split(Json(split): Json<MacroSplit>) -> Json<SplitValidationResponse> {
    Json(GoalService::check_split_total(&split))
}
