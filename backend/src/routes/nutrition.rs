//! Nutrition API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::nutrition::WEEK_DAYS;
use crate::services::NutritionService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{Duration, Utc};
use macrotrack_shared::types::{
    DateQuery, LogFoodRequest, QuickAddRequest, UpdateLogRequest, WeekQuery,
};
use macrotrack_shared::{DailySummary, FavoriteFoodSummary, LogEntry, RangeSummary};
use uuid::Uuid;

/// Create nutrition routes
pub fn nutrition_routes() -> Router<AppState> {
    Router::new()
        .route("/log", post(log_food))
        .route("/log/:id", put(update_log).delete(delete_log))
        .route("/quick-add", post(quick_add))
        .route("/daily", get(get_daily_summary))
        .route("/weekly", get(get_weekly_summary))
        .route("/favorites", get(get_favorites))
}

fn parse_entry_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::validation("Invalid log entry ID"))
}

/// POST /api/v1/nutrition/log - Log a food
async fn log_food(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogFoodRequest>,
) -> Result<(StatusCode, Json<LogEntry>), ApiError> {
    let entry = NutritionService::log_food(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// POST /api/v1/nutrition/quick-add - Log raw calories and macros
async fn quick_add(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<QuickAddRequest>,
) -> Result<(StatusCode, Json<LogEntry>), ApiError> {
    let entry = NutritionService::quick_add(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /api/v1/nutrition/log/:id - Edit a log entry
async fn update_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateLogRequest>,
) -> Result<Json<LogEntry>, ApiError> {
    let entry_id = parse_entry_id(&id)?;
    let entry = NutritionService::update_entry(state.db(), auth.user_id, entry_id, req).await?;
    Ok(Json(entry))
}

/// DELETE /api/v1/nutrition/log/:id - Delete a log entry
async fn delete_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let entry_id = parse_entry_id(&id)?;
    NutritionService::delete_entry(state.db(), auth.user_id, entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/nutrition/daily - Daily summary, today by default
async fn get_daily_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailySummary>, ApiError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let summary = NutritionService::daily_summary(state.db(), auth.user_id, date).await?;
    Ok(Json(summary))
}

/// GET /api/v1/nutrition/weekly - Seven days of totals, ending today by default
async fn get_weekly_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<WeekQuery>,
) -> Result<Json<RangeSummary>, ApiError> {
    let start = query
        .start
        .unwrap_or_else(|| Utc::now().date_naive() - Duration::days(i64::from(WEEK_DAYS) - 1));
    let summary = NutritionService::weekly_summary(state.db(), auth.user_id, start).await?;
    Ok(Json(summary))
}

/// GET /api/v1/nutrition/favorites - Most frequently logged foods
async fn get_favorites(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<FavoriteFoodSummary>>, ApiError> {
    let favorites = NutritionService::favorites(state.db(), auth.user_id).await?;
    Ok(Json(favorites))
}
