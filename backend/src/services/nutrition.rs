//! Nutrition service - logging food and building summaries
//!
//! Persisted entries carry absolute nutrition resolved at write time. Edits
//! that change serving or quantity re-resolve against the food's current
//! record; other edits keep the stored amounts.

use crate::error::ApiError;
use crate::repositories::{
    FoodRepository, FoodUsageRow, GoalsRepository, LogEntryChanges, LogEntryRepository,
    NewLogEntry,
};
use chrono::{NaiveDate, Utc};
use macrotrack_shared::types::{LogFoodRequest, QuickAddRequest, UpdateLogRequest};
use macrotrack_shared::validation::{
    validate_calories, validate_meal_id, validate_quantity, ValidationError,
};
use macrotrack_shared::{
    default_serving, range_end, rank_usage, resolve, summarize_day, summarize_range, total_grams,
    AbsoluteNutrition, DailyGoals, DailySummary, FavoriteFoodSummary, Food, FoodUsage,
    GoalSettings, LogEntry, RangeSummary, ServingDefinition,
};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// Days covered by the weekly summary
pub const WEEK_DAYS: u32 = 7;

/// Serving, weight and nutrition computed for a log entry
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    pub serving: ServingDefinition,
    pub grams: f64,
    pub nutrition: AbsoluteNutrition,
}

fn parse_id(field: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::invalid_field(field, format!("Invalid {field}")))
}

/// Nutrition service
pub struct NutritionService;

impl NutritionService {
    /// Pick the serving for an entry and compute its nutrition.
    ///
    /// Without `serving_id` the food's default serving is used, which is the
    /// implicit 100 g serving when none is flagged.
    pub fn resolve_entry(
        food: &Food,
        serving_id: Option<&str>,
        quantity: f64,
    ) -> Result<ResolvedEntry, ApiError> {
        let serving = match serving_id {
            Some(id) => Self::find_serving(food, id)?,
            None => default_serving(&food.servings),
        };
        Self::resolve_with(food, serving, quantity)
    }

    /// Re-resolve an edited entry.
    ///
    /// A newly chosen serving wins. Otherwise the stored serving is kept, and
    /// an entry whose serving is unset or deleted counts as 100 g.
    pub fn resolve_edit(
        food: &Food,
        stored_serving: Option<&str>,
        new_serving: Option<&str>,
        quantity: f64,
    ) -> Result<ResolvedEntry, ApiError> {
        let serving = match (new_serving, stored_serving) {
            (Some(id), _) => Self::find_serving(food, id)?,
            (None, Some(id)) => food
                .serving(id)
                .cloned()
                .unwrap_or_else(ServingDefinition::implicit_100g),
            (None, None) => ServingDefinition::implicit_100g(),
        };
        Self::resolve_with(food, serving, quantity)
    }

    fn find_serving(food: &Food, serving_id: &str) -> Result<ServingDefinition, ApiError> {
        food.serving(serving_id)
            .cloned()
            .ok_or_else(|| ApiError::invalid_field("serving_id", "Unknown serving for this food"))
    }

    fn resolve_with(
        food: &Food,
        serving: ServingDefinition,
        quantity: f64,
    ) -> Result<ResolvedEntry, ApiError> {
        ValidationError::check("quantity", validate_quantity(quantity))?;
        let nutrition = resolve(&food.per_100g, serving.grams, quantity)?;

        Ok(ResolvedEntry {
            grams: total_grams(serving.grams, quantity),
            serving,
            nutrition,
        })
    }

    /// Whether an edit changes the serving or quantity of a food entry
    fn edit_needs_food(existing: &LogEntry, request: &UpdateLogRequest) -> bool {
        !existing.is_quick_add
            && existing.food_id.is_some()
            && (request.serving_id.is_some() || request.quantity.is_some())
    }

    /// Replacement values for an edit.
    ///
    /// `food` is the entry's current food record, loaded only when
    /// [`Self::edit_needs_food`] holds. Edits that change neither serving nor
    /// quantity keep the stored grams and nutrition.
    pub fn apply_edit(
        existing: &LogEntry,
        request: &UpdateLogRequest,
        food: Option<&Food>,
    ) -> Result<LogEntryChanges, ApiError> {
        let meal_id = request.meal_id.clone().unwrap_or_else(|| existing.meal_id.clone());
        ValidationError::check("meal_id", validate_meal_id(&meal_id))?;

        let is_food_entry = !existing.is_quick_add && existing.food_id.is_some();
        if !is_food_entry && (request.serving_id.is_some() || request.quantity.is_some()) {
            return Err(ApiError::validation("Quick adds can only be moved to another meal"));
        }

        if !Self::edit_needs_food(existing, request) {
            let serving_id = existing
                .serving_id
                .as_deref()
                .map(|id| parse_id("serving_id", id))
                .transpose()?;
            return Ok(LogEntryChanges {
                meal_id,
                serving_id,
                quantity: existing.quantity,
                grams: existing.grams,
                nutrition: existing.nutrition.clone(),
            });
        }

        let food = food.ok_or_else(|| ApiError::NotFound("Food not found".to_string()))?;
        let quantity = request.quantity.unwrap_or(existing.quantity);
        let resolved = Self::resolve_edit(
            food,
            existing.serving_id.as_deref(),
            request.serving_id.as_deref(),
            quantity,
        )?;

        Ok(LogEntryChanges {
            meal_id,
            serving_id: Self::serving_uuid(&resolved.serving)?,
            quantity,
            grams: resolved.grams,
            nutrition: resolved.nutrition,
        })
    }

    /// Stored serving id; the implicit serving has none
    fn serving_uuid(serving: &ServingDefinition) -> Result<Option<Uuid>, ApiError> {
        if serving.id.is_empty() {
            return Ok(None);
        }
        parse_id("serving_id", &serving.id).map(Some)
    }

    async fn load_food(db: &PgPool, user_id: Uuid, food_id: Uuid) -> Result<Food, ApiError> {
        FoodRepository::find_by_id(db, user_id, food_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Food not found".to_string()))
    }

    /// Log a serving of a food
    pub async fn log_food(
        db: &PgPool,
        user_id: Uuid,
        request: LogFoodRequest,
    ) -> Result<LogEntry, ApiError> {
        request.validate()?;
        ValidationError::check("meal_id", validate_meal_id(&request.meal_id))?;
        let food_id = parse_id("food_id", &request.food_id)?;

        let food = Self::load_food(db, user_id, food_id).await?;
        let resolved = Self::resolve_entry(&food, request.serving_id.as_deref(), request.quantity)?;
        let log_time = request.log_time.unwrap_or_else(Utc::now);

        let row = LogEntryRepository::create(
            db,
            NewLogEntry {
                user_id,
                food_id: Some(food_id),
                meal_id: request.meal_id,
                serving_id: Self::serving_uuid(&resolved.serving)?,
                quantity: request.quantity,
                grams: resolved.grams,
                nutrition: resolved.nutrition,
                log_date: request.log_date.unwrap_or_else(|| log_time.date_naive()),
                log_time,
                is_quick_add: false,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, entry_id = %row.id, food_id = %food_id, "Food logged");
        Ok(row.into())
    }

    /// Log raw nutrient amounts without a food
    pub async fn quick_add(
        db: &PgPool,
        user_id: Uuid,
        request: QuickAddRequest,
    ) -> Result<LogEntry, ApiError> {
        request.validate()?;
        ValidationError::check("meal_id", validate_meal_id(&request.meal_id))?;
        ValidationError::check("calories", validate_calories(request.nutrition.calories))?;
        let log_time = request.log_time.unwrap_or_else(Utc::now);

        let row = LogEntryRepository::create(
            db,
            NewLogEntry {
                user_id,
                food_id: None,
                meal_id: request.meal_id,
                serving_id: None,
                quantity: 1.0,
                grams: 0.0,
                nutrition: request.nutrition,
                log_date: request.log_date.unwrap_or_else(|| log_time.date_naive()),
                log_time,
                is_quick_add: true,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, entry_id = %row.id, "Quick add logged");
        Ok(row.into())
    }

    /// Edit meal, serving or quantity of an entry
    pub async fn update_entry(
        db: &PgPool,
        user_id: Uuid,
        entry_id: Uuid,
        request: UpdateLogRequest,
    ) -> Result<LogEntry, ApiError> {
        request.validate()?;
        let existing: LogEntry = LogEntryRepository::find_by_id(db, user_id, entry_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Log entry not found".to_string()))?
            .into();

        let food = match existing.food_id.as_deref() {
            Some(food_id) if Self::edit_needs_food(&existing, &request) => {
                Some(Self::load_food(db, user_id, parse_id("food_id", food_id)?).await?)
            }
            _ => None,
        };
        let changes = Self::apply_edit(&existing, &request, food.as_ref())?;

        let row = LogEntryRepository::update(db, user_id, entry_id, changes)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Log entry not found".to_string()))?;

        info!(user_id = %user_id, entry_id = %entry_id, "Log entry updated");
        Ok(row.into())
    }

    /// Delete an entry
    pub async fn delete_entry(db: &PgPool, user_id: Uuid, entry_id: Uuid) -> Result<(), ApiError> {
        let deleted = LogEntryRepository::delete(db, user_id, entry_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Log entry not found".to_string()));
        }
        info!(user_id = %user_id, entry_id = %entry_id, "Log entry deleted");
        Ok(())
    }

    async fn daily_goals(db: &PgPool, user_id: Uuid) -> Result<Option<DailyGoals>, ApiError> {
        let Some(row) = GoalsRepository::find(db, user_id).await.map_err(ApiError::Internal)? else {
            return Ok(None);
        };
        Ok(Some(GoalSettings::from(row).daily_goals()?))
    }

    /// Totals, meals and goal progress for one day
    pub async fn daily_summary(
        db: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<DailySummary, ApiError> {
        let entries: Vec<LogEntry> = LogEntryRepository::list_for_range(db, user_id, date, date)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(LogEntry::from)
            .collect();
        let goals = Self::daily_goals(db, user_id).await?;

        Ok(summarize_day(date, &entries, goals.as_ref())?)
    }

    /// Per-day totals for the week starting at `start`
    pub async fn weekly_summary(
        db: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
    ) -> Result<RangeSummary, ApiError> {
        let end = range_end(start, WEEK_DAYS)?;
        let entries: Vec<LogEntry> = LogEntryRepository::list_for_range(db, user_id, start, end)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(LogEntry::from)
            .collect();

        Ok(summarize_range(start, WEEK_DAYS, &entries)?)
    }

    /// Most frequently logged foods, with their last serving
    ///
    /// Counts cover the user's whole history; storage returns one row per food.
    pub async fn favorites(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<FavoriteFoodSummary>, ApiError> {
        let rows = LogEntryRepository::food_usage(db, user_id)
            .await
            .map_err(ApiError::Internal)?;

        let food_ids: Vec<Uuid> = rows.iter().filter_map(|r| r.last.food_id).collect();

        let foods: HashMap<String, Food> = FoodRepository::find_many(db, user_id, &food_ids)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(|food| (food.id.clone(), food))
            .collect();
        if foods.len() < food_ids.len() {
            debug!(
                user_id = %user_id,
                missing = food_ids.len() - foods.len(),
                "Skipping favorites for deleted foods"
            );
        }

        let usages: Vec<FoodUsage> =
            rows.into_iter().filter_map(FoodUsageRow::into_usage).collect();
        Ok(rank_usage(usages, &foods)?)
    }
}
