//! Log entry repository - logged foods and quick adds

use super::{dec_to_f64, f64_to_dec, NutrientColumns};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use macrotrack_shared::{FoodUsage, LogEntry, NutrientProfile};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Log entry row from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LogEntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Option<Uuid>,
    pub meal_id: String,
    pub serving_id: Option<Uuid>,
    pub quantity: Decimal,
    pub grams: Decimal,
    pub calories: Decimal,
    pub carbs: Decimal,
    pub protein: Decimal,
    pub fat: Decimal,
    pub sugar: Option<Decimal>,
    pub sodium: Option<Decimal>,
    pub fiber: Option<Decimal>,
    pub log_date: NaiveDate,
    pub log_time: DateTime<Utc>,
    pub is_quick_add: bool,
}

impl From<LogEntryRow> for LogEntry {
    fn from(row: LogEntryRow) -> Self {
        let nutrition = NutrientColumns {
            calories: row.calories,
            carbs: row.carbs,
            protein: row.protein,
            fat: row.fat,
            sugar: row.sugar,
            sodium: row.sodium,
            fiber: row.fiber,
        }
        .into_profile();

        Self {
            id: row.id.to_string(),
            food_id: row.food_id.map(|id| id.to_string()),
            meal_id: row.meal_id,
            serving_id: row.serving_id.map(|id| id.to_string()),
            quantity: dec_to_f64(row.quantity),
            grams: dec_to_f64(row.grams),
            nutrition,
            log_date: row.log_date,
            log_time: row.log_time,
            is_quick_add: row.is_quick_add,
        }
    }
}

/// A food's most recent entry with its total log count
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodUsageRow {
    #[sqlx(flatten)]
    pub last: LogEntryRow,
    pub log_count: i64,
}

impl FoodUsageRow {
    /// `None` for rows without a food, which the query already excludes
    pub fn into_usage(self) -> Option<FoodUsage> {
        let food_id = self.last.food_id?.to_string();
        Some(FoodUsage {
            food_id,
            log_count: usize::try_from(self.log_count).unwrap_or(0),
            last: self.last.into(),
        })
    }
}

/// Input for inserting a log entry
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub user_id: Uuid,
    pub food_id: Option<Uuid>,
    pub meal_id: String,
    pub serving_id: Option<Uuid>,
    pub quantity: f64,
    pub grams: f64,
    pub nutrition: NutrientProfile,
    pub log_date: NaiveDate,
    pub log_time: DateTime<Utc>,
    pub is_quick_add: bool,
}

/// Replacement values for an edited entry
#[derive(Debug, Clone)]
pub struct LogEntryChanges {
    pub meal_id: String,
    pub serving_id: Option<Uuid>,
    pub quantity: f64,
    pub grams: f64,
    pub nutrition: NutrientProfile,
}

const ENTRY_COLUMNS: &str = "id, user_id, food_id, meal_id, serving_id, quantity, grams, \
                             calories, carbs, protein, fat, sugar, sodium, fiber, \
                             log_date, log_time, is_quick_add";

/// Log entry repository
pub struct LogEntryRepository;

impl LogEntryRepository {
    /// Insert a log entry
    pub async fn create(db: &PgPool, input: NewLogEntry) -> Result<LogEntryRow> {
        let n = NutrientColumns::from_profile(&input.nutrition);
        let row = sqlx::query_as::<_, LogEntryRow>(&format!(
            r#"
            INSERT INTO log_entries (
                user_id, food_id, meal_id, serving_id, quantity, grams,
                calories, carbs, protein, fat, sugar, sodium, fiber,
                log_date, log_time, is_quick_add
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(input.food_id)
        .bind(&input.meal_id)
        .bind(input.serving_id)
        .bind(f64_to_dec(input.quantity))
        .bind(f64_to_dec(input.grams))
        .bind(n.calories)
        .bind(n.carbs)
        .bind(n.protein)
        .bind(n.fat)
        .bind(n.sugar)
        .bind(n.sodium)
        .bind(n.fiber)
        .bind(input.log_date)
        .bind(input.log_time)
        .bind(input.is_quick_add)
        .fetch_one(db)
        .await?;

        Ok(row)
    }

    /// Find one of the user's entries
    pub async fn find_by_id(
        db: &PgPool,
        user_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Option<LogEntryRow>> {
        let row = sqlx::query_as::<_, LogEntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM log_entries WHERE id = $1 AND user_id = $2"
        ))
        .bind(entry_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(row)
    }

    /// Overwrite the editable fields of an entry
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        entry_id: Uuid,
        changes: LogEntryChanges,
    ) -> Result<Option<LogEntryRow>> {
        let n = NutrientColumns::from_profile(&changes.nutrition);
        let row = sqlx::query_as::<_, LogEntryRow>(&format!(
            r#"
            UPDATE log_entries
            SET meal_id = $3, serving_id = $4, quantity = $5, grams = $6,
                calories = $7, carbs = $8, protein = $9, fat = $10,
                sugar = $11, sodium = $12, fiber = $13
            WHERE id = $1 AND user_id = $2
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(entry_id)
        .bind(user_id)
        .bind(&changes.meal_id)
        .bind(changes.serving_id)
        .bind(f64_to_dec(changes.quantity))
        .bind(f64_to_dec(changes.grams))
        .bind(n.calories)
        .bind(n.carbs)
        .bind(n.protein)
        .bind(n.fat)
        .bind(n.sugar)
        .bind(n.sodium)
        .bind(n.fiber)
        .fetch_optional(db)
        .await?;

        Ok(row)
    }

    /// Delete an entry; false when it did not exist
    pub async fn delete(db: &PgPool, user_id: Uuid, entry_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM log_entries WHERE id = $1 AND user_id = $2")
            .bind(entry_id)
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Entries logged between `start` and `end`, inclusive
    pub async fn list_for_range(
        db: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LogEntryRow>> {
        let rows = sqlx::query_as::<_, LogEntryRow>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM log_entries
            WHERE user_id = $1 AND log_date >= $2 AND log_date <= $3
            ORDER BY log_date ASC, log_time ASC
            "#
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;

        Ok(rows)
    }

    /// Per-food log counts over the user's whole history, each with the
    /// food's most recent entry. Ordered newest last entry first.
    pub async fn food_usage(db: &PgPool, user_id: Uuid) -> Result<Vec<FoodUsageRow>> {
        let rows = sqlx::query_as::<_, FoodUsageRow>(&format!(
            r#"
            SELECT * FROM (
                SELECT DISTINCT ON (food_id)
                    {ENTRY_COLUMNS},
                    COUNT(*) OVER (PARTITION BY food_id) AS log_count
                FROM log_entries
                WHERE user_id = $1 AND food_id IS NOT NULL AND NOT is_quick_add
                ORDER BY food_id, log_date DESC, log_time DESC, id
            ) latest
            ORDER BY log_date DESC, log_time DESC, id
            "#
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(rows)
    }
}
