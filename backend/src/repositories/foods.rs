//! Food repository - foods and their servings

use super::{dec_to_f64, f64_to_dec, NutrientColumns};
use anyhow::Result;
use chrono::{DateTime, Utc};
use macrotrack_shared::{Food, NutrientProfile, ServingDefinition};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Food row from the database (per-100g values)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub calories: Decimal,
    pub carbs: Decimal,
    pub protein: Decimal,
    pub fat: Decimal,
    pub sugar: Option<Decimal>,
    pub sodium: Option<Decimal>,
    pub fiber: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Serving row from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServingRow {
    pub id: Uuid,
    pub food_id: Uuid,
    pub name: String,
    pub grams: Decimal,
    pub is_default: bool,
}

/// Input for creating a food
#[derive(Debug, Clone)]
pub struct CreateFood {
    pub user_id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub per_100g: NutrientProfile,
    pub servings: Vec<CreateServing>,
}

/// Serving to create alongside a food
#[derive(Debug, Clone)]
pub struct CreateServing {
    pub name: String,
    pub grams: f64,
    pub is_default: bool,
}

impl FoodRow {
    fn per_100g(&self) -> NutrientProfile {
        NutrientColumns {
            calories: self.calories,
            carbs: self.carbs,
            protein: self.protein,
            fat: self.fat,
            sugar: self.sugar,
            sodium: self.sodium,
            fiber: self.fiber,
        }
        .into_profile()
    }

    /// Assemble the engine's food record from this row and its servings
    pub fn into_food(self, servings: Vec<ServingRow>) -> Food {
        let per_100g = self.per_100g();
        Food {
            id: self.id.to_string(),
            name: self.name,
            brand: self.brand,
            per_100g,
            servings: servings.into_iter().map(ServingDefinition::from).collect(),
        }
    }
}

impl From<ServingRow> for ServingDefinition {
    fn from(row: ServingRow) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name,
            grams: dec_to_f64(row.grams),
            is_default: row.is_default,
        }
    }
}

const FOOD_COLUMNS: &str = "id, user_id, name, brand, calories, carbs, protein, fat, \
                            sugar, sodium, fiber, created_at, updated_at";

/// Food repository
pub struct FoodRepository;

impl FoodRepository {
    /// Create a food and its servings in one transaction
    pub async fn create(db: &PgPool, input: CreateFood) -> Result<Food> {
        let mut tx = db.begin().await?;
        let nutrients = NutrientColumns::from_profile(&input.per_100g);

        let food = sqlx::query_as::<_, FoodRow>(&format!(
            r#"
            INSERT INTO foods
                (user_id, name, brand, calories, carbs, protein, fat, sugar, sodium, fiber)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {FOOD_COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(&input.name)
        .bind(&input.brand)
        .bind(nutrients.calories)
        .bind(nutrients.carbs)
        .bind(nutrients.protein)
        .bind(nutrients.fat)
        .bind(nutrients.sugar)
        .bind(nutrients.sodium)
        .bind(nutrients.fiber)
        .fetch_one(&mut *tx)
        .await?;

        let mut servings = Vec::with_capacity(input.servings.len());
        for serving in &input.servings {
            let row = sqlx::query_as::<_, ServingRow>(
                r#"
                INSERT INTO food_servings (food_id, name, grams, is_default)
                VALUES ($1, $2, $3, $4)
                RETURNING id, food_id, name, grams, is_default
                "#,
            )
            .bind(food.id)
            .bind(&serving.name)
            .bind(f64_to_dec(serving.grams))
            .bind(serving.is_default)
            .fetch_one(&mut *tx)
            .await?;
            servings.push(row);
        }

        tx.commit().await?;
        Ok(food.into_food(servings))
    }

    /// Find one of the user's foods with its servings
    pub async fn find_by_id(db: &PgPool, user_id: Uuid, food_id: Uuid) -> Result<Option<Food>> {
        let row = sqlx::query_as::<_, FoodRow>(&format!(
            "SELECT {FOOD_COLUMNS} FROM foods WHERE id = $1 AND user_id = $2"
        ))
        .bind(food_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let servings = Self::servings_for(db, &[row.id]).await?;
        Ok(Some(row.into_food(servings)))
    }

    /// Load several of the user's foods; ids that do not exist are skipped
    pub async fn find_many(db: &PgPool, user_id: Uuid, food_ids: &[Uuid]) -> Result<Vec<Food>> {
        if food_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, FoodRow>(&format!(
            "SELECT {FOOD_COLUMNS} FROM foods WHERE user_id = $1 AND id = ANY($2)"
        ))
        .bind(user_id)
        .bind(food_ids)
        .fetch_all(db)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut servings: HashMap<Uuid, Vec<ServingRow>> = HashMap::new();
        for serving in Self::servings_for(db, &ids).await? {
            servings.entry(serving.food_id).or_default().push(serving);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let own = servings.remove(&row.id).unwrap_or_default();
                row.into_food(own)
            })
            .collect())
    }

    async fn servings_for(db: &PgPool, food_ids: &[Uuid]) -> Result<Vec<ServingRow>> {
        let rows = sqlx::query_as::<_, ServingRow>(
            r#"
            SELECT id, food_id, name, grams, is_default
            FROM food_servings
            WHERE food_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(food_ids)
        .fetch_all(db)
        .await?;

        Ok(rows)
    }
}
