//! Goals repository - one goal record per user

use super::{dec_to_f64, f64_to_dec};
use anyhow::Result;
use chrono::{DateTime, Utc};
use macrotrack_shared::{DailyGoals, GoalSettings, GoalType, MacroSplit};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Goal row from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoalsRow {
    pub user_id: Uuid,
    pub goal_type: String,
    pub calories: Decimal,
    pub carbs: Decimal,
    pub protein: Decimal,
    pub fat: Decimal,
    pub carb_pct: Option<Decimal>,
    pub protein_pct: Option<Decimal>,
    pub fat_pct: Option<Decimal>,
    pub updated_at: DateTime<Utc>,
}

impl From<GoalsRow> for GoalSettings {
    fn from(row: GoalsRow) -> Self {
        let goal_type = match row.goal_type.as_str() {
            "percentage" => GoalType::Percentage,
            _ => GoalType::Grams,
        };
        let split = match (row.carb_pct, row.protein_pct, row.fat_pct) {
            (Some(carb), Some(protein), Some(fat)) => Some(MacroSplit {
                carb_pct: dec_to_f64(carb),
                protein_pct: dec_to_f64(protein),
                fat_pct: dec_to_f64(fat),
            }),
            _ => None,
        };

        Self {
            goal_type,
            calories: dec_to_f64(row.calories),
            carbs: dec_to_f64(row.carbs),
            protein: dec_to_f64(row.protein),
            fat: dec_to_f64(row.fat),
            split,
        }
    }
}

fn goal_type_name(goal_type: GoalType) -> &'static str {
    match goal_type {
        GoalType::Grams => "grams",
        GoalType::Percentage => "percentage",
    }
}

/// Goals repository
pub struct GoalsRepository;

impl GoalsRepository {
    /// Load the user's goals
    pub async fn find(db: &PgPool, user_id: Uuid) -> Result<Option<GoalsRow>> {
        let row = sqlx::query_as::<_, GoalsRow>(
            r#"
            SELECT user_id, goal_type, calories, carbs, protein, fat,
                   carb_pct, protein_pct, fat_pct, updated_at
            FROM user_goals
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(row)
    }

    /// Save settings; gram columns always hold the resolved gram goals
    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        settings: &GoalSettings,
        goals: &DailyGoals,
    ) -> Result<GoalsRow> {
        let split = settings.split.filter(|_| settings.goal_type == GoalType::Percentage);

        let row = sqlx::query_as::<_, GoalsRow>(
            r#"
            INSERT INTO user_goals (
                user_id, goal_type, calories, carbs, protein, fat,
                carb_pct, protein_pct, fat_pct, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                goal_type = EXCLUDED.goal_type,
                calories = EXCLUDED.calories,
                carbs = EXCLUDED.carbs,
                protein = EXCLUDED.protein,
                fat = EXCLUDED.fat,
                carb_pct = EXCLUDED.carb_pct,
                protein_pct = EXCLUDED.protein_pct,
                fat_pct = EXCLUDED.fat_pct,
                updated_at = NOW()
            RETURNING user_id, goal_type, calories, carbs, protein, fat,
                      carb_pct, protein_pct, fat_pct, updated_at
            "#,
        )
        .bind(user_id)
        .bind(goal_type_name(settings.goal_type))
        .bind(f64_to_dec(goals.calories))
        .bind(f64_to_dec(goals.carbs))
        .bind(f64_to_dec(goals.protein))
        .bind(f64_to_dec(goals.fat))
        .bind(split.map(|s| f64_to_dec(s.carb_pct)))
        .bind(split.map(|s| f64_to_dec(s.protein_pct)))
        .bind(split.map(|s| f64_to_dec(s.fat_pct)))
        .fetch_one(db)
        .await?;

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(goal_type: &str, pct: Option<(i64, i64, i64)>) -> GoalsRow {
        GoalsRow {
            user_id: Uuid::new_v4(),
            goal_type: goal_type.to_string(),
            calories: Decimal::new(2000, 0),
            carbs: Decimal::new(250, 0),
            protein: Decimal::new(125, 0),
            fat: Decimal::new(56, 0),
            carb_pct: pct.map(|p| Decimal::new(p.0, 0)),
            protein_pct: pct.map(|p| Decimal::new(p.1, 0)),
            fat_pct: pct.map(|p| Decimal::new(p.2, 0)),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_percentage_row_to_settings() {
        let settings = GoalSettings::from(row("percentage", Some((50, 25, 25))));
        assert_eq!(settings.goal_type, GoalType::Percentage);
        assert_eq!(settings.split.unwrap().carb_pct, 50.0);
        assert_eq!(settings.daily_goals().unwrap().fat, 56.0);
    }

    #[test]
    fn test_gram_row_to_settings() {
        let settings = GoalSettings::from(row("grams", None));
        assert_eq!(settings.goal_type, GoalType::Grams);
        assert!(settings.split.is_none());
        assert_eq!(settings.protein, 125.0);
    }
}
