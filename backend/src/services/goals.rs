//! Goals service - daily targets and macro allocation

use crate::error::ApiError;
use crate::repositories::GoalsRepository;
use macrotrack_shared::types::{AllocateRequest, GoalsResponse, SplitValidationResponse};
use macrotrack_shared::validation::{
    validate_calorie_goal, validate_macro_goal, validate_percentage, ValidationError,
};
use macrotrack_shared::{validate_percentage_split, DailyGoals, GoalSettings, GoalType, MacroSplit};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Goals service
pub struct GoalService;

impl GoalService {
    fn check_split(split: &MacroSplit) -> Result<(), ApiError> {
        ValidationError::check("carb_pct", validate_percentage(split.carb_pct))?;
        ValidationError::check("protein_pct", validate_percentage(split.protein_pct))?;
        ValidationError::check("fat_pct", validate_percentage(split.fat_pct))?;
        Ok(())
    }

    /// Validate settings and resolve them to gram goals
    pub fn resolve_settings(settings: &GoalSettings) -> Result<DailyGoals, ApiError> {
        ValidationError::check("calories", validate_calorie_goal(settings.calories))?;

        match (settings.goal_type, settings.split.as_ref()) {
            (GoalType::Grams, _) => {
                ValidationError::check("carbs", validate_macro_goal(settings.carbs))?;
                ValidationError::check("protein", validate_macro_goal(settings.protein))?;
                ValidationError::check("fat", validate_macro_goal(settings.fat))?;
            }
            (GoalType::Percentage, Some(split)) => Self::check_split(split)?,
            (GoalType::Percentage, None) => {}
        }

        Ok(settings.daily_goals()?)
    }

    /// Both representations of the saved settings
    pub fn to_response(settings: GoalSettings, daily_goals: DailyGoals) -> GoalsResponse {
        let split = match (settings.goal_type, settings.split) {
            (GoalType::Percentage, Some(split)) => split,
            _ => MacroSplit::from_goals(&daily_goals),
        };
        GoalsResponse {
            settings,
            daily_goals,
            split,
        }
    }

    /// Gram goals for a percentage split
    pub fn allocate(request: &AllocateRequest) -> Result<DailyGoals, ApiError> {
        request.validate()?;
        ValidationError::check("calories", validate_calorie_goal(request.calories))?;
        Self::check_split(&request.split)?;
        Ok(DailyGoals::from_split(request.calories, &request.split)?)
    }

    /// Whether a split totals 100%
    pub fn check_split_total(split: &MacroSplit) -> SplitValidationResponse {
        SplitValidationResponse {
            total: split.total(),
            is_valid: validate_percentage_split(split.carb_pct, split.protein_pct, split.fat_pct),
        }
    }

    /// Load the user's goals
    pub async fn get(db: &PgPool, user_id: Uuid) -> Result<GoalsResponse, ApiError> {
        let row = GoalsRepository::find(db, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("No goals set".to_string()))?;

        let settings = GoalSettings::from(row);
        let daily_goals = settings.daily_goals()?;
        Ok(Self::to_response(settings, daily_goals))
    }

    /// Validate and save the user's goals
    pub async fn save(
        db: &PgPool,
        user_id: Uuid,
        settings: GoalSettings,
    ) -> Result<GoalsResponse, ApiError> {
        let daily_goals = Self::resolve_settings(&settings)?;

        let row = GoalsRepository::upsert(db, user_id, &settings, &daily_goals)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, goal_type = ?settings.goal_type, "Goals saved");
        Ok(Self::to_response(GoalSettings::from(row), daily_goals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macrotrack_shared::NutritionError;
    use rstest::rstest;

    fn percentage(carb: f64, protein: f64, fat: f64) -> GoalSettings {
        GoalSettings {
            goal_type: GoalType::Percentage,
            calories: 2000.0,
            carbs: 0.0,
            protein: 0.0,
            fat: 0.0,
            split: Some(MacroSplit {
                carb_pct: carb,
                protein_pct: protein,
                fat_pct: fat,
            }),
        }
    }

    #[test]
    fn test_resolve_percentage_settings() {
        let goals = GoalService::resolve_settings(&percentage(50.0, 25.0, 25.0)).unwrap();
        assert_eq!(goals.carbs, 250.0);
        assert_eq!(goals.protein, 125.0);
        assert_eq!(goals.fat, 56.0);
    }

    #[test]
    fn test_resolve_rejects_split_off_100() {
        let err = GoalService::resolve_settings(&percentage(50.0, 30.0, 25.0)).unwrap_err();
        let expected: ApiError = NutritionError::InvalidGoalPercentageSplit { total: 105.0 }.into();
        assert_eq!(err.to_string(), expected.to_string());
    }

    #[test]
    fn test_resolve_rejects_bad_values() {
        let mut zero_calories = percentage(50.0, 25.0, 25.0);
        zero_calories.calories = 0.0;
        assert!(GoalService::resolve_settings(&zero_calories).is_err());

        assert!(GoalService::resolve_settings(&percentage(120.0, -10.0, -10.0)).is_err());

        let negative_grams = GoalSettings {
            goal_type: GoalType::Grams,
            carbs: -1.0,
            split: None,
            ..percentage(0.0, 0.0, 0.0)
        };
        assert!(GoalService::resolve_settings(&negative_grams).is_err());
    }

    #[test]
    fn test_gram_settings_report_derived_split() {
        let settings = GoalSettings {
            goal_type: GoalType::Grams,
            calories: 2000.0,
            carbs: 250.0,
            protein: 125.0,
            fat: 56.0,
            split: None,
        };
        let goals = GoalService::resolve_settings(&settings).unwrap();
        let response = GoalService::to_response(settings, goals);
        assert_eq!(response.split.carb_pct, 50.0);
        assert_eq!(response.split.fat_pct, 25.2);
    }

    #[test]
    fn test_allocate() {
        let request = AllocateRequest {
            calories: 1800.0,
            split: MacroSplit {
                carb_pct: 40.0,
                protein_pct: 30.0,
                fat_pct: 30.0,
            },
        };
        let goals = GoalService::allocate(&request).unwrap();
        assert_eq!((goals.carbs, goals.protein, goals.fat), (180.0, 135.0, 60.0));
    }

    #[test]
    fn test_check_split_total() {
        let response = GoalService::check_split_total(&MacroSplit {
            carb_pct: 40.0,
            protein_pct: 30.0,
            fat_pct: 30.05,
        });
        assert!(response.is_valid);

        let response = GoalService::check_split_total(&MacroSplit {
            carb_pct: 50.0,
            protein_pct: 30.0,
            fat_pct: 25.0,
        });
        assert!(!response.is_valid);
        assert_eq!(response.total, 105.0);
    }

    #[rstest]
    #[case(40.0, 30.0, 30.0, 1800.0, (180.0, 135.0, 60.0))]
    #[case(50.0, 25.0, 25.0, 2000.0, (250.0, 125.0, 56.0))]
    #[case(100.0, 0.0, 0.0, 1600.0, (400.0, 0.0, 0.0))]
    #[case(33.3, 33.3, 33.4, 2400.0, (200.0, 200.0, 89.0))]
    fn test_allocate_cases(
        #[case] carb_pct: f64,
        #[case] protein_pct: f64,
        #[case] fat_pct: f64,
        #[case] calories: f64,
        #[case] expected: (f64, f64, f64),
    ) {
        let request = AllocateRequest {
            calories,
            split: MacroSplit {
                carb_pct,
                protein_pct,
                fat_pct,
            },
        };
        let goals = GoalService::allocate(&request).unwrap();
        assert_eq!((goals.carbs, goals.protein, goals.fat), expected);
    }
}
