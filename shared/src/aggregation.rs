//! Meal and day totals for logged entries
//!
//! Unknown optional nutrients (fiber, sugar, sodium) count as zero here so
//! totals are always closed. Each nutrient is summed in sorted order, which
//! makes the totals identical for every ordering of the same entries.

use crate::errors::{NutritionError, NutritionResult};
use crate::goals::DailyGoals;
use crate::models::{LogEntry, NutritionTotals};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entries of one meal and their totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealGroup {
    pub totals: NutritionTotals,
    pub entries: Vec<LogEntry>,
}

/// Consumption relative to daily goals, in whole percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub calories_pct: f64,
    pub carbs_pct: f64,
    pub protein_pct: f64,
    pub fat_pct: f64,
    /// Negative once the calorie goal is exceeded
    pub remaining_calories: f64,
}

/// Everything the daily log view needs for one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub totals: NutritionTotals,
    pub meals: BTreeMap<String, MealGroup>,
    pub entry_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<DailyGoals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<GoalProgress>,
}

/// Totals for a single day inside a range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTotals {
    pub date: NaiveDate,
    pub totals: NutritionTotals,
    pub entry_count: usize,
}

/// Per-day totals over a window of consecutive days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DayTotals>,
    /// Number of days with at least one entry
    pub logged_days: usize,
    /// Mean over logged days only
    pub average: NutritionTotals,
}

fn check_entry(entry: &LogEntry) -> NutritionResult<()> {
    if !entry.quantity.is_finite() || entry.quantity <= 0.0 {
        return Err(NutritionError::InvalidQuantity(entry.quantity));
    }
    entry.nutrition.validate()
}

fn ordered_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

fn sum_totals<'a>(items: impl Iterator<Item = &'a NutritionTotals> + Clone) -> NutritionTotals {
    NutritionTotals {
        calories: ordered_sum(items.clone().map(|t| t.calories)),
        carbs: ordered_sum(items.clone().map(|t| t.carbs)),
        protein: ordered_sum(items.clone().map(|t| t.protein)),
        fat: ordered_sum(items.clone().map(|t| t.fat)),
        fiber: ordered_sum(items.clone().map(|t| t.fiber)),
        sugar: ordered_sum(items.clone().map(|t| t.sugar)),
        sodium: ordered_sum(items.map(|t| t.sodium)),
    }
}

/// Sum every nutrient across `entries`.
///
/// Fails on an entry with a non-positive quantity or a negative nutrient
/// rather than producing distorted totals.
pub fn sum_entries(entries: &[LogEntry]) -> NutritionResult<NutritionTotals> {
    entries.iter().try_for_each(check_entry)?;

    let field = |f: fn(&LogEntry) -> f64| ordered_sum(entries.iter().map(f));
    Ok(NutritionTotals {
        calories: field(|e| e.nutrition.calories),
        carbs: field(|e| e.nutrition.carbs),
        protein: field(|e| e.nutrition.protein),
        fat: field(|e| e.nutrition.fat),
        fiber: field(|e| e.nutrition.fiber.unwrap_or(0.0)),
        sugar: field(|e| e.nutrition.sugar.unwrap_or(0.0)),
        sodium: field(|e| e.nutrition.sodium.unwrap_or(0.0)),
    })
}

/// Bucket entries by meal id, with totals per bucket
pub fn group_by_meal(entries: &[LogEntry]) -> NutritionResult<BTreeMap<String, MealGroup>> {
    let mut buckets: BTreeMap<String, Vec<LogEntry>> = BTreeMap::new();
    for entry in entries {
        buckets.entry(entry.meal_id.clone()).or_default().push(entry.clone());
    }

    buckets
        .into_iter()
        .map(|(meal_id, entries)| {
            let totals = sum_entries(&entries)?;
            Ok((meal_id, MealGroup { totals, entries }))
        })
        .collect()
}

/// `amount` as a whole percentage of `goal`, unclamped.
///
/// A non-positive goal yields 0; goals are user-editable and may be briefly
/// invalid while a form is being filled in.
pub fn percent_of_goal(amount: f64, goal: f64) -> f64 {
    if !goal.is_finite() || goal <= 0.0 {
        return 0.0;
    }
    (amount / goal * 100.0).round()
}

impl GoalProgress {
    pub fn from_totals(totals: &NutritionTotals, goals: &DailyGoals) -> Self {
        Self {
            calories_pct: percent_of_goal(totals.calories, goals.calories),
            carbs_pct: percent_of_goal(totals.carbs, goals.carbs),
            protein_pct: percent_of_goal(totals.protein, goals.protein),
            fat_pct: percent_of_goal(totals.fat, goals.fat),
            remaining_calories: goals.calories - totals.calories,
        }
    }
}

/// Build the summary for `date` from entries; entries on other dates are ignored
pub fn summarize_day(
    date: NaiveDate,
    entries: &[LogEntry],
    goals: Option<&DailyGoals>,
) -> NutritionResult<DailySummary> {
    let day: Vec<LogEntry> = entries.iter().filter(|e| e.log_date == date).cloned().collect();
    let totals = sum_entries(&day)?;
    let meals = group_by_meal(&day)?;

    Ok(DailySummary {
        date,
        totals,
        meals,
        entry_count: day.len(),
        goals: goals.copied(),
        progress: goals.map(|g| GoalProgress::from_totals(&totals, g)),
    })
}

/// Last date of a window of `days` dates starting at `start`.
///
/// Fails when the window would run past [`NaiveDate::MAX`].
pub fn range_end(start: NaiveDate, days: u32) -> NutritionResult<NaiveDate> {
    start
        .checked_add_days(Days::new(u64::from(days.max(1)) - 1))
        .ok_or(NutritionError::DateOutOfRange { start })
}

/// Per-day totals for `days` consecutive dates starting at `start`.
///
/// Every date in the window appears, with zero totals when nothing was logged.
pub fn summarize_range(
    start: NaiveDate,
    days: u32,
    entries: &[LogEntry],
) -> NutritionResult<RangeSummary> {
    let span = days.max(1);
    let end = range_end(start, span)?;

    let mut by_date: BTreeMap<NaiveDate, Vec<LogEntry>> = start
        .iter_days()
        .take(span as usize)
        .map(|date| (date, Vec::new()))
        .collect();
    for entry in entries {
        if let Some(bucket) = by_date.get_mut(&entry.log_date) {
            bucket.push(entry.clone());
        }
    }

    let days = by_date
        .into_iter()
        .map(|(date, day)| {
            Ok(DayTotals {
                date,
                totals: sum_entries(&day)?,
                entry_count: day.len(),
            })
        })
        .collect::<NutritionResult<Vec<_>>>()?;

    let logged: Vec<&DayTotals> = days.iter().filter(|d| d.entry_count > 0).collect();
    let logged_days = logged.len();
    let average = if logged_days == 0 {
        NutritionTotals::default()
    } else {
        let sum = sum_totals(logged.iter().map(|d| &d.totals));
        let n = logged_days as f64;
        NutritionTotals {
            calories: sum.calories / n,
            carbs: sum.carbs / n,
            protein: sum.protein / n,
            fat: sum.fat / n,
            fiber: sum.fiber / n,
            sugar: sum.sugar / n,
            sodium: sum.sodium / n,
        }
    };

    Ok(RangeSummary {
        start,
        end,
        days,
        logged_days,
        average,
    })
}
