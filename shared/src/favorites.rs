//! Frequently logged foods for quick re-logging

use crate::errors::NutritionResult;
use crate::models::{FavoriteFoodSummary, Food, LogEntry, ServingDefinition};
use crate::serving::resolve;
use crate::units::round1;
use regex_lite::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Maximum number of favorites returned by [`rank`]
pub const FAVORITES_LIMIT: usize = 10;

/// Units that never take a plural suffix
const ABBREVIATIONS: &[&str] = &[
    "g", "kg", "mg", "mcg", "oz", "lb", "lbs", "ml", "l", "dl", "cl", "tsp", "tbsp", "fl", "qt",
    "pt",
];

/// How often one food was logged and its most recent entry
#[derive(Debug, Clone, PartialEq)]
pub struct FoodUsage {
    pub food_id: String,
    pub log_count: usize,
    pub last: LogEntry,
}

/// Rank foods by how often they were logged, most frequent first.
///
/// Quick adds are ignored. The most recent entry of each food (by date, then
/// time; the first one in `entries` on a full tie) supplies the serving and
/// quantity, and nutrition is recomputed against the food's current record.
/// Foods missing from `foods` are skipped.
pub fn rank(
    entries: &[LogEntry],
    foods: &HashMap<String, Food>,
) -> NutritionResult<Vec<FavoriteFoodSummary>> {
    let mut usages: Vec<FoodUsage> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries.iter().filter(|e| !e.is_quick_add) {
        let Some(food_id) = entry.food_id.as_deref() else {
            continue;
        };
        match index.get(food_id) {
            Some(&i) => {
                let usage = &mut usages[i];
                usage.log_count += 1;
                if (entry.log_date, entry.log_time) > (usage.last.log_date, usage.last.log_time) {
                    usage.last = entry.clone();
                }
            }
            None => {
                index.insert(food_id, usages.len());
                usages.push(FoodUsage {
                    food_id: food_id.to_string(),
                    log_count: 1,
                    last: entry.clone(),
                });
            }
        }
    }

    rank_usage(usages, foods)
}

/// Rank already counted usage, such as per-food counts aggregated in storage.
///
/// Sorted by count, then last logged date, both descending; the order of
/// `usages` breaks remaining ties.
pub fn rank_usage(
    mut usages: Vec<FoodUsage>,
    foods: &HashMap<String, Food>,
) -> NutritionResult<Vec<FavoriteFoodSummary>> {
    usages.sort_by(|a, b| {
        b.log_count
            .cmp(&a.log_count)
            .then_with(|| b.last.log_date.cmp(&a.last.log_date))
    });

    usages
        .iter()
        .filter_map(|usage| foods.get(&usage.food_id).map(|food| (usage, food)))
        .take(FAVORITES_LIMIT)
        .map(|(usage, food)| summarize(usage, food))
        .collect()
}

fn summarize(usage: &FoodUsage, food: &Food) -> NutritionResult<FavoriteFoodSummary> {
    let last = &usage.last;
    let serving: Option<&ServingDefinition> =
        last.serving_id.as_deref().and_then(|id| food.serving(id));
    let grams = serving.map_or(100.0, |s| s.grams);
    let nutrition = resolve(&food.per_100g, grams, last.quantity)?;

    Ok(FavoriteFoodSummary {
        food_id: food.id.clone(),
        food_name: food.name.clone(),
        log_count: usage.log_count,
        last_logged_date: last.log_date,
        last_logged_quantity: last.quantity,
        last_logged_serving: serving.cloned(),
        nutrition,
        serving_display: format_serving_display(
            last.quantity,
            serving.map(|s| s.name.as_str()),
        ),
    })
}

fn serving_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"^\s*(?:(?:(?P<whole>\d+)\s+)?(?P<num>\d+)/(?P<den>\d+)",
            r"|(?P<dec>\d+(?:\.\d+)?|\.\d+))",
            r"(?P<sep>\s*)(?P<unit>.*?)\s*$",
        ))
        .expect("serving name pattern is valid")
    })
}

/// Split a serving name into its leading amount, separator and unit
fn parse_serving_name(name: &str) -> (f64, String, String) {
    let fallback = || (1.0, " ".to_string(), name.trim().to_string());

    let Some(caps) = serving_name_pattern().captures(name) else {
        return fallback();
    };
    let number = |group: &str| caps.name(group).and_then(|m| m.as_str().parse::<f64>().ok());

    let amount = match (number("num"), number("den"), number("dec")) {
        (Some(_), Some(den), _) if den == 0.0 => return fallback(),
        (Some(num), Some(den), _) => number("whole").unwrap_or(0.0) + num / den,
        (_, _, Some(dec)) => dec,
        _ => return fallback(),
    };

    let sep = caps.name("sep").map_or("", |m| m.as_str()).to_string();
    let unit = caps.name("unit").map_or("", |m| m.as_str()).to_string();
    (amount, sep, unit)
}

fn format_amount(value: f64) -> String {
    let rounded = round1(value);
    let value = if rounded.is_finite() { rounded } else { value };
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn pluralize(unit: &str) -> String {
    let is_word = unit.len() > 1 && unit.chars().all(|c| c.is_ascii_alphabetic());
    let lower = unit.to_ascii_lowercase();
    if !is_word || lower.ends_with('s') || ABBREVIATIONS.contains(&lower.as_str()) {
        return unit.to_string();
    }
    format!("{unit}s")
}

/// Human readable amount for `quantity` servings named `serving_name`.
///
/// The leading amount of the name is multiplied by `quantity`, so `2` of
/// `"1 cup"` is `"2 cups"` and `2` of `"100g"` is `"200g"`. Word units
/// are pluralized only for totals above one.
pub fn format_serving_display(quantity: f64, serving_name: Option<&str>) -> String {
    let Some(name) = serving_name.filter(|n| !n.trim().is_empty()) else {
        let noun = if quantity == 1.0 { "serving" } else { "servings" };
        return format!("{} {noun}", format_amount(quantity));
    };

    let (amount, sep, unit) = parse_serving_name(name);
    let total = quantity * amount;
    if unit.is_empty() {
        return format_amount(total);
    }

    let unit = if !sep.is_empty() && round1(total) > 1.0 {
        pluralize(&unit)
    } else {
        unit
    };
    let sep = if sep.is_empty() { "" } else { " " };
    format!("{}{sep}{unit}", format_amount(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutrientProfile;
    use chrono::{NaiveDate, TimeZone, Utc};
    use proptest::prelude::*;
    use rstest::rstest;

    fn food(id: &str, servings: Vec<ServingDefinition>) -> Food {
        Food {
            id: id.to_string(),
            name: format!("Food {id}"),
            brand: None,
            per_100g: NutrientProfile::new(150.0, 12.0, 20.0, 0.0),
            servings,
        }
    }

    fn cup() -> ServingDefinition {
        ServingDefinition {
            id: "cup".into(),
            name: "1 cup".into(),
            grams: 170.0,
            is_default: true,
        }
    }

    fn logged(id: &str, food_id: &str, day: u32, hour: u32) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            food_id: Some(food_id.to_string()),
            meal_id: "lunch".into(),
            serving_id: None,
            quantity: 1.0,
            grams: 100.0,
            nutrition: NutrientProfile::new(0.0, 0.0, 0.0, 0.0),
            log_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            log_time: Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap(),
            is_quick_add: false,
        }
    }

    fn catalog(foods: Vec<Food>) -> HashMap<String, Food> {
        foods.into_iter().map(|f| (f.id.clone(), f)).collect()
    }

    #[test]
    fn test_rank_by_count_then_recency() {
        let entries = vec![
            logged("1", "a", 5, 8),
            logged("2", "b", 6, 8),
            logged("3", "a", 3, 8),
            logged("4", "c", 7, 8),
            logged("5", "b", 2, 8),
            logged("6", "a", 1, 8),
        ];
        let foods = catalog(vec![food("a", vec![]), food("b", vec![]), food("c", vec![])]);
        let ranked = rank(&entries, &foods).unwrap();

        let order: Vec<_> = ranked.iter().map(|f| (f.food_id.as_str(), f.log_count)).collect();
        assert_eq!(order, vec![("a", 3), ("b", 2), ("c", 1)]);
        assert_eq!(ranked[0].last_logged_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_rank_recency_breaks_count_ties() {
        let entries = vec![logged("1", "old", 1, 8), logged("2", "new", 9, 8)];
        let foods = catalog(vec![food("old", vec![]), food("new", vec![])]);
        let ranked = rank(&entries, &foods).unwrap();
        assert_eq!(ranked[0].food_id, "new");
    }

    #[test]
    fn test_rank_excludes_quick_adds() {
        let mut quick = logged("1", "a", 1, 8);
        quick.food_id = None;
        let mut flagged = logged("2", "a", 1, 9);
        flagged.is_quick_add = true;

        let foods = catalog(vec![food("a", vec![])]);
        assert!(rank(&[quick, flagged], &foods).unwrap().is_empty());
    }

    #[test]
    fn test_rank_uses_last_serving_and_current_food() {
        let mut older = logged("1", "yogurt", 1, 8);
        older.quantity = 3.0;
        let mut latest = logged("2", "yogurt", 4, 8);
        latest.serving_id = Some("cup".into());
        latest.quantity = 2.0;

        let foods = catalog(vec![food("yogurt", vec![cup()])]);
        let ranked = rank(&[older, latest], &foods).unwrap();
        let favorite = &ranked[0];

        assert_eq!(favorite.last_logged_quantity, 2.0);
        assert_eq!(favorite.last_logged_serving, Some(cup()));
        assert_eq!(favorite.nutrition.calories, 510.0);
        assert_eq!(favorite.nutrition.protein, 68.0);
        assert_eq!(favorite.serving_display, "2 cups");
    }

    #[test]
    fn test_rank_deleted_serving_falls_back_to_100g() {
        let mut entry = logged("1", "yogurt", 1, 8);
        entry.serving_id = Some("gone".into());
        entry.quantity = 1.5;

        let foods = catalog(vec![food("yogurt", vec![cup()])]);
        let favorite = &rank(&[entry], &foods).unwrap()[0];

        assert!(favorite.last_logged_serving.is_none());
        assert_eq!(favorite.nutrition.calories, 225.0);
        assert_eq!(favorite.serving_display, "1.5 servings");
    }

    #[test]
    fn test_rank_same_day_prefers_later_time_then_input_order() {
        let mut morning = logged("1", "a", 2, 8);
        morning.quantity = 1.0;
        let mut evening = logged("2", "a", 2, 20);
        evening.quantity = 2.0;
        let mut twin = logged("3", "a", 2, 20);
        twin.quantity = 3.0;

        let foods = catalog(vec![food("a", vec![])]);
        let ranked = rank(&[morning, evening, twin], &foods).unwrap();
        assert_eq!(ranked[0].last_logged_quantity, 2.0);
    }

    #[test]
    fn test_rank_truncates_and_skips_missing_foods() {
        let entries: Vec<LogEntry> = (0..12)
            .map(|i| logged(&i.to_string(), &format!("f{i}"), 1, 8))
            .collect();
        let mut foods = catalog((0..12).map(|i| food(&format!("f{i}"), vec![])).collect());
        foods.remove("f0");

        let ranked = rank(&entries, &foods).unwrap();
        assert_eq!(ranked.len(), FAVORITES_LIMIT);
        assert!(ranked.iter().all(|f| f.food_id != "f0"));
        // equal counts and dates keep first-seen order
        assert_eq!(ranked[0].food_id, "f1");
    }

    #[rstest]
    #[case(2.0, Some("1 cup"), "2 cups")]
    #[case(1.0, Some("1 cup"), "1 cup")]
    #[case(2.0, Some("100g"), "200g")]
    #[case(3.0, Some("6 meatballs"), "18 meatballs")]
    #[case(1.0, Some("1/2 cup"), "0.5 cup")]
    #[case(2.0, Some("1/2 cup"), "1 cup")]
    #[case(3.0, Some("1/2 cup"), "1.5 cups")]
    #[case(2.0, Some("1 1/2 cup"), "3 cups")]
    #[case(2.0, Some("0.5 oz"), "1 oz")]
    #[case(4.0, Some("2 tbsp"), "8 tbsp")]
    #[case(2.0, Some("slice"), "2 slices")]
    #[case(1.0, Some("large egg"), "1 large egg")]
    #[case(1.0, None, "1 serving")]
    #[case(2.5, None, "2.5 servings")]
    #[case(2.0, Some("  "), "2 servings")]
    fn test_format_serving_display(
        #[case] quantity: f64,
        #[case] name: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(format_serving_display(quantity, name), expected);
    }

    #[test]
    fn test_format_serving_display_zero_denominator_is_literal() {
        assert_eq!(format_serving_display(1.0, Some("1/0 cup")), "1 1/0 cup");
    }

    #[test]
    fn test_format_serving_display_large_totals() {
        assert_eq!(format_serving_display(1e20, None), "100000000000000000000 servings");
        assert_eq!(
            format_serving_display(4e18, Some("4 cup")),
            "16000000000000000000 cups"
        );
    }

    #[test]
    fn test_rank_count_beats_recency_in_any_order() {
        // A: 3 recent entries, B: 5 older ones
        let a: Vec<LogEntry> = (0..3).map(|i| logged(&format!("a{i}"), "a", 10 + i, 8)).collect();
        let b: Vec<LogEntry> = (0..5).map(|i| logged(&format!("b{i}"), "b", 1 + i, 8)).collect();
        let foods = catalog(vec![food("a", vec![]), food("b", vec![])]);

        for entries in [
            [a.clone(), b.clone()].concat(),
            [b.clone(), a.clone()].concat(),
        ] {
            let ranked = rank(&entries, &foods).unwrap();
            let order: Vec<_> = ranked.iter().map(|f| (f.food_id.as_str(), f.log_count)).collect();
            assert_eq!(order, vec![("b", 5), ("a", 3)]);
        }
    }

    #[test]
    fn test_rank_usage_from_stored_counts() {
        let usages = vec![
            FoodUsage {
                food_id: "a".into(),
                log_count: 7,
                last: logged("1", "a", 20, 8),
            },
            FoodUsage {
                food_id: "gone".into(),
                log_count: 90,
                last: logged("2", "gone", 20, 8),
            },
            FoodUsage {
                food_id: "b".into(),
                log_count: 1400,
                last: logged("3", "b", 2, 8),
            },
        ];
        let foods = catalog(vec![food("a", vec![]), food("b", vec![])]);
        let ranked = rank_usage(usages, &foods).unwrap();

        let order: Vec<_> = ranked.iter().map(|f| (f.food_id.as_str(), f.log_count)).collect();
        assert_eq!(order, vec![("b", 1400), ("a", 7)]);
    }

    /// Histories where every food has its own last logged date, so no
    /// ranking tie is left to input order
    fn history_strategy() -> impl Strategy<Value = Vec<LogEntry>> {
        proptest::collection::vec(
            (1usize..6, 1u32..5, proptest::collection::vec(1u32..10, 5)),
            1..8,
        )
        .prop_map(|foods| {
            let mut entries = Vec::new();
            for (k, (count, last_quantity, older_days)) in foods.into_iter().enumerate() {
                let food_id = format!("f{k}");
                let mut latest = logged(&format!("{k}-last"), &food_id, 10 + k as u32, 12);
                latest.quantity = f64::from(last_quantity);
                entries.push(latest);
                for (i, day) in older_days.into_iter().take(count - 1).enumerate() {
                    entries.push(logged(&format!("{k}-{i}"), &food_id, day, 8));
                }
            }
            entries
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Ranking depends only on the history, not its order
        #[test]
        fn prop_rank_ignores_input_order(
            pair in history_strategy()
                .prop_flat_map(|entries| (Just(entries.clone()), Just(entries).prop_shuffle()))
        ) {
            let (entries, shuffled) = pair;
            let foods = catalog((0..8).map(|k| food(&format!("f{k}"), vec![])).collect());
            let ranked = rank(&entries, &foods).unwrap();

            prop_assert_eq!(&ranked, &rank(&shuffled, &foods).unwrap());
            prop_assert!(ranked.windows(2).all(|w| w[0].log_count >= w[1].log_count));
        }
    }
}
