//! Diet log mutation and per-day macro aggregation.
//!
//! The daily diet log is a date-keyed map of meals; meals that become empty
//! are pruned along with their day so the structure never accumulates empty
//! containers.

use crate::{DailyDietLog, DayDietLog, FoodItem, LoggedFood, MacroTotals, MealType};

/// Sum macros for one day: `food.field * servings` across every meal.
///
/// A logged food whose id no longer resolves in the database contributes
/// zero and is skipped; deletion from the database never cascades here.
pub fn daily_totals(day_log: &DayDietLog, food_db: &[FoodItem]) -> MacroTotals {
    let mut totals = MacroTotals::default();

    for logged in day_log.values().flatten() {
        let food = match food_db.iter().find(|f| f.id == logged.food_id) {
            Some(food) => food,
            None => {
                tracing::debug!(
                    "Logged food {} references missing food {}, skipping",
                    logged.id,
                    logged.food_id
                );
                continue;
            }
        };
        totals.calories += food.calories * logged.servings;
        totals.protein += food.protein * logged.servings;
        totals.carbs += food.carbs * logged.servings;
        totals.fat += food.fat * logged.servings;
    }

    totals
}

/// Append a logged food to `logs[date][meal]`, creating intermediate
/// containers as needed
pub fn log_food(logs: &mut DailyDietLog, date: &str, meal: MealType, logged: LoggedFood) {
    logs.entry(date.to_string())
        .or_default()
        .entry(meal)
        .or_default()
        .push(logged);
}

/// Remove a logged food by id. Returns whether anything was removed.
///
/// Invariant: after every removal, no empty meal vector and no empty day
/// map is left behind.
pub fn remove_logged_food(
    logs: &mut DailyDietLog,
    date: &str,
    meal: MealType,
    logged_food_id: &str,
) -> bool {
    let day = match logs.get_mut(date) {
        Some(day) => day,
        None => return false,
    };
    let items = match day.get_mut(&meal) {
        Some(items) => items,
        None => return false,
    };

    let before = items.len();
    items.retain(|f| f.id != logged_food_id);
    let removed = items.len() != before;

    if items.is_empty() {
        day.remove(&meal);
    }
    if day.is_empty() {
        logs.remove(date);
    }

    removed
}
