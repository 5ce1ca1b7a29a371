//! Core domain types for the Gymlog tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Workout entries and their drafts
//! - Body parts and the exercise catalog
//! - Routines and the weekly schedule
//! - Nutrition goals, food items and diet logs
//! - The snapshot envelope used for backup/restore

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Body Parts and Exercises
// ============================================================================

/// Slug identifier for a body part (e.g. "upper")
pub type BodyPartId = String;

/// A user-defined training category grouping exercises
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BodyPart {
    pub id: BodyPartId,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub gradient: String,
}

/// An exercise inside a body-part group; `name` is the key within the group
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub image: String,
}

/// Exercise groups keyed by body-part id
pub type ExerciseCatalog = BTreeMap<BodyPartId, Vec<Exercise>>;

// ============================================================================
// Workout Log
// ============================================================================

/// One recorded set (exercise + weight + reps + week + timestamp)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutEntry {
    pub id: String,
    pub part: BodyPartId,
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
    pub week: u32,
    /// RFC 3339 timestamp of when the set was performed
    pub date: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl WorkoutEntry {
    /// Parse the entry timestamp, normalized to UTC
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// An entry is valid iff id, part and exercise are non-empty and the
    /// timestamp parses. Invalid entries are filtered out of every view.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
            && !self.part.is_empty()
            && !self.exercise.is_empty()
            && self.parsed_date().is_some()
    }
}

/// Input for creating a workout entry; id, timestamp and image are assigned
/// at add time unless `date` carries an explicit back-fill override.
#[derive(Clone, Debug)]
pub struct EntryDraft {
    pub part: BodyPartId,
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
    pub week: u32,
    pub comment: Option<String>,
    pub date: Option<String>,
}

// ============================================================================
// Routines and Weekly Schedule
// ============================================================================

/// One slot in a routine template
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoutineExercise {
    pub part_id: BodyPartId,
    pub exercise_name: String,
}

/// A named, reusable ordered template of exercises, not yet dated
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutRoutine {
    pub id: String,
    pub name: String,
    pub exercises: Vec<RoutineExercise>,
}

/// Weekday index (0=Sunday .. 6=Saturday) to routine id; sparse
pub type WeeklySchedule = BTreeMap<u8, String>;

// ============================================================================
// Nutrition
// ============================================================================

/// Daily macro targets; singleton record, replaced whole on edit
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NutritionGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// A food database record; macros are per serving
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub serving_size: String,
}

/// Meal slots within a day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snacks,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snacks" | "snack" => Some(MealType::Snacks),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snacks => "snacks",
        }
    }
}

/// A food logged against a meal; `servings` may be fractional
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggedFood {
    pub id: String,
    pub food_id: String,
    pub servings: f64,
}

/// Meals of one calendar day
pub type DayDietLog = BTreeMap<MealType, Vec<LoggedFood>>;

/// Date key (`YYYY-MM-DD`, local calendar day) to that day's meals.
/// Empty meal vectors and empty day maps are pruned on removal.
pub type DailyDietLog = BTreeMap<String, DayDietLog>;

/// Summed macros for one day
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

// ============================================================================
// Snapshot Envelope
// ============================================================================

/// Full application state bundled for backup/restore; must round-trip exactly
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AppData {
    pub log: Vec<WorkoutEntry>,
    pub body_parts: Vec<BodyPart>,
    pub exercises: ExerciseCatalog,
    pub routines: Vec<WorkoutRoutine>,
    pub weekly_schedule: WeeklySchedule,
    pub nutrition_goals: NutritionGoals,
    pub food_database: Vec<FoodItem>,
    pub daily_diet_logs: DailyDietLog,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str) -> WorkoutEntry {
        WorkoutEntry {
            id: "e1".into(),
            part: "upper".into(),
            exercise: "Bench Press".into(),
            weight: 80.0,
            reps: 8,
            week: 1,
            date: date.into(),
            image: "img".into(),
            comment: None,
        }
    }

    #[test]
    fn test_entry_validity() {
        assert!(entry("2026-01-15T10:30:00+03:00").is_valid());

        let mut bad = entry("2026-01-15T10:30:00Z");
        bad.id = String::new();
        assert!(!bad.is_valid());

        let mut bad = entry("not a date");
        assert!(!bad.is_valid());
        bad.date = String::new();
        assert!(!bad.is_valid());
    }

    #[test]
    fn test_meal_type_parse() {
        assert_eq!(MealType::parse("breakfast"), Some(MealType::Breakfast));
        assert_eq!(MealType::parse("SNACKS"), Some(MealType::Snacks));
        assert_eq!(MealType::parse("snack"), Some(MealType::Snacks));
        assert_eq!(MealType::parse("brunch"), None);
    }

    #[test]
    fn test_meal_type_as_map_key_roundtrip() {
        let mut day: DayDietLog = BTreeMap::new();
        day.insert(
            MealType::Lunch,
            vec![LoggedFood {
                id: "l1".into(),
                food_id: "food-1".into(),
                servings: 1.5,
            }],
        );

        let json = serde_json::to_string(&day).unwrap();
        assert!(json.contains("\"lunch\""));

        let back: DayDietLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day);
    }

    #[test]
    fn test_entry_comment_omitted_when_absent() {
        let json = serde_json::to_string(&entry("2026-01-15T10:30:00Z")).unwrap();
        assert!(!json.contains("comment"));
    }
}
