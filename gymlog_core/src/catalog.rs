//! Built-in defaults for body parts, exercises and the food database.
//!
//! These seed values populate every slot on first run and are the fallback
//! when an imported snapshot omits a slot.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Image used when an entry's exercise has no catalog image
pub const PLACEHOLDER_IMAGE: &str = "https://picsum.photos/seed/placeholder/100/100";

/// Color/gradient pairs cycled through when the user adds a new body part
pub const COLOR_SCHEMES: [(&str, &str); 5] = [
    ("rose", "from-rose-500 to-pink-500"),
    ("fuchsia", "from-fuchsia-500 to-purple-500"),
    ("indigo", "from-indigo-500 to-blue-500"),
    ("teal", "from-teal-500 to-cyan-500"),
    ("orange", "from-orange-500 to-amber-500"),
];

/// Icons cycled through when the user adds a new body part
pub const PART_ICONS: [&str; 5] = ["💪", "🔥", "🧘", "🤸", "🏋️"];

/// The complete set of initial slot values
#[derive(Clone, Debug)]
pub struct Defaults {
    pub body_parts: Vec<BodyPart>,
    pub exercises: ExerciseCatalog,
    pub nutrition_goals: NutritionGoals,
    pub food_database: Vec<FoodItem>,
}

/// Cached defaults - built once and reused across all operations
static DEFAULTS: Lazy<Defaults> = Lazy::new(build_defaults);

/// Get a reference to the cached defaults
pub fn defaults() -> &'static Defaults {
    &DEFAULTS
}

/// Derive a body-part slug from its display name
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn part(id: &str, name: &str, icon: &str, color: &str, gradient: &str) -> BodyPart {
    BodyPart {
        id: id.into(),
        name: name.into(),
        icon: icon.into(),
        color: color.into(),
        gradient: gradient.into(),
    }
}

fn exercise(name: &str, seed: &str) -> Exercise {
    Exercise {
        name: name.into(),
        image: format!("https://picsum.photos/seed/{}/100/100", seed),
    }
}

fn food(id: &str, name: &str, calories: f64, protein: f64, carbs: f64, fat: f64, serving: &str) -> FoodItem {
    FoodItem {
        id: id.into(),
        name: name.into(),
        calories,
        protein,
        carbs,
        fat,
        serving_size: serving.into(),
    }
}

/// Builds the default catalog content
///
/// **Note**: For production use, prefer `defaults()` which returns a cached
/// reference. This function is retained for testing and custom setups.
pub fn build_defaults() -> Defaults {
    let body_parts = vec![
        part("upper", "Upper Body", "💪", "blue", "from-blue-500 to-cyan-400"),
        part("lower", "Lower Body", "🦵", "green", "from-green-500 to-lime-400"),
        part("core", "Core", "🔥", "yellow", "from-yellow-500 to-amber-400"),
    ];

    let mut exercises: ExerciseCatalog = BTreeMap::new();

    exercises.insert(
        "upper".into(),
        vec![
            exercise("Lat Pulldown", "latpulldown"),
            exercise("Seated Row", "seatedrow"),
            exercise("Chest Press", "chestpress"),
            exercise("Incline Chest Press", "inclinepress"),
            exercise("Barbell Bench Press", "benchpress"),
            exercise("Butterfly", "butterfly"),
            exercise("Lateral Raise", "latraise"),
            exercise("Shoulder Press", "shoulderpress"),
            exercise("Triceps Pushdown", "pushdown"),
            exercise("Cable Curl", "cablecurl"),
        ],
    );

    exercises.insert(
        "lower".into(),
        vec![
            exercise("Leg Press", "legpress"),
            exercise("Leg Curl", "legcurl"),
            exercise("Leg Extension", "legextension"),
            exercise("Seated Calf Raise", "calfraise"),
            exercise("Standing Calf Raise", "standingcalf"),
            exercise("Seated Hip Abduction", "abduction"),
        ],
    );

    exercises.insert(
        "core".into(),
        vec![
            exercise("Abdominal Crunch", "crunch"),
            exercise("Rotary Torso", "torso"),
            exercise("Back Extension", "backext"),
            exercise("Cardio Bike", "bike"),
            exercise("Cardio Treadmill", "treadmill"),
        ],
    );

    let nutrition_goals = NutritionGoals {
        calories: 2000.0,
        protein: 150.0,
        carbs: 200.0,
        fat: 65.0,
    };

    let food_database = vec![
        food("food-1", "Chicken Breast", 165.0, 31.0, 0.0, 3.6, "100g"),
        food("food-2", "White Rice", 130.0, 2.7, 28.0, 0.3, "100g cooked"),
        food("food-3", "Boiled Egg", 78.0, 6.0, 0.6, 5.0, "1 large"),
        food("food-4", "Olive Oil", 119.0, 0.0, 0.0, 13.5, "1 tbsp"),
    ];

    Defaults {
        body_parts,
        exercises,
        nutrition_goals,
        food_database,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_consistent() {
        let d = defaults();
        assert_eq!(d.body_parts.len(), 3);

        // Every seeded body part has an exercise group
        for p in &d.body_parts {
            assert!(d.exercises.contains_key(&p.id), "missing group for {}", p.id);
        }

        assert!(!d.food_database.is_empty());
        assert!(d.nutrition_goals.calories > 0.0);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Push Day"), "push-day");
        assert_eq!(slugify("  Cardio "), "cardio");
        assert_eq!(slugify("Full   Body Work"), "full-body-work");
    }

    #[test]
    fn test_default_ids_unique() {
        let d = defaults();
        let mut ids: Vec<_> = d.body_parts.iter().map(|p| &p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), d.body_parts.len());

        let mut food_ids: Vec<_> = d.food_database.iter().map(|f| &f.id).collect();
        food_ids.sort();
        food_ids.dedup();
        assert_eq!(food_ids.len(), d.food_database.len());
    }
}
