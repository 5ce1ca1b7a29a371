//! Snapshot import/export.
//!
//! An exported snapshot is a single JSON document bundling every state slot
//! (`AppData`). Import goes through `SnapshotDocument`, a typed per-slot
//! optional schema: the document as a whole must be an object whose `log`
//! is a sequence, and every other slot is independently defaulted when
//! missing or malformed. A missing slot falls back to that slot's *initial*
//! default, never to the currently-live value.

use crate::{catalog, log_engine, types::*, Error, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

/// Parsed but not yet resolved import document
#[derive(Clone, Debug)]
pub struct SnapshotDocument {
    /// Raw log items; decoded per-item at resolve time
    pub log: Vec<JsonValue>,
    pub body_parts: Option<Vec<BodyPart>>,
    pub exercises: Option<ExerciseCatalog>,
    pub routines: Option<Vec<WorkoutRoutine>>,
    pub weekly_schedule: Option<WeeklySchedule>,
    pub nutrition_goals: Option<NutritionGoals>,
    pub food_database: Option<Vec<FoodItem>>,
    pub daily_diet_logs: Option<DailyDietLog>,
}

impl SnapshotDocument {
    /// Parse and validate an import document.
    ///
    /// Fails with a validation error (no partial apply) when the text is
    /// not a JSON object or its `log` slot is not a sequence.
    pub fn parse(text: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(text)
            .map_err(|e| Error::Validation(format!("not valid JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Validate an already-parsed JSON value
    pub fn from_value(value: &JsonValue) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::Validation("snapshot must be a JSON object".into()))?;

        let log = match obj.get("log") {
            Some(JsonValue::Array(items)) => items.clone(),
            Some(_) => return Err(Error::Validation("snapshot `log` must be a sequence".into())),
            None => return Err(Error::Validation("snapshot is missing the `log` slot".into())),
        };

        Ok(Self {
            log,
            body_parts: slot(obj, "body_parts"),
            exercises: slot(obj, "exercises"),
            routines: slot(obj, "routines"),
            weekly_schedule: slot(obj, "weekly_schedule"),
            nutrition_goals: slot(obj, "nutrition_goals"),
            food_database: slot(obj, "food_database"),
            daily_diet_logs: slot(obj, "daily_diet_logs"),
        })
    }

    /// Substitute defaults for absent slots and decode the log tolerantly
    pub fn resolve(&self) -> AppData {
        let d = catalog::defaults();
        AppData {
            log: log_engine::decode_entries(&JsonValue::Array(self.log.clone())),
            body_parts: self.body_parts.clone().unwrap_or_else(|| d.body_parts.clone()),
            exercises: self.exercises.clone().unwrap_or_else(|| d.exercises.clone()),
            routines: self.routines.clone().unwrap_or_default(),
            weekly_schedule: self.weekly_schedule.clone().unwrap_or_default(),
            nutrition_goals: self.nutrition_goals.clone().unwrap_or_else(|| d.nutrition_goals.clone()),
            food_database: self.food_database.clone().unwrap_or_else(|| d.food_database.clone()),
            daily_diet_logs: self.daily_diet_logs.clone().unwrap_or_default(),
        }
    }
}

/// Decode one optional slot. Malformed values are warned about and treated
/// as absent so import keeps the all-or-default per-slot behavior.
fn slot<T: DeserializeOwned>(obj: &Map<String, JsonValue>, key: &str) -> Option<T> {
    let value = obj.get(key)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!("Snapshot slot {} is malformed ({}), using default", key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            SnapshotDocument::parse("[1, 2, 3]"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            SnapshotDocument::parse("not json at all"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_missing_or_non_sequence_log() {
        assert!(matches!(
            SnapshotDocument::parse(r#"{"body_parts": []}"#),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            SnapshotDocument::parse(r#"{"log": "nope"}"#),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_missing_slots_fall_back_to_initial_defaults() {
        let doc = SnapshotDocument::parse(r#"{"log": []}"#).unwrap();
        let data = doc.resolve();

        assert!(data.log.is_empty());
        assert_eq!(data.body_parts, catalog::defaults().body_parts);
        assert_eq!(data.food_database, catalog::defaults().food_database);
        assert_eq!(data.nutrition_goals, catalog::defaults().nutrition_goals);
        assert!(data.routines.is_empty());
        assert!(data.weekly_schedule.is_empty());
        assert!(data.daily_diet_logs.is_empty());
    }

    #[test]
    fn test_present_empty_slot_stays_empty() {
        // An explicitly empty list is data, not an omission
        let doc = SnapshotDocument::parse(r#"{"log": [], "body_parts": []}"#).unwrap();
        let data = doc.resolve();
        assert!(data.body_parts.is_empty());
    }

    #[test]
    fn test_malformed_slot_falls_back_to_default() {
        let doc = SnapshotDocument::parse(r#"{"log": [], "body_parts": 42}"#).unwrap();
        let data = doc.resolve();
        assert_eq!(data.body_parts, catalog::defaults().body_parts);
    }

    #[test]
    fn test_export_import_roundtrip_on_defaults() {
        let d = catalog::defaults();
        let original = AppData {
            log: vec![WorkoutEntry {
                id: "e1".into(),
                part: "upper".into(),
                exercise: "Bench Press".into(),
                weight: 80.0,
                reps: 8,
                week: 2,
                date: "2026-03-09T12:00:00+00:00".into(),
                image: "img".into(),
                comment: Some("pr attempt".into()),
            }],
            body_parts: d.body_parts.clone(),
            exercises: d.exercises.clone(),
            routines: vec![WorkoutRoutine {
                id: "routine-push".into(),
                name: "Push Day".into(),
                exercises: vec![RoutineExercise {
                    part_id: "upper".into(),
                    exercise_name: "Bench Press".into(),
                }],
            }],
            weekly_schedule: [(1u8, "routine-push".to_string())].into_iter().collect(),
            nutrition_goals: d.nutrition_goals.clone(),
            food_database: d.food_database.clone(),
            daily_diet_logs: {
                let mut logs = DailyDietLog::new();
                crate::diet::log_food(
                    &mut logs,
                    "2026-03-09",
                    MealType::Lunch,
                    LoggedFood {
                        id: "l1".into(),
                        food_id: "food-1".into(),
                        servings: 1.5,
                    },
                );
                logs
            },
        };

        let text = serde_json::to_string(&original).unwrap();
        let restored = SnapshotDocument::parse(&text).unwrap().resolve();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_invalid_log_items_skipped() {
        let doc_value = json!({
            "log": [
                {"id": "ok", "part": "upper", "exercise": "Row", "weight": 40.0,
                 "reps": 10, "week": 1, "date": "2026-02-01T10:00:00Z", "image": ""},
                {"id": "bad-date", "part": "upper", "exercise": "Row", "weight": 40.0,
                 "reps": 10, "week": 1, "date": "yesterday", "image": ""}
            ]
        });
        let data = SnapshotDocument::from_value(&doc_value).unwrap().resolve();
        assert_eq!(data.log.len(), 1);
        assert_eq!(data.log[0].id, "ok");
    }
}
