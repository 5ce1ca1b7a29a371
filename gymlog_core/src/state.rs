//! Central application state.
//!
//! `AppState` owns every top-level slot and is the only mutation surface;
//! each named operation applies its transition in memory and mirrors the
//! touched slot to the store before returning. Views are recomputed on
//! read, so callers never hold stale derived data.

use crate::snapshot::SnapshotDocument;
use crate::store::{keys, Store};
use crate::{catalog, csv_export, diet, log_engine, schedule, types::*, Error, Result};
use chrono::{Local, NaiveDate};
use serde_json::Value as JsonValue;
use std::path::Path;
use uuid::Uuid;

/// The whole application's data, centrally owned
#[derive(Debug)]
pub struct AppState {
    store: Store,
    log: Vec<WorkoutEntry>,
    body_parts: Vec<BodyPart>,
    exercises: ExerciseCatalog,
    routines: Vec<WorkoutRoutine>,
    weekly_schedule: WeeklySchedule,
    nutrition_goals: NutritionGoals,
    food_database: Vec<FoodItem>,
    daily_diet_logs: DailyDietLog,
    show_intro: bool,
}

impl AppState {
    /// Open the store at `dir` and load every slot
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::load(Store::open(dir.as_ref().to_path_buf())?))
    }

    /// Load state from an open store, initializing absent slots with the
    /// built-in defaults
    pub fn load(store: Store) -> Self {
        let d = catalog::defaults();

        // The log slot is decoded item by item so one bad record cannot
        // blank the whole history
        let raw_log: JsonValue = store.get(keys::WORKOUT_LOG, JsonValue::Array(Vec::new()));
        let log = log_engine::decode_entries(&raw_log);

        let body_parts = store.get(keys::BODY_PARTS, d.body_parts.clone());
        let exercises = store.get(keys::EXERCISES, d.exercises.clone());
        let routines = store.get(keys::ROUTINES, Vec::new());
        let weekly_schedule = store.get(keys::WEEKLY_SCHEDULE, WeeklySchedule::new());
        let nutrition_goals = store.get(keys::NUTRITION_GOALS, d.nutrition_goals.clone());
        let food_database = store.get(keys::FOOD_DATABASE, d.food_database.clone());
        let daily_diet_logs = store.get(keys::DAILY_DIET_LOGS, DailyDietLog::new());

        let show_intro = log.is_empty();

        Self {
            store,
            log,
            body_parts,
            exercises,
            routines,
            weekly_schedule,
            nutrition_goals,
            food_database,
            daily_diet_logs,
            show_intro,
        }
    }

    // ========================================================================
    // Read surface
    // ========================================================================

    /// The log in storage order (insertion order, newest prepended)
    pub fn log(&self) -> &[WorkoutEntry] {
        &self.log
    }

    /// Valid entries, newest first
    pub fn entries(&self) -> Vec<&WorkoutEntry> {
        log_engine::sorted_desc(&self.log)
    }

    /// Valid entries matching the optional part/week filters, newest first
    pub fn filtered_entries(&self, part: Option<&str>, week: Option<u32>) -> Vec<&WorkoutEntry> {
        log_engine::filter_entries(&self.log, part, week)
    }

    /// Valid entries whose timestamp falls on the given local calendar day
    pub fn entries_on(&self, day: NaiveDate) -> Vec<&WorkoutEntry> {
        log_engine::filter_by_local_day(&self.log, day)
    }

    pub fn available_weeks(&self) -> Vec<u32> {
        log_engine::available_weeks(&self.log)
    }

    pub fn latest_week(&self) -> Option<u32> {
        log_engine::latest_week(&self.log)
    }

    pub fn body_parts(&self) -> &[BodyPart] {
        &self.body_parts
    }

    pub fn exercises(&self) -> &ExerciseCatalog {
        &self.exercises
    }

    pub fn routines(&self) -> &[WorkoutRoutine] {
        &self.routines
    }

    pub fn weekly_schedule(&self) -> &WeeklySchedule {
        &self.weekly_schedule
    }

    pub fn nutrition_goals(&self) -> &NutritionGoals {
        &self.nutrition_goals
    }

    pub fn food_database(&self) -> &[FoodItem] {
        &self.food_database
    }

    pub fn daily_diet_logs(&self) -> &DailyDietLog {
        &self.daily_diet_logs
    }

    /// Whether the empty-state intro should be shown
    pub fn show_intro(&self) -> bool {
        self.show_intro
    }

    // ========================================================================
    // Workout log mutations
    // ========================================================================

    /// Add one entry. Assigns a fresh id, resolves the exercise image and
    /// stamps the current instant unless the draft carries a back-fill date.
    pub fn add_entry(&mut self, draft: EntryDraft) -> WorkoutEntry {
        let entry = self.materialize(draft);
        self.log.insert(0, entry.clone());
        self.show_intro = false;
        self.persist_log();
        entry
    }

    /// Add a batch of entries, prepended together with their relative input
    /// order preserved
    pub fn add_entries(&mut self, drafts: Vec<EntryDraft>) -> Vec<WorkoutEntry> {
        if drafts.is_empty() {
            return Vec::new();
        }

        let entries: Vec<WorkoutEntry> = drafts.into_iter().map(|d| self.materialize(d)).collect();
        self.log.splice(0..0, entries.iter().cloned());
        self.show_intro = false;
        self.persist_log();
        entries
    }

    /// Replace the entry with a matching id; no-op when the id is unknown
    pub fn update_entry(&mut self, updated: WorkoutEntry) -> bool {
        match self.log.iter_mut().find(|e| e.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                self.persist_log();
                true
            }
            None => false,
        }
    }

    /// Remove an entry by id; idempotent. Raises the empty-state intro when
    /// the log becomes empty.
    pub fn delete_entry(&mut self, id: &str) -> bool {
        let before = self.log.len();
        self.log.retain(|e| e.id != id);
        if self.log.len() == before {
            return false;
        }
        if self.log.is_empty() {
            self.show_intro = true;
        }
        self.persist_log();
        true
    }

    /// Empty the whole log and raise the empty-state intro
    pub fn clear_log(&mut self) {
        self.log.clear();
        self.show_intro = true;
        self.persist_log();
    }

    fn materialize(&self, draft: EntryDraft) -> WorkoutEntry {
        let image = self.exercise_image(&draft.part, &draft.exercise);
        WorkoutEntry {
            id: Uuid::new_v4().to_string(),
            part: draft.part,
            exercise: draft.exercise,
            weight: draft.weight,
            reps: draft.reps,
            week: draft.week,
            date: draft.date.unwrap_or_else(|| Local::now().to_rfc3339()),
            image,
            comment: draft.comment,
        }
    }

    fn exercise_image(&self, part: &str, exercise: &str) -> String {
        self.exercises
            .get(part)
            .and_then(|group| group.iter().find(|e| e.name == exercise))
            .map(|e| e.image.clone())
            .unwrap_or_else(|| catalog::PLACEHOLDER_IMAGE.to_string())
    }

    // ========================================================================
    // Body parts and exercise catalog
    // ========================================================================

    /// Add a body part, deriving its slug from the name and rotating through
    /// the built-in icon and color palettes
    pub fn add_body_part(&mut self, name: &str) -> Result<BodyPart> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("body part name must not be empty".into()));
        }

        let id = catalog::slugify(name);
        if self.body_parts.iter().any(|p| p.id == id) {
            return Err(Error::Validation(format!("body part '{}' already exists", id)));
        }

        let (color, gradient) = catalog::COLOR_SCHEMES[self.body_parts.len() % catalog::COLOR_SCHEMES.len()];
        let icon = catalog::PART_ICONS[self.body_parts.len() % catalog::PART_ICONS.len()];

        let part = BodyPart {
            id: id.clone(),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            gradient: gradient.to_string(),
        };

        self.body_parts.push(part.clone());
        self.exercises.entry(id).or_default();
        self.persist_body_parts();
        self.persist_exercises();
        Ok(part)
    }

    /// Rename a body part; historical entries keep referencing the same slug
    pub fn rename_body_part(&mut self, id: &str, new_name: &str) -> bool {
        match self.body_parts.iter_mut().find(|p| p.id == id) {
            Some(part) => {
                part.name = new_name.trim().to_string();
                self.persist_body_parts();
                true
            }
            None => false,
        }
    }

    /// Delete a body part and its exercise group.
    ///
    /// Entries and routines referencing the part are left untouched; views
    /// fall back to rendering the raw slug.
    pub fn delete_body_part(&mut self, id: &str) -> bool {
        let before = self.body_parts.len();
        self.body_parts.retain(|p| p.id != id);
        if self.body_parts.len() == before {
            return false;
        }
        self.exercises.remove(id);
        self.persist_body_parts();
        self.persist_exercises();
        true
    }

    /// Add an exercise to a body-part group, creating the group if needed
    pub fn add_exercise(&mut self, part_id: &str, exercise: Exercise) -> Result<()> {
        if exercise.name.trim().is_empty() {
            return Err(Error::Validation("exercise name must not be empty".into()));
        }
        self.exercises
            .entry(part_id.to_string())
            .or_default()
            .push(exercise);
        self.persist_exercises();
        Ok(())
    }

    /// Replace the exercise at `index` within a group.
    ///
    /// Renames do not propagate to historical entries; they keep the old
    /// exercise string.
    pub fn update_exercise(&mut self, part_id: &str, index: usize, exercise: Exercise) -> bool {
        match self.exercises.get_mut(part_id).and_then(|g| g.get_mut(index)) {
            Some(slot) => {
                *slot = exercise;
                self.persist_exercises();
                true
            }
            None => false,
        }
    }

    /// Remove the exercise at `index` within a group
    pub fn delete_exercise(&mut self, part_id: &str, index: usize) -> bool {
        match self.exercises.get_mut(part_id) {
            Some(group) if index < group.len() => {
                group.remove(index);
                self.persist_exercises();
                true
            }
            _ => false,
        }
    }

    // ========================================================================
    // Routines and weekly schedule
    // ========================================================================

    pub fn add_routine(&mut self, name: &str, exercises: Vec<RoutineExercise>) -> Result<WorkoutRoutine> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("routine name must not be empty".into()));
        }

        let routine = WorkoutRoutine {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            exercises,
        };
        self.routines.push(routine.clone());
        self.persist_routines();
        Ok(routine)
    }

    pub fn update_routine(&mut self, updated: WorkoutRoutine) -> bool {
        match self.routines.iter_mut().find(|r| r.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                self.persist_routines();
                true
            }
            None => false,
        }
    }

    /// Delete a routine. Weekday assignments pointing at it become dangling
    /// and resolve to none.
    pub fn delete_routine(&mut self, id: &str) -> bool {
        let before = self.routines.len();
        self.routines.retain(|r| r.id != id);
        if self.routines.len() == before {
            return false;
        }
        self.persist_routines();
        true
    }

    /// Assign a routine to a weekday (0=Sunday .. 6=Saturday)
    pub fn set_scheduled_routine(&mut self, weekday: u8, routine_id: &str) -> Result<()> {
        if weekday > 6 {
            return Err(Error::Validation(format!("weekday index {} out of range 0-6", weekday)));
        }
        if !self.routines.iter().any(|r| r.id == routine_id) {
            return Err(Error::Validation(format!("unknown routine id '{}'", routine_id)));
        }
        self.weekly_schedule.insert(weekday, routine_id.to_string());
        self.persist_schedule();
        Ok(())
    }

    pub fn clear_scheduled_routine(&mut self, weekday: u8) -> bool {
        if self.weekly_schedule.remove(&weekday).is_none() {
            return false;
        }
        self.persist_schedule();
        true
    }

    /// Routine scheduled for the weekday of `date`, if any
    pub fn scheduled_routine_for(&self, date: NaiveDate) -> Option<&WorkoutRoutine> {
        schedule::resolve_scheduled_routine(date, &self.weekly_schedule, &self.routines)
    }

    /// Expand the routine scheduled for `date` and log the resulting batch.
    ///
    /// The smart lookup scans the full log, so weights and reps carry over
    /// from history regardless of any active view filter.
    pub fn log_scheduled_routine(&mut self, date: NaiveDate, week: u32) -> Result<Vec<WorkoutEntry>> {
        let routine = self
            .scheduled_routine_for(date)
            .ok_or_else(|| Error::Validation(format!("no routine scheduled for {}", date)))?
            .clone();

        let drafts = schedule::expand_routine(&routine, &self.log, week, date);
        Ok(self.add_entries(drafts))
    }

    // ========================================================================
    // Diet
    // ========================================================================

    /// Log a food against a meal on a day.
    ///
    /// Rejects a non-`YYYY-MM-DD` date key, non-positive servings and a food
    /// id that does not resolve at log time.
    pub fn log_food(
        &mut self,
        date_key: &str,
        meal: MealType,
        food_id: &str,
        servings: f64,
    ) -> Result<LoggedFood> {
        if NaiveDate::parse_from_str(date_key, "%Y-%m-%d").is_err() {
            return Err(Error::Validation(format!("invalid date key '{}'", date_key)));
        }
        if !servings.is_finite() || servings <= 0.0 {
            return Err(Error::Validation("servings must be a positive number".into()));
        }
        if !self.food_database.iter().any(|f| f.id == food_id) {
            return Err(Error::Validation(format!("unknown food id '{}'", food_id)));
        }

        let logged = LoggedFood {
            id: Uuid::new_v4().to_string(),
            food_id: food_id.to_string(),
            servings,
        };
        diet::log_food(&mut self.daily_diet_logs, date_key, meal, logged.clone());
        self.persist_diet_logs();
        Ok(logged)
    }

    /// Remove a logged food; empty meal and day containers are pruned
    pub fn remove_logged_food(&mut self, date_key: &str, meal: MealType, logged_food_id: &str) -> bool {
        if !diet::remove_logged_food(&mut self.daily_diet_logs, date_key, meal, logged_food_id) {
            return false;
        }
        self.persist_diet_logs();
        true
    }

    /// Macro totals for one local calendar day
    pub fn daily_totals(&self, date_key: &str) -> MacroTotals {
        match self.daily_diet_logs.get(date_key) {
            Some(day) => diet::daily_totals(day, &self.food_database),
            None => MacroTotals::default(),
        }
    }

    pub fn day_diet_log(&self, date_key: &str) -> Option<&DayDietLog> {
        self.daily_diet_logs.get(date_key)
    }

    /// Add a food to the database with a fresh id
    pub fn add_food(
        &mut self,
        name: &str,
        calories: f64,
        protein: f64,
        carbs: f64,
        fat: f64,
        serving_size: &str,
    ) -> Result<FoodItem> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("food name must not be empty".into()));
        }
        for (label, value) in [
            ("calories", calories),
            ("protein", protein),
            ("carbs", carbs),
            ("fat", fat),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Validation(format!("{} must be a non-negative number", label)));
            }
        }

        let food = FoodItem {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            calories,
            protein,
            carbs,
            fat,
            serving_size: serving_size.trim().to_string(),
        };
        self.food_database.push(food.clone());
        self.persist_foods();
        Ok(food)
    }

    pub fn update_food(&mut self, updated: FoodItem) -> bool {
        match self.food_database.iter_mut().find(|f| f.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                self.persist_foods();
                true
            }
            None => false,
        }
    }

    /// Delete a food. Historical diet logs keep the dangling reference and
    /// contribute zero to totals from then on.
    pub fn delete_food(&mut self, id: &str) -> bool {
        let before = self.food_database.len();
        self.food_database.retain(|f| f.id != id);
        if self.food_database.len() == before {
            return false;
        }
        self.persist_foods();
        true
    }

    /// Replace the nutrition goals record whole
    pub fn set_nutrition_goals(&mut self, goals: NutritionGoals) {
        self.nutrition_goals = goals;
        self.persist_goals();
    }

    // ========================================================================
    // Import / export
    // ========================================================================

    /// Snapshot every slot into one document
    pub fn export_snapshot(&self) -> AppData {
        AppData {
            log: self.log.clone(),
            body_parts: self.body_parts.clone(),
            exercises: self.exercises.clone(),
            routines: self.routines.clone(),
            weekly_schedule: self.weekly_schedule.clone(),
            nutrition_goals: self.nutrition_goals.clone(),
            food_database: self.food_database.clone(),
            daily_diet_logs: self.daily_diet_logs.clone(),
        }
    }

    /// Replace every slot from a resolved snapshot and persist them all.
    /// The empty-state intro is recomputed from the new log.
    pub fn restore(&mut self, data: AppData) {
        self.log = data.log;
        self.body_parts = data.body_parts;
        self.exercises = data.exercises;
        self.routines = data.routines;
        self.weekly_schedule = data.weekly_schedule;
        self.nutrition_goals = data.nutrition_goals;
        self.food_database = data.food_database;
        self.daily_diet_logs = data.daily_diet_logs;
        self.show_intro = self.log.is_empty();
        self.persist_all();
    }

    /// Validate and import a snapshot document in one step
    pub fn import_snapshot(&mut self, text: &str) -> Result<()> {
        let data = SnapshotDocument::parse(text)?.resolve();
        self.restore(data);
        Ok(())
    }

    /// Write the valid log as CSV to a file
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        csv_export::export_csv(path, &self.log, &self.body_parts)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    fn persist_log(&self) {
        self.store.set(keys::WORKOUT_LOG, &self.log);
    }

    fn persist_body_parts(&self) {
        self.store.set(keys::BODY_PARTS, &self.body_parts);
    }

    fn persist_exercises(&self) {
        self.store.set(keys::EXERCISES, &self.exercises);
    }

    fn persist_routines(&self) {
        self.store.set(keys::ROUTINES, &self.routines);
    }

    fn persist_schedule(&self) {
        self.store.set(keys::WEEKLY_SCHEDULE, &self.weekly_schedule);
    }

    fn persist_goals(&self) {
        self.store.set(keys::NUTRITION_GOALS, &self.nutrition_goals);
    }

    fn persist_foods(&self) {
        self.store.set(keys::FOOD_DATABASE, &self.food_database);
    }

    fn persist_diet_logs(&self) {
        self.store.set(keys::DAILY_DIET_LOGS, &self.daily_diet_logs);
    }

    fn persist_all(&self) {
        self.persist_log();
        self.persist_body_parts();
        self.persist_exercises();
        self.persist_routines();
        self.persist_schedule();
        self.persist_goals();
        self.persist_foods();
        self.persist_diet_logs();
    }
}
