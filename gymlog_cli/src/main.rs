use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use gymlog_core::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gymlog")]
#[command(about = "Personal workout and diet tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log one workout set
    Add {
        /// Body part id (e.g. upper)
        #[arg(long)]
        part: String,

        #[arg(long)]
        exercise: String,

        /// Weight in kg
        #[arg(long)]
        weight: f64,

        #[arg(long)]
        reps: u32,

        #[arg(long)]
        week: u32,

        #[arg(long)]
        comment: Option<String>,
    },

    /// Edit fields of an existing entry
    Edit {
        id: String,

        #[arg(long)]
        part: Option<String>,

        #[arg(long)]
        exercise: Option<String>,

        #[arg(long)]
        weight: Option<f64>,

        #[arg(long)]
        reps: Option<u32>,

        #[arg(long)]
        week: Option<u32>,

        /// New comment; pass an empty string to remove it
        #[arg(long)]
        comment: Option<String>,
    },

    /// Delete one entry by id
    Delete { id: String },

    /// Show the workout log, newest first
    List {
        /// Filter by body part id
        #[arg(long)]
        part: Option<String>,

        /// Filter by week number (defaults to the latest week)
        #[arg(long, conflicts_with = "all_weeks")]
        week: Option<u32>,

        /// Show every week
        #[arg(long)]
        all_weeks: bool,
    },

    /// Show entries for one calendar day (YYYY-MM-DD, local time)
    Day { date: NaiveDate },

    /// Expand the routine scheduled for a date and log it
    LogRoutine {
        date: NaiveDate,

        /// Week number to record the batch under
        #[arg(long)]
        week: u32,
    },

    /// Manage body parts
    Part {
        #[command(subcommand)]
        command: PartCommands,
    },

    /// Manage the exercise catalog
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommands,
    },

    /// Manage routines
    Routine {
        #[command(subcommand)]
        command: RoutineCommands,
    },

    /// Manage the weekly schedule
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },

    /// Diet log and daily totals
    Diet {
        #[command(subcommand)]
        command: DietCommands,
    },

    /// Manage the food database
    Food {
        #[command(subcommand)]
        command: FoodCommands,
    },

    /// Nutrition goals
    Goals {
        #[command(subcommand)]
        command: GoalsCommands,
    },

    /// Export all data as a JSON snapshot
    Export { path: Option<PathBuf> },

    /// Import a JSON snapshot, replacing all current data
    Import {
        path: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Export the workout log as CSV
    ExportCsv { path: Option<PathBuf> },

    /// Clear the whole workout log
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PartCommands {
    /// Add a body part; the id is derived from the name
    Add { name: String },
    List,
    /// Change the display name; the id and logged entries keep the old slug
    Rename { id: String, name: String },
    /// Delete a body part and its exercise group (entries keep the old id)
    Delete { id: String },
}

#[derive(Subcommand)]
enum ExerciseCommands {
    /// Add an exercise to a body-part group
    Add {
        part: String,
        name: String,

        /// Image URL shown next to logged sets
        #[arg(long)]
        image: Option<String>,
    },
    /// List exercises, optionally for one body part
    List { part: Option<String> },
    /// Remove an exercise from a group by name
    Delete { part: String, name: String },
}

#[derive(Subcommand)]
enum RoutineCommands {
    /// Create a routine from PART:EXERCISE pairs, in order
    Add {
        name: String,

        /// Repeatable, e.g. --exercise upper:"Bench Press"
        #[arg(long = "exercise", value_name = "PART:EXERCISE", required = true)]
        exercises: Vec<String>,
    },
    List,
    Delete { id: String },
}

#[derive(Subcommand)]
enum ScheduleCommands {
    /// Assign a routine to a weekday
    Set { weekday: String, routine_id: String },
    /// Remove a weekday assignment
    Clear { weekday: String },
    Show,
}

#[derive(Subcommand)]
enum DietCommands {
    /// Show the diet log and totals for a day (defaults to today)
    Show { date: Option<NaiveDate> },

    /// Log a food against a meal
    Log {
        /// Meal: breakfast, lunch, dinner or snacks
        meal: String,

        /// Food id or exact name
        food: String,

        servings: f64,

        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Remove a logged food by id
    Remove {
        meal: String,
        logged_food_id: String,

        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum FoodCommands {
    Add {
        name: String,

        #[arg(long)]
        calories: f64,

        #[arg(long)]
        protein: f64,

        #[arg(long)]
        carbs: f64,

        #[arg(long)]
        fat: f64,

        /// Free-text serving label, e.g. "100g"
        #[arg(long, default_value = "1 serving")]
        serving: String,
    },
    List,
    Delete { id: String },
}

#[derive(Subcommand)]
enum GoalsCommands {
    Show,
    Set {
        #[arg(long)]
        calories: f64,

        #[arg(long)]
        protein: f64,

        #[arg(long)]
        carbs: f64,

        #[arg(long)]
        fat: f64,
    },
}

fn main() -> Result<()> {
    gymlog_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let mut state = AppState::open(&data_dir)?;

    match cli.command {
        Commands::Add {
            part,
            exercise,
            weight,
            reps,
            week,
            comment,
        } => cmd_add(&mut state, part, exercise, weight, reps, week, comment),
        Commands::Edit {
            id,
            part,
            exercise,
            weight,
            reps,
            week,
            comment,
        } => cmd_edit(&mut state, id, part, exercise, weight, reps, week, comment),
        Commands::Delete { id } => cmd_delete(&mut state, id),
        Commands::List {
            part,
            week,
            all_weeks,
        } => cmd_list(&state, part, week, all_weeks),
        Commands::Day { date } => cmd_day(&state, date),
        Commands::LogRoutine { date, week } => cmd_log_routine(&mut state, date, week),
        Commands::Part { command } => cmd_part(&mut state, command),
        Commands::Exercise { command } => cmd_exercise(&mut state, command),
        Commands::Routine { command } => cmd_routine(&mut state, command),
        Commands::Schedule { command } => cmd_schedule(&mut state, command),
        Commands::Diet { command } => cmd_diet(&mut state, command),
        Commands::Food { command } => cmd_food(&mut state, command),
        Commands::Goals { command } => cmd_goals(&mut state, command),
        Commands::Export { path } => cmd_export(&state, path),
        Commands::Import { path, yes } => cmd_import(&mut state, path, yes),
        Commands::ExportCsv { path } => cmd_export_csv(&state, path),
        Commands::Clear { yes } => cmd_clear(&mut state, yes),
    }
}

fn cmd_add(
    state: &mut AppState,
    part: String,
    exercise: String,
    weight: f64,
    reps: u32,
    week: u32,
    comment: Option<String>,
) -> Result<()> {
    let entry = state.add_entry(EntryDraft {
        part,
        exercise,
        weight,
        reps,
        week,
        comment,
        date: None,
    });

    println!(
        "✓ Logged {} {}kg × {} (week {})",
        entry.exercise, entry.weight, entry.reps, entry.week
    );
    Ok(())
}

fn cmd_edit(
    state: &mut AppState,
    id: String,
    part: Option<String>,
    exercise: Option<String>,
    weight: Option<f64>,
    reps: Option<u32>,
    week: Option<u32>,
    comment: Option<String>,
) -> Result<()> {
    let mut entry = state
        .log()
        .iter()
        .find(|e| e.id == id)
        .cloned()
        .ok_or_else(|| Error::Validation(format!("no entry with id {}", id)))?;

    if let Some(part) = part {
        entry.part = part;
    }
    if let Some(exercise) = exercise {
        entry.exercise = exercise;
    }
    if let Some(weight) = weight {
        entry.weight = weight;
    }
    if let Some(reps) = reps {
        entry.reps = reps;
    }
    if let Some(week) = week {
        entry.week = week;
    }
    if let Some(comment) = comment {
        entry.comment = if comment.is_empty() { None } else { Some(comment) };
    }

    state.update_entry(entry);
    println!("✓ Updated entry {}", id);
    Ok(())
}

fn cmd_delete(state: &mut AppState, id: String) -> Result<()> {
    if state.delete_entry(&id) {
        println!("✓ Deleted entry {}", id);
    } else {
        println!("No entry with id {}", id);
    }
    Ok(())
}

fn cmd_list(
    state: &AppState,
    part: Option<String>,
    week: Option<u32>,
    all_weeks: bool,
) -> Result<()> {
    if state.show_intro() {
        println!("Log is empty. Add your first set with `gymlog add`.");
        return Ok(());
    }

    // The default view shows only the latest week
    let effective_week = if all_weeks { None } else { week.or_else(|| state.latest_week()) };
    let entries = state.filtered_entries(part.as_deref(), effective_week);

    match effective_week {
        Some(w) => println!("Week {} ({} entries)", w, entries.len()),
        None => println!("All weeks ({} entries)", entries.len()),
    }

    if entries.is_empty() {
        println!("No entries match this filter.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", format_entry(state, entry));
    }
    Ok(())
}

fn cmd_day(state: &AppState, date: NaiveDate) -> Result<()> {
    let entries = state.entries_on(date);

    if entries.is_empty() {
        match state.scheduled_routine_for(date) {
            Some(routine) => {
                println!("No workouts logged on {}.", date);
                println!("Scheduled routine: {}", routine.name);
                for ex in &routine.exercises {
                    println!("  • {}", ex.exercise_name);
                }
                println!("Log it with `gymlog log-routine {} --week N`.", date);
            }
            None => println!("No workouts logged on {}.", date),
        }
        return Ok(());
    }

    println!("Workouts on {}:", date);
    for entry in entries {
        println!("{}", format_entry(state, entry));
    }
    Ok(())
}

fn cmd_log_routine(state: &mut AppState, date: NaiveDate, week: u32) -> Result<()> {
    let routine_name = state
        .scheduled_routine_for(date)
        .map(|r| r.name.clone())
        .ok_or_else(|| Error::Validation(format!("no routine scheduled for {}", date)))?;

    let logged = state.log_scheduled_routine(date, week)?;
    println!(
        "✓ Logged {} exercises from '{}' for {}",
        logged.len(),
        routine_name,
        date
    );
    for entry in &logged {
        println!("  • {} {}kg × {}", entry.exercise, entry.weight, entry.reps);
    }
    Ok(())
}

fn cmd_part(state: &mut AppState, command: PartCommands) -> Result<()> {
    match command {
        PartCommands::Add { name } => {
            let part = state.add_body_part(&name)?;
            println!("✓ Added body part '{}' ({})", part.name, part.id);
        }
        PartCommands::List => {
            for part in state.body_parts() {
                let count = state.exercises().get(&part.id).map_or(0, |group| group.len());
                println!("{}  {} {} ({} exercises)", part.id, part.icon, part.name, count);
            }
        }
        PartCommands::Rename { id, name } => {
            if state.rename_body_part(&id, &name) {
                println!("✓ Renamed {} to '{}'", id, name);
            } else {
                println!("No body part with id {}", id);
            }
        }
        PartCommands::Delete { id } => {
            if state.delete_body_part(&id) {
                println!("✓ Deleted body part {} (logged entries keep referencing it)", id);
            } else {
                println!("No body part with id {}", id);
            }
        }
    }
    Ok(())
}

fn cmd_exercise(state: &mut AppState, command: ExerciseCommands) -> Result<()> {
    match command {
        ExerciseCommands::Add { part, name, image } => {
            let image = image.unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
            state.add_exercise(&part, Exercise { name: name.clone(), image })?;
            println!("✓ Added '{}' under {}", name, part);
        }
        ExerciseCommands::List { part } => {
            for (part_id, group) in state.exercises() {
                if part.as_deref().is_some_and(|p| p != part_id.as_str()) {
                    continue;
                }
                println!("{}:", part_id);
                for exercise in group {
                    println!("  • {}", exercise.name);
                }
            }
        }
        ExerciseCommands::Delete { part, name } => {
            let index = state
                .exercises()
                .get(&part)
                .and_then(|group| group.iter().position(|e| e.name == name));
            match index {
                Some(index) => {
                    state.delete_exercise(&part, index);
                    println!("✓ Removed '{}' from {}", name, part);
                }
                None => println!("No exercise '{}' under {}", name, part),
            }
        }
    }
    Ok(())
}

fn cmd_routine(state: &mut AppState, command: RoutineCommands) -> Result<()> {
    match command {
        RoutineCommands::Add { name, exercises } => {
            let parsed = exercises
                .iter()
                .map(|spec| parse_routine_exercise(spec))
                .collect::<Result<Vec<_>>>()?;

            let routine = state.add_routine(&name, parsed)?;
            println!("✓ Created routine '{}' ({})", routine.name, routine.id);
        }
        RoutineCommands::List => {
            if state.routines().is_empty() {
                println!("No routines defined.");
                return Ok(());
            }
            for routine in state.routines() {
                println!("{}  {}", routine.id, routine.name);
                for ex in &routine.exercises {
                    println!("    • {} ({})", ex.exercise_name, ex.part_id);
                }
            }
        }
        RoutineCommands::Delete { id } => {
            if state.delete_routine(&id) {
                println!("✓ Deleted routine {}", id);
            } else {
                println!("No routine with id {}", id);
            }
        }
    }
    Ok(())
}

fn cmd_schedule(state: &mut AppState, command: ScheduleCommands) -> Result<()> {
    match command {
        ScheduleCommands::Set {
            weekday,
            routine_id,
        } => {
            let index = parse_weekday(&weekday)?;
            state.set_scheduled_routine(index, &routine_id)?;
            println!("✓ Scheduled routine {} on {}", routine_id, WEEKDAY_NAMES[index as usize]);
        }
        ScheduleCommands::Clear { weekday } => {
            let index = parse_weekday(&weekday)?;
            if state.clear_scheduled_routine(index) {
                println!("✓ Cleared {}", WEEKDAY_NAMES[index as usize]);
            } else {
                println!("Nothing scheduled on {}", WEEKDAY_NAMES[index as usize]);
            }
        }
        ScheduleCommands::Show => {
            for (index, name) in WEEKDAY_NAMES.iter().enumerate() {
                let assigned = state
                    .weekly_schedule()
                    .get(&(index as u8))
                    .map(|routine_id| {
                        state
                            .routines()
                            .iter()
                            .find(|r| &r.id == routine_id)
                            .map(|r| r.name.clone())
                            .unwrap_or_else(|| format!("{} (deleted)", routine_id))
                    });
                match assigned {
                    Some(routine) => println!("{:9} {}", name, routine),
                    None => println!("{:9} (none)", name),
                }
            }
        }
    }
    Ok(())
}

fn cmd_diet(state: &mut AppState, command: DietCommands) -> Result<()> {
    match command {
        DietCommands::Show { date } => {
            let date_key = date_key(date);
            let totals = state.daily_totals(&date_key);
            let goals = state.nutrition_goals();

            println!("Diet for {}", date_key);
            println!(
                "  {:.0}/{:.0} kcal · P {:.0}/{:.0}g · C {:.0}/{:.0}g · F {:.0}/{:.0}g",
                totals.calories,
                goals.calories,
                totals.protein,
                goals.protein,
                totals.carbs,
                goals.carbs,
                totals.fat,
                goals.fat
            );

            let day = match state.day_diet_log(&date_key) {
                Some(day) => day.clone(),
                None => {
                    println!("  Nothing logged yet.");
                    return Ok(());
                }
            };

            for meal in MealType::ALL {
                let items = match day.get(&meal) {
                    Some(items) => items,
                    None => continue,
                };
                println!("  {}:", meal.label());
                for logged in items {
                    let name = state
                        .food_database()
                        .iter()
                        .find(|f| f.id == logged.food_id)
                        .map(|f| f.name.clone())
                        .unwrap_or_else(|| "(deleted food)".to_string());
                    println!("    {} × {}  [{}]", name, logged.servings, logged.id);
                }
            }
        }
        DietCommands::Log {
            meal,
            food,
            servings,
            date,
        } => {
            let meal = parse_meal(&meal)?;
            let food_id = resolve_food_id(state, &food)?;
            let date_key = date_key(date);
            let logged = state.log_food(&date_key, meal, &food_id, servings)?;
            println!("✓ Logged {} × {} for {} ({})", food, servings, meal.label(), logged.id);
        }
        DietCommands::Remove {
            meal,
            logged_food_id,
            date,
        } => {
            let meal = parse_meal(&meal)?;
            let date_key = date_key(date);
            if state.remove_logged_food(&date_key, meal, &logged_food_id) {
                println!("✓ Removed {}", logged_food_id);
            } else {
                println!("No logged food {} in {} on {}", logged_food_id, meal.label(), date_key);
            }
        }
    }
    Ok(())
}

fn cmd_food(state: &mut AppState, command: FoodCommands) -> Result<()> {
    match command {
        FoodCommands::Add {
            name,
            calories,
            protein,
            carbs,
            fat,
            serving,
        } => {
            let food = state.add_food(&name, calories, protein, carbs, fat, &serving)?;
            println!("✓ Added '{}' ({})", food.name, food.id);
        }
        FoodCommands::List => {
            for food in state.food_database() {
                println!(
                    "{}  {}: {:.0} kcal, P {:.1}g, C {:.1}g, F {:.1}g per {}",
                    food.id, food.name, food.calories, food.protein, food.carbs, food.fat, food.serving_size
                );
            }
        }
        FoodCommands::Delete { id } => {
            if state.delete_food(&id) {
                println!("✓ Deleted food {}", id);
            } else {
                println!("No food with id {}", id);
            }
        }
    }
    Ok(())
}

fn cmd_goals(state: &mut AppState, command: GoalsCommands) -> Result<()> {
    match command {
        GoalsCommands::Show => {
            let goals = state.nutrition_goals();
            println!(
                "Goals: {:.0} kcal · P {:.0}g · C {:.0}g · F {:.0}g",
                goals.calories, goals.protein, goals.carbs, goals.fat
            );
        }
        GoalsCommands::Set {
            calories,
            protein,
            carbs,
            fat,
        } => {
            state.set_nutrition_goals(NutritionGoals {
                calories,
                protein,
                carbs,
                fat,
            });
            println!("✓ Goals updated");
        }
    }
    Ok(())
}

fn cmd_export(state: &AppState, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| {
        PathBuf::from(format!("gymlog-backup-{}.json", Local::now().format("%Y-%m-%d")))
    });

    let snapshot = state.export_snapshot();
    let contents = serde_json::to_string_pretty(&snapshot).map_err(Error::Json)?;
    std::fs::write(&path, contents)?;

    println!("✓ Exported snapshot to {}", path.display());
    Ok(())
}

fn cmd_import(state: &mut AppState, path: PathBuf, yes: bool) -> Result<()> {
    let contents = std::fs::read_to_string(&path)?;
    let document = SnapshotDocument::parse(&contents)?;
    let data = document.resolve();

    println!("Snapshot from {}:", path.display());
    println!("  {} log entries", data.log.len());
    println!("  {} body parts, {} routines", data.body_parts.len(), data.routines.len());
    println!("  {} foods, {} diet days", data.food_database.len(), data.daily_diet_logs.len());

    if !yes && !confirm("Replace ALL current data with this snapshot?")? {
        println!("Import cancelled.");
        return Ok(());
    }

    state.restore(data);
    println!("✓ Import complete");
    Ok(())
}

fn cmd_export_csv(state: &AppState, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from("workout_log.csv"));
    state.export_csv(&path)?;
    println!("✓ Exported CSV to {}", path.display());
    Ok(())
}

fn cmd_clear(state: &mut AppState, yes: bool) -> Result<()> {
    if !yes && !confirm("Clear the whole workout log?")? {
        println!("Clear cancelled.");
        return Ok(());
    }
    state.clear_log();
    println!("✓ Workout log cleared");
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

fn parse_weekday(s: &str) -> Result<u8> {
    if let Ok(index) = s.parse::<u8>() {
        if index <= 6 {
            return Ok(index);
        }
        return Err(Error::Validation(format!("weekday index {} out of range 0-6", index)));
    }

    let lower = s.to_lowercase();
    WEEKDAY_NAMES
        .iter()
        .position(|name| name.to_lowercase().starts_with(&lower) && lower.len() >= 3)
        .map(|index| index as u8)
        .ok_or_else(|| Error::Validation(format!("unknown weekday '{}'", s)))
}

fn parse_meal(s: &str) -> Result<MealType> {
    MealType::parse(s)
        .ok_or_else(|| Error::Validation(format!("unknown meal '{}' (breakfast/lunch/dinner/snacks)", s)))
}

fn parse_routine_exercise(pair: &str) -> Result<RoutineExercise> {
    match pair.split_once(':') {
        Some((part, name)) if !part.trim().is_empty() && !name.trim().is_empty() => {
            Ok(RoutineExercise {
                part_id: part.trim().to_string(),
                exercise_name: name.trim().to_string(),
            })
        }
        _ => Err(Error::Validation(format!(
            "exercise '{}' must look like PART:EXERCISE",
            pair
        ))),
    }
}

/// Resolve a food argument by id first, then by exact name
fn resolve_food_id(state: &AppState, arg: &str) -> Result<String> {
    if let Some(food) = state.food_database().iter().find(|f| f.id == arg) {
        return Ok(food.id.clone());
    }
    if let Some(food) = state.food_database().iter().find(|f| f.name == arg) {
        return Ok(food.id.clone());
    }
    Err(Error::Validation(format!("unknown food '{}'", arg)))
}

fn date_key(date: Option<NaiveDate>) -> String {
    date.unwrap_or_else(|| Local::now().date_naive())
        .format("%Y-%m-%d")
        .to_string()
}

fn format_entry(state: &AppState, entry: &WorkoutEntry) -> String {
    let part_name = state
        .body_parts()
        .iter()
        .find(|p| p.id == entry.part)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| entry.part.clone());

    let when = entry
        .parsed_date()
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| entry.date.clone());

    let mut line = format!(
        "{}  w{}  {:12} {}  {}kg × {}",
        when, entry.week, part_name, entry.exercise, entry.weight, entry.reps
    );
    if let Some(comment) = &entry.comment {
        line.push_str(&format!("  ({})", comment));
    }
    format!("{}  [{}]", line, entry.id)
}

fn confirm(question: &str) -> Result<bool> {
    println!("{}", question);
    print!("Type 'yes' to continue: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("yes"))
}
