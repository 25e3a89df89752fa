use clap::{Parser, Subcommand};
use lift_core::*;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "liftcoach")]
#[command(about = "Workout tracking and progression coach", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage exercise definitions
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommands,
    },

    /// Manage workout templates
    Workout {
        #[command(subcommand)]
        command: WorkoutCommands,
    },

    /// Seed the built-in preset workouts (push/pull/legs)
    Seed,

    /// Walk through a workout, logging each set
    Start {
        /// Workout name or id
        workout: String,

        /// Log every set at its planned target without prompting
        #[arg(long)]
        auto: bool,

        /// Show a live rest countdown between sets
        #[arg(long)]
        timed_rest: bool,
    },

    /// Suggest a next-session target for an exercise
    Suggest {
        /// Exercise name
        exercise: String,

        /// Only consider workouts completed in the last N days
        #[arg(long)]
        window_days: Option<i64>,
    },

    /// Show completed-workout history
    History {
        /// Only show workouts completed in the last N days
        #[arg(long)]
        days: Option<i64>,
    },

    /// Export completed sets to CSV
    Export {
        /// Output file path
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum ExerciseCommands {
    /// Define a new exercise
    Add {
        /// Exercise name
        name: String,

        /// hypertrophy or strength
        #[arg(long)]
        kind: String,

        /// Comma-separated muscle groups (e.g. chest,triceps)
        #[arg(long)]
        muscles: String,
    },

    /// List defined exercises
    List,
}

#[derive(Subcommand)]
enum WorkoutCommands {
    /// Create a workout template from existing exercises
    ///
    /// Each --exercise takes NAME:SETS or NAME:SETS@REST_SECONDS; targets
    /// are prefilled from the suggestion engine.
    Create {
        /// Workout name
        name: String,

        /// Exercise spec, repeatable (e.g. --exercise "Bench Press:3@120")
        #[arg(long = "exercise", required = true)]
        exercises: Vec<String>,
    },

    /// List workout templates
    List,
}

fn main() -> Result<()> {
    lift_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store = JsonStore::new(&data_dir);

    match cli.command {
        Commands::Exercise { command } => match command {
            ExerciseCommands::Add {
                name,
                kind,
                muscles,
            } => cmd_exercise_add(&store, &name, &kind, &muscles),
            ExerciseCommands::List => cmd_exercise_list(&store),
        },
        Commands::Workout { command } => match command {
            WorkoutCommands::Create { name, exercises } => {
                cmd_workout_create(&store, &config, &name, &exercises)
            }
            WorkoutCommands::List => cmd_workout_list(&store),
        },
        Commands::Seed => cmd_seed(&store),
        Commands::Start {
            workout,
            auto,
            timed_rest,
        } => cmd_start(&store, &config, &workout, auto, timed_rest),
        Commands::Suggest {
            exercise,
            window_days,
        } => cmd_suggest(&store, &config, &exercise, window_days),
        Commands::History { days } => cmd_history(&store, days),
        Commands::Export { out } => cmd_export(&store, &out),
    }
}

// ============================================================================
// Exercise and workout management
// ============================================================================

fn cmd_exercise_add(store: &JsonStore, name: &str, kind: &str, muscles: &str) -> Result<()> {
    let kind = ExerciseKind::from_str(kind).map_err(Error::Validation)?;

    let muscles = muscles
        .split(',')
        .map(|m| MuscleGroup::from_str(m.trim()).map_err(Error::Validation))
        .collect::<Result<Vec<_>>>()?;

    let id = store.create_exercise(name, kind, muscles)?;
    println!("✓ Created exercise '{}' ({})", name, id);
    Ok(())
}

fn cmd_exercise_list(store: &JsonStore) -> Result<()> {
    let exercises = store.list_exercises()?;

    if exercises.is_empty() {
        println!("No exercises defined yet. Add one with 'exercise add' or run 'seed'.");
        return Ok(());
    }

    for exercise in exercises {
        let muscles: Vec<String> = exercise.muscles.iter().map(|m| m.to_string()).collect();
        println!(
            "  {}  [{}]  {}",
            exercise.name,
            exercise.kind,
            muscles.join(", ")
        );
    }
    Ok(())
}

fn cmd_workout_create(
    store: &JsonStore,
    config: &Config,
    name: &str,
    specs: &[String],
) -> Result<()> {
    let exercises = store.list_exercises()?;
    let completed = store.list_completed()?;

    let mut snapshots = Vec::new();
    for spec in specs {
        let (exercise_name, set_count, rest) = parse_exercise_spec(spec)?;

        let exercise = exercises
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(&exercise_name))
            .ok_or_else(|| Error::NotFound(format!("Exercise '{}'", exercise_name)))?;

        // Prefill targets from the suggestion engine at planning time
        let history = exercise_history(&completed, &exercise.name);
        let target = suggest_next(&history, exercise.kind, &config.progression);

        let planned = PlannedSet {
            target_reps: target.reps,
            rest_seconds: rest.unwrap_or(config.session.default_rest_seconds),
            target_weight: Some(target.weight),
        };
        snapshots.push(WorkoutExercise::from_exercise(
            exercise,
            vec![planned; set_count],
        ));
    }

    let id = store.create_workout(name, snapshots)?;
    println!("✓ Created workout '{}' ({})", name, id);
    Ok(())
}

/// Parse "NAME:SETS" or "NAME:SETS@REST_SECONDS"
fn parse_exercise_spec(spec: &str) -> Result<(String, usize, Option<u32>)> {
    let (name, tail) = spec.rsplit_once(':').ok_or_else(|| {
        Error::Validation(format!(
            "Exercise spec '{}' must be NAME:SETS or NAME:SETS@REST",
            spec
        ))
    })?;

    let (sets_str, rest) = match tail.split_once('@') {
        Some((sets, rest)) => {
            let rest = rest
                .parse::<u32>()
                .map_err(|_| Error::Validation(format!("Invalid rest seconds in '{}'", spec)))?;
            (sets, Some(rest))
        }
        None => (tail, None),
    };

    let set_count = sets_str
        .parse::<usize>()
        .map_err(|_| Error::Validation(format!("Invalid set count in '{}'", spec)))?;
    if set_count == 0 {
        return Err(Error::Validation("Set count must be at least 1".into()));
    }

    Ok((name.to_string(), set_count, rest))
}

fn cmd_workout_list(store: &JsonStore) -> Result<()> {
    let workouts = store.list_workouts()?;

    if workouts.is_empty() {
        println!("No workouts yet. Create one with 'workout create' or run 'seed'.");
        return Ok(());
    }

    for summary in workouts {
        println!(
            "  {}  ({} exercises)  {}",
            summary.name, summary.exercise_count, summary.id
        );
    }
    Ok(())
}

fn cmd_seed(store: &JsonStore) -> Result<()> {
    let created = seed_presets(store)?;
    if created == 0 {
        println!("Presets already seeded.");
    } else {
        println!("✓ Seeded {} preset workouts", created);
    }
    Ok(())
}

// ============================================================================
// Session walking
// ============================================================================

fn cmd_start(
    store: &JsonStore,
    config: &Config,
    workout: &str,
    auto: bool,
    timed_rest: bool,
) -> Result<()> {
    let workout = resolve_workout(store, workout)?;
    println!("\nStarting '{}' ({} exercises)", workout.name, workout.exercises.len());

    let mut session = Session::start(workout, &config.session)?;
    let mut prefill: Option<CompletedSet> = None;

    while !session.is_finished() {
        let step = if auto {
            auto_step(&session)?
        } else {
            match interactive_step(&session, &prefill)? {
                Some(step) => step,
                None => {
                    println!("\nSession abandoned - nothing was saved.");
                    return Ok(());
                }
            }
        };

        prefill = None;
        for effect in &step.effects {
            match effect {
                Effect::StartRest { seconds } => {
                    if !auto {
                        show_rest(*seconds, timed_rest);
                    }
                }
                Effect::CancelRest => {}
                Effect::Prefill { set } => prefill = Some(set.clone()),
                Effect::Persist {
                    workout_id,
                    exercises,
                } => {
                    // The single persistence write; a failure here is fatal
                    // and the in-memory session data is lost
                    let record = store.complete_workout(*workout_id, exercises.clone())?;
                    println!(
                        "\n✓ Session complete! Recorded {} exercises.",
                        record.exercises.len()
                    );
                }
            }
        }

        session = step.session;
    }

    Ok(())
}

fn resolve_workout(store: &JsonStore, name_or_id: &str) -> Result<Workout> {
    if let Ok(id) = Uuid::parse_str(name_or_id) {
        return store.get_workout(id);
    }

    let summary = store
        .list_workouts()?
        .into_iter()
        .find(|w| w.name.eq_ignore_ascii_case(name_or_id))
        .ok_or_else(|| Error::NotFound(format!("Workout '{}'", name_or_id)))?;
    store.get_workout(summary.id)
}

/// One prompted transition; None means the user quit without saving
fn interactive_step(session: &Session, prefill: &Option<CompletedSet>) -> Result<Option<Step>> {
    display_position(session);
    if let Some(set) = prefill {
        println!(
            "  Correcting previous set: {} lbs x {} reps (RPE {})",
            set.weight, set.reps, set.rpe
        );
    }

    loop {
        println!("─────────────────────────────────────────");
        println!("Enter: WEIGHT REPS RPE  (e.g. '95 8 7')");
        println!("  's' + Enter to skip this exercise");
        println!("  'b' + Enter to go back one step");
        println!("  'f' + Enter to finish early");
        println!("  'q' + Enter to quit without saving");
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        match input.trim().to_lowercase().as_str() {
            "s" => return Ok(Some(session.skip_exercise()?)),
            "b" => return Ok(Some(session.go_back())),
            "f" => return finish_early(session).map(Some),
            "q" => return Ok(None),
            line => match session.submit_set(&parse_set_input(line)) {
                Ok(step) => return Ok(Some(step)),
                Err(Error::Validation(message)) => {
                    // Rejected input leaves the walker untouched; re-prompt
                    println!("  ! {}", message);
                    continue;
                }
                Err(e) => return Err(e),
            },
        }
    }
}

/// Skip every remaining exercise so the partial session is still recorded
fn finish_early(session: &Session) -> Result<Step> {
    let mut step = session.skip_exercise()?;
    while !step.session.is_finished() {
        let mut next = step.session.skip_exercise()?;
        step.effects.append(&mut next.effects);
        step.session = next.session;
    }
    Ok(step)
}

/// Log the current set at its planned target (scripted runs)
fn auto_step(session: &Session) -> Result<Step> {
    let planned = session
        .current_set()
        .ok_or_else(|| Error::Session("No current set to auto-complete".into()))?;

    let input = SetInput {
        reps: Some(planned.target_reps.max(1)),
        weight: Some(planned.target_weight.unwrap_or(45.0)),
        rpe: Some(8),
    };
    session.submit_set(&input)
}

/// Raw token parsing; missing or malformed tokens surface as validation
/// rejections from the walker
fn parse_set_input(line: &str) -> SetInput {
    let mut tokens = line.split_whitespace();
    SetInput {
        weight: tokens.next().and_then(|t| t.parse().ok()),
        reps: tokens.next().and_then(|t| t.parse().ok()),
        rpe: tokens.next().and_then(|t| t.parse().ok()),
    }
}

fn display_position(session: &Session) {
    let (exercise_idx, set_idx) = match session.phase() {
        Phase::AtSet { exercise, set } => (exercise, set),
        Phase::Finished => return,
    };
    let Some(exercise) = session.current_exercise() else {
        return;
    };

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", exercise.name);
    println!("╰─────────────────────────────────────────╯");
    println!(
        "  Set {} of {}  ·  Exercise {} of {}",
        set_idx + 1,
        exercise.sets.len(),
        exercise_idx + 1,
        session.workout().exercises.len()
    );

    if let Some(planned) = session.current_set() {
        match planned.target_weight {
            Some(weight) => println!("  Target: {} reps @ {} lbs", planned.target_reps, weight),
            None => println!("  Target: {} reps", planned.target_reps),
        }
        println!("  Rest after: {}s", planned.rest_seconds);
    }
}

fn show_rest(seconds: u32, timed: bool) {
    if !timed {
        println!("\n  Rest: {}s", seconds);
        return;
    }

    // Purely informational countdown; the next prompt is not gated on it
    let mut timer = RestTimer::new(seconds);
    while !timer.is_done() {
        print!("\r  Rest: {:>3}s ", timer.remaining());
        let _ = io::stdout().flush();
        std::thread::sleep(std::time::Duration::from_secs(1));
        timer.tick();
    }
    println!("\r  Rest done.   ");
}

// ============================================================================
// Planning and history
// ============================================================================

fn cmd_suggest(
    store: &JsonStore,
    config: &Config,
    exercise_name: &str,
    window_days: Option<i64>,
) -> Result<()> {
    let exercise = store
        .list_exercises()?
        .into_iter()
        .find(|e| e.name.eq_ignore_ascii_case(exercise_name))
        .ok_or_else(|| Error::NotFound(format!("Exercise '{}'", exercise_name)))?;

    let completed = store.list_completed()?;
    let history = match window_days {
        Some(days) => {
            let cutoff = chrono::Utc::now() - chrono::Duration::days(days);
            exercise_history_since(&completed, &exercise.name, cutoff)
        }
        None => exercise_history(&completed, &exercise.name),
    };

    let suggestion = suggest_next(&history, exercise.kind, &config.progression);

    println!(
        "Next target for {} ({}): {} lbs x {} reps",
        exercise.name, exercise.kind, suggestion.weight, suggestion.reps
    );
    if history.is_empty() {
        println!("  (no history yet - starting target)");
    } else {
        println!("  (based on {} logged sets)", history.len());
    }
    Ok(())
}

fn cmd_history(store: &JsonStore, days: Option<i64>) -> Result<()> {
    let mut completed = store.list_completed()?;

    if let Some(days) = days {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(days);
        completed.retain(|w| w.completed_at >= cutoff);
    }

    if completed.is_empty() {
        println!("No completed workouts yet.");
        return Ok(());
    }

    completed.sort_by_key(|w| std::cmp::Reverse(w.completed_at));
    for workout in completed {
        let total_sets: usize = workout.exercises.iter().map(|e| e.sets.len()).sum();
        println!(
            "  {}  {}  ({} exercises, {} sets)",
            workout.completed_at.format("%Y-%m-%d %H:%M"),
            workout.name,
            workout.exercises.len(),
            total_sets
        );
        for exercise in &workout.exercises {
            if exercise.sets.is_empty() {
                println!("      {} - skipped", exercise.name);
            } else {
                let best = exercise
                    .sets
                    .iter()
                    .map(|s| s.weight)
                    .fold(f64::MIN, f64::max);
                println!(
                    "      {} - {} sets, top weight {} lbs",
                    exercise.name,
                    exercise.sets.len(),
                    best
                );
            }
        }
    }
    Ok(())
}

fn cmd_export(store: &JsonStore, out: &std::path::Path) -> Result<()> {
    let completed = store.list_completed()?;
    let rows = export_completed(&completed, out)?;
    println!("✓ Exported {} set rows to {}", rows, out.display());
    Ok(())
}
