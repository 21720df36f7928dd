//! Replays undo/redo sessions against the bundled receivers and prints every step.

use std::{borrow::Cow, fmt::Display, num::NonZeroUsize};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use command_timeline::prelude::*;
use command_timeline::receivers::{
    counter::{Add, Counter},
    light::{Light, LightError, SetBrightness, TurnOff, TurnOn},
    text_editor::{CopyText, Delete, EditorError, Insert, Paste, TextEditor},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

type EditorCommand = BoxedCommand<TextEditor, EditorError>;
type LightCommand = BoxedCommand<Light, LightError>;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Session to replay
    #[arg(short, long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,

    /// Keep at most this many commands; older ones are evicted and can no longer be undone
    #[arg(long, env = "COMMAND_DEMO_HISTORY_LIMIT")]
    history_limit: Option<NonZeroUsize>,

    /// Log filter, e.g. `debug` or `command_timeline=trace`
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    log_filter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    Editor,
    Remote,
    Counter,
    All,
}

fn main() -> Result<()> {
    let args = Args::parse();
    initialize_tracing(&args.log_filter)?;
    info!(scenario = ?args.scenario, history_limit = ?args.history_limit, "starting");

    match args.scenario {
        Scenario::Editor => run_editor(args.history_limit),
        Scenario::Remote => run_remote(args.history_limit),
        Scenario::Counter => run_counter(args.history_limit),
        Scenario::All => {
            run_editor(args.history_limit)?;
            run_remote(args.history_limit)?;
            run_counter(args.history_limit)
        }
    }
}

fn initialize_tracing(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter).context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
    Ok(())
}

fn timeline<C: Command>(history_limit: Option<NonZeroUsize>) -> Timeline<C> {
    history_limit.map_or_else(Timeline::new, Timeline::with_limit)
}

fn execute<C>(history: &mut Timeline<C>, command: C, ctx: &mut C::Context) -> Result<()>
where
    C: Command,
    C::Context: Display,
    C::Error: std::error::Error + Send + Sync + 'static,
{
    println!("\nExecuting: {}", command.description());
    history.execute_command(command, ctx)?;
    println!("{ctx}");
    Ok(())
}

fn undo<C>(history: &mut Timeline<C>, ctx: &mut C::Context) -> Result<()>
where
    C: Command,
    C::Context: Display,
    C::Error: std::error::Error + Send + Sync + 'static,
{
    let label = history.undo_description().map(Cow::into_owned);
    match history.undo(ctx)? {
        UndoOutcome::Applied => println!("\nUndoing: {}", label.unwrap_or_default()),
        UndoOutcome::NothingToUndo => println!("\nNothing to undo"),
    }
    println!("{ctx}");
    Ok(())
}

fn redo<C>(history: &mut Timeline<C>, ctx: &mut C::Context) -> Result<()>
where
    C: Command,
    C::Context: Display,
    C::Error: std::error::Error + Send + Sync + 'static,
{
    let label = history.redo_description().map(Cow::into_owned);
    match history.redo(ctx)? {
        RedoOutcome::Applied => println!("\nRedoing: {}", label.unwrap_or_default()),
        RedoOutcome::NothingToRedo => println!("\nNothing to redo"),
    }
    println!("{ctx}");
    Ok(())
}

fn run_editor(history_limit: Option<NonZeroUsize>) -> Result<()> {
    println!("=== Text editor ===\n");

    let mut editor = TextEditor::new();
    let mut history: Timeline<EditorCommand> = timeline(history_limit);
    println!("{editor}");

    let session: Vec<EditorCommand> = vec![
        Box::new(Insert::new("Hello", 0)),
        Box::new(Insert::new(" World", 5)),
        Box::new(Insert::new("!", 11)),
        Box::new(CopyText::new(0, 5)),
        Box::new(Insert::new(" ", 12)),
        Box::new(Paste::new(13)),
        Box::new(Delete::new(6, 5)),
    ];
    for command in session {
        execute(&mut history, command, &mut editor)?;
    }
    println!("\n{history}");

    println!("\n--- Undo ---");
    for _ in 0..3 {
        undo(&mut history, &mut editor)?;
    }
    println!("\n{history}");

    println!("\n--- Redo ---");
    for _ in 0..2 {
        redo(&mut history, &mut editor)?;
    }
    println!("\n{history}");

    println!("\n--- Past both ends ---");
    while history.can_undo() {
        undo(&mut history, &mut editor)?;
    }
    undo(&mut history, &mut editor)?;
    while history.can_redo() {
        redo(&mut history, &mut editor)?;
    }
    redo(&mut history, &mut editor)?;

    println!();
    Ok(())
}

fn run_remote(history_limit: Option<NonZeroUsize>) -> Result<()> {
    println!("=== Remote control ===\n");

    let mut light = Light::default();
    let mut history: Timeline<LightCommand> = timeline(history_limit);
    println!("{light}");

    let buttons: Vec<LightCommand> = vec![
        Box::new(TurnOn::new()),
        Box::new(SetBrightness::new(90)),
        Box::new(SetBrightness::new(25)),
        Box::new(TurnOff::new()),
    ];
    for button in buttons {
        execute(&mut history, button, &mut light)?;
    }

    println!("\n--- Undo ---");
    for _ in 0..5 {
        undo(&mut history, &mut light)?;
    }

    println!("\n--- Macro ---");
    let steps: Vec<LightCommand> = vec![
        Box::new(TurnOn::new()),
        Box::new(SetBrightness::new(25)),
        Box::new(TurnOff::new()),
    ];
    let bedtime: LightCommand = Box::new(Macro::with_steps("Bedtime routine", steps));
    execute(&mut history, bedtime, &mut light)?;
    undo(&mut history, &mut light)?;
    println!("\n{history}");

    println!();
    Ok(())
}

fn run_counter(history_limit: Option<NonZeroUsize>) -> Result<()> {
    println!("=== Counter ===\n");

    let mut counter = Counter::default();
    let mut history = timeline(history_limit);
    println!("value = {}", counter.value());

    for delta in [5, 3] {
        history.execute_command(Add(delta), &mut counter)?;
        println!("Add({delta}) -> {}", counter.value());
    }
    history.undo(&mut counter)?;
    history.undo(&mut counter)?;
    println!("undo, undo -> {}", counter.value());
    history.redo(&mut counter)?;
    println!("redo -> {}", counter.value());
    history.execute_command(Add(10), &mut counter)?;
    println!("Add(10) -> {}", counter.value());

    println!("\n{history}");
    Ok(())
}
