//! grid-runner - run a robot program against a catalog level from the terminal.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use grid_robot::cli::{ProgramSource, exit_status, log_filter, prepare_program, select_level};
use grid_robot::{Config, ExecutionResult, LevelCatalog, ReplayOutcome, replay, run};
use std::ops::ControlFlow;
use tokio::sync::watch;
use tracing::info;

#[derive(Parser)]
#[command(name = "grid-runner")]
#[command(about = "Run a robot navigation program against a puzzle level")]
struct Args {
    /// Config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level catalog to use instead of the bundled one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Level index (0-based) or name
    #[arg(long, short, default_value = "0")]
    level: String,

    /// List the catalog's levels and exit
    #[arg(long)]
    list: bool,

    /// Run the level's bundled reference solution
    #[arg(long, conflicts_with = "program")]
    solution: bool,

    /// Skip the level's instruction palette and length checks
    #[arg(long)]
    no_check: bool,

    /// Replay the trace frame by frame instead of printing it at once
    #[arg(long)]
    animate: bool,

    /// Program tokens, e.g. `forward right if-wall-ahead:left`
    program: Vec<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    let loaded;
    let catalog = match args.catalog.as_ref().or(config.catalog.as_ref()) {
        Some(path) => {
            loaded = LevelCatalog::load(path)
                .with_context(|| format!("failed to load catalog {}", path.display()))?;
            &loaded
        }
        None => LevelCatalog::builtin(),
    };

    if args.list {
        for (index, level) in catalog.iter().enumerate() {
            let kinds: Vec<_> = level.available().iter().map(|k| k.as_str()).collect();
            println!(
                "{index:>3}  {:<24} {}x{}  max {:>2}  [{}]",
                level.name(),
                level.grid().width(),
                level.grid().height(),
                level.max_instructions(),
                kinds.join(", ")
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    let level = select_level(catalog, &args.level)?;
    let source = if args.solution {
        ProgramSource::Solution
    } else {
        ProgramSource::Tokens(&args.program)
    };
    let program = prepare_program(level, source, !args.no_check)?;

    info!(level = level.name(), program = %program, "running");
    let result = run(level, &program);

    if args.animate {
        animate(&result, &config)?;
    } else {
        print!("{}", level.grid());
        for (step, state) in result.trace.iter().enumerate() {
            let label = match step {
                0 => "start".to_string(),
                n => program[n - 1].to_string(),
            };
            println!("{step:>3}  {label:<24} {state}");
        }
    }

    if result.success {
        println!("Solved {:?} in {} instructions.", level.name(), program.len());
    } else {
        println!(
            "Stopped at {}; the goal is at ({}, {}).",
            result.final_state,
            level.goal().x,
            level.goal().y
        );
    }
    Ok(ExitCode::from(exit_status(&result)))
}

fn animate(result: &ExecutionResult, config: &Config) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    // Nothing cancels a terminal replay; the sender only has to outlive it.
    let (_cancel, cancel_rx) = watch::channel(false);
    let outcome = runtime.block_on(replay(
        &result.trace,
        &config.playback,
        cancel_rx,
        |index, state| {
            println!("{index:>3}  {state}");
            ControlFlow::Continue(())
        },
    ));
    if let ReplayOutcome::Cancelled { at } = outcome {
        info!(at, "replay cancelled");
    }
    Ok(())
}
