//! Headless Bout Runner
//!
//! Runs scripted AI vs AI bouts and prints a JSON or text report.

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use ringside::bout::{BoutEvent, BoutState, FighterStats, REFERENCE_FRAME_MS};
use ringside::core::config::MetaAiConfig;
use ringside::core::{load_config, BoutConfig, Corner, Level, Result, SimError};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Headless Bout Runner - scripted fighters, adaptive AI, full scoring
#[derive(Parser, Debug)]
#[command(name = "bout_runner")]
#[command(about = "Run an AI vs AI boxing bout and print the result")]
struct Args {
    /// Red corner AI level (clamped to 1..=10)
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    red_level: i32,

    /// Blue corner AI level (clamped to 1..=10)
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    blue_level: i32,

    /// Random seed for deterministic playbooks
    #[arg(long)]
    seed: Option<u64>,

    /// Number of rounds (overrides the config file)
    #[arg(long)]
    rounds: Option<u32>,

    /// Seconds per round (overrides the config file)
    #[arg(long)]
    round_seconds: Option<u32>,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = REFERENCE_FRAME_MS)]
    dt_ms: f64,

    /// TOML bout configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the tactical rule engine thresholds
    #[arg(long)]
    tactical: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Log round flow and AI decisions to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Tallies collected from the event bus
#[derive(Debug, Default)]
struct Tally {
    rules_fired: usize,
    breaks: usize,
    level_shifts: usize,
    rounds_started: usize,
}

/// JSON output structure
#[derive(Serialize)]
struct BoutReport {
    winner: Option<Corner>,
    winner_name: Option<String>,
    method: String,
    round: u32,
    elapsed_seconds: u32,
    red_hits: u32,
    blue_hits: u32,
    red_health: f64,
    blue_health: f64,
    red_final_level: Option<u8>,
    blue_final_level: Option<u8>,
    rules_fired: usize,
    breaks: usize,
    level_shifts: usize,
    rounds_fought: usize,
    ticks: u64,
    seed: u64,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn build_config(args: &Args) -> Result<BoutConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => BoutConfig::default(),
    };

    if args.tactical {
        config.meta_ai.close_distance = MetaAiConfig::tactical().close_distance;
    }
    if let Some(rounds) = args.rounds {
        config.rounds.rounds = rounds;
    }
    if let Some(round_seconds) = args.round_seconds {
        config.rounds.round_seconds = round_seconds;
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    if !(args.dt_ms > 0.0) || !args.dt_ms.is_finite() {
        return Err(SimError::InvalidConfig(format!(
            "dt-ms must be a positive number (got {})",
            args.dt_ms
        )));
    }

    let config = build_config(args)?;
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut state = BoutState::ai_vs_ai(
        config,
        &FighterStats::named("Red"),
        &FighterStats::named("Blue"),
        Level::new(args.red_level),
        Level::new(args.blue_level),
        seed,
    )?;

    let tally = Rc::new(RefCell::new(Tally::default()));
    let sink = Rc::clone(&tally);
    state.subscribe(move |event: &BoutEvent| {
        let mut tally = sink.borrow_mut();
        match event {
            BoutEvent::RuleActivated { .. } => tally.rules_fired += 1,
            BoutEvent::BreakStarted => tally.breaks += 1,
            BoutEvent::LevelShifted { .. } => tally.level_shifts += 1,
            BoutEvent::RoundStarted { .. } => tally.rounds_started += 1,
            _ => {}
        }
    });

    state.start();
    let mut ticks: u64 = 0;
    while !state.is_finished() {
        state.tick(args.dt_ms);
        ticks += 1;
    }

    let outcome = state.outcome().cloned().ok_or_else(|| {
        SimError::InvalidConfig("bout stopped without an outcome".into())
    })?;
    let (red_hits, blue_hits) = state.hit_counts();
    let level_of = |corner: Corner| state.contender(corner).controller.level().map(Level::get);

    let tally = tally.borrow();
    let report = BoutReport {
        winner: outcome.winner,
        winner_name: outcome.winner_name.clone(),
        method: format!("{:?}", outcome.method),
        round: outcome.round,
        elapsed_seconds: outcome.elapsed_seconds,
        red_hits,
        blue_hits,
        red_health: state.fighter(Corner::Red).health,
        blue_health: state.fighter(Corner::Blue).health,
        red_final_level: level_of(Corner::Red),
        blue_final_level: level_of(Corner::Blue),
        rules_fired: tally.rules_fired,
        breaks: tally.breaks,
        level_shifts: tally.level_shifts,
        rounds_fought: tally.rounds_started,
        ticks,
        seed,
    };

    match args.format.as_str() {
        "text" => print_text(&report),
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        other => {
            tracing::warn!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    drop(tally);
    state.teardown();
    Ok(())
}

fn print_text(report: &BoutReport) {
    println!("Bout Result");
    println!("===========");
    match &report.winner_name {
        Some(name) => println!("Winner: {} by {}", name, report.method),
        None => println!("Result: {}", report.method),
    }
    println!("Round: {} ({}s in)", report.round, report.elapsed_seconds);
    println!("Clean hits: red {} - blue {}", report.red_hits, report.blue_hits);
    println!(
        "Health left: red {:.3} - blue {:.3}",
        report.red_health, report.blue_health
    );
    println!();
    println!("Rules fired: {}", report.rules_fired);
    println!("Clinch breaks: {}", report.breaks);
    println!("Level shifts: {}", report.level_shifts);
    println!("Ticks: {}", report.ticks);
    println!("Seed: {}", report.seed);
}
