#![deny(warnings)]

//! Headless driver: runs weeks from a fresh or saved game and prints KPIs and charts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use sim_core::{GameState, SimConfig};
use sim_runtime::actions::override_config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    weeks: Option<u32>,
    seed: Option<u32>,
    config: Option<PathBuf>,
    load: Option<PathBuf>,
    token: Option<String>,
    save: Option<PathBuf>,
    export: bool,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--weeks" => args.weeks = it.next().and_then(|s| s.parse().ok()),
            "--seed" => args.seed = it.next().and_then(|s| s.parse().ok()),
            "--config" => args.config = it.next().map(PathBuf::from),
            "--load" => args.load = it.next().map(PathBuf::from),
            "--token" => args.token = it.next(),
            "--save" => args.save = it.next().map(PathBuf::from),
            "--export" => args.export = true,
            _ => {}
        }
    }
    args
}

fn initial_state(args: &Args) -> Result<GameState> {
    let mut state = if let Some(path) = &args.load {
        persistence::load_snapshot(path)
            .with_context(|| format!("loading {}", path.display()))?
            .state
    } else if let Some(token) = &args.token {
        persistence::import_token(token).context("importing save token")?.state
    } else {
        GameState::fresh()
    };
    if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let cfg: SimConfig = serde_yaml::from_str(&text).context("parsing config")?;
        override_config(&mut state, cfg)?;
    }
    if let Some(seed) = args.seed {
        state.rng_seed = seed;
    }
    Ok(state)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args();
    info!(?args, "starting CLI");

    let mut state = initial_state(&args)?;
    let report = sim_runtime::run_weeks_in_place(&mut state, args.weeks.unwrap_or(1));

    println!(
        "Week {} (calendar {}, {}) | {} {} age {}",
        state.week,
        state.calendar_week,
        state.artist.year,
        state.artist.name,
        state.artist.id,
        state.artist.age
    );
    println!(
        "KPI | weeks: {} | song streams: {} | project streams: {} | platform revenue: ${} | gigs: ${} | job: ${} | cash: ${} | energy: {} | hype: {:.1}",
        report.weeks_run,
        report.song_streams,
        report.project_streams,
        report.platform_revenue.round_dp(2),
        report.activity_payouts,
        report.job_pay,
        state.artist.cash.round_dp(2),
        state.artist.energy,
        state.artist.hype
    );

    println!("Top songs (chart week {})", state.charts.week);
    for row in state.charts.songs.iter().take(10) {
        println!(
            "  #{:<2} {:<24} {:>9} streams  {:>6.1} pts",
            row.position, row.title, row.streams, row.points
        );
    }
    if !state.charts.projects.is_empty() {
        println!("Top projects");
        for row in state.charts.projects.iter().take(10) {
            println!(
                "  #{:<2} {:<24} {:>9} streams  {:>6.1} pts",
                row.position, row.title, row.streams, row.points
            );
        }
    }
    for (label, rows) in [
        (&state.config.platforms.aurafy.label, &state.platform_charts.aurafy),
        (&state.config.platforms.streambox.label, &state.platform_charts.streambox),
    ] {
        if let Some(top) = rows.first() {
            println!("{label} #1: {} ({})", top.title, top.metric);
        }
    }

    if let Some(path) = &args.save {
        persistence::save_snapshot(path, &state)
            .with_context(|| format!("saving {}", path.display()))?;
    }
    if args.export {
        println!("{}", persistence::export_token(&state)?);
    }
    Ok(())
}
