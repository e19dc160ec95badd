//! Command line match runner.
//!
//! Pits the two demo agents against each other on a fixed cover layout and
//! prints the result; `--json` additionally dumps the full event log as JSON
//! lines for replay tooling.

mod agents;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use agents::{Hunter, Skirmisher};
use arena_core::{
    vec2, ArenaConfig, ArenaEngine, GameMap, MapElement, MatchPlan, TeamSetup,
};

#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Run a deterministic arena match between demo agents", long_about = None)]
struct Cli {
    /// Simulation seed; the same seed replays the same match
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Units per team
    #[arg(long, default_value = "3")]
    units: u32,

    /// Round points needed to win the match
    #[arg(long, default_value = "3")]
    points_to_win: u32,

    /// Tick budget per round
    #[arg(long, default_value = "18000")]
    ticks: u64,

    /// Maximum number of rounds
    #[arg(long, default_value = "9")]
    rounds: u32,

    /// Dump the event log as JSON lines to stdout
    #[arg(long, default_value = "false")]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = ArenaConfig {
        points_to_win: cli.points_to_win,
        ..ArenaConfig::standard()
    };

    let plan = MatchPlan {
        teams: vec![
            TeamSetup {
                name: "hunters".into(),
                unit_count: cli.units,
                spawn_point: vec2(-40.0, 0.0),
                build_agent: Box::new(|| Box::new(Hunter::new())),
            },
            TeamSetup {
                name: "skirmishers".into(),
                unit_count: cli.units,
                spawn_point: vec2(40.0, 0.0),
                build_agent: Box::new(|| Box::new(Skirmisher::new())),
            },
        ],
        map: demo_map(),
        config,
        seed: cli.seed,
    };

    let mut engine = ArenaEngine::new(plan)?;
    info!(seed = cli.seed, units = cli.units, "match starting");
    let state = engine.run_match(cli.ticks, cli.rounds);

    if cli.json {
        for event in engine.events().events() {
            println!("{}", serde_json::to_string(event)?);
        }
    }

    println!("final state: {state:?}");
    for (team_id, points) in engine.scoreboard().standings() {
        println!("team {team_id}: {points} points");
    }
    Ok(())
}

/// Fixed cover layout: a ring of posts around the center and two flanking
/// blocks per side.
fn demo_map() -> GameMap {
    GameMap::with_elements(
        120.0,
        vec![
            MapElement { element_id: 0, position: vec2(0.0, 14.0), radius: 3.0 },
            MapElement { element_id: 1, position: vec2(0.0, -14.0), radius: 3.0 },
            MapElement { element_id: 2, position: vec2(14.0, 0.0), radius: 2.0 },
            MapElement { element_id: 3, position: vec2(-14.0, 0.0), radius: 2.0 },
            MapElement { element_id: 4, position: vec2(-24.0, 18.0), radius: 4.0 },
            MapElement { element_id: 5, position: vec2(24.0, -18.0), radius: 4.0 },
            MapElement { element_id: 6, position: vec2(-24.0, -18.0), radius: 4.0 },
            MapElement { element_id: 7, position: vec2(24.0, 18.0), radius: 4.0 },
        ],
    )
}
