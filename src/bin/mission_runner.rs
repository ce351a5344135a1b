//! Headless Mission Runner
//!
//! Plays a scripted squad against the alien AI and prints a summary.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use squad_tactics::battle::{
    find_approach_path, mission_status, plan_shot, BattleEventLog, CommandOutcome, Faction, Mission,
    MissionStatus, ShotMode, TurnController, UnitId,
};
use squad_tactics::core::{load_mission_config, MissionConfig, Result};

/// Headless Mission Runner - scripted squad vs alien AI
#[derive(Parser, Debug)]
#[command(name = "mission_runner")]
#[command(about = "Play a mission headlessly and report the outcome")]
struct Args {
    /// Mission file (TOML); built-in default mission when omitted
    #[arg(long)]
    mission: Option<PathBuf>,

    /// Override the mission seed
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many turns
    #[arg(long, default_value_t = 30)]
    max_turns: u32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every event to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct SoldierReport {
    name: String,
    alive: bool,
    kills: u32,
    rank: String,
}

/// JSON output structure
#[derive(Serialize)]
struct MissionReport {
    outcome: MissionStatus,
    turns: u32,
    soldiers_alive: usize,
    aliens_alive: usize,
    events: usize,
    seed: u64,
    squad: Vec<SoldierReport>,
}

/// Fire modes the scripted squad tries, most accurate first
const SQUAD_MODES: [ShotMode; 3] = [ShotMode::Aimed, ShotMode::Snap, ShotMode::Auto];
const SQUAD_ACTIONS_PER_UNIT: usize = 6;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("squad_tactics=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.mission {
        Some(path) => load_mission_config(path)?,
        None => MissionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.map.seed = seed;
    }

    let mut mission = Mission::from_config(&config)?;
    let mut events = 0;

    while mission.status() == MissionStatus::InProgress
        && mission.controller.turn() <= args.max_turns
    {
        let log = play_squad_turn(&mut mission.controller);
        events += report(&log, args.verbose);
        if mission.status() != MissionStatus::InProgress {
            break;
        }

        let result = mission.controller.end_turn();
        events += report(&result.events, args.verbose);
    }

    let state = mission.controller.state();
    let report = MissionReport {
        outcome: mission_status(state),
        turns: mission.controller.turn(),
        soldiers_alive: state.units.living_count(Faction::Player),
        aliens_alive: state.units.living_count(Faction::Enemy),
        events,
        seed: config.map.seed,
        squad: state
            .units
            .all()
            .filter(|u| u.faction() == Faction::Player)
            .map(|u| SoldierReport {
                name: u.name.clone(),
                alive: u.alive,
                kills: u.kills,
                rank: u.rank.map(|r| format!("{:?}", r)).unwrap_or_default(),
            })
            .collect(),
    };

    match args.format.as_str() {
        "text" => print_text(&report, &state.map.render_ascii()),
        "json" => print_json(&report),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            print_json(&report);
        }
    }
    Ok(())
}

/// Each soldier shoots the nearest spotted alien it can hit, otherwise advances
fn play_squad_turn(controller: &mut TurnController) -> BattleEventLog {
    let mut log = BattleEventLog::new();

    for id in controller.state().units.living_ids(Faction::Player) {
        for _ in 0..SQUAD_ACTIONS_PER_UNIT {
            if mission_status(controller.state()) != MissionStatus::InProgress {
                return log;
            }
            let Some(outcome) = next_squad_action(controller, id) else {
                break;
            };
            match outcome {
                Ok(done) => log.extend(done.events),
                Err(err) => {
                    tracing::debug!("Soldier {} order rejected: {}", id, err);
                    break;
                }
            }
        }
    }
    log
}

fn next_squad_action(
    controller: &mut TurnController,
    id: UnitId,
) -> Option<Result<CommandOutcome>> {
    let state = controller.state();
    let soldier = state.units.get(id).filter(|u| u.alive)?;

    if soldier.weapon.is_empty() {
        return (soldier.weapon.spare_clips > 0).then(|| controller.reload(id));
    }

    let mut aliens: Vec<_> = state.units.living(Faction::Enemy).collect();
    aliens.sort_by(|a, b| {
        let da = soldier.position.euclidean(&a.position);
        let db = soldier.position.euclidean(&b.position);
        da.total_cmp(&db).then(a.id.cmp(&b.id))
    });

    let shot = aliens.iter().filter(|a| a.spotted).find_map(|alien| {
        SQUAD_MODES
            .iter()
            .copied()
            .find(|mode| plan_shot(&state.map, &state.units, id, alien.id, *mode).is_ok())
            .map(|mode| (alien.id, mode))
    });
    if let Some((target, mode)) = shot {
        return Some(controller.fire(id, target, mode));
    }

    // Advance on the nearest alien, keeping a snap shot in hand
    let nearest = aliens.first()?;
    let reserve = soldier
        .weapon
        .profile(ShotMode::Snap)
        .map(|p| p.tu_cost(soldier.time_units.base))
        .unwrap_or(0);
    let budget = soldier.time_units.current.saturating_sub(reserve);
    let path = find_approach_path(&state.map, soldier.position, nearest.position)?
        .truncate_to_budget(&state.map, budget);
    if path.moves() == 0 {
        return None;
    }
    Some(controller.move_unit(id, path))
}

fn report(log: &BattleEventLog, verbose: bool) -> usize {
    if verbose {
        for event in log.iter() {
            eprintln!("  [turn {}] {}", event.turn, event.description);
        }
    }
    log.len()
}

fn print_json(report: &MissionReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("Failed to serialize report: {}", err),
    }
}

fn print_text(report: &MissionReport, map: &str) {
    println!("Mission Result");
    println!("==============");
    println!("Outcome: {:?}", report.outcome);
    println!("Turns: {}", report.turns);
    println!("Soldiers alive: {}", report.soldiers_alive);
    println!("Aliens alive: {}", report.aliens_alive);
    println!("Events: {}", report.events);
    println!();
    for soldier in &report.squad {
        println!(
            "  {:<10} {:<9} kills={} {}",
            soldier.name,
            soldier.rank,
            soldier.kills,
            if soldier.alive { "" } else { "(KIA)" }
        );
    }
    println!();
    println!("{}", map);
    println!("Seed: {}", report.seed);
}
