//! skirmish-run: headless scenario runner.
//!
//! Usage:
//!   skirmish-run --scenario ambush --ticks 1800 --seed 7
//!   skirmish-run --scenario skirmish --config tactics.json
//!
//! Prints a JSON summary of the run to stdout. Set RUST_LOG (for example
//! `RUST_LOG=skirmish_tactics=debug`) to trace decisions on stderr.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process;

use serde_json::json;
use tracing_subscriber::EnvFilter;

use skirmish_core::config::TacticsConfig;
use skirmish_core::enums::{Faction, ScenarioId};
use skirmish_core::state::SimSnapshot;
use skirmish_sim::scenario::parse_scenario;
use skirmish_sim::{SimConfig, SimulationEngine};

const DEFAULT_TICKS: u64 = 1800;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| matches!(a.as_str(), "help" | "--help" | "-h")) {
        print_usage();
        return;
    }

    let scenario = match flag_value(&args, "--scenario") {
        Some(name) => parse_scenario(name).unwrap_or_else(|| {
            eprintln!("Unknown scenario: {name}");
            print_usage();
            process::exit(1);
        }),
        None => ScenarioId::default(),
    };
    let ticks = parse_number(&args, "--ticks").unwrap_or(DEFAULT_TICKS);
    let seed = parse_number(&args, "--seed").unwrap_or(42);
    let tactics = match flag_value(&args, "--config").map(PathBuf::from) {
        Some(path) => load_config(&path),
        None => TacticsConfig::default(),
    };

    let mut engine = match SimulationEngine::new(SimConfig {
        seed,
        tactics,
        scenario,
    }) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let mut event_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut last = SimSnapshot::default();
    for _ in 0..ticks {
        last = engine.tick();
        for event in &last.events {
            let kind = serde_json::to_value(event)
                .ok()
                .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(str::to_owned))
                .unwrap_or_else(|| "Unknown".to_owned());
            *event_counts.entry(kind).or_default() += 1;
        }
    }

    tracing::info!(ticks = last.time.tick, "run complete");

    let summary = json!({
        "scenario": engine.scenario_name(),
        "seed": seed,
        "ticks": last.time.tick,
        "elapsed_secs": last.time.elapsed_secs,
        "alive": {
            "blue": last.alive_count(Faction::Blue),
            "red": last.alive_count(Faction::Red),
        },
        "events": event_counts,
        "danger_zones": last.danger_zones.len(),
        "agents": last.agents,
    });
    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error: failed to encode summary: {e}");
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "skirmish-run: run a SKIRMISH scenario headless and print a JSON summary\n\
         \n\
           --scenario <name>  skirmish | ambush (default: skirmish)\n\
           --ticks <N>        Ticks to simulate at 30 Hz (default: {DEFAULT_TICKS})\n\
           --seed <N>         RNG seed (default: 42)\n\
           --config <path>    Tactics configuration JSON; missing fields use defaults\n"
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_number(args: &[String], flag: &str) -> Option<u64> {
    let raw = flag_value(args, flag)?;
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            eprintln!("Error: {flag} expects a number, got {raw}");
            process::exit(1);
        }
    }
}

fn load_config(path: &PathBuf) -> TacticsConfig {
    let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error: cannot read {}: {e}", path.display());
        process::exit(1);
    });
    TacticsConfig::from_json_str(&text).unwrap_or_else(|e| {
        eprintln!("Error: {}: {e}", path.display());
        process::exit(1);
    })
}
