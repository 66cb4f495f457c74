//! Scenario definitions: hardcoded yard layouts and squad rosters.

use std::f64::consts::PI;

use skirmish_core::enums::{Faction, ScenarioId, SurfaceMaterial};
use skirmish_core::types::{MapId, Position, SquadId};
use skirmish_tactics::profiles::PersonalityPreset;
use skirmish_terrain::{NavGrid, Obstacle, ObstacleField};

/// Grid resolution used by every built-in map (meters per cell).
const CELL_SIZE: f64 = 1.0;

/// Clearance kept between walkable cell centers and obstacles (meters).
const CLEARANCE: f64 = 0.4;

/// One squad to spawn.
#[derive(Debug, Clone)]
pub struct SquadSpawn {
    pub squad: SquadId,
    pub faction: Faction,
    pub members: Vec<(Position, PersonalityPreset)>,
    /// Initial compass heading of every member.
    pub heading: f64,
    /// Where the squad walks at start, if anywhere.
    pub objective: Option<Position>,
    /// Shared fallback point, if preset.
    pub fallback: Option<Position>,
}

/// Static description of a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioLayout {
    pub name: &'static str,
    pub map: MapId,
    pub obstacles: ObstacleField,
    /// Southwest corner of the walkable area.
    pub origin: (f64, f64),
    /// Walkable area in cells.
    pub size: (u32, u32),
    pub squads: Vec<SquadSpawn>,
}

impl ScenarioLayout {
    /// Rasterise the obstacles into a walkability grid.
    pub fn nav_grid(&self) -> NavGrid {
        NavGrid::from_obstacles(
            &self.obstacles,
            self.origin.0,
            self.origin.1,
            CELL_SIZE,
            self.size.0,
            self.size.1,
            CLEARANCE,
        )
    }

    pub fn agent_count(&self) -> usize {
        self.squads.iter().map(|s| s.members.len()).sum()
    }
}

/// Build the layout for a given scenario.
pub fn build_layout(scenario: ScenarioId) -> ScenarioLayout {
    match scenario {
        ScenarioId::Skirmish => build_skirmish(),
        ScenarioId::Ambush => build_ambush(),
    }
}

/// Parse a scenario name as typed on a command line.
pub fn parse_scenario(name: &str) -> Option<ScenarioId> {
    match name.to_ascii_lowercase().as_str() {
        "skirmish" => Some(ScenarioId::Skirmish),
        "ambush" => Some(ScenarioId::Ambush),
        _ => None,
    }
}

fn line(y: f64, xs: &[f64]) -> impl Iterator<Item = Position> + '_ {
    xs.iter().map(move |x| Position::new(*x, y, 0.0))
}

/// "Skirmish": two squads of four meet across a walled yard.
/// A concrete wall splits the yard with gaps at both ends; brick crates
/// and sandbags give cover on each side. Blue flanks around the west end
/// of the wall while Red moves up on the east.
fn build_skirmish() -> ScenarioLayout {
    let obstacles = ObstacleField::new()
        .with(Obstacle::new((-18.0, -0.5), (18.0, 0.5), 2.6, SurfaceMaterial::Concrete))
        .with(Obstacle::new((-30.0, -12.0), (-27.0, -10.0), 1.8, SurfaceMaterial::Brick))
        .with(Obstacle::new((27.0, -12.0), (30.0, -10.0), 1.8, SurfaceMaterial::Brick))
        .with(Obstacle::new((-30.0, 10.0), (-27.0, 12.0), 1.8, SurfaceMaterial::Brick))
        .with(Obstacle::new((27.0, 10.0), (30.0, 12.0), 1.8, SurfaceMaterial::Brick))
        .with(Obstacle::new((-6.0, -20.0), (6.0, -19.2), 1.2, SurfaceMaterial::Sandbag))
        .with(Obstacle::new((-6.0, 19.2), (6.0, 20.0), 1.2, SurfaceMaterial::Sandbag))
        .with(Obstacle::new((35.0, -3.0), (40.0, 3.0), 3.0, SurfaceMaterial::Glass))
        .with(Obstacle::new((-40.0, -3.0), (-35.0, 3.0), 3.0, SurfaceMaterial::Foliage).trigger());

    let blue = SquadSpawn {
        squad: SquadId(1),
        faction: Faction::Blue,
        members: line(-38.0, &[-6.0, -2.0, 2.0, 6.0])
            .zip([
                PersonalityPreset::Veteran,
                PersonalityPreset::Regular,
                PersonalityPreset::Regular,
                PersonalityPreset::Rookie,
            ])
            .collect(),
        heading: 0.0,
        objective: Some(Position::new(-24.0, 8.0, 0.0)),
        fallback: Some(Position::new(0.0, -30.0, 0.0)),
    };
    let red = SquadSpawn {
        squad: SquadId(2),
        faction: Faction::Red,
        members: line(38.0, &[-6.0, -2.0, 2.0, 6.0])
            .zip([
                PersonalityPreset::Berserker,
                PersonalityPreset::Regular,
                PersonalityPreset::Stalker,
                PersonalityPreset::Rookie,
            ])
            .collect(),
        heading: PI,
        objective: Some(Position::new(20.0, 30.0, 0.0)),
        fallback: None,
    };

    ScenarioLayout {
        name: "skirmish",
        map: MapId(1),
        obstacles,
        origin: (-50.0, -50.0),
        size: (100, 100),
        squads: vec![blue, red],
    }
}

/// "Ambush": three defenders dug in behind a sandbag line watch four
/// attackers cross open ground toward them.
fn build_ambush() -> ScenarioLayout {
    let obstacles = ObstacleField::new()
        .with(Obstacle::new((-12.0, 17.0), (12.0, 18.0), 1.2, SurfaceMaterial::Sandbag))
        .with(Obstacle::new((-14.0, 26.0), (14.0, 27.0), 2.8, SurfaceMaterial::Concrete))
        .with(Obstacle::new((-25.0, -5.0), (-22.0, -2.0), 1.5, SurfaceMaterial::Rock))
        .with(Obstacle::new((20.0, 5.0), (23.0, 8.0), 1.5, SurfaceMaterial::Wood));

    let red = SquadSpawn {
        squad: SquadId(1),
        faction: Faction::Red,
        members: line(21.0, &[-6.0, 0.0, 6.0])
            .zip([
                PersonalityPreset::Holdout,
                PersonalityPreset::Veteran,
                PersonalityPreset::Stalker,
            ])
            .collect(),
        heading: PI,
        objective: None,
        fallback: Some(Position::new(0.0, 30.0, 0.0)),
    };
    let blue = SquadSpawn {
        squad: SquadId(2),
        faction: Faction::Blue,
        members: line(-40.0, &[-9.0, -3.0, 3.0, 9.0])
            .zip([
                PersonalityPreset::Rookie,
                PersonalityPreset::Rookie,
                PersonalityPreset::Regular,
                PersonalityPreset::Berserker,
            ])
            .collect(),
        heading: 0.0,
        objective: Some(Position::new(0.0, 12.0, 0.0)),
        fallback: None,
    };

    ScenarioLayout {
        name: "ambush",
        map: MapId(2),
        obstacles,
        origin: (-50.0, -50.0),
        size: (100, 100),
        squads: vec![red, blue],
    }
}
