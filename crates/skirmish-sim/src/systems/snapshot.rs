//! Snapshot builder: turns the world into a serialisable `SimSnapshot`.

use hecs::World;

use skirmish_core::components::{AgentTag, Dead, SquadTag, Vitals};
use skirmish_core::events::TacticalEvent;
use skirmish_core::oracles::{DangerZone, HealthProvider};
use skirmish_core::state::{AgentView, SimSnapshot};
use skirmish_core::types::{MapId, Position, SimTime};
use skirmish_tactics::brain::TacticalBrain;

pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    map: MapId,
    danger_zones: Vec<DangerZone>,
    events: Vec<TacticalEvent>,
) -> SimSnapshot {
    let mut agents: Vec<AgentView> = world
        .query::<(&AgentTag, &SquadTag, &Position, &Vitals, &TacticalBrain, Option<&Dead>)>()
        .iter()
        .map(|(_e, (tag, squad, pos, vitals, brain, dead))| AgentView {
            id: tag.id,
            squad: squad.squad,
            faction: tag.faction,
            position: *pos,
            alive: dead.is_none() && brain.is_alive(),
            health_ratio: vitals.health_ratio(),
            state: brain.state(),
            target: brain.current_target(),
            composure: brain.composure(),
            suppressed: brain.is_suppressed(),
            panicking: brain.is_panicking(),
            escalated: brain.is_escalated(),
        })
        .collect();
    agents.sort_by_key(|a| a.id);

    SimSnapshot {
        time: *time,
        map: Some(map),
        agents,
        danger_zones,
        events,
    }
}
