//! Agent spawn factories.

use std::sync::Arc;

use hecs::{Entity, World};

use skirmish_core::components::{AgentTag, Facing, MoveOrder, SquadTag, Vitals};
use skirmish_core::config::TacticsConfig;
use skirmish_core::enums::{Faction, Gait, SquadPoint};
use skirmish_core::oracles::GroupRegistry;
use skirmish_core::types::{AgentId, MapId, Position, SquadId, Velocity};
use skirmish_tactics::brain::TacticalBrain;
use skirmish_tactics::profiles::{get_profile, PersonalityPreset};
use skirmish_tactics::services::TacticalServices;

use crate::scenario::ScenarioLayout;
use crate::systems::combat::Weapon;
use crate::systems::movement::Locomotion;
use crate::systems::perception::Awareness;

/// Everything needed to spawn one agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentSpawn {
    pub id: AgentId,
    pub faction: Faction,
    pub squad: SquadId,
    pub map: MapId,
    pub position: Position,
    pub heading: f64,
    pub preset: PersonalityPreset,
    pub objective: Option<Position>,
}

/// Spawn one agent entity with its brain and register it with its squad.
pub fn spawn_agent(
    world: &mut World,
    spawn: &AgentSpawn,
    config: &Arc<TacticsConfig>,
    services: &TacticalServices,
    seed: u64,
) -> Entity {
    let mut brain = TacticalBrain::new(
        spawn.id,
        spawn.squad,
        spawn.map,
        get_profile(spawn.preset),
        Arc::clone(config),
        seed,
    );
    brain.place(spawn.position, spawn.heading);

    let mut loco = Locomotion::default();
    if let Some(objective) = spawn.objective {
        loco.assign(
            MoveOrder {
                destination: objective,
                gait: Gait::Walk,
            },
            &spawn.position,
            services.navigation.as_deref(),
        );
    }
    if let Some(squads) = &services.squads {
        squads.register(spawn.id, spawn.squad);
    }

    world.spawn((
        AgentTag {
            id: spawn.id,
            faction: spawn.faction,
        },
        SquadTag {
            squad: spawn.squad,
            map: spawn.map,
        },
        spawn.position,
        Velocity::default(),
        Facing {
            heading: spawn.heading,
        },
        Vitals::default(),
        brain,
        Awareness::default(),
        loco,
        Weapon::default(),
    ))
}

/// Spawn every squad of a layout. Agent ids are assigned in roster order
/// starting at `next_id`, which is advanced past the last one used.
pub fn populate(
    world: &mut World,
    layout: &ScenarioLayout,
    config: &Arc<TacticsConfig>,
    services: &TacticalServices,
    seed: u64,
    next_id: &mut u32,
) -> Vec<(AgentId, Entity)> {
    let mut spawned = Vec::with_capacity(layout.agent_count());
    for squad in &layout.squads {
        if let (Some(point), Some(squads)) = (squad.fallback, &services.squads) {
            squads.set_point(squad.squad, SquadPoint::Fallback, point);
        }
        for (position, preset) in &squad.members {
            let id = AgentId(*next_id);
            *next_id += 1;
            let spawn = AgentSpawn {
                id,
                faction: squad.faction,
                squad: squad.squad,
                map: layout.map,
                position: *position,
                heading: squad.heading,
                preset: *preset,
                objective: squad.objective,
            };
            spawned.push((id, spawn_agent(world, &spawn, config, services, seed)));
        }
    }
    spawned
}
