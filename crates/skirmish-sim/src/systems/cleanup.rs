//! Cleanup system: despawns dead agents and settles their bookkeeping.

use std::collections::BTreeMap;

use hecs::{Entity, World};

use skirmish_core::components::{AgentTag, Dead};
use skirmish_core::enums::DangerTrigger;
use skirmish_core::events::TacticalEvent;
use skirmish_core::oracles::GroupRegistry;
use skirmish_core::types::{AgentId, MapId, Position};
use skirmish_tactics::brain::TacticalBrain;
use skirmish_tactics::services::TacticalServices;

/// Remove every agent marked `Dead`: count the casualty, drop its pending
/// deliveries, leave a casualty danger zone where it fell and despawn it.
pub fn run(
    world: &mut World,
    agents: &mut BTreeMap<AgentId, Entity>,
    services: &TacticalServices,
    map: MapId,
    now: f64,
    events: &mut Vec<TacticalEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();

    let mut fallen: Vec<(Entity, AgentId, Position)> = world
        .query_mut::<(&AgentTag, &Position, &Dead)>()
        .into_iter()
        .map(|(e, (tag, pos, _))| (e, tag.id, *pos))
        .collect();
    fallen.sort_by_key(|(_, id, _)| *id);

    for (entity, id, position) in fallen {
        if let Ok(mut brain) = world.get::<&mut TacticalBrain>(entity) {
            brain.mark_dead(services);
        }
        if let Some(squads) = &services.squads {
            squads.record_casualty(id);
        }
        if let Some(scheduler) = &services.scheduler {
            scheduler.cancel_for(id);
        }
        if let Some(store) = &services.danger_zones {
            store.add_danger_zone(map, position, DangerTrigger::Casualty, 1.0, None, now);
        }
        tracing::debug!(agent = %id, "agent killed");
        events.push(TacticalEvent::AgentKilled { agent: id });
        agents.remove(&id);
        despawn_buffer.push(entity);
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Remove an agent without counting it as a casualty.
pub fn despawn_agent(
    world: &mut World,
    agents: &mut BTreeMap<AgentId, Entity>,
    services: &TacticalServices,
    id: AgentId,
) -> bool {
    let Some(entity) = agents.remove(&id) else {
        return false;
    };
    if let Ok(mut brain) = world.get::<&mut TacticalBrain>(entity) {
        brain.mark_dead(services);
    }
    if let Some(squads) = &services.squads {
        squads.unregister(id);
    }
    if let Some(scheduler) = &services.scheduler {
        scheduler.cancel_for(id);
    }
    world.despawn(entity).is_ok()
}
