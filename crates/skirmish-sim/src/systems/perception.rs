//! Perception shim: what each agent can see and hear this tick.
//!
//! Hostile agents within the observer's detection distance and with a clear
//! eye-to-eye line are visible. Agents seen before stay known at their last
//! seen position. Gunfire from the previous tick is heard within
//! `GUNFIRE_HEARING_RANGE`.

use std::collections::BTreeMap;

use hecs::World;

use skirmish_core::components::{AgentTag, Dead, SquadTag, Vitals};
use skirmish_core::constants::GUNFIRE_HEARING_RANGE;
use skirmish_core::enums::Faction;
use skirmish_core::oracles::HealthProvider;
use skirmish_core::types::{AgentId, Position, SquadId};
use skirmish_tactics::brain::TacticalBrain;
use skirmish_tactics::threat::ThreatCandidate;
use skirmish_terrain::{has_line_of_sight, ObstacleField};

/// Eye height above the ground (meters).
pub const EYE_HEIGHT: f64 = 1.6;

/// Per-agent sensory state, rebuilt every tick.
#[derive(Debug, Clone, Default)]
pub struct Awareness {
    pub candidates: Vec<ThreatCandidate>,
    pub squadmates: Vec<(AgentId, Position)>,
    pub sounds: Vec<Position>,
    /// Last sighting of each hostile: (time, position).
    pub sightings: BTreeMap<AgentId, (f64, Position)>,
}

struct Seen {
    id: AgentId,
    faction: Faction,
    squad: SquadId,
    position: Position,
    alive: bool,
    health_ratio: f64,
}

pub fn eye(position: &Position) -> Position {
    Position::new(position.x, position.y, position.z + EYE_HEIGHT)
}

/// Refresh every agent's `Awareness`.
pub fn run(world: &mut World, terrain: &ObstacleField, gunfire: &[(AgentId, Position)], now: f64) {
    let mut roster: Vec<Seen> = world
        .query_mut::<(&AgentTag, &SquadTag, &Position, &Vitals, Option<&Dead>)>()
        .into_iter()
        .map(|(_e, (tag, squad, pos, vitals, dead))| Seen {
            id: tag.id,
            faction: tag.faction,
            squad: squad.squad,
            position: *pos,
            alive: dead.is_none() && vitals.health > 0.0,
            health_ratio: vitals.health_ratio(),
        })
        .collect();
    roster.sort_by_key(|s| s.id);

    for (_entity, (tag, squad, pos, brain, awareness)) in world.query_mut::<(
        &AgentTag,
        &SquadTag,
        &Position,
        &TacticalBrain,
        &mut Awareness,
    )>() {
        awareness.candidates.clear();
        awareness.squadmates.clear();
        awareness.sounds.clear();
        awareness
            .sightings
            .retain(|id, _| roster.iter().any(|s| s.id == *id));

        let detection = brain.tuning().detection_distance;
        let own_eye = eye(pos);

        for other in roster.iter().filter(|s| s.id != tag.id) {
            if !tag.faction.is_hostile_to(other.faction) {
                if other.squad == squad.squad && other.alive {
                    awareness.squadmates.push((other.id, other.position));
                }
                continue;
            }

            let visible = other.alive
                && pos.horizontal_range_to(&other.position) <= detection
                && has_line_of_sight(terrain, &own_eye, &eye(&other.position));
            if visible {
                awareness.sightings.insert(other.id, (now, other.position));
            }
            let Some(&(last_seen, last_position)) = awareness.sightings.get(&other.id) else {
                continue;
            };
            awareness.candidates.push(ThreatCandidate {
                id: other.id,
                position: if visible { other.position } else { last_position },
                alive: other.alive,
                hostile: true,
                visible,
                last_seen: Some(last_seen),
                health_ratio: other.health_ratio,
            });
        }

        awareness.sounds.extend(
            gunfire
                .iter()
                .filter(|(shooter, at)| {
                    *shooter != tag.id && at.horizontal_range_to(pos) <= GUNFIRE_HEARING_RANGE
                })
                .map(|(_, at)| *at),
        );
    }
}
