//! Tactics system: tick every brain and apply its intents.

use hecs::World;

use skirmish_core::components::{Dead, Facing, MoveOrder, Vitals};
use skirmish_core::events::TacticalEvent;
use skirmish_core::types::{Position, Velocity};
use skirmish_tactics::brain::{Perception, TacticalBrain};
use skirmish_tactics::intent::Intent;
use skirmish_tactics::services::TacticalServices;

use crate::systems::combat::Weapon;
use crate::systems::movement::Locomotion;
use crate::systems::perception::Awareness;

pub fn run(
    world: &mut World,
    services: &TacticalServices,
    now: f64,
    events: &mut Vec<TacticalEvent>,
) {
    let nav = services.navigation.as_deref();

    for (_entity, (pos, vel, facing, vitals, dead, awareness, brain, loco, weapon)) in world
        .query_mut::<(
            &Position,
            &Velocity,
            &mut Facing,
            &Vitals,
            Option<&Dead>,
            &Awareness,
            &mut TacticalBrain,
            &mut Locomotion,
            &mut Weapon,
        )>()
    {
        let perception = Perception {
            position: *pos,
            heading: facing.heading,
            speed: vel.horizontal_speed(),
            alive: dead.is_none() && vitals.health > 0.0,
            candidates: &awareness.candidates,
            squadmates: &awareness.squadmates,
            sounds: &awareness.sounds,
        };
        let output = brain.tick(&perception, services, now);

        for intent in output.intents {
            match intent {
                Intent::MoveTo { destination, gait } => {
                    loco.assign(MoveOrder { destination, gait }, pos, nav);
                }
                Intent::Halt => loco.clear(),
                Intent::FaceToward(point) => facing.heading = pos.bearing_to(&point),
                Intent::Fire { target } => weapon.firing_at = Some(target),
                Intent::CeaseFire => weapon.firing_at = None,
            }
        }
        if !brain.is_alive() {
            weapon.firing_at = None;
            loco.clear();
        }
        events.extend(output.events);
    }
}
