//! Combat resolution.
//!
//! Agents whose brain asked to fire deal damage to their target while they
//! can see it, and may pin it down. Damage feeds back into the target's
//! brain through `notify_damaged`; lethal damage marks it `Dead`.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::components::{Dead, Vitals};
use skirmish_core::constants::{ATTACK_DAMAGE_PER_SEC, ATTACK_SUPPRESS_CHANCE_PER_SEC, DT};
use skirmish_core::types::{AgentId, Position};
use skirmish_tactics::brain::TacticalBrain;
use skirmish_tactics::services::TacticalServices;
use skirmish_terrain::{has_line_of_sight, ObstacleField};

use crate::systems::perception::eye;

/// Who the agent is shooting at, as requested by its brain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Weapon {
    pub firing_at: Option<AgentId>,
}

struct Shot {
    target: Entity,
    from: Position,
    amount: f64,
    suppress: bool,
}

/// Resolve one tick of fire. Shooter positions are pushed to `gunfire`.
pub fn run(
    world: &mut World,
    agents: &BTreeMap<AgentId, Entity>,
    terrain: &ObstacleField,
    services: &TacticalServices,
    rng: &mut ChaCha8Rng,
    now: f64,
    gunfire: &mut Vec<(AgentId, Position)>,
) {
    gunfire.clear();

    // Shooters in id order so RNG draws are reproducible.
    let mut shooters: Vec<(AgentId, Position, AgentId, f64)> = Vec::new();
    for (&id, &entity) in agents {
        let Ok(mut q) = world.query_one::<(&Position, &Weapon, &TacticalBrain, Option<&Dead>)>(entity)
        else {
            continue;
        };
        let Some((pos, weapon, brain, dead)) = q.get() else {
            continue;
        };
        let (Some(target), None) = (weapon.firing_at, dead) else {
            continue;
        };
        let mut damage = ATTACK_DAMAGE_PER_SEC * DT * brain.tuning().recoil_tolerance;
        if brain.is_suppressed() {
            damage *= brain.personality().accuracy_under_fire;
        }
        shooters.push((id, *pos, target, damage));
    }

    let mut shots = Vec::new();
    for (id, from, target, amount) in shooters {
        gunfire.push((id, from));
        let Some(&target_entity) = agents.get(&target) else {
            continue;
        };
        let Ok(mut q) =
            world.query_one::<(&Position, &TacticalBrain, Option<&Dead>)>(target_entity)
        else {
            continue;
        };
        let Some((target_pos, target_brain, None)) = q.get() else {
            continue;
        };
        if !has_line_of_sight(terrain, &eye(&from), &eye(target_pos)) {
            continue;
        }
        let chance = ATTACK_SUPPRESS_CHANCE_PER_SEC
            * DT
            * (0.5 + target_brain.personality().suppression_sensitivity);
        shots.push(Shot {
            target: target_entity,
            from,
            amount,
            suppress: rng.gen_bool(chance.clamp(0.0, 1.0)),
        });
    }

    for shot in shots {
        let killed = apply_damage(world, services, shot.target, shot.amount, Some(shot.from), now);
        if !killed && shot.suppress {
            if let Ok(mut brain) = world.get::<&mut TacticalBrain>(shot.target) {
                brain.trigger_suppression(Some(shot.from), services, now);
            }
        }
    }
}

/// Subtract health and tell the brain. Returns true when this hit killed
/// the agent; it is then marked `Dead` and left for cleanup.
pub fn apply_damage(
    world: &mut World,
    services: &TacticalServices,
    entity: Entity,
    amount: f64,
    from: Option<Position>,
    now: f64,
) -> bool {
    let killed = {
        let Ok((vitals, brain, dead)) =
            world.query_one_mut::<(&mut Vitals, &mut TacticalBrain, Option<&Dead>)>(entity)
        else {
            return false;
        };
        if dead.is_some() {
            return false;
        }
        vitals.health = (vitals.health - amount.max(0.0)).max(0.0);
        let killed = vitals.health <= 0.0;
        if !killed {
            brain.notify_damaged(&*vitals, from, services, now);
        }
        killed
    };
    if killed {
        let _ = world.insert_one(entity, Dead);
    }
    killed
}
