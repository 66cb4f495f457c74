//! Scheduled-event delivery.
//!
//! Due events are delivered only to recipients that still exist and are
//! alive at fire time; anything else is dropped.

use std::collections::BTreeMap;

use hecs::{Entity, World};

use skirmish_core::components::Dead;
use skirmish_core::types::AgentId;
use skirmish_tactics::brain::TacticalBrain;
use skirmish_tactics::scheduler::EventScheduler;
use skirmish_tactics::services::TacticalServices;

/// Deliver every event due at `now`. Returns how many were delivered.
pub fn run(
    world: &mut World,
    agents: &BTreeMap<AgentId, Entity>,
    scheduler: &EventScheduler,
    services: &TacticalServices,
    now: f64,
) -> usize {
    let mut delivered = 0;
    for event in scheduler.drain_due(now) {
        let Some(&entity) = agents.get(&event.recipient) else {
            tracing::trace!(recipient = %event.recipient, "recipient gone, event dropped");
            continue;
        };
        let Ok((brain, dead)) =
            world.query_one_mut::<(&mut TacticalBrain, Option<&Dead>)>(entity)
        else {
            continue;
        };
        if dead.is_some() || !brain.is_alive() {
            continue;
        }
        brain.deliver(event.action, services, now);
        delivered += 1;
    }
    delivered
}
