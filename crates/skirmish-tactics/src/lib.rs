//! Tactical decision core for SKIRMISH.
//!
//! Per-agent state machines, threat selection, suppression and panic
//! reactions, cover scoring, retreat planning, squad coordination and
//! threat escalation. No ECS dependency: the driver feeds each
//! [`TacticalBrain`](brain::TacticalBrain) a perception snapshot per tick and
//! applies the returned intents.

pub mod brain;
pub mod cover;
pub mod danger;
pub mod escalation;
pub mod fsm;
pub mod intent;
pub mod memory;
pub mod panic;
pub mod profiles;
pub mod retreat;
pub mod scheduler;
pub mod services;
pub mod squad;
pub mod suppression;
pub mod threat;
pub mod voice;

pub use skirmish_core as core;
