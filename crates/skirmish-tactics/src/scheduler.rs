//! `EventScheduler`: delayed cross-agent deliveries keyed by fire time.
//!
//! Squad broadcasts never reach a squadmate directly. They are queued with a
//! fire time and drained by the driver once per tick, which checks that the
//! recipient is still alive before delivering. Pending events for an agent
//! are dropped with [`EventScheduler::cancel_for`] when it dies or despawns.

use std::collections::BTreeMap;
use std::sync::Mutex;

use skirmish_core::types::{AgentId, Position};

/// What happens when a scheduled event fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduledAction {
    /// A squadmate broadcast a fallback point.
    SquadFallback { point: Position },
    /// A squadmate signalled danger; panic unless already panicking.
    DangerPanic { position: Position },
    /// A squadmate asked for this position to be checked.
    InvestigateEcho { point: Position },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEvent {
    pub recipient: AgentId,
    pub sender: AgentId,
    pub fire_at: f64,
    pub action: ScheduledAction,
}

#[derive(Default)]
struct Queue {
    /// Fire time in whole milliseconds → events in insertion order.
    by_time: BTreeMap<u64, Vec<ScheduledEvent>>,
    total: usize,
}

/// Thread-safe queue of delayed deliveries.
#[derive(Default)]
pub struct EventScheduler {
    inner: Mutex<Queue>,
}

fn to_millis(secs: f64) -> u64 {
    if secs.is_nan() || secs <= 0.0 {
        return 0;
    }
    (secs * 1000.0).round() as u64
}

impl EventScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, Queue> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue `action` for `recipient` at `fire_at` seconds.
    pub fn schedule(
        &self,
        sender: AgentId,
        recipient: AgentId,
        fire_at: f64,
        action: ScheduledAction,
    ) {
        let event = ScheduledEvent {
            recipient,
            sender,
            fire_at,
            action,
        };
        let mut q = self.queue();
        q.by_time.entry(to_millis(fire_at)).or_default().push(event);
        q.total += 1;
    }

    /// Remove and return every event due at or before `now`, earliest first.
    pub fn drain_due(&self, now: f64) -> Vec<ScheduledEvent> {
        let mut q = self.queue();
        let later = q.by_time.split_off(&(to_millis(now) + 1));
        let due = std::mem::replace(&mut q.by_time, later);
        let events: Vec<ScheduledEvent> = due.into_values().flatten().collect();
        q.total -= events.len();
        events
    }

    /// Drop every pending event addressed to `agent`. Returns how many were dropped.
    pub fn cancel_for(&self, agent: AgentId) -> usize {
        let mut q = self.queue();
        let mut dropped = 0;
        q.by_time.retain(|_, events| {
            let before = events.len();
            events.retain(|e| e.recipient != agent);
            dropped += before - events.len();
            !events.is_empty()
        });
        q.total -= dropped;
        dropped
    }

    /// Pending events addressed to `agent`.
    pub fn pending_for(&self, agent: AgentId) -> Vec<ScheduledEvent> {
        self.queue()
            .by_time
            .values()
            .flatten()
            .filter(|e| e.recipient == agent)
            .copied()
            .collect()
    }

    /// Earliest pending fire time, in seconds.
    pub fn next_fire_time(&self) -> Option<f64> {
        self.queue().by_time.keys().next().map(|ms| *ms as f64 / 1000.0)
    }

    pub fn len(&self) -> usize {
        self.queue().total
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
