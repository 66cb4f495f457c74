//! Squad coordination.
//!
//! [`SquadRegistry`] holds one [`SquadBoard`] per squad, each behind its own
//! lock: membership, shared points of interest, casualty counts and the
//! panicking set. [`SquadCoordinator`] is the per-agent side that fans
//! broadcasts out to squadmates through the [`EventScheduler`].

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, RwLock};

use rand::Rng;

use skirmish_core::config::SquadConfig;
use skirmish_core::enums::SquadPoint;
use skirmish_core::oracles::GroupRegistry;
use skirmish_core::types::{AgentId, Position, SquadId};

use crate::scheduler::{EventScheduler, ScheduledAction};

/// Shared state of one squad.
#[derive(Debug, Clone)]
pub struct SquadBoard {
    pub members: BTreeSet<AgentId>,
    /// Largest membership ever seen.
    pub original_size: usize,
    pub casualties: usize,
    pub fallback_point: Option<Position>,
    pub loot_point: Option<Position>,
    pub extract_point: Option<Position>,
    /// Last danger broadcast: position and time.
    pub last_danger: Option<(Position, f64)>,
    pub last_echo_at: f64,
    pub panicking: BTreeSet<AgentId>,
}

impl Default for SquadBoard {
    fn default() -> Self {
        Self {
            members: BTreeSet::new(),
            original_size: 0,
            casualties: 0,
            fallback_point: None,
            loot_point: None,
            extract_point: None,
            last_danger: None,
            last_echo_at: f64::NEG_INFINITY,
            panicking: BTreeSet::new(),
        }
    }
}

impl SquadBoard {
    pub fn point(&self, kind: SquadPoint) -> Option<Position> {
        match kind {
            SquadPoint::Fallback => self.fallback_point,
            SquadPoint::Loot => self.loot_point,
            SquadPoint::Extract => self.extract_point,
        }
    }

    /// Last write wins.
    pub fn set_point(&mut self, kind: SquadPoint, point: Position) {
        match kind {
            SquadPoint::Fallback => self.fallback_point = Some(point),
            SquadPoint::Loot => self.loot_point = Some(point),
            SquadPoint::Extract => self.extract_point = Some(point),
        }
    }
}

type Board = Arc<Mutex<SquadBoard>>;

#[derive(Default)]
pub struct SquadRegistry {
    boards: RwLock<HashMap<SquadId, Board>>,
    membership: RwLock<HashMap<AgentId, SquadId>>,
}

impl SquadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn board(&self, squad: SquadId) -> Board {
        if let Some(b) = self
            .boards
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(&squad)
        {
            return Arc::clone(b);
        }
        let mut boards = self.boards.write().unwrap_or_else(|p| p.into_inner());
        Arc::clone(boards.entry(squad).or_default())
    }

    /// Run `f` with the squad's board locked.
    pub fn with_board<R>(&self, squad: SquadId, f: impl FnOnce(&mut SquadBoard) -> R) -> R {
        let board = self.board(squad);
        let mut guard = board.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut guard)
    }

    pub fn squad_of(&self, agent: AgentId) -> Option<SquadId> {
        self.membership
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(&agent)
            .copied()
    }

    pub fn is_registered(&self, agent: AgentId) -> bool {
        self.squad_of(agent).is_some()
    }

    /// Remove a dead agent and count it as a casualty.
    pub fn record_casualty(&self, agent: AgentId) {
        if let Some(squad) = self.squad_of(agent) {
            self.unregister(agent);
            self.with_board(squad, |b| b.casualties += 1);
        }
    }

    pub fn set_point(&self, squad: SquadId, kind: SquadPoint, point: Position) {
        self.with_board(squad, |b| b.set_point(kind, point));
    }

    pub fn point(&self, squad: SquadId, kind: SquadPoint) -> Option<Position> {
        self.with_board(squad, |b| b.point(kind))
    }

    pub fn set_panicking(&self, squad: SquadId, agent: AgentId, panicking: bool) {
        self.with_board(squad, |b| {
            if panicking {
                b.panicking.insert(agent);
            } else {
                b.panicking.remove(&agent);
            }
        });
    }

    /// Claim the squad's shared echo slot. Returns false while the cooldown runs.
    pub fn try_claim_echo(&self, squad: SquadId, now: f64, cooldown: f64) -> bool {
        self.with_board(squad, |b| {
            if now - b.last_echo_at < cooldown {
                return false;
            }
            b.last_echo_at = now;
            true
        })
    }

    /// (casualties, original size) for escalation checks.
    pub fn losses(&self, squad: SquadId) -> (usize, usize) {
        self.with_board(squad, |b| (b.casualties, b.original_size))
    }
}

impl GroupRegistry for SquadRegistry {
    fn register(&self, agent: AgentId, squad: SquadId) {
        let previous = self
            .membership
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .insert(agent, squad);
        if let Some(old) = previous.filter(|old| *old != squad) {
            self.with_board(old, |b| {
                b.members.remove(&agent);
                b.panicking.remove(&agent);
            });
        }
        self.with_board(squad, |b| {
            b.members.insert(agent);
            b.original_size = b.original_size.max(b.members.len());
        });
    }

    fn unregister(&self, agent: AgentId) {
        let removed = self
            .membership
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&agent);
        if let Some(squad) = removed {
            self.with_board(squad, |b| {
                b.members.remove(&agent);
                b.panicking.remove(&agent);
            });
        }
    }

    fn members(&self, squad: SquadId) -> Vec<AgentId> {
        self.with_board(squad, |b| b.members.iter().copied().collect())
    }
}

/// Per-agent end of the squad protocol.
#[derive(Debug, Clone)]
pub struct SquadCoordinator {
    agent: AgentId,
    squad: SquadId,
    last_tick: Option<f64>,
    last_broadcast_position: Option<Position>,
}

impl SquadCoordinator {
    pub fn new(agent: AgentId, squad: SquadId) -> Self {
        Self {
            agent,
            squad,
            last_tick: None,
            last_broadcast_position: None,
        }
    }

    pub fn squad(&self) -> SquadId {
        self.squad
    }

    /// Register with the squad on first use.
    pub fn ensure_registered(&self, registry: &SquadRegistry) {
        if !registry.is_registered(self.agent) {
            registry.register(self.agent, self.squad);
        }
    }

    /// Live squadmates, excluding this agent.
    pub fn squadmates(&self, registry: &SquadRegistry) -> Vec<AgentId> {
        self.ensure_registered(registry);
        registry
            .members(self.squad)
            .into_iter()
            .filter(|id| *id != self.agent)
            .collect()
    }

    /// Store `point` as the squad fallback point and send every squadmate
    /// there. Delivery is immediate: it fires on the next scheduler drain.
    pub fn broadcast_fallback_point(
        &self,
        registry: &SquadRegistry,
        scheduler: &EventScheduler,
        point: Position,
        now: f64,
    ) -> usize {
        let mates = self.squadmates(registry);
        registry.set_point(self.squad, SquadPoint::Fallback, point);
        for mate in &mates {
            scheduler.schedule(
                self.agent,
                *mate,
                now,
                ScheduledAction::SquadFallback { point },
            );
        }
        mates.len()
    }

    /// Record a danger signal and schedule a panic trigger for every
    /// squadmate that is not already panicking, after a random delay.
    pub fn broadcast_danger<R: Rng>(
        &self,
        registry: &SquadRegistry,
        scheduler: &EventScheduler,
        config: &SquadConfig,
        rng: &mut R,
        position: Position,
        now: f64,
    ) -> usize {
        self.ensure_registered(registry);
        let calm: Vec<AgentId> = registry.with_board(self.squad, |b| {
            b.last_danger = Some((position, now));
            b.members
                .iter()
                .filter(|id| **id != self.agent && !b.panicking.contains(id))
                .copied()
                .collect()
        });
        for mate in &calm {
            let delay = jitter(rng, config.danger_jitter_min_secs, config.danger_jitter_max_secs);
            scheduler.schedule(
                self.agent,
                *mate,
                now + delay,
                ScheduledAction::DangerPanic { position },
            );
        }
        calm.len()
    }

    /// Periodic work. A panicking agent re-broadcasts its position as both
    /// fallback point and danger signal once it has moved far enough.
    /// Returns true when it broadcast.
    #[allow(clippy::too_many_arguments)]
    pub fn tick<R: Rng>(
        &mut self,
        registry: &SquadRegistry,
        scheduler: &EventScheduler,
        config: &SquadConfig,
        rng: &mut R,
        position: Position,
        panicking: bool,
        now: f64,
    ) -> bool {
        if let Some(last) = self.last_tick {
            if now - last < config.tick_interval_secs {
                return false;
            }
        }
        self.last_tick = Some(now);
        self.ensure_registered(registry);

        if !panicking {
            self.last_broadcast_position = None;
            return false;
        }
        if self
            .last_broadcast_position
            .is_some_and(|p| p.horizontal_range_to(&position) < config.rebroadcast_min_movement)
        {
            return false;
        }
        self.last_broadcast_position = Some(position);
        self.broadcast_fallback_point(registry, scheduler, position, now);
        self.broadcast_danger(registry, scheduler, config, rng, position, now);
        true
    }
}

/// Uniform delay in `[min, max]`. Inverted bounds collapse to `min`.
pub fn jitter<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}
