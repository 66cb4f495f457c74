//! `TacticalBrain`: one agent's complete decision stack.
//!
//! The driver calls [`TacticalBrain::tick`] once per simulation tick with a
//! fresh [`Perception`] and applies the returned intents. Commands may
//! arrive between ticks; their intents are returned by the next tick.
//! Nothing in here fails: missing services and failed queries degrade to
//! simpler behavior.

use std::f64::consts::TAU;
use std::sync::Arc;

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use skirmish_core::components::{CombatTuning, Personality};
use skirmish_core::config::TacticsConfig;
use skirmish_core::enums::{CombatState, DangerTrigger, Gait, PanicCause, VoiceTrigger};
use skirmish_core::events::TacticalEvent;
use skirmish_core::oracles::{HealthProvider, TacticalMemory};
use skirmish_core::types::{heading_to_direction, rotate_about_up, AgentId, MapId, Position, SquadId};

use crate::escalation::{EscalationMonitor, StressSignals};
use crate::fsm::{evaluate, CombatContext, CombatStateMachine, Transition, TransitionReason};
use crate::intent::Intent;
use crate::memory::AgentMemory;
use crate::panic::PanicHandler;
use crate::retreat::{FallbackPath, RetreatPlanner, RetreatRequest};
use crate::scheduler::ScheduledAction;
use crate::services::TacticalServices;
use crate::squad::{jitter, SquadCoordinator};
use crate::suppression::{fixed_fallback_point, threat_direction, SuppressionReaction};
use crate::threat::{TargetChange, ThreatCandidate, ThreatSelector};

/// Danger zones weaker than this no longer spread panic.
const SQUAD_DANGER_MIN_INTENSITY: f64 = 0.5;

/// What the agent knows this tick.
pub struct Perception<'a> {
    pub position: Position,
    /// Compass heading in radians.
    pub heading: f64,
    pub speed: f64,
    pub alive: bool,
    pub candidates: &'a [ThreatCandidate],
    /// Other live squad members and where they stand.
    pub squadmates: &'a [(AgentId, Position)],
    /// Positions of sounds heard since the previous tick.
    pub sounds: &'a [Position],
}

/// Everything a brain produced since the previous tick.
#[derive(Debug, Default)]
pub struct BrainOutput {
    pub intents: Vec<Intent>,
    pub events: Vec<TacticalEvent>,
}

/// Derive an agent's RNG seed from the session seed.
pub fn agent_seed(seed: u64, agent: AgentId) -> u64 {
    seed ^ (agent.0 as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

pub struct TacticalBrain {
    id: AgentId,
    squad: SquadId,
    map: MapId,
    config: Arc<TacticsConfig>,
    personality: Personality,
    tuning: CombatTuning,
    rng: ChaCha8Rng,

    memory: AgentMemory,
    threat: ThreatSelector,
    fsm: CombatStateMachine,
    suppression: SuppressionReaction,
    panic: PanicHandler,
    coordinator: SquadCoordinator,
    escalation: EscalationMonitor,

    alive: bool,
    position: Position,
    heading: f64,
    squadmates: Vec<(AgentId, Position)>,
    target_position: Option<Position>,
    target_healthy: bool,
    /// The current target is still alive, however badly hurt.
    target_alive: bool,
    firing_at: Option<AgentId>,
    heard: Option<(Position, f64)>,
    echo: Option<Position>,
    investigate_point: Option<Position>,
    fallback_request: Option<Position>,
    injured: bool,
    last_tick: Option<f64>,
    out: BrainOutput,
}

impl TacticalBrain {
    pub fn new(
        id: AgentId,
        squad: SquadId,
        map: MapId,
        personality: Personality,
        config: Arc<TacticsConfig>,
        seed: u64,
    ) -> Self {
        let memory = AgentMemory::new(config.memory.clone());
        Self {
            id,
            squad,
            map,
            config,
            personality,
            tuning: CombatTuning::default(),
            rng: ChaCha8Rng::seed_from_u64(agent_seed(seed, id)),
            memory,
            threat: ThreatSelector::new(),
            fsm: CombatStateMachine::new(0.0),
            suppression: SuppressionReaction::default(),
            panic: PanicHandler::default(),
            coordinator: SquadCoordinator::new(id, squad),
            escalation: EscalationMonitor::default(),
            alive: true,
            position: Position::default(),
            heading: 0.0,
            squadmates: Vec::new(),
            target_position: None,
            target_healthy: false,
            target_alive: false,
            firing_at: None,
            heard: None,
            echo: None,
            investigate_point: None,
            fallback_request: None,
            injured: false,
            last_tick: None,
            out: BrainOutput::default(),
        }
    }

    pub fn with_tuning(mut self, tuning: CombatTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Seed the agent's position before its first tick.
    pub fn place(&mut self, position: Position, heading: f64) {
        self.position = position;
        self.heading = heading;
    }

    // --- Queries ---

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn squad(&self) -> SquadId {
        self.squad
    }

    pub fn map(&self) -> MapId {
        self.map
    }

    pub fn state(&self) -> CombatState {
        self.fsm.state()
    }

    pub fn current_target(&self) -> Option<AgentId> {
        self.threat.current_target()
    }

    pub fn is_in_combat_state(&self) -> bool {
        self.fsm.state().is_combat()
    }

    pub fn composure(&self) -> f64 {
        self.panic.composure()
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppression.is_suppressed()
    }

    pub fn is_panicking(&self) -> bool {
        self.panic.is_panicking()
    }

    pub fn is_escalated(&self) -> bool {
        self.escalation.is_escalated()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    pub fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }

    pub fn memory(&self) -> &AgentMemory {
        &self.memory
    }

    /// Active move target, if any.
    pub fn destination(&self) -> Option<Position> {
        self.fsm.destination().map(|(d, _)| d)
    }

    // --- Commands ---

    /// The agent took damage. `health` reflects the state after the hit.
    pub fn notify_damaged(
        &mut self,
        health: &dyn HealthProvider,
        from: Option<Position>,
        services: &TacticalServices,
        now: f64,
    ) {
        if !self.alive {
            return;
        }
        if let Some(src) = from {
            self.memory.record_enemy_position(src, now);
        }
        let ratio = health.health_ratio();
        if ratio <= 0.0 {
            return;
        }
        if ratio < self.config.panic.health_threshold
            && self.trigger_panic(PanicCause::CriticalHealth, services, now)
        {
            return;
        }
        if self.panic.is_panicking() || self.suppression.is_suppressed() {
            return;
        }
        if health.should_heal() {
            self.injured = true;
        }

        let chance = self.tuning.run_on_damage_chance.clamp(0.0, 1.0);
        if matches!(
            self.fsm.state(),
            CombatState::Patrol | CombatState::Investigate
        ) && self.rng.gen_bool(chance)
        {
            let dir = threat_direction(&self.position, self.heading, from.as_ref());
            let point =
                fixed_fallback_point(&self.position, dir, self.config.suppression.fallback_distance);
            self.move_to(point, Gait::Sprint);
        }
    }

    /// Fall back to `point` at the next allowed transition.
    pub fn trigger_fallback(&mut self, point: Position) {
        if self.alive {
            self.fallback_request = Some(point);
        }
    }

    /// React to suppressive fire. Returns true when an episode started.
    pub fn trigger_suppression(
        &mut self,
        from: Option<Position>,
        services: &TacticalServices,
        now: f64,
    ) -> bool {
        if !self.alive
            || self.panic.is_panicking()
            || !self.suppression.can_trigger(&self.config.suppression, now)
        {
            return false;
        }
        let dir = threat_direction(&self.position, self.heading, from.as_ref());
        let destination = if services.navigation.is_some() {
            self.plan_retreat(dir, services, now).destination()
        } else {
            fixed_fallback_point(&self.position, dir, self.config.suppression.fallback_distance)
        };

        self.suppression.begin(now);
        self.out
            .events
            .push(TacticalEvent::SuppressionStarted { agent: self.id });
        services.say(self.id, VoiceTrigger::Suppressed);
        if let Some(store) = &services.danger_zones {
            store.add_danger_zone(
                self.map,
                self.position,
                DangerTrigger::Suppression,
                0.6,
                Some(self.id),
                now,
            );
        }
        tracing::debug!(agent = %self.id, "suppressed");
        self.enter_fallback(TransitionReason::Suppressed, Some(destination), services, now);
        true
    }

    /// Start a panic episode. Returns true when one started.
    pub fn trigger_panic(
        &mut self,
        cause: PanicCause,
        services: &TacticalServices,
        now: f64,
    ) -> bool {
        if !self.alive
            || !self
                .panic
                .try_trigger(cause, &self.personality, &self.config.panic, now)
        {
            return false;
        }
        self.out.events.push(TacticalEvent::PanicStarted {
            agent: self.id,
            cause,
        });
        services.say(self.id, VoiceTrigger::Panicking);
        if let Some(squads) = &services.squads {
            squads.set_panicking(self.squad, self.id, true);
        }
        if let Some(store) = &services.danger_zones {
            store.add_danger_zone(
                self.map,
                self.position,
                DangerTrigger::Panic,
                1.0,
                Some(self.id),
                now,
            );
        }
        tracing::debug!(agent = %self.id, ?cause, "panic");

        let destination = self.fallback_request.take();
        self.enter_fallback(TransitionReason::Panicked, destination, services, now);
        true
    }

    /// A squadmate asked for `point` to be checked.
    pub fn notify_echo_investigate(&mut self, point: Position) {
        if self.alive {
            self.echo = Some(point);
        }
    }

    pub fn notify_blinded(&mut self, services: &TacticalServices, now: f64) -> bool {
        self.trigger_panic(PanicCause::Blinded, services, now)
    }

    pub fn notify_sound(&mut self, position: Position, now: f64) {
        if self.alive && !self.memory.was_recently_cleared(&position, now) {
            self.heard = Some((position, now));
        }
    }

    /// Handle a delivery from the event scheduler.
    pub fn deliver(&mut self, action: ScheduledAction, services: &TacticalServices, now: f64) {
        if !self.alive {
            return;
        }
        match action {
            ScheduledAction::SquadFallback { point } => {
                self.fallback_request = Some(point);
                if !self.panic.is_panicking() {
                    self.trigger_panic(PanicCause::SquadDanger, services, now);
                }
            }
            ScheduledAction::DangerPanic { .. } => {
                self.trigger_panic(PanicCause::SquadDanger, services, now);
            }
            ScheduledAction::InvestigateEcho { point } => self.notify_echo_investigate(point),
        }
    }

    /// The agent died. Drops transient state and leaves the squad's panic set.
    pub fn mark_dead(&mut self, services: &TacticalServices) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.suppression.clear();
        self.fsm.clear_destination();
        if let Some(squads) = &services.squads {
            squads.set_panicking(self.squad, self.id, false);
        }
    }

    // --- Tick ---

    pub fn tick(
        &mut self,
        perception: &Perception<'_>,
        services: &TacticalServices,
        now: f64,
    ) -> BrainOutput {
        if self.alive && !perception.alive {
            self.mark_dead(services);
        }
        if !self.alive {
            return std::mem::take(&mut self.out);
        }

        let dt = self.last_tick.map_or(0.0, |t| (now - t).max(0.0));
        self.last_tick = Some(now);
        self.position = perception.position;
        self.heading = perception.heading;
        self.squadmates.clear();
        self.squadmates.extend_from_slice(perception.squadmates);

        if self.suppression.update(&self.config.suppression, now) {
            self.out
                .events
                .push(TacticalEvent::SuppressionEnded { agent: self.id });
        }
        if self.panic.update(&self.config.panic, now, dt) {
            self.out.events.push(TacticalEvent::PanicEnded { agent: self.id });
            if let Some(squads) = &services.squads {
                squads.set_panicking(self.squad, self.id, false);
            }
        }

        for sound in perception.sounds {
            self.notify_sound(*sound, now);
        }
        self.update_target(perception, services, now);
        self.check_squad_danger(services, now);
        self.check_escalation(services, now);
        self.run_state_machine(services, now);

        if self
            .fsm
            .update_stuck(&self.position, perception.speed, &self.config.combat, now)
        {
            self.repath();
        }

        if let (Some(squads), Some(scheduler)) = (&services.squads, &services.scheduler) {
            let panicking = self.panic.is_panicking();
            if self.coordinator.tick(
                squads,
                scheduler,
                &self.config.squad,
                &mut self.rng,
                self.position,
                panicking,
                now,
            ) {
                self.out.events.push(TacticalEvent::FallbackBroadcast {
                    agent: self.id,
                    squad: self.squad,
                    point: self.position,
                });
                self.out.events.push(TacticalEvent::DangerBroadcast {
                    agent: self.id,
                    squad: self.squad,
                    position: self.position,
                });
                services.say(self.id, VoiceTrigger::SquadDanger);
            }
        }

        std::mem::take(&mut self.out)
    }

    fn update_target(
        &mut self,
        perception: &Perception<'_>,
        services: &TacticalServices,
        now: f64,
    ) {
        let change = self.threat.evaluate(
            &self.config.threat,
            &self.personality,
            &self.position,
            perception.candidates,
            now,
        );
        match change {
            TargetChange::Unchanged => {}
            TargetChange::Acquired(target) => {
                tracing::debug!(agent = %self.id, %target, "target acquired");
                self.out.events.push(TacticalEvent::TargetAcquired {
                    agent: self.id,
                    target,
                });
                services.say(self.id, VoiceTrigger::EnemySpotted);
            }
            TargetChange::Switched { from, to } => {
                tracing::debug!(agent = %self.id, %from, %to, "target switched");
                self.out.events.push(TacticalEvent::TargetSwitched {
                    agent: self.id,
                    from,
                    to,
                });
            }
            TargetChange::Lost(_) => {
                self.out
                    .events
                    .push(TacticalEvent::TargetLost { agent: self.id });
            }
        }

        let current = self
            .threat
            .current_target()
            .and_then(|id| perception.candidates.iter().find(|c| c.id == id));
        self.target_position = current.map(|c| c.position);
        self.target_alive = current.is_some_and(|c| c.alive);
        self.target_healthy = self.target_alive
            && current.is_some_and(|c| c.health_ratio > self.config.combat.enemy_healthy_ratio);
        if let Some(c) = current.filter(|c| c.visible) {
            self.memory.record_enemy_position(c.position, now);
        }
    }

    fn check_squad_danger(&mut self, services: &TacticalServices, now: f64) {
        if self.panic.is_panicking() {
            return;
        }
        let Some(store) = &services.danger_zones else {
            return;
        };
        let near = store.zones_for_map(self.map, now).into_iter().any(|z| {
            z.trigger != DangerTrigger::Suppression
                && z.current_intensity(now) >= SQUAD_DANGER_MIN_INTENSITY
                && z.contains(&self.position)
                && z.source.map_or(true, |s| {
                    s != self.id && self.squadmates.iter().any(|(id, _)| *id == s)
                })
        });
        if near {
            self.trigger_panic(PanicCause::SquadDanger, services, now);
        }
    }

    fn check_escalation(&mut self, services: &TacticalServices, now: f64) {
        let (squad_casualties, squad_original_size) = services
            .squads
            .as_ref()
            .map_or((0, 0), |s| s.losses(self.squad));
        let signals = StressSignals {
            panic_secs: self.panic.panic_duration(now),
            known_enemies: self.threat.known_enemies(),
            squad_casualties,
            squad_original_size,
        };
        if self.escalation.observe(
            &signals,
            &self.config.escalation,
            &mut self.personality,
            &mut self.tuning,
        ) {
            tracing::info!(agent = %self.id, ?signals, "threat escalated");
            self.out
                .events
                .push(TacticalEvent::Escalated { agent: self.id });
            services.say(self.id, VoiceTrigger::Escalated);
        }
    }

    /// Last known enemy position: the current target, else memory.
    fn enemy_position(&self, now: f64) -> Option<Position> {
        self.target_position
            .or_else(|| self.memory.recent_enemy_memory(now))
    }

    fn run_state_machine(&mut self, services: &TacticalServices, now: f64) {
        let config = &self.config.combat;
        let heard_sound = self
            .heard
            .is_some_and(|(_, t)| now - t <= config.sound_memory_secs);
        let ctx = CombatContext {
            state: self.fsm.state(),
            elapsed_in_state_secs: self.fsm.elapsed(now),
            suppressed: self.suppression.is_suppressed(),
            panicking: self.panic.is_panicking(),
            fallback_requested: self.fallback_request.is_some(),
            injured: self.injured,
            heard_sound,
            echo_requested: self.echo.is_some(),
            caution: self.personality.caution,
            enemy_reported: self.threat.current_target().is_some() && self.target_healthy,
            enemy_distance: self
                .enemy_position(now)
                .map(|p| self.position.horizontal_range_to(&p)),
            engagement_range: self.personality.engagement_range,
            arrived: self.fsm.has_arrived(&self.position, config.arrival_radius),
        };

        match evaluate(&ctx, config) {
            Some(transition) => self.apply_transition(transition, services, now),
            None => self.sustain(now),
        }
    }

    fn apply_transition(&mut self, t: Transition, services: &TacticalServices, now: f64) {
        if t.to == CombatState::Fallback {
            let destination = match t.reason {
                TransitionReason::FallbackRequested => self.fallback_request.take(),
                _ => None,
            };
            self.enter_fallback(t.reason, destination, services, now);
            return;
        }

        let from = self.change_state(t.to, now);
        tracing::debug!(agent = %self.id, ?from, to = ?t.to, reason = ?t.reason, "state change");

        match t.to {
            CombatState::Patrol => {
                self.halt();
                if t.reason == TransitionReason::AreaCleared {
                    if let Some(point) = self.investigate_point {
                        self.memory.mark_cleared(point, now);
                    }
                }
                if t.reason == TransitionReason::ContactLost {
                    self.threat.reset_target();
                    self.memory.forget_enemy();
                }
                self.investigate_point = None;
                self.heard = None;
                self.echo = None;
                if from.is_combat() {
                    services.say(self.id, VoiceTrigger::AllClear);
                }
            }
            CombatState::Investigate => {
                let point = self.echo.take().or(self.heard.map(|(p, _)| p));
                self.heard = None;
                if let Some(point) = point {
                    self.investigate_point = Some(point);
                    self.move_to(point, Gait::Walk);
                }
                services.say(self.id, VoiceTrigger::Investigating);
            }
            CombatState::Engage => {
                if let Some(pos) = self.enemy_position(now) {
                    if let Some(target) = self.target_position {
                        self.memory.record_enemy_position(target, now);
                    }
                    self.move_to(pos, Gait::Sprint);
                }
                if matches!(from, CombatState::Patrol | CombatState::Investigate) {
                    services.say(self.id, VoiceTrigger::EnemySpotted);
                }
            }
            CombatState::Attack => {
                self.halt();
                self.sustain(now);
            }
            CombatState::Fallback => {}
        }
    }

    /// Per-tick upkeep of the current state when nothing changed.
    fn sustain(&mut self, now: f64) {
        match self.fsm.state() {
            CombatState::Engage => {
                let Some(enemy) = self.enemy_position(now) else {
                    return;
                };
                let stale = self.fsm.destination().map_or(true, |(d, _)| {
                    d.horizontal_range_to(&enemy) > self.config.combat.arrival_radius
                });
                if stale {
                    self.move_to(enemy, Gait::Sprint);
                }
            }
            CombatState::Attack => {
                if let Some(pos) = self.target_position {
                    self.out.intents.push(Intent::FaceToward(pos));
                }
                // Health only gates opening an engagement; a crippled target is finished off.
                let target = self.threat.current_target().filter(|_| self.target_alive);
                if target != self.firing_at {
                    match target {
                        Some(t) => self.out.intents.push(Intent::Fire { target: t }),
                        None => self.out.intents.push(Intent::CeaseFire),
                    }
                    self.firing_at = target;
                }
            }
            _ => {}
        }
    }

    /// Record the state change and stop firing when leaving Attack.
    fn change_state(&mut self, to: CombatState, now: f64) -> CombatState {
        let from = self.fsm.transition(to, now);
        if self.firing_at.take().is_some() {
            self.out.intents.push(Intent::CeaseFire);
        }
        if from != to {
            self.out.events.push(TacticalEvent::StateChanged {
                agent: self.id,
                from,
                to,
            });
        }
        from
    }

    /// Enter Fallback: plan (or take) a destination, spread out from
    /// squadmates, sprint there and maybe ask nearby squadmates to look.
    fn enter_fallback(
        &mut self,
        reason: TransitionReason,
        destination: Option<Position>,
        services: &TacticalServices,
        now: f64,
    ) {
        let target = match destination {
            Some(p) => p,
            None => {
                let dir = self.threat_direction(now);
                self.plan_retreat(dir, services, now).destination()
            }
        };
        let adjusted = Position::from_vec(target.to_vec() + self.spacing_offset());
        let from = self.change_state(CombatState::Fallback, now);
        tracing::debug!(agent = %self.id, ?from, ?reason, "falling back");
        self.injured = false;
        self.move_to(adjusted, Gait::Sprint);
        services.say(self.id, VoiceTrigger::FallingBack);
        self.echo_to_squad(services, now);
    }

    fn echo_to_squad(&mut self, services: &TacticalServices, now: f64) {
        let (Some(squads), Some(scheduler)) = (&services.squads, &services.scheduler) else {
            return;
        };
        let config = &self.config.combat;
        let p = config.echo_probability.clamp(0.0, 1.0);
        if !self.rng.gen_bool(p) || !squads.try_claim_echo(self.squad, now, config.echo_cooldown_secs) {
            return;
        }
        let max_delay = self.config.squad.echo_delay_max_secs * (1.0 + self.personality.chaos_factor);
        for (mate, pos) in &self.squadmates {
            if pos.horizontal_range_to(&self.position) > config.echo_radius {
                continue;
            }
            let delay = jitter(&mut self.rng, self.config.squad.echo_delay_min_secs, max_delay);
            scheduler.schedule(
                self.id,
                *mate,
                now + delay,
                ScheduledAction::InvestigateEcho {
                    point: self.position,
                },
            );
        }
    }

    /// Direction toward the threat: target, remembered enemy, else ahead.
    fn threat_direction(&self, now: f64) -> DVec3 {
        self.enemy_position(now)
            .map(|p| self.position.direction_to(&p))
            .filter(|d| *d != DVec3::ZERO)
            .unwrap_or_else(|| heading_to_direction(self.heading))
    }

    fn plan_retreat(&self, dir: DVec3, services: &TacticalServices, now: f64) -> FallbackPath {
        let zones = services
            .danger_zones
            .as_ref()
            .map(|d| d.zones_for_map(self.map, now))
            .unwrap_or_default();
        let mates: Vec<Position> = self.squadmates.iter().map(|(_, p)| *p).collect();
        let planner = RetreatPlanner {
            retreat: &self.config.retreat,
            cover: &self.config.cover,
            navigation: services.navigation.as_deref(),
            raycaster: services.raycaster.as_deref(),
            danger_zones: &zones,
            cache: services.path_cache.as_deref(),
        };
        planner.plan(&RetreatRequest {
            agent: self.id,
            map: self.map,
            squad: self.squad,
            origin: self.position,
            threat_direction: dir,
            personality: &self.personality,
            composure: self.panic.composure(),
            squadmates: &mates,
            memory: &self.memory,
            now,
        })
    }

    /// Offset that spreads squad members around a shared point. Slots
    /// follow id order so every member picks a different one.
    fn spacing_offset(&self) -> DVec3 {
        let n = self.squadmates.len() + 1;
        if n <= 1 {
            return DVec3::ZERO;
        }
        let slot = self
            .squadmates
            .iter()
            .filter(|(id, _)| *id < self.id)
            .count();
        let radius =
            self.config.combat.squad_spacing_offset * (1.5 - self.personality.cohesion.clamp(0.0, 1.0));
        rotate_about_up(DVec3::X, TAU * slot as f64 / n as f64) * radius
    }

    fn repath(&mut self) {
        let Some((dest, gait)) = self.fsm.destination() else {
            return;
        };
        let angle = self.rng.gen_range(0.0..TAU);
        let dist = self.rng.gen_range(0.0..=self.config.combat.stuck_repath_jitter.max(0.0));
        let jittered = dest.offset(rotate_about_up(DVec3::X, angle), dist);
        tracing::debug!(agent = %self.id, "stuck, re-pathing");
        self.out.events.push(TacticalEvent::Repath {
            agent: self.id,
            destination: jittered,
        });
        self.move_to(jittered, gait);
    }

    fn move_to(&mut self, destination: Position, gait: Gait) {
        self.fsm.set_destination(destination, gait);
        self.out.intents.push(Intent::MoveTo { destination, gait });
    }

    fn halt(&mut self) {
        self.fsm.clear_destination();
        self.out.intents.push(Intent::Halt);
    }
}
