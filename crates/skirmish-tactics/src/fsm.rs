//! Combat state machine.
//!
//! [`evaluate`] is a pure function from a [`CombatContext`] to an optional
//! [`Transition`]. Side effects of entering a state (paths, broadcasts,
//! movement intents) belong to the brain. [`CombatStateMachine`] only keeps
//! the state, when it was entered and the active move target.

use skirmish_core::config::CombatConfig;
use skirmish_core::enums::{CombatState, Gait};
use skirmish_core::types::Position;

/// Inputs to one evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatContext {
    pub state: CombatState,
    pub elapsed_in_state_secs: f64,
    pub suppressed: bool,
    pub panicking: bool,
    /// A squadmate or an outside command asked for a fallback.
    pub fallback_requested: bool,
    /// Fresh damage left the agent wanting to heal.
    pub injured: bool,
    pub heard_sound: bool,
    pub echo_requested: bool,
    pub caution: f64,
    /// A live, healthy enemy is currently targeted.
    pub enemy_reported: bool,
    /// Distance to the last known enemy position.
    pub enemy_distance: Option<f64>,
    pub engagement_range: f64,
    /// Within the arrival radius of the active move target.
    pub arrived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionReason {
    Suppressed,
    Panicked,
    FallbackRequested,
    Injured,
    HeardSound,
    SquadEcho,
    EnemyReported,
    EnemyInRange,
    EnemyOutOfRange,
    ContactLost,
    InvestigateTimedOut,
    AreaCleared,
    ReachedFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: CombatState,
    pub reason: TransitionReason,
}

impl Transition {
    fn new(to: CombatState, reason: TransitionReason) -> Option<Self> {
        Some(Self { to, reason })
    }
}

/// Evaluate one agent. Only the suppression/panic override ignores the
/// minimum dwell time.
pub fn evaluate(ctx: &CombatContext, config: &CombatConfig) -> Option<Transition> {
    if ctx.state != CombatState::Fallback {
        if ctx.panicking {
            return Transition::new(CombatState::Fallback, TransitionReason::Panicked);
        }
        if ctx.suppressed {
            return Transition::new(CombatState::Fallback, TransitionReason::Suppressed);
        }
    }

    if ctx.elapsed_in_state_secs < config.min_state_duration_secs {
        return None;
    }

    if ctx.state != CombatState::Fallback {
        if ctx.fallback_requested {
            return Transition::new(CombatState::Fallback, TransitionReason::FallbackRequested);
        }
        if ctx.injured {
            return Transition::new(CombatState::Fallback, TransitionReason::Injured);
        }
    }

    match ctx.state {
        CombatState::Patrol => evaluate_patrol(ctx, config),
        CombatState::Investigate => evaluate_investigate(ctx, config),
        CombatState::Engage => evaluate_engage(ctx),
        CombatState::Attack => evaluate_attack(ctx, config),
        CombatState::Fallback => evaluate_fallback(ctx),
    }
}

fn evaluate_patrol(ctx: &CombatContext, config: &CombatConfig) -> Option<Transition> {
    if ctx.enemy_reported {
        return Transition::new(CombatState::Engage, TransitionReason::EnemyReported);
    }
    if ctx.heard_sound && ctx.caution > config.investigate_caution_threshold {
        return Transition::new(CombatState::Investigate, TransitionReason::HeardSound);
    }
    if ctx.echo_requested {
        return Transition::new(CombatState::Investigate, TransitionReason::SquadEcho);
    }
    None
}

fn evaluate_investigate(ctx: &CombatContext, config: &CombatConfig) -> Option<Transition> {
    if ctx.enemy_reported {
        return Transition::new(CombatState::Engage, TransitionReason::EnemyReported);
    }
    if ctx.arrived {
        return Transition::new(CombatState::Patrol, TransitionReason::AreaCleared);
    }
    if ctx.elapsed_in_state_secs >= config.investigate_timeout_secs {
        return Transition::new(CombatState::Patrol, TransitionReason::InvestigateTimedOut);
    }
    None
}

fn evaluate_engage(ctx: &CombatContext) -> Option<Transition> {
    match ctx.enemy_distance {
        None => Transition::new(CombatState::Patrol, TransitionReason::ContactLost),
        Some(d) if d < ctx.engagement_range => {
            Transition::new(CombatState::Attack, TransitionReason::EnemyInRange)
        }
        Some(_) => None,
    }
}

fn evaluate_attack(ctx: &CombatContext, config: &CombatConfig) -> Option<Transition> {
    match ctx.enemy_distance {
        None => Transition::new(CombatState::Patrol, TransitionReason::ContactLost),
        Some(d) if d > ctx.engagement_range * config.attack_range_hysteresis => {
            Transition::new(CombatState::Engage, TransitionReason::EnemyOutOfRange)
        }
        Some(_) => None,
    }
}

fn evaluate_fallback(ctx: &CombatContext) -> Option<Transition> {
    if ctx.suppressed || ctx.panicking || !ctx.arrived {
        return None;
    }
    let next = if ctx.enemy_distance.is_some() {
        CombatState::Engage
    } else {
        CombatState::Patrol
    };
    Transition::new(next, TransitionReason::ReachedFallback)
}

/// Per-agent state holder.
#[derive(Debug, Clone, Default)]
pub struct CombatStateMachine {
    state: CombatState,
    entered_at: f64,
    destination: Option<(Position, Gait)>,
    stuck_since: Option<f64>,
}

impl CombatStateMachine {
    pub fn new(now: f64) -> Self {
        Self {
            entered_at: now,
            ..Self::default()
        }
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn elapsed(&self, now: f64) -> f64 {
        (now - self.entered_at).max(0.0)
    }

    /// Enter `to`. Returns the previous state.
    pub fn transition(&mut self, to: CombatState, now: f64) -> CombatState {
        let previous = self.state;
        self.state = to;
        self.entered_at = now;
        self.destination = None;
        self.stuck_since = None;
        previous
    }

    pub fn destination(&self) -> Option<(Position, Gait)> {
        self.destination
    }

    pub fn set_destination(&mut self, destination: Position, gait: Gait) {
        self.destination = Some((destination, gait));
        self.stuck_since = None;
    }

    pub fn clear_destination(&mut self) {
        self.destination = None;
        self.stuck_since = None;
    }

    pub fn has_arrived(&self, position: &Position, radius: f64) -> bool {
        self.destination
            .is_some_and(|(d, _)| d.horizontal_range_to(position) <= radius)
    }

    /// Track low speed while a move target is active. Returns true once the
    /// agent has been stuck for `config.stuck_duration_secs`, then starts
    /// counting again.
    pub fn update_stuck(
        &mut self,
        position: &Position,
        speed: f64,
        config: &CombatConfig,
        now: f64,
    ) -> bool {
        if self.destination.is_none()
            || self.has_arrived(position, config.arrival_radius)
            || speed >= config.stuck_speed_threshold
        {
            self.stuck_since = None;
            return false;
        }
        let since = *self.stuck_since.get_or_insert(now);
        if now - since >= config.stuck_duration_secs {
            self.stuck_since = Some(now);
            return true;
        }
        false
    }
}
