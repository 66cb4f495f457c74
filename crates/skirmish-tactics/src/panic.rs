//! Panic handling: a longer fallback and composure-recovery cycle.

use skirmish_core::components::Personality;
use skirmish_core::config::PanicConfig;
use skirmish_core::enums::PanicCause;

#[derive(Debug, Clone)]
pub struct PanicHandler {
    panicking: bool,
    cause: Option<PanicCause>,
    started_at: f64,
    ended_at: Option<f64>,
    composure: f64,
}

impl Default for PanicHandler {
    fn default() -> Self {
        Self {
            panicking: false,
            cause: None,
            started_at: 0.0,
            ended_at: None,
            composure: 1.0,
        }
    }
}

/// Frenzied, stubborn and very aggressive agents shrug off direct causes.
pub fn is_unshakeable(personality: &Personality, config: &PanicConfig) -> bool {
    personality.flags.frenzied
        || personality.flags.stubborn
        || personality.aggression >= config.unshakeable_aggression
}

impl PanicHandler {
    pub fn is_panicking(&self) -> bool {
        self.panicking
    }

    pub fn composure(&self) -> f64 {
        self.composure
    }

    pub fn cause(&self) -> Option<PanicCause> {
        self.cause
    }

    /// How long the current episode has lasted, or zero.
    pub fn panic_duration(&self, now: f64) -> f64 {
        if self.panicking {
            (now - self.started_at).max(0.0)
        } else {
            0.0
        }
    }

    /// Start an episode if allowed. Returns true when one started.
    pub fn try_trigger(
        &mut self,
        cause: PanicCause,
        personality: &Personality,
        config: &PanicConfig,
        now: f64,
    ) -> bool {
        if self.panicking {
            return false;
        }
        if cause.is_direct() && is_unshakeable(personality, config) {
            return false;
        }
        if self
            .ended_at
            .is_some_and(|t| now - t < config.cooldown_secs)
        {
            return false;
        }
        self.panicking = true;
        self.cause = Some(cause);
        self.started_at = now;
        self.composure = 0.0;
        true
    }

    /// Advance by `dt` seconds. Returns true when the episode ended on this call.
    pub fn update(&mut self, config: &PanicConfig, now: f64, dt: f64) -> bool {
        if self.panicking {
            if now - self.started_at >= config.duration_secs {
                self.panicking = false;
                self.cause = None;
                self.ended_at = Some(now);
                return true;
            }
            return false;
        }
        if dt > 0.0 {
            self.composure = (self.composure + config.composure_recovery_rate * dt).min(1.0);
        }
        false
    }
}
