//! Threat escalation: a one-shot, permanent hardening of an agent that has
//! been through enough.

use skirmish_core::components::{CombatTuning, Personality};
use skirmish_core::config::EscalationConfig;

/// Stress signals observed on one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct StressSignals {
    /// Length of the ongoing panic episode (seconds).
    pub panic_secs: f64,
    pub known_enemies: usize,
    pub squad_casualties: usize,
    pub squad_original_size: usize,
}

impl StressSignals {
    fn casualty_fraction(&self) -> f64 {
        if self.squad_original_size == 0 {
            return 0.0;
        }
        self.squad_casualties as f64 / self.squad_original_size as f64
    }
}

#[derive(Debug, Clone, Default)]
pub struct EscalationMonitor {
    escalated: bool,
}

impl EscalationMonitor {
    pub fn is_escalated(&self) -> bool {
        self.escalated
    }

    /// Whether any threshold is crossed.
    pub fn should_escalate(signals: &StressSignals, config: &EscalationConfig) -> bool {
        signals.panic_secs >= config.panic_secs
            || signals.known_enemies >= config.enemy_count
            || signals.casualty_fraction() >= config.casualty_fraction
    }

    /// Escalate once when a threshold is crossed. Returns true only on the
    /// call that escalates.
    pub fn observe(
        &mut self,
        signals: &StressSignals,
        config: &EscalationConfig,
        personality: &mut Personality,
        tuning: &mut CombatTuning,
    ) -> bool {
        if self.escalated || !Self::should_escalate(signals, config) {
            return false;
        }
        apply(config, personality, tuning);
        self.escalated = true;
        true
    }
}

fn apply(config: &EscalationConfig, personality: &mut Personality, tuning: &mut CombatTuning) {
    tuning.recoil_tolerance += config.recoil_tolerance_gain;
    tuning.detection_distance += config.detection_distance_gain;
    tuning.run_on_damage_chance = (tuning.run_on_damage_chance + config.run_on_damage_gain).min(1.0);
    personality.aggression = (personality.aggression + config.aggression_gain).min(1.0);
    personality.accuracy_under_fire =
        (personality.accuracy_under_fire + config.accuracy_gain).min(1.0);
    personality.caution = (personality.caution - config.caution_drop).max(0.0);
    personality.suppression_sensitivity =
        (personality.suppression_sensitivity - config.suppression_sensitivity_drop).max(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalates_once() {
        let config = EscalationConfig::default();
        let mut p = Personality::default();
        let mut t = CombatTuning::default();
        let mut m = EscalationMonitor::default();
        let calm = StressSignals {
            known_enemies: 2,
            squad_casualties: 1,
            squad_original_size: 4,
            ..StressSignals::default()
        };
        assert!(!m.observe(&calm, &config, &mut p, &mut t));

        let swarmed = StressSignals {
            known_enemies: 3,
            ..calm
        };
        assert!(m.observe(&swarmed, &config, &mut p, &mut t));
        assert!((p.aggression - 0.7).abs() < 1e-9);
        assert!((p.caution - 0.3).abs() < 1e-9);
        assert!((t.detection_distance - 110.0).abs() < 1e-9);

        let before = p.clone();
        assert!(!m.observe(&swarmed, &config, &mut p, &mut t));
        assert_eq!(p, before, "escalation applies once");
    }

    #[test]
    fn test_casualty_and_panic_thresholds() {
        let config = EscalationConfig::default();
        let losses = StressSignals {
            squad_casualties: 2,
            squad_original_size: 4,
            ..StressSignals::default()
        };
        assert!(EscalationMonitor::should_escalate(&losses, &config));
        let long_panic = StressSignals {
            panic_secs: 3.0,
            ..StressSignals::default()
        };
        assert!(EscalationMonitor::should_escalate(&long_panic, &config));
        assert!(!EscalationMonitor::should_escalate(
            &StressSignals::default(),
            &config
        ));
    }
}
