//! Tunable parameters of the decision core, grouped by component.
//!
//! Every field defaults to the matching value in [`crate::constants`], so a
//! partial JSON document only needs to name what it overrides.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::DangerTrigger;
use crate::error::{TacticsError, TacticsResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticsConfig {
    pub threat: ThreatConfig,
    pub combat: CombatConfig,
    pub cover: CoverConfig,
    pub retreat: RetreatConfig,
    pub suppression: SuppressionConfig,
    pub panic: PanicConfig,
    pub squad: SquadConfig,
    pub escalation: EscalationConfig,
    pub danger: DangerConfig,
    pub memory: MemoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    pub scan_interval_secs: f64,
    pub max_scan_distance: f64,
    pub visibility_bonus: f64,
    pub recency_bonus: f64,
    pub recency_window_secs: f64,
    pub caution_bonus: f64,
    pub caution_threshold: f64,
    pub switch_threshold: f64,
    pub switch_cooldown_secs: f64,
    /// Fraction of the cooldown removed at aggression 1.0.
    pub aggression_cooldown_scale: f64,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: THREAT_SCAN_INTERVAL_SECS,
            max_scan_distance: MAX_SCAN_DISTANCE,
            visibility_bonus: THREAT_VISIBILITY_BONUS,
            recency_bonus: THREAT_RECENCY_BONUS,
            recency_window_secs: THREAT_RECENCY_WINDOW_SECS,
            caution_bonus: THREAT_CAUTION_BONUS,
            caution_threshold: THREAT_CAUTION_THRESHOLD,
            switch_threshold: TARGET_SWITCH_THRESHOLD,
            switch_cooldown_secs: TARGET_SWITCH_COOLDOWN_SECS,
            aggression_cooldown_scale: TARGET_SWITCH_AGGRESSION_SCALE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub min_state_duration_secs: f64,
    pub investigate_caution_threshold: f64,
    pub sound_memory_secs: f64,
    pub investigate_timeout_secs: f64,
    pub attack_range_hysteresis: f64,
    pub enemy_healthy_ratio: f64,
    pub arrival_radius: f64,
    pub squad_spacing_offset: f64,
    pub echo_radius: f64,
    pub echo_probability: f64,
    pub echo_cooldown_secs: f64,
    pub stuck_speed_threshold: f64,
    pub stuck_duration_secs: f64,
    pub stuck_repath_jitter: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            min_state_duration_secs: MIN_STATE_DURATION_SECS,
            investigate_caution_threshold: INVESTIGATE_CAUTION_THRESHOLD,
            sound_memory_secs: SOUND_MEMORY_SECS,
            investigate_timeout_secs: INVESTIGATE_TIMEOUT_SECS,
            attack_range_hysteresis: ATTACK_RANGE_HYSTERESIS,
            enemy_healthy_ratio: ENEMY_HEALTHY_RATIO,
            arrival_radius: ARRIVAL_RADIUS,
            squad_spacing_offset: SQUAD_SPACING_OFFSET,
            echo_radius: ECHO_RADIUS,
            echo_probability: ECHO_PROBABILITY,
            echo_cooldown_secs: ECHO_COOLDOWN_SECS,
            stuck_speed_threshold: STUCK_SPEED_THRESHOLD,
            stuck_duration_secs: STUCK_DURATION_SECS,
            stuck_repath_jitter: STUCK_REPATH_JITTER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    pub min_score: f64,
    pub max_score: f64,
    pub back_bonus: f64,
    pub front_penalty: f64,
    pub flank_bonus: f64,
    pub flank_angles_deg: Vec<f64>,
    pub back_probe: f64,
    pub front_probe: f64,
    pub flank_probe: f64,
    pub ray_height: f64,
    pub ideal_distance: f64,
    pub distance_penalty_per_m: f64,
    pub distance_penalty_cap: f64,
    pub min_thickness: f64,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            min_score: COVER_MIN_SCORE,
            max_score: COVER_MAX_SCORE,
            back_bonus: COVER_BACK_BONUS,
            front_penalty: COVER_FRONT_PENALTY,
            flank_bonus: COVER_FLANK_BONUS,
            flank_angles_deg: COVER_FLANK_ANGLES_DEG.to_vec(),
            back_probe: COVER_BACK_PROBE,
            front_probe: COVER_FRONT_PROBE,
            flank_probe: COVER_FLANK_PROBE,
            ray_height: COVER_RAY_HEIGHT,
            ideal_distance: COVER_IDEAL_DISTANCE,
            distance_penalty_per_m: COVER_DISTANCE_PENALTY_PER_M,
            distance_penalty_cap: COVER_DISTANCE_PENALTY_CAP,
            min_thickness: COVER_MIN_THICKNESS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetreatConfig {
    pub sample_count: usize,
    pub sample_arc_deg: f64,
    pub max_distance: f64,
    pub min_distance: f64,
    pub walkable_radius: f64,
    pub squad_spacing: f64,
    pub cover_floor: f64,
    pub danger_influence: f64,
    pub sneak_exposed_factor: f64,
    pub cache_ttl_secs: f64,
    pub cache_clear_interval_secs: f64,
}

impl Default for RetreatConfig {
    fn default() -> Self {
        Self {
            sample_count: RETREAT_SAMPLE_COUNT,
            sample_arc_deg: RETREAT_SAMPLE_ARC_DEG,
            max_distance: RETREAT_MAX_DISTANCE,
            min_distance: RETREAT_MIN_DISTANCE,
            walkable_radius: RETREAT_WALKABLE_RADIUS,
            squad_spacing: RETREAT_SQUAD_SPACING,
            cover_floor: RETREAT_COVER_FLOOR,
            danger_influence: RETREAT_DANGER_INFLUENCE,
            sneak_exposed_factor: RETREAT_SNEAK_EXPOSED_FACTOR,
            cache_ttl_secs: RETREAT_CACHE_TTL_SECS,
            cache_clear_interval_secs: RETREAT_CACHE_CLEAR_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuppressionConfig {
    pub duration_secs: f64,
    pub cooldown_secs: f64,
    pub fallback_distance: f64,
}

impl Default for SuppressionConfig {
    fn default() -> Self {
        Self {
            duration_secs: SUPPRESSION_DURATION_SECS,
            cooldown_secs: SUPPRESSION_COOLDOWN_SECS,
            fallback_distance: SUPPRESSION_FALLBACK_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanicConfig {
    pub health_threshold: f64,
    pub duration_secs: f64,
    pub cooldown_secs: f64,
    pub composure_recovery_rate: f64,
    pub unshakeable_aggression: f64,
}

impl Default for PanicConfig {
    fn default() -> Self {
        Self {
            health_threshold: PANIC_HEALTH_THRESHOLD,
            duration_secs: PANIC_DURATION_SECS,
            cooldown_secs: PANIC_COOLDOWN_SECS,
            composure_recovery_rate: COMPOSURE_RECOVERY_RATE,
            unshakeable_aggression: UNSHAKEABLE_AGGRESSION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquadConfig {
    pub tick_interval_secs: f64,
    pub danger_jitter_min_secs: f64,
    pub danger_jitter_max_secs: f64,
    pub rebroadcast_min_movement: f64,
    pub echo_delay_min_secs: f64,
    pub echo_delay_max_secs: f64,
}

impl Default for SquadConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: SQUAD_TICK_INTERVAL_SECS,
            danger_jitter_min_secs: DANGER_JITTER_MIN_SECS,
            danger_jitter_max_secs: DANGER_JITTER_MAX_SECS,
            rebroadcast_min_movement: REBROADCAST_MIN_MOVEMENT,
            echo_delay_min_secs: ECHO_DELAY_MIN_SECS,
            echo_delay_max_secs: ECHO_DELAY_MAX_SECS,
        }
    }
}

/// Escalation thresholds and the amounts each tuning value moves by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    pub panic_secs: f64,
    pub enemy_count: usize,
    pub casualty_fraction: f64,
    pub recoil_tolerance_gain: f64,
    pub detection_distance_gain: f64,
    pub run_on_damage_gain: f64,
    pub aggression_gain: f64,
    pub accuracy_gain: f64,
    pub caution_drop: f64,
    pub suppression_sensitivity_drop: f64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            panic_secs: ESCALATION_PANIC_SECS,
            enemy_count: ESCALATION_ENEMY_COUNT,
            casualty_fraction: ESCALATION_CASUALTY_FRACTION,
            recoil_tolerance_gain: 0.25,
            detection_distance_gain: 20.0,
            run_on_damage_gain: 0.15,
            aggression_gain: 0.2,
            accuracy_gain: 0.15,
            caution_drop: 0.2,
            suppression_sensitivity_drop: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DangerConfig {
    pub panic_radius: f64,
    pub suppression_radius: f64,
    pub casualty_radius: f64,
    pub explosion_radius: f64,
    pub lifetime_secs: f64,
}

impl Default for DangerConfig {
    fn default() -> Self {
        Self {
            panic_radius: DANGER_PANIC_RADIUS,
            suppression_radius: DANGER_SUPPRESSION_RADIUS,
            casualty_radius: DANGER_CASUALTY_RADIUS,
            explosion_radius: DANGER_EXPLOSION_RADIUS,
            lifetime_secs: DANGER_ZONE_LIFETIME_SECS,
        }
    }
}

impl DangerConfig {
    pub fn radius_for(&self, trigger: DangerTrigger) -> f64 {
        match trigger {
            DangerTrigger::Panic => self.panic_radius,
            DangerTrigger::Suppression => self.suppression_radius,
            DangerTrigger::Casualty => self.casualty_radius,
            DangerTrigger::Explosion => self.explosion_radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub enemy_memory_secs: f64,
    pub cleared_radius: f64,
    pub cleared_memory_secs: f64,
    pub contested_radius: f64,
    pub contested_memory_secs: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enemy_memory_secs: ENEMY_MEMORY_SECS,
            cleared_radius: CLEARED_RADIUS,
            cleared_memory_secs: CLEARED_MEMORY_SECS,
            contested_radius: CONTESTED_RADIUS,
            contested_memory_secs: CONTESTED_MEMORY_SECS,
        }
    }
}

impl TacticsConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json_str(json: &str) -> TacticsResult<Self> {
        let config: TacticsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> TacticsResult<()> {
        let durations = [
            ("threat.scan_interval_secs", self.threat.scan_interval_secs),
            ("threat.switch_cooldown_secs", self.threat.switch_cooldown_secs),
            ("combat.min_state_duration_secs", self.combat.min_state_duration_secs),
            ("combat.investigate_timeout_secs", self.combat.investigate_timeout_secs),
            ("combat.echo_cooldown_secs", self.combat.echo_cooldown_secs),
            ("combat.stuck_duration_secs", self.combat.stuck_duration_secs),
            ("suppression.duration_secs", self.suppression.duration_secs),
            ("suppression.cooldown_secs", self.suppression.cooldown_secs),
            ("panic.duration_secs", self.panic.duration_secs),
            ("panic.cooldown_secs", self.panic.cooldown_secs),
            ("retreat.cache_ttl_secs", self.retreat.cache_ttl_secs),
            ("retreat.cache_clear_interval_secs", self.retreat.cache_clear_interval_secs),
            ("squad.tick_interval_secs", self.squad.tick_interval_secs),
            ("danger.lifetime_secs", self.danger.lifetime_secs),
            ("memory.enemy_memory_secs", self.memory.enemy_memory_secs),
        ];
        for (name, value) in durations {
            if value.is_nan() || value < 0.0 {
                return Err(TacticsError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        if self.cover.min_score > self.cover.max_score {
            return Err(TacticsError::InvalidConfig(format!(
                "cover.min_score ({}) exceeds cover.max_score ({})",
                self.cover.min_score, self.cover.max_score
            )));
        }
        if self.retreat.sample_count == 0 {
            return Err(TacticsError::InvalidConfig(
                "retreat.sample_count must be at least 1".into(),
            ));
        }
        if self.retreat.cover_floor <= 0.0 {
            return Err(TacticsError::InvalidConfig(
                "retreat.cover_floor must be positive".into(),
            ));
        }
        if self.squad.danger_jitter_min_secs > self.squad.danger_jitter_max_secs
            || self.squad.echo_delay_min_secs > self.squad.echo_delay_max_secs
        {
            return Err(TacticsError::InvalidConfig(
                "squad jitter bounds are inverted".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.combat.echo_probability) {
            return Err(TacticsError::InvalidConfig(format!(
                "combat.echo_probability must be in [0, 1], got {}",
                self.combat.echo_probability
            )));
        }
        Ok(())
    }
}
