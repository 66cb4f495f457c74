//! Suppression reaction: a short, time-boxed fallback impulse under fire.

use glam::DVec3;

use skirmish_core::config::SuppressionConfig;
use skirmish_core::types::{heading_to_direction, Position};

#[derive(Debug, Clone, Default)]
pub struct SuppressionReaction {
    active: bool,
    started_at: f64,
    ended_at: Option<f64>,
}

impl SuppressionReaction {
    pub fn is_suppressed(&self) -> bool {
        self.active
    }

    /// Whether a new episode may start now.
    pub fn can_trigger(&self, config: &SuppressionConfig, now: f64) -> bool {
        !self.active && self.ended_at.map_or(true, |t| now - t >= config.cooldown_secs)
    }

    pub fn begin(&mut self, now: f64) {
        self.active = true;
        self.started_at = now;
    }

    /// Clear an episode whose duration has elapsed. Returns true when it
    /// ended on this call.
    pub fn update(&mut self, config: &SuppressionConfig, now: f64) -> bool {
        if self.active && now - self.started_at >= config.duration_secs {
            self.active = false;
            self.ended_at = Some(now);
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.active = false;
    }
}

/// Direction from the agent toward the threat. Without a known source the
/// threat is assumed to be ahead, so the agent backs off against its facing.
pub fn threat_direction(origin: &Position, heading: f64, source: Option<&Position>) -> DVec3 {
    let ahead = heading_to_direction(heading);
    match source {
        Some(src) => {
            let dir = origin.direction_to(src);
            if dir == DVec3::ZERO {
                ahead
            } else {
                dir
            }
        }
        None => ahead,
    }
}

/// Fixed-distance point straight away from the threat.
pub fn fixed_fallback_point(origin: &Position, threat_direction: DVec3, distance: f64) -> Position {
    origin.offset(-threat_direction, distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_and_cooldown() {
        let config = SuppressionConfig::default();
        let mut s = SuppressionReaction::default();
        assert!(s.can_trigger(&config, 0.0));
        s.begin(0.0);
        assert!(s.is_suppressed());
        assert!(!s.can_trigger(&config, 0.5));
        assert!(!s.update(&config, 1.9));
        assert!(s.update(&config, 2.0));
        assert!(!s.is_suppressed());
        assert!(!s.can_trigger(&config, 2.5), "cooldown after the episode");
        assert!(s.can_trigger(&config, 3.0));
    }

    #[test]
    fn test_fixed_point_is_opposite_the_source() {
        let origin = Position::new(0.0, 0.0, 0.0);
        let dir = threat_direction(&origin, 0.0, Some(&Position::new(10.0, 0.0, 0.0)));
        let p = fixed_fallback_point(&origin, dir, 6.0);
        assert!((p.x + 6.0).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);

        let facing_north = threat_direction(&origin, 0.0, None);
        let p = fixed_fallback_point(&origin, facing_north, 6.0);
        assert!((p.y + 6.0).abs() < 1e-9);
    }
}
