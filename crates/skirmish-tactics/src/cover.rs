//! Cover scoring.
//!
//! Pure functions: given a candidate position and the direction toward the
//! threat, cast a handful of short rays and turn what they hit into a
//! desirability score in `[min_score, max_score]`.

use glam::DVec3;

use skirmish_core::config::CoverConfig;
use skirmish_core::oracles::{RayHit, Raycaster};
use skirmish_core::types::{horizontal, rotate_about_up, Position};

/// Whether a hit counts as cover. Triggers, see-through or soft materials
/// and very thin colliders do not.
pub fn is_solid_cover(hit: &RayHit, config: &CoverConfig) -> bool {
    !hit.is_trigger && hit.material.stops_fire() && hit.thickness >= config.min_thickness
}

fn ray_origin(candidate: &Position, config: &CoverConfig) -> Position {
    Position::new(candidate.x, candidate.y, candidate.z + config.ray_height)
}

fn probe(
    raycaster: &dyn Raycaster,
    config: &CoverConfig,
    candidate: &Position,
    direction: DVec3,
    length: f64,
) -> bool {
    raycaster
        .first_hit(&ray_origin(candidate, config), direction, length, &|hit| {
            is_solid_cover(hit, config)
        })
        .is_some()
}

/// Whether nothing solid stands between the candidate and the threat
/// within the frontal probe.
pub fn is_exposed(
    raycaster: &dyn Raycaster,
    config: &CoverConfig,
    candidate: &Position,
    threat_direction: DVec3,
) -> bool {
    let toward = horizontal(threat_direction);
    if toward == DVec3::ZERO {
        return true;
    }
    !probe(raycaster, config, candidate, toward, config.front_probe)
}

/// Score `candidate` for an agent standing at `origin` with the threat
/// along `threat_direction` (pointing from the agent toward the threat).
pub fn score_cover(
    raycaster: &dyn Raycaster,
    config: &CoverConfig,
    origin: &Position,
    candidate: &Position,
    threat_direction: DVec3,
) -> f64 {
    let toward = horizontal(threat_direction);
    let mut score = config.min_score;

    if toward != DVec3::ZERO {
        if probe(raycaster, config, candidate, -toward, config.back_probe) {
            score += config.back_bonus;
        }
        if !probe(raycaster, config, candidate, toward, config.front_probe) {
            score -= config.front_penalty;
        }
        for angle in &config.flank_angles_deg {
            let dir = rotate_about_up(toward, angle.to_radians());
            if probe(raycaster, config, candidate, dir, config.flank_probe) {
                score += config.flank_bonus;
            }
        }
    }

    let excess = (origin.horizontal_range_to(candidate) - config.ideal_distance).max(0.0);
    score -= (excess * config.distance_penalty_per_m).min(config.distance_penalty_cap);

    clamp_score(score, config)
}

/// Clamp into the configured range. A misconfigured range collapses to
/// `min_score` instead of panicking.
fn clamp_score(score: f64, config: &CoverConfig) -> f64 {
    if score.is_nan() || config.min_score > config.max_score {
        return config.min_score;
    }
    score.clamp(config.min_score, config.max_score)
}
