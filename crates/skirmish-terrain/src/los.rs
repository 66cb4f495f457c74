//! Line-of-sight checks against an obstacle field.

use skirmish_core::oracles::Raycaster;
use skirmish_core::types::Position;

use crate::obstacles::ObstacleField;

/// True if nothing opaque and solid lies between `from` and `to`.
/// Trigger volumes and glass never block sight.
pub fn has_line_of_sight(field: &ObstacleField, from: &Position, to: &Position) -> bool {
    let distance = from.range_to(to);
    if distance < 1e-6 {
        return true;
    }
    let direction = (to.to_vec() - from.to_vec()).normalize_or_zero();
    field
        .first_hit(from, direction, distance, &|hit| {
            !hit.is_trigger && hit.material.is_opaque()
        })
        .is_none()
}
