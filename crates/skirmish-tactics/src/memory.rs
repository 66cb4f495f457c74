//! Per-agent tactical memory: last enemy contact, cleared and contested areas.

use skirmish_core::config::MemoryConfig;
use skirmish_core::oracles::TacticalMemory;
use skirmish_core::types::Position;

#[derive(Debug, Clone, Copy)]
struct Area {
    center: Position,
    radius: f64,
    expires_at: f64,
}

impl Area {
    fn covers(&self, position: &Position, now: f64) -> bool {
        now < self.expires_at && self.center.horizontal_range_to(position) <= self.radius
    }
}

#[derive(Debug, Clone)]
pub struct AgentMemory {
    config: MemoryConfig,
    last_enemy: Option<(Position, f64)>,
    cleared: Vec<Area>,
    contested: Vec<Area>,
}

impl AgentMemory {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            config,
            last_enemy: None,
            cleared: Vec::new(),
            contested: Vec::new(),
        }
    }

    /// Forget the last contact.
    pub fn forget_enemy(&mut self) {
        self.last_enemy = None;
    }

    /// Time the last contact was recorded, if any.
    pub fn last_enemy_time(&self) -> Option<f64> {
        self.last_enemy.map(|(_, t)| t)
    }
}

impl Default for AgentMemory {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}

impl TacticalMemory for AgentMemory {
    fn record_enemy_position(&mut self, position: Position, now: f64) {
        self.last_enemy = Some((position, now));
        let expires_at = now + self.config.contested_memory_secs;
        self.contested.retain(|a| now < a.expires_at);
        // Refresh an overlapping area instead of stacking a new one.
        match self
            .contested
            .iter_mut()
            .find(|a| a.center.horizontal_range_to(&position) <= a.radius * 0.5)
        {
            Some(area) => {
                area.center = position;
                area.expires_at = expires_at;
            }
            None => self.contested.push(Area {
                center: position,
                radius: self.config.contested_radius,
                expires_at,
            }),
        }
    }

    fn recent_enemy_memory(&self, now: f64) -> Option<Position> {
        self.last_enemy
            .filter(|(_, t)| now - t <= self.config.enemy_memory_secs)
            .map(|(p, _)| p)
    }

    fn was_recently_cleared(&self, position: &Position, now: f64) -> bool {
        self.cleared.iter().any(|a| a.covers(position, now))
    }

    fn mark_cleared(&mut self, position: Position, now: f64) {
        self.cleared.retain(|a| now < a.expires_at);
        self.cleared.push(Area {
            center: position,
            radius: self.config.cleared_radius,
            expires_at: now + self.config.cleared_memory_secs,
        });
    }

    fn is_zone_unsafe(&self, position: &Position, now: f64) -> bool {
        self.contested.iter().any(|a| a.covers(position, now))
    }
}
