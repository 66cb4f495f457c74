//! Threat selection with switch hysteresis.

use skirmish_core::components::Personality;
use skirmish_core::config::ThreatConfig;
use skirmish_core::types::{AgentId, Position};

/// A potential target as reported by perception.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatCandidate {
    pub id: AgentId,
    pub position: Position,
    pub alive: bool,
    pub hostile: bool,
    /// In line of sight right now.
    pub visible: bool,
    /// Last time the candidate was seen, if ever.
    pub last_seen: Option<f64>,
    pub health_ratio: f64,
}

/// One scored candidate from a single evaluation.
#[derive(Debug, Clone, Copy)]
pub struct ThreatRecord {
    pub id: AgentId,
    pub distance: f64,
    pub visible: bool,
    pub last_seen: Option<f64>,
    pub score: f64,
}

/// Result of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetChange {
    Unchanged,
    Acquired(AgentId),
    Switched { from: AgentId, to: AgentId },
    Lost(AgentId),
}

/// Score one candidate. Out-of-range candidates score negative infinity.
pub fn score_candidate(
    config: &ThreatConfig,
    caution: f64,
    observer: &Position,
    candidate: &ThreatCandidate,
    now: f64,
) -> f64 {
    let distance = observer.range_to(&candidate.position);
    if distance > config.max_scan_distance {
        return f64::NEG_INFINITY;
    }
    let mut score = (config.max_scan_distance - distance).clamp(0.0, config.max_scan_distance);
    if candidate.visible {
        score += config.visibility_bonus;
    }
    if candidate
        .last_seen
        .is_some_and(|t| now - t <= config.recency_window_secs)
    {
        score += config.recency_bonus;
    }
    if caution > config.caution_threshold && candidate.visible {
        score += config.caution_bonus;
    }
    score
}

/// Score every live hostile candidate. Excluded candidates are dropped.
pub fn score_all(
    config: &ThreatConfig,
    caution: f64,
    observer: &Position,
    candidates: &[ThreatCandidate],
    now: f64,
) -> Vec<ThreatRecord> {
    candidates
        .iter()
        .filter(|c| c.alive && c.hostile)
        .filter_map(|c| {
            let score = score_candidate(config, caution, observer, c, now);
            score.is_finite().then(|| ThreatRecord {
                id: c.id,
                distance: observer.range_to(&c.position),
                visible: c.visible,
                last_seen: c.last_seen,
                score,
            })
        })
        .collect()
}

/// Per-agent target selector.
#[derive(Debug, Clone)]
pub struct ThreatSelector {
    current: Option<AgentId>,
    last_switch: f64,
    last_scan: Option<f64>,
    /// Number of candidates scored in the last scan.
    known: usize,
}

impl Default for ThreatSelector {
    fn default() -> Self {
        Self {
            current: None,
            last_switch: f64::NEG_INFINITY,
            last_scan: None,
            known: 0,
        }
    }
}

impl ThreatSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_target(&self) -> Option<AgentId> {
        self.current
    }

    /// Enemies scored in the most recent scan.
    pub fn known_enemies(&self) -> usize {
        self.known
    }

    pub fn reset_target(&mut self) {
        self.current = None;
        self.last_switch = f64::NEG_INFINITY;
    }

    fn switch_cooldown(config: &ThreatConfig, aggression: f64) -> f64 {
        let scale = 1.0 - config.aggression_cooldown_scale * aggression.clamp(0.0, 1.0);
        config.switch_cooldown_secs * scale.max(0.0)
    }

    /// Re-evaluate the target. Does nothing until the scan interval has
    /// elapsed since the previous scan.
    pub fn evaluate(
        &mut self,
        config: &ThreatConfig,
        personality: &Personality,
        observer: &Position,
        candidates: &[ThreatCandidate],
        now: f64,
    ) -> TargetChange {
        if let Some(last) = self.last_scan {
            if now - last < config.scan_interval_secs {
                return TargetChange::Unchanged;
            }
        }
        self.last_scan = Some(now);

        let records = score_all(config, personality.caution, observer, candidates, now);
        self.known = records.len();
        let best = records.iter().max_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then_with(|| b.id.cmp(&a.id))
        });

        let Some(current) = self.current else {
            return match best {
                Some(b) => {
                    self.current = Some(b.id);
                    self.last_switch = now;
                    TargetChange::Acquired(b.id)
                }
                None => TargetChange::Unchanged,
            };
        };

        let cooldown = Self::switch_cooldown(config, personality.aggression);
        let Some(current_record) = records.iter().find(|r| r.id == current) else {
            // Still alive but out of range: held until the cooldown runs out.
            let still_alive = candidates
                .iter()
                .any(|c| c.id == current && c.alive && c.hostile);
            if still_alive && now - self.last_switch <= cooldown {
                return TargetChange::Unchanged;
            }
            // Dead, gone, or out of range past the cooldown: start over.
            self.reset_target();
            return match best {
                Some(b) => {
                    self.current = Some(b.id);
                    self.last_switch = now;
                    TargetChange::Switched {
                        from: current,
                        to: b.id,
                    }
                }
                None => TargetChange::Lost(current),
            };
        };

        match best {
            Some(b)
                if b.id != current
                    && b.score > current_record.score + config.switch_threshold
                    && now - self.last_switch > cooldown =>
            {
                self.current = Some(b.id);
                self.last_switch = now;
                TargetChange::Switched {
                    from: current,
                    to: b.id,
                }
            }
            _ => TargetChange::Unchanged,
        }
    }
}
