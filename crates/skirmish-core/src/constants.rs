//! Simulation constants and tuning parameters.
//!
//! Every value here is the default for the matching field of
//! [`TacticsConfig`](crate::config::TacticsConfig).

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Threat selection ---

/// Minimum interval between two threat scans (seconds).
pub const THREAT_SCAN_INTERVAL_SECS: f64 = 0.35;

/// Candidates beyond this range are excluded (meters).
pub const MAX_SCAN_DISTANCE: f64 = 120.0;

/// Score bonus for a currently visible candidate.
pub const THREAT_VISIBILITY_BONUS: f64 = 25.0;

/// Score bonus for a candidate seen recently.
pub const THREAT_RECENCY_BONUS: f64 = 10.0;

/// Window for the recency bonus (seconds).
pub const THREAT_RECENCY_WINDOW_SECS: f64 = 2.0;

/// Score bonus for cautious agents watching a visible candidate.
pub const THREAT_CAUTION_BONUS: f64 = 5.0;

/// Caution trait above which the caution bonus applies.
pub const THREAT_CAUTION_THRESHOLD: f64 = 0.6;

/// Margin a challenger must beat the current target by.
pub const TARGET_SWITCH_THRESHOLD: f64 = 10.0;

/// Minimum time between target switches (seconds).
pub const TARGET_SWITCH_COOLDOWN_SECS: f64 = 2.0;

/// Fraction of the switch cooldown removed at aggression 1.0.
pub const TARGET_SWITCH_AGGRESSION_SCALE: f64 = 0.5;

// --- Combat state machine ---

/// Minimum dwell time between evaluated transitions (seconds).
pub const MIN_STATE_DURATION_SECS: f64 = 1.0;

/// Caution above which a heard sound triggers investigation.
pub const INVESTIGATE_CAUTION_THRESHOLD: f64 = 0.4;

/// How long a heard sound stays "recent" (seconds).
pub const SOUND_MEMORY_SECS: f64 = 4.0;

/// Investigate gives up after this long without re-acquisition (seconds).
pub const INVESTIGATE_TIMEOUT_SECS: f64 = 8.0;

/// Attack drops back to Engage beyond this multiple of engagement range.
pub const ATTACK_RANGE_HYSTERESIS: f64 = 1.25;

/// Health ratio below which an enemy no longer counts as healthy.
pub const ENEMY_HEALTHY_RATIO: f64 = 0.05;

/// Arrival radius for fallback and investigate destinations (meters).
pub const ARRIVAL_RADIUS: f64 = 2.0;

/// Radius of the squad spacing offset around a shared fallback point (meters).
pub const SQUAD_SPACING_OFFSET: f64 = 2.5;

/// Squadmates farther than this do not receive a fallback echo (meters).
pub const ECHO_RADIUS: f64 = 30.0;

/// Probability that a fallback is echoed to the squad.
pub const ECHO_PROBABILITY: f64 = 0.6;

/// Shared per-squad cooldown between echoes (seconds).
pub const ECHO_COOLDOWN_SECS: f64 = 3.0;

/// Speed under which an agent with a move target counts as stuck (m/s).
pub const STUCK_SPEED_THRESHOLD: f64 = 0.15;

/// How long an agent must be stuck before re-pathing (seconds).
pub const STUCK_DURATION_SECS: f64 = 1.5;

/// Maximum random displacement of a stuck re-path (meters).
pub const STUCK_REPATH_JITTER: f64 = 2.0;

// --- Suppression ---

/// How long a suppression episode lasts (seconds).
pub const SUPPRESSION_DURATION_SECS: f64 = 2.0;

/// Cooldown after an episode before another can start (seconds).
pub const SUPPRESSION_COOLDOWN_SECS: f64 = 1.0;

/// Distance of the fallback point when no planner is available (meters).
pub const SUPPRESSION_FALLBACK_DISTANCE: f64 = 6.0;

// --- Panic ---

/// Health ratio under which damage triggers panic.
pub const PANIC_HEALTH_THRESHOLD: f64 = 0.3;

/// How long a panic episode lasts (seconds).
pub const PANIC_DURATION_SECS: f64 = 3.5;

/// Cooldown after an episode before another can start (seconds).
pub const PANIC_COOLDOWN_SECS: f64 = 5.0;

/// Composure regained per second after an episode.
pub const COMPOSURE_RECOVERY_RATE: f64 = 0.2;

/// Aggression at or above which direct panic causes are ignored.
pub const UNSHAKEABLE_AGGRESSION: f64 = 0.9;

// --- Cover scoring ---

/// Lower bound of a cover score.
pub const COVER_MIN_SCORE: f64 = 1.0;

/// Upper bound of a cover score. A candidate enclosed on every probed side
/// reaches it with the default bonuses: base + back + every flank.
pub const COVER_MAX_SCORE: f64 =
    COVER_MIN_SCORE + COVER_BACK_BONUS + COVER_FLANK_BONUS * COVER_FLANK_ANGLES_DEG.len() as f64;

/// Bonus for solid cover behind the candidate.
pub const COVER_BACK_BONUS: f64 = 3.0;

/// Penalty for an open line toward the threat.
pub const COVER_FRONT_PENALTY: f64 = 2.0;

/// Bonus per flank ray that hits solid cover.
pub const COVER_FLANK_BONUS: f64 = 0.5;

/// Flank ray angles relative to the threat direction (degrees).
pub const COVER_FLANK_ANGLES_DEG: [f64; 4] = [-60.0, -30.0, 30.0, 60.0];

/// Probe length for the back ray (meters).
pub const COVER_BACK_PROBE: f64 = 3.0;

/// Probe length for the frontal ray (meters).
pub const COVER_FRONT_PROBE: f64 = 4.0;

/// Probe length for flank rays (meters).
pub const COVER_FLANK_PROBE: f64 = 3.0;

/// Height above the candidate at which rays are cast (meters).
pub const COVER_RAY_HEIGHT: f64 = 1.0;

/// Fallback distance that costs nothing (meters).
pub const COVER_IDEAL_DISTANCE: f64 = 12.0;

/// Penalty per meter beyond the ideal distance.
pub const COVER_DISTANCE_PENALTY_PER_M: f64 = 0.1;

/// Cap on the distance penalty.
pub const COVER_DISTANCE_PENALTY_CAP: f64 = 2.0;

/// Colliders thinner than this never count as cover (meters).
pub const COVER_MIN_THICKNESS: f64 = 0.15;

// --- Retreat planning ---

/// Number of sampled retreat directions.
pub const RETREAT_SAMPLE_COUNT: usize = 10;

/// Total arc the samples are spread over, centered on the reverse threat (degrees).
pub const RETREAT_SAMPLE_ARC_DEG: f64 = 180.0;

/// Retreat distance at risk tolerance 0 (meters).
pub const RETREAT_MAX_DISTANCE: f64 = 18.0;

/// Retreat distance at risk tolerance 1 (meters).
pub const RETREAT_MIN_DISTANCE: f64 = 8.0;

/// Search radius when projecting samples onto walkable ground (meters).
pub const RETREAT_WALKABLE_RADIUS: f64 = 3.0;

/// Candidates closer than this to a squadmate are discarded (meters).
pub const RETREAT_SQUAD_SPACING: f64 = 3.0;

/// Cover score floor in the candidate cost denominator.
pub const RETREAT_COVER_FLOOR: f64 = 0.5;

/// Zones within this multiple of their radius add a cost penalty.
pub const RETREAT_DANGER_INFLUENCE: f64 = 2.0;

/// Cost multiplier for exposed candidates picked by silent hunters.
pub const RETREAT_SNEAK_EXPOSED_FACTOR: f64 = 1.5;

/// Lifetime of a cached squad path (seconds).
pub const RETREAT_CACHE_TTL_SECS: f64 = 6.0;

/// The whole cache is flushed on this interval (seconds).
pub const RETREAT_CACHE_CLEAR_INTERVAL_SECS: f64 = 30.0;

// --- Squad coordination ---

/// Minimum interval between two coordinator ticks (seconds).
pub const SQUAD_TICK_INTERVAL_SECS: f64 = 0.5;

/// Lower bound of the danger propagation jitter (seconds).
pub const DANGER_JITTER_MIN_SECS: f64 = 0.1;

/// Upper bound of the danger propagation jitter (seconds).
pub const DANGER_JITTER_MAX_SECS: f64 = 0.4;

/// A panicking agent re-broadcasts only after moving this far (meters).
pub const REBROADCAST_MIN_MOVEMENT: f64 = 4.0;

/// Delay before a fallback echo reaches a squadmate (seconds).
pub const ECHO_DELAY_MIN_SECS: f64 = 0.2;

/// Upper bound of the echo delay (seconds).
pub const ECHO_DELAY_MAX_SECS: f64 = 0.8;

// --- Threat escalation ---

/// Panic lasting at least this long escalates (seconds).
pub const ESCALATION_PANIC_SECS: f64 = 3.0;

/// Known enemies at or above this count escalate.
pub const ESCALATION_ENEMY_COUNT: usize = 3;

/// Fraction of the original squad lost that escalates.
pub const ESCALATION_CASUALTY_FRACTION: f64 = 0.5;

// --- Danger zones ---

/// Radius of a panic danger zone (meters).
pub const DANGER_PANIC_RADIUS: f64 = 8.0;

/// Radius of a suppression danger zone (meters).
pub const DANGER_SUPPRESSION_RADIUS: f64 = 6.0;

/// Radius of a casualty danger zone (meters).
pub const DANGER_CASUALTY_RADIUS: f64 = 10.0;

/// Radius of an explosion danger zone (meters).
pub const DANGER_EXPLOSION_RADIUS: f64 = 12.0;

/// Lifetime of a danger zone before it expires (seconds).
pub const DANGER_ZONE_LIFETIME_SECS: f64 = 20.0;

// --- Tactical memory ---

/// How long a sighted enemy position is remembered (seconds).
pub const ENEMY_MEMORY_SECS: f64 = 20.0;

/// Radius of a cleared area (meters).
pub const CLEARED_RADIUS: f64 = 6.0;

/// How long an area stays cleared (seconds).
pub const CLEARED_MEMORY_SECS: f64 = 30.0;

/// Radius around a recent enemy sighting that is considered unsafe (meters).
pub const CONTESTED_RADIUS: f64 = 10.0;

/// How long a sighting keeps its surroundings unsafe (seconds).
pub const CONTESTED_MEMORY_SECS: f64 = 8.0;

// --- Locomotion (simulation driver) ---

/// Walking speed (m/s).
pub const WALK_SPEED: f64 = 1.6;

/// Sprinting speed (m/s).
pub const SPRINT_SPEED: f64 = 4.5;

/// Hearing range for gunfire (meters).
pub const GUNFIRE_HEARING_RANGE: f64 = 60.0;

/// Damage per second dealt by an attacking agent.
pub const ATTACK_DAMAGE_PER_SEC: f64 = 0.12;

/// Chance per second that an attacker pins its target down.
pub const ATTACK_SUPPRESS_CHANCE_PER_SEC: f64 = 0.35;
