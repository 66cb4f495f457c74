//! Personality presets.
//!
//! Consolidates per-archetype trait values so scenarios can spawn agents by
//! role instead of spelling out every scalar.

use skirmish_core::components::{Personality, PersonalityFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonalityPreset {
    /// Green recruit: cautious, panics easily, short engagement range.
    Rookie,
    /// Baseline soldier.
    Regular,
    /// Steady and accurate under fire.
    Veteran,
    /// Charges in and never panics from wounds.
    Berserker,
    /// Prefers concealed withdrawal routes.
    Stalker,
    /// Holds ground stubbornly.
    Holdout,
}

/// Get the personality for a given preset.
pub fn get_profile(preset: PersonalityPreset) -> Personality {
    match preset {
        PersonalityPreset::Rookie => Personality {
            aggression: 0.3,
            caution: 0.7,
            cohesion: 0.8,
            risk_tolerance: 0.2,
            accuracy_under_fire: 0.3,
            chaos_factor: 0.5,
            suppression_sensitivity: 0.8,
            engagement_range: 25.0,
            flags: PersonalityFlags::default(),
        },
        PersonalityPreset::Regular => Personality::default(),
        PersonalityPreset::Veteran => Personality {
            aggression: 0.6,
            caution: 0.65,
            cohesion: 0.6,
            risk_tolerance: 0.6,
            accuracy_under_fire: 0.8,
            chaos_factor: 0.1,
            suppression_sensitivity: 0.3,
            engagement_range: 45.0,
            flags: PersonalityFlags::default(),
        },
        PersonalityPreset::Berserker => Personality {
            aggression: 0.95,
            caution: 0.1,
            cohesion: 0.2,
            risk_tolerance: 0.9,
            accuracy_under_fire: 0.5,
            chaos_factor: 0.6,
            suppression_sensitivity: 0.1,
            engagement_range: 20.0,
            flags: PersonalityFlags {
                frenzied: true,
                ..PersonalityFlags::default()
            },
        },
        PersonalityPreset::Stalker => Personality {
            aggression: 0.4,
            caution: 0.8,
            cohesion: 0.3,
            risk_tolerance: 0.4,
            accuracy_under_fire: 0.7,
            chaos_factor: 0.15,
            suppression_sensitivity: 0.4,
            engagement_range: 50.0,
            flags: PersonalityFlags {
                silent_hunter: true,
                ..PersonalityFlags::default()
            },
        },
        PersonalityPreset::Holdout => Personality {
            aggression: 0.5,
            caution: 0.5,
            cohesion: 0.7,
            risk_tolerance: 0.8,
            accuracy_under_fire: 0.6,
            chaos_factor: 0.1,
            suppression_sensitivity: 0.3,
            engagement_range: 40.0,
            flags: PersonalityFlags {
                stubborn: true,
                ..PersonalityFlags::default()
            },
        },
    }
}
