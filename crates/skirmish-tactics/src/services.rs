//! Collaborators injected into every brain.

use std::sync::Arc;

use skirmish_core::enums::VoiceTrigger;
use skirmish_core::oracles::{DangerZoneStore, NavigationOracle, Raycaster, VoiceNotifier};
use skirmish_core::types::AgentId;

use crate::retreat::RetreatPathCache;
use crate::scheduler::EventScheduler;
use crate::squad::SquadRegistry;

/// Shared services. Every one is optional: a missing service degrades the
/// behavior that needs it and is otherwise skipped.
#[derive(Clone, Default)]
pub struct TacticalServices {
    pub navigation: Option<Arc<dyn NavigationOracle>>,
    pub raycaster: Option<Arc<dyn Raycaster>>,
    pub danger_zones: Option<Arc<dyn DangerZoneStore>>,
    pub squads: Option<Arc<SquadRegistry>>,
    pub path_cache: Option<Arc<RetreatPathCache>>,
    pub voice: Option<Arc<dyn VoiceNotifier>>,
    pub scheduler: Option<Arc<EventScheduler>>,
}

impl TacticalServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_navigation(mut self, navigation: Arc<dyn NavigationOracle>) -> Self {
        self.navigation = Some(navigation);
        self
    }

    pub fn with_raycaster(mut self, raycaster: Arc<dyn Raycaster>) -> Self {
        self.raycaster = Some(raycaster);
        self
    }

    pub fn with_danger_zones(mut self, store: Arc<dyn DangerZoneStore>) -> Self {
        self.danger_zones = Some(store);
        self
    }

    pub fn with_squads(mut self, squads: Arc<SquadRegistry>) -> Self {
        self.squads = Some(squads);
        self
    }

    pub fn with_path_cache(mut self, cache: Arc<RetreatPathCache>) -> Self {
        self.path_cache = Some(cache);
        self
    }

    pub fn with_voice(mut self, voice: Arc<dyn VoiceNotifier>) -> Self {
        self.voice = Some(voice);
        self
    }

    pub fn with_scheduler(mut self, scheduler: Arc<EventScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn say(&self, agent: AgentId, trigger: VoiceTrigger) {
        if let Some(voice) = &self.voice {
            voice.say(agent, trigger);
        }
    }

    /// Once-per-tick housekeeping of shared stores.
    pub fn maintain(&self, now: f64) {
        if let Some(cache) = &self.path_cache {
            cache.maintain(now);
        }
    }
}
