//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs ECS world and the shared tactical
//! services, processes queued commands, runs all systems and produces
//! `SimSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use skirmish_core::commands::AgentCommand;
use skirmish_core::components::Dead;
use skirmish_core::config::TacticsConfig;
use skirmish_core::enums::{Faction, PanicCause, ScenarioId};
use skirmish_core::error::TacticsResult;
use skirmish_core::events::TacticalEvent;
use skirmish_core::oracles::DangerZoneStore;
use skirmish_core::state::SimSnapshot;
use skirmish_core::types::{AgentId, MapId, Position, SimTime, SquadId};
use skirmish_tactics::brain::TacticalBrain;
use skirmish_tactics::danger::DangerZoneRegistry;
use skirmish_tactics::profiles::PersonalityPreset;
use skirmish_tactics::retreat::RetreatPathCache;
use skirmish_tactics::scheduler::EventScheduler;
use skirmish_tactics::services::TacticalServices;
use skirmish_tactics::squad::SquadRegistry;
use skirmish_tactics::voice::TracingVoice;
use skirmish_terrain::{GridNavigator, ObstacleField};

use crate::scenario::{self, ScenarioLayout};
use crate::systems;
use crate::work_queue::{WorkQueue, WorkSender};
use crate::world_setup::{self, AgentSpawn};

/// Session parameters; every field falls back to its default when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Master seed. Identical seeds replay identically.
    pub seed: u64,
    pub tactics: TacticsConfig,
    pub scenario: ScenarioId,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tactics: TacticsConfig::default(),
            scenario: ScenarioId::default(),
        }
    }
}

/// Headless skirmish driver. Owns the ECS world and the tactical services its brains share.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    seed: u64,
    rng: ChaCha8Rng,
    layout: ScenarioLayout,
    tactics: Arc<TacticsConfig>,
    terrain: Arc<ObstacleField>,
    services: TacticalServices,
    danger: Arc<DangerZoneRegistry>,
    squads: Arc<SquadRegistry>,
    scheduler: Arc<EventScheduler>,
    agents: BTreeMap<AgentId, Entity>,
    next_agent_id: u32,
    command_queue: VecDeque<AgentCommand>,
    work_queue: WorkQueue,
    gunfire: Vec<(AgentId, Position)>,
    events: Vec<TacticalEvent>,
    despawn_buffer: Vec<Entity>,
}

impl SimulationEngine {
    /// Create an engine and spawn the scenario's squads.
    /// Fails only when the tactics configuration is inconsistent.
    pub fn new(config: SimConfig) -> TacticsResult<Self> {
        config.tactics.validate()?;

        let layout = scenario::build_layout(config.scenario);
        let tactics = Arc::new(config.tactics);
        let terrain = Arc::new(layout.obstacles.clone());
        let navigator = Arc::new(GridNavigator::new(layout.nav_grid()));
        let danger = Arc::new(DangerZoneRegistry::new(tactics.danger.clone()));
        let squads = Arc::new(SquadRegistry::new());
        let scheduler = Arc::new(EventScheduler::new());
        let services = TacticalServices::new()
            .with_navigation(navigator)
            .with_raycaster(terrain.clone())
            .with_danger_zones(danger.clone())
            .with_squads(squads.clone())
            .with_path_cache(Arc::new(RetreatPathCache::new(&tactics.retreat)))
            .with_voice(Arc::new(TracingVoice))
            .with_scheduler(scheduler.clone());

        let mut world = World::new();
        let mut next_agent_id = 1;
        let agents = world_setup::populate(
            &mut world,
            &layout,
            &tactics,
            &services,
            config.seed,
            &mut next_agent_id,
        )
        .into_iter()
        .collect();

        tracing::info!(scenario = layout.name, seed = config.seed, "simulation started");

        Ok(Self {
            world,
            time: SimTime::default(),
            seed: config.seed,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            layout,
            tactics,
            terrain,
            services,
            danger,
            squads,
            scheduler,
            agents,
            next_agent_id,
            command_queue: VecDeque::new(),
            work_queue: WorkQueue::new(),
            gunfire: Vec::new(),
            events: Vec::new(),
            despawn_buffer: Vec::new(),
        })
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: AgentCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue a batch of commands in order.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = AgentCommand>) {
        self.command_queue.extend(commands);
    }

    /// Handle for submitting world mutations from other threads.
    pub fn work_sender(&self) -> WorkSender {
        self.work_queue.sender()
    }

    /// Step one fixed tick: commands, queued jobs, systems, then the snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        let now = self.time.elapsed_secs;
        self.process_commands(now);
        self.work_queue.drain(&mut self.world);
        self.run_systems(now);
        self.time.advance();

        let events = std::mem::take(&mut self.events);
        let zones = self.danger.zones_for_map(self.layout.map, now);
        systems::snapshot::build_snapshot(&self.world, &self.time, self.layout.map, zones, events)
    }

    /// Spawn an extra agent mid-session. Returns its id.
    pub fn spawn_agent(
        &mut self,
        faction: Faction,
        squad: SquadId,
        position: Position,
        preset: PersonalityPreset,
    ) -> AgentId {
        let id = AgentId(self.next_agent_id);
        self.next_agent_id += 1;
        let spawn = AgentSpawn {
            id,
            faction,
            squad,
            map: self.layout.map,
            position,
            heading: 0.0,
            preset,
            objective: None,
        };
        let entity =
            world_setup::spawn_agent(&mut self.world, &spawn, &self.tactics, &self.services, self.seed);
        self.agents.insert(id, entity);
        id
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn map(&self) -> MapId {
        self.layout.map
    }

    pub fn scenario_name(&self) -> &'static str {
        self.layout.name
    }

    /// The ECS world, read-only.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn services(&self) -> &TacticalServices {
        &self.services
    }

    pub fn squads(&self) -> &SquadRegistry {
        &self.squads
    }

    pub fn scheduler(&self) -> &EventScheduler {
        &self.scheduler
    }

    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    /// Read an agent's brain.
    pub fn with_brain<R>(&self, agent: AgentId, f: impl FnOnce(&TacticalBrain) -> R) -> Option<R> {
        let entity = *self.agents.get(&agent)?;
        let brain = self.world.get::<&TacticalBrain>(entity).ok()?;
        Some(f(&brain))
    }

    fn process_commands(&mut self, now: f64) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command, now);
        }
    }

    fn handle_command(&mut self, command: AgentCommand, now: f64) {
        let services = &self.services;
        match command {
            AgentCommand::NotifyDamaged {
                agent,
                amount,
                from,
            } => {
                if let Some(&entity) = self.agents.get(&agent) {
                    systems::combat::apply_damage(&mut self.world, services, entity, amount, from, now);
                }
            }
            AgentCommand::TriggerFallback { agent, point } => {
                if let Some(mut brain) = brain_mut(&self.world, &self.agents, agent) {
                    brain.trigger_fallback(point);
                }
            }
            AgentCommand::TriggerSuppression { agent, from } => {
                if let Some(mut brain) = brain_mut(&self.world, &self.agents, agent) {
                    brain.trigger_suppression(from, services, now);
                }
            }
            AgentCommand::TriggerPanic { agent } => {
                if let Some(mut brain) = brain_mut(&self.world, &self.agents, agent) {
                    brain.trigger_panic(PanicCause::Forced, services, now);
                }
            }
            AgentCommand::NotifyEchoInvestigate { agent, point } => {
                if let Some(mut brain) = brain_mut(&self.world, &self.agents, agent) {
                    brain.notify_echo_investigate(point);
                }
            }
            AgentCommand::NotifyBlinded { agent } => {
                if let Some(mut brain) = brain_mut(&self.world, &self.agents, agent) {
                    brain.notify_blinded(services, now);
                }
            }
            AgentCommand::NotifySound { agent, position } => {
                if let Some(mut brain) = brain_mut(&self.world, &self.agents, agent) {
                    brain.notify_sound(position, now);
                }
            }
            AgentCommand::SetSquadPoint { squad, kind, point } => {
                self.squads.set_point(squad, kind, point);
            }
            AgentCommand::Kill { agent } => {
                if let Some(&entity) = self.agents.get(&agent) {
                    let _ = self.world.insert_one(entity, Dead);
                }
            }
            AgentCommand::Despawn { agent } => {
                systems::cleanup::despawn_agent(&mut self.world, &mut self.agents, services, agent);
            }
        }
    }

    /// Fixed system order for one tick.
    fn run_systems(&mut self, now: f64) {
        // 1. Shared store housekeeping
        self.services.maintain(now);
        // 2. Scheduled squad deliveries
        systems::delivery::run(&mut self.world, &self.agents, &self.scheduler, &self.services, now);
        // 3. Perception
        systems::perception::run(&mut self.world, &self.terrain, &self.gunfire, now);
        // 4. Brains
        systems::tactics::run(&mut self.world, &self.services, now, &mut self.events);
        // 5. Fire resolution
        systems::combat::run(
            &mut self.world,
            &self.agents,
            &self.terrain,
            &self.services,
            &mut self.rng,
            now,
            &mut self.gunfire,
        );
        // 6. Locomotion
        systems::movement::run(&mut self.world, &self.terrain);
        // 7. Casualties
        systems::cleanup::run(
            &mut self.world,
            &mut self.agents,
            &self.services,
            self.layout.map,
            now,
            &mut self.events,
            &mut self.despawn_buffer,
        );
    }
}

fn brain_mut<'a>(
    world: &'a World,
    agents: &BTreeMap<AgentId, Entity>,
    agent: AgentId,
) -> Option<hecs::RefMut<'a, TacticalBrain>> {
    let Some(&entity) = agents.get(&agent) else {
        tracing::debug!(%agent, "command for unknown agent ignored");
        return None;
    };
    world.get::<&mut TacticalBrain>(entity).ok()
}
