//! Tests for the simulation engine, command handling and scheduled delivery.

use skirmish_core::commands::AgentCommand;
use skirmish_core::components::Vitals;
use skirmish_core::enums::*;
use skirmish_core::events::TacticalEvent;
use skirmish_core::oracles::GroupRegistry;
use skirmish_core::state::SimSnapshot;
use skirmish_core::types::{AgentId, Position, SquadId};
use skirmish_tactics::profiles::PersonalityPreset;
use skirmish_tactics::scheduler::ScheduledAction;

use crate::engine::{SimConfig, SimulationEngine};

fn engine(scenario: ScenarioId, seed: u64) -> SimulationEngine {
    SimulationEngine::new(SimConfig {
        seed,
        scenario,
        ..Default::default()
    })
    .unwrap()
}

fn run(engine: &mut SimulationEngine, ticks: usize) -> Vec<SimSnapshot> {
    (0..ticks).map(|_| engine.tick()).collect()
}

fn all_events(snaps: &[SimSnapshot]) -> Vec<TacticalEvent> {
    snaps.iter().flat_map(|s| s.events.iter().cloned()).collect()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut a = engine(ScenarioId::Ambush, 12345);
    let mut b = engine(ScenarioId::Ambush, 12345);
    for _ in 0..300 {
        let json_a = serde_json::to_string(&a.tick()).unwrap();
        let json_b = serde_json::to_string(&b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

// ---- Setup ----

#[test]
fn test_scenario_spawns_registered_squads() {
    let mut eng = engine(ScenarioId::Skirmish, 1);
    let snap = eng.tick();
    assert_eq!(snap.agents.len(), 8);
    assert_eq!(snap.alive_count(Faction::Blue), 4);
    assert_eq!(snap.alive_count(Faction::Red), 4);
    assert_eq!(eng.squads().members(SquadId(1)).len(), 4);
    assert_eq!(
        eng.squads().point(SquadId(1), SquadPoint::Fallback),
        Some(Position::new(0.0, -30.0, 0.0))
    );
    let ids: Vec<AgentId> = snap.agents.iter().map(|a| a.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[test]
fn test_invalid_tactics_config_rejected() {
    let mut config = SimConfig::default();
    config.tactics.cover.min_score = 20.0;
    assert!(SimulationEngine::new(config).is_err());
}

#[test]
fn test_spawn_agent_mid_session() {
    let mut eng = engine(ScenarioId::Skirmish, 1);
    eng.tick();
    let id = eng.spawn_agent(
        Faction::Blue,
        SquadId(1),
        Position::new(-10.0, -40.0, 0.0),
        PersonalityPreset::Veteran,
    );
    let snap = eng.tick();
    assert!(snap.agent(id).is_some_and(|a| a.alive));
    assert!(eng.squads().members(SquadId(1)).contains(&id));
}

// ---- Engagement ----

#[test]
fn test_ambush_sides_acquire_targets() {
    let mut eng = engine(ScenarioId::Ambush, 7);
    let snaps = run(&mut eng, 60);
    let acquired: Vec<AgentId> = all_events(&snaps)
        .into_iter()
        .filter_map(|e| match e {
            TacticalEvent::TargetAcquired { agent, .. } => Some(agent),
            _ => None,
        })
        .collect();
    let last = snaps.last().unwrap();
    let red_acquired = acquired
        .iter()
        .any(|id| last.agent(*id).is_some_and(|a| a.faction == Faction::Red));
    let blue_acquired = acquired
        .iter()
        .any(|id| last.agent(*id).is_some_and(|a| a.faction == Faction::Blue));
    assert!(red_acquired && blue_acquired);
}

#[test]
fn test_skirmish_firefight_produces_a_kill() {
    let mut eng = engine(ScenarioId::Skirmish, 7);
    let mut kills = 0;
    for _ in 0..3000 {
        let snap = eng.tick();
        kills += snap
            .events
            .iter()
            .filter(|e| matches!(e, TacticalEvent::AgentKilled { .. }))
            .count();
        if kills > 0 {
            break;
        }
    }
    assert!(kills > 0, "no agent died in 100 s of Skirmish");
    let snap = eng.tick();
    assert!(snap.agents.len() < 8);
}

#[test]
fn test_long_run_invariants() {
    for scenario in [ScenarioId::Skirmish, ScenarioId::Ambush] {
        let mut eng = engine(scenario, 99);
        let mut alive_before = usize::MAX;
        let mut killed = Vec::new();
        for _ in 0..900 {
            let snap = eng.tick();
            for a in &snap.agents {
                assert!((0.0..=1.0).contains(&a.composure), "{:?}", a);
                assert!((0.0..=1.0).contains(&a.health_ratio), "{:?}", a);
                if a.panicking || a.suppressed {
                    assert_eq!(a.state, CombatState::Fallback, "{:?}", a);
                }
                assert!(!killed.contains(&a.id), "killed agent still present");
            }
            for e in &snap.events {
                if let TacticalEvent::AgentKilled { agent } = e {
                    killed.push(*agent);
                    assert!(eng.scheduler().pending_for(*agent).is_empty());
                }
            }
            let alive = snap.agents.iter().filter(|a| a.alive).count();
            assert!(alive <= alive_before);
            alive_before = alive;
            assert!(snap.danger_zones.iter().all(|z| z.current_intensity(snap.time.elapsed_secs) >= 0.0));
        }
    }
}

// ---- Commands ----

#[test]
fn test_trigger_suppression_command() {
    let mut eng = engine(ScenarioId::Skirmish, 3);
    eng.tick();
    let agent = AgentId(2);
    eng.queue_command(AgentCommand::TriggerSuppression {
        agent,
        from: Some(Position::new(-2.0, 0.0, 0.0)),
    });
    let snap = eng.tick();
    let view = snap.agent(agent).unwrap();
    assert!(view.suppressed);
    assert_eq!(view.state, CombatState::Fallback);
    assert!(snap
        .events
        .contains(&TacticalEvent::SuppressionStarted { agent }));
    assert!(snap
        .danger_zones
        .iter()
        .any(|z| z.trigger == DangerTrigger::Suppression && z.source == Some(agent)));
}

#[test]
fn test_critical_damage_command_panics_rookie() {
    let mut eng = engine(ScenarioId::Skirmish, 3);
    eng.tick();
    let rookie = AgentId(4);
    eng.queue_command(AgentCommand::NotifyDamaged {
        agent: rookie,
        amount: 0.8,
        from: Some(Position::new(6.0, 0.0, 0.0)),
    });
    let snap = eng.tick();
    let view = snap.agent(rookie).unwrap();
    assert!((view.health_ratio - 0.2).abs() < 1e-9);
    assert!(view.panicking);
    assert_eq!(view.composure, 0.0);
    assert!(snap.events.iter().any(|e| matches!(
        e,
        TacticalEvent::PanicStarted { agent, cause: PanicCause::CriticalHealth } if *agent == rookie
    )));
}

#[test]
fn test_kill_command_settles_bookkeeping() {
    let mut eng = engine(ScenarioId::Skirmish, 3);
    eng.tick();
    let victim = AgentId(3);
    eng.scheduler().schedule(
        AgentId(1),
        victim,
        10.0,
        ScheduledAction::InvestigateEcho {
            point: Position::new(0.0, -30.0, 0.0),
        },
    );
    eng.queue_command(AgentCommand::Kill { agent: victim });
    let snap = eng.tick();

    assert!(snap.agent(victim).is_none());
    assert!(snap
        .events
        .contains(&TacticalEvent::AgentKilled { agent: victim }));
    assert!(eng.scheduler().pending_for(victim).is_empty());
    assert_eq!(eng.squads().losses(SquadId(1)), (1, 4));
    assert!(snap
        .danger_zones
        .iter()
        .any(|z| z.trigger == DangerTrigger::Casualty && z.source.is_none()));
    assert!(!eng.agent_ids().contains(&victim));
}

#[test]
fn test_despawn_is_not_a_casualty() {
    let mut eng = engine(ScenarioId::Skirmish, 3);
    eng.tick();
    eng.queue_command(AgentCommand::Despawn { agent: AgentId(5) });
    let snap = eng.tick();
    assert!(snap.agent(AgentId(5)).is_none());
    assert_eq!(eng.squads().losses(SquadId(2)).0, 0);
    assert!(!eng.squads().members(SquadId(2)).contains(&AgentId(5)));
    assert!(snap.danger_zones.is_empty());
}

#[test]
fn test_set_squad_point_command() {
    let mut eng = engine(ScenarioId::Skirmish, 3);
    let point = Position::new(10.0, -45.0, 0.0);
    eng.queue_command(AgentCommand::SetSquadPoint {
        squad: SquadId(1),
        kind: SquadPoint::Extract,
        point,
    });
    eng.tick();
    assert_eq!(eng.squads().point(SquadId(1), SquadPoint::Extract), Some(point));
}

#[test]
fn test_commands_for_unknown_agents_are_ignored() {
    let mut eng = engine(ScenarioId::Skirmish, 3);
    eng.queue_commands([
        AgentCommand::TriggerPanic { agent: AgentId(99) },
        AgentCommand::Kill { agent: AgentId(99) },
        AgentCommand::NotifySound {
            agent: AgentId(99),
            position: Position::default(),
        },
    ]);
    let snap = eng.tick();
    assert_eq!(snap.agents.len(), 8);
}

// ---- Scheduled delivery ----

#[test]
fn test_scheduled_danger_panics_living_recipient() {
    let mut eng = engine(ScenarioId::Skirmish, 3);
    eng.tick();
    let recipient = AgentId(2);
    eng.scheduler().schedule(
        AgentId(1),
        recipient,
        0.1,
        ScheduledAction::DangerPanic {
            position: Position::new(-6.0, -38.0, 0.0),
        },
    );
    let snaps = run(&mut eng, 6);
    assert!(snaps.last().unwrap().agent(recipient).unwrap().panicking);
    assert!(all_events(&snaps).iter().any(|e| matches!(
        e,
        TacticalEvent::PanicStarted { agent, cause: PanicCause::SquadDanger } if *agent == recipient
    )));
}

#[test]
fn test_scheduled_event_for_dead_recipient_is_dropped() {
    let mut eng = engine(ScenarioId::Skirmish, 3);
    eng.tick();
    let recipient = AgentId(6);
    eng.scheduler().schedule(
        AgentId(5),
        recipient,
        0.2,
        ScheduledAction::DangerPanic {
            position: Position::new(-2.0, 38.0, 0.0),
        },
    );
    eng.queue_command(AgentCommand::Kill { agent: recipient });
    let snaps = run(&mut eng, 12);
    assert!(!all_events(&snaps).iter().any(|e| matches!(
        e,
        TacticalEvent::PanicStarted { agent, .. } if *agent == recipient
    )));
    assert!(eng.scheduler().pending_for(recipient).is_empty());
}

// ---- Work queue ----

#[test]
fn test_work_submitted_from_thread_applies_next_tick() {
    let mut eng = engine(ScenarioId::Skirmish, 3);
    eng.tick();
    let sender = eng.work_sender();
    std::thread::spawn(move || {
        sender.submit(|world| {
            for (_e, vitals) in world.query_mut::<&mut Vitals>() {
                vitals.health = 0.9;
            }
        });
    })
    .join()
    .unwrap();
    let snap = eng.tick();
    assert!(snap
        .agents
        .iter()
        .all(|a| (a.health_ratio - 0.9).abs() < 1e-9));
}

// ---- Serialization ----

#[test]
fn test_snapshot_serializes() {
    let mut eng = engine(ScenarioId::Ambush, 5);
    let snaps = run(&mut eng, 30);
    let json = serde_json::to_string(snaps.last().unwrap()).unwrap();
    let back: SimSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.agents.len(), snaps.last().unwrap().agents.len());
    assert_eq!(back.time.tick, 30);
}

#[test]
fn test_sim_config_partial_json() {
    let config: SimConfig =
        serde_json::from_str(r#"{"seed": 9, "scenario": "Ambush", "tactics": {"panic": {"duration_secs": 5.0}}}"#)
            .unwrap();
    assert_eq!(config.seed, 9);
    assert_eq!(config.scenario, ScenarioId::Ambush);
    assert_eq!(config.tactics.panic.duration_secs, 5.0);
    assert_eq!(config.tactics.threat, SimConfig::default().tactics.threat);
}
