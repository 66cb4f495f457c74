#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::commands::AgentCommand;
    use crate::components::Vitals;
    use crate::config::TacticsConfig;
    use crate::enums::*;
    use crate::error::TacticsError;
    use crate::events::TacticalEvent;
    use crate::oracles::{DangerZone, HealthProvider};
    use crate::state::SimSnapshot;
    use crate::types::*;

    #[test]
    fn test_combat_state_serde() {
        let variants = vec![
            CombatState::Patrol,
            CombatState::Investigate,
            CombatState::Engage,
            CombatState::Attack,
            CombatState::Fallback,
        ];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: CombatState = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_combat_state_is_combat() {
        assert!(!CombatState::Patrol.is_combat());
        assert!(!CombatState::Investigate.is_combat());
        assert!(CombatState::Engage.is_combat());
        assert!(CombatState::Attack.is_combat());
        assert!(CombatState::Fallback.is_combat());
    }

    #[test]
    fn test_material_solidity() {
        assert!(SurfaceMaterial::Concrete.stops_fire());
        assert!(SurfaceMaterial::Sandbag.stops_fire());
        assert!(!SurfaceMaterial::Glass.stops_fire());
        assert!(!SurfaceMaterial::Foliage.stops_fire());
        assert!(!SurfaceMaterial::Cloth.stops_fire());
        assert!(!SurfaceMaterial::Glass.is_opaque());
        assert!(SurfaceMaterial::Foliage.is_opaque());
    }

    #[test]
    fn test_panic_cause_directness() {
        assert!(PanicCause::CriticalHealth.is_direct());
        assert!(PanicCause::Blinded.is_direct());
        assert!(!PanicCause::SquadDanger.is_direct());
        assert!(!PanicCause::Forced.is_direct());
    }

    #[test]
    fn test_position_range() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 0.0);
        assert!((a.range_to(&b) - 5.0).abs() < 1e-10);
        let c = Position::new(3.0, 4.0, 12.0);
        assert!((a.horizontal_range_to(&c) - 5.0).abs() < 1e-10);
        assert!((a.range_to(&c) - 13.0).abs() < 1e-10);
    }

    #[test]
    fn test_position_bearing() {
        let origin = Position::new(0.0, 0.0, 0.0);
        let north = Position::new(0.0, 100.0, 0.0);
        let east = Position::new(100.0, 0.0, 0.0);
        assert!(origin.bearing_to(&north).abs() < 1e-10);
        assert!((origin.bearing_to(&east) - std::f64::consts::FRAC_PI_2).abs() < 1e-10);
    }

    #[test]
    fn test_direction_and_offset() {
        let a = Position::new(1.0, 1.0, 5.0);
        let b = Position::new(1.0, 11.0, 0.0);
        let dir = a.direction_to(&b);
        assert!((dir - DVec3::Y).length() < 1e-10);
        let p = a.offset(dir * 7.0, 4.0);
        assert!((p.y - 5.0).abs() < 1e-10);
        assert!((p.z - 5.0).abs() < 1e-10);
        assert_eq!(a.direction_to(&a), DVec3::ZERO);
    }

    #[test]
    fn test_rotate_about_up() {
        let r = rotate_about_up(DVec3::X, std::f64::consts::FRAC_PI_2);
        assert!((r - DVec3::Y).length() < 1e-10);
        let north = heading_to_direction(0.0);
        assert!((north - DVec3::Y).length() < 1e-10);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        for _ in 0..30 {
            t.advance();
        }
        assert_eq!(t.tick, 30);
        assert!((t.elapsed_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_typed_id_display() {
        assert_eq!(AgentId(7).to_string(), "agent#7");
        assert_eq!(SquadId(2).to_string(), "squad#2");
        assert_eq!(MapId(0).to_string(), "map#0");
    }

    #[test]
    fn test_vitals_health_provider() {
        let mut v = Vitals::default();
        assert_eq!(v.health_ratio(), 1.0);
        assert!(!v.should_heal());
        v.health = 0.4;
        assert!(v.should_heal());
        v.health = 0.0;
        assert!(!v.should_heal(), "the dead do not heal");
        v.max_health = 0.0;
        assert_eq!(v.health_ratio(), 0.0);
    }

    #[test]
    fn test_danger_zone_decay() {
        let zone = DangerZone {
            position: Position::new(0.0, 0.0, 0.0),
            radius: 8.0,
            trigger: DangerTrigger::Panic,
            intensity: 1.0,
            created_at: 10.0,
            lifetime: 20.0,
            source: None,
        };
        assert!((zone.current_intensity(10.0) - 1.0).abs() < 1e-10);
        assert!((zone.current_intensity(20.0) - 0.5).abs() < 1e-10);
        assert_eq!(zone.current_intensity(40.0), 0.0);
        assert!(!zone.is_expired(29.9));
        assert!(zone.is_expired(30.0));
        assert!(zone.contains(&Position::new(5.0, 5.0, 3.0)));
        assert!(!zone.contains(&Position::new(8.0, 8.0, 0.0)));
    }

    #[test]
    fn test_command_serde() {
        let cmd = AgentCommand::TriggerSuppression {
            agent: AgentId(3),
            from: Some(Position::new(1.0, 2.0, 0.0)),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"TriggerSuppression\""));
        let back: AgentCommand = serde_json::from_str(&json).unwrap();
        match back {
            AgentCommand::TriggerSuppression { agent, from } => {
                assert_eq!(agent, AgentId(3));
                assert_eq!(from, Some(Position::new(1.0, 2.0, 0.0)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_event_serde() {
        let ev = TacticalEvent::StateChanged {
            agent: AgentId(1),
            from: CombatState::Patrol,
            to: CombatState::Engage,
        };
        let json = serde_json::to_string(&ev).unwrap();
        let back: TacticalEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(ev, back);
    }

    #[test]
    fn test_empty_snapshot_serializes() {
        let snap = SimSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        let back: SimSnapshot = serde_json::from_str(&json).unwrap();
        assert!(back.agents.is_empty());
        assert_eq!(back.alive_count(Faction::Blue), 0);
    }

    #[test]
    fn test_config_defaults_validate() {
        let config = TacticsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.threat.max_scan_distance, 120.0);
        assert_eq!(config.retreat.sample_count, 10);
        assert_eq!(config.cover.flank_angles_deg.len(), 4);
    }

    #[test]
    fn test_config_partial_json() {
        let config =
            TacticsConfig::from_json_str(r#"{ "threat": { "switch_threshold": 15.0 } }"#).unwrap();
        assert_eq!(config.threat.switch_threshold, 15.0);
        assert_eq!(config.threat.switch_cooldown_secs, 2.0);
        assert_eq!(config.panic.duration_secs, 3.5);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let err = TacticsConfig::from_json_str(r#"{ "cover": { "min_score": 11.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, TacticsError::InvalidConfig(_)));

        let err = TacticsConfig::from_json_str(r#"{ "panic": { "duration_secs": -1.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, TacticsError::InvalidConfig(_)));

        let err = TacticsConfig::from_json_str(r#"{ "retreat": { "sample_count": 0 } }"#)
            .unwrap_err();
        assert!(matches!(err, TacticsError::InvalidConfig(_)));

        let err = TacticsConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, TacticsError::ConfigParse(_)));
    }
}
