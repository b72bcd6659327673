use rl::{AgentConfig, AgentError};

#[test]
fn defaults_match_pendulum_setup() {
    let c = AgentConfig::default();
    assert_eq!(c.state_size, 3);
    assert_eq!(c.num_actions, 1);
    assert_eq!(c.hidden_units, 36);
    assert_eq!(c.action_bound, 2.0);
    assert_eq!(c.sigma_floor, 0.1);
    assert_eq!(c.entropy_beta, 0.01);
    assert!(c.validate().is_ok());
}

#[test]
fn partial_json_keeps_defaults() {
    let c = AgentConfig::from_json_str(r#"{ "learning_rate": 0.002, "batch_size": 4 }"#).unwrap();
    assert_eq!(c.learning_rate, 0.002);
    assert_eq!(c.batch_size, 4);
    assert_eq!(c.gamma, AgentConfig::default().gamma);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = AgentConfig::from_json_str(r#"{ "learning_rat": 0.1 }"#).unwrap_err();
    assert!(matches!(err, AgentError::Json(_)));
}

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        r#"{ "learning_rate": 0.0 }"#,
        r#"{ "gamma": 1.5 }"#,
        r#"{ "batch_size": 0 }"#,
        r#"{ "state_size": 0 }"#,
        r#"{ "action_bound": -1.0 }"#,
        r#"{ "sigma_floor": 0.0 }"#,
    ];
    for json in cases {
        let err = AgentConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, AgentError::InvalidConfig(_)), "{json}: {err}");
    }
}

#[test]
fn non_finite_values_are_rejected() {
    let base = AgentConfig::default();
    let cases = [
        AgentConfig { action_bound: f32::INFINITY, ..base.clone() },
        AgentConfig { action_bound: f32::NAN, ..base.clone() },
        AgentConfig { sigma_floor: f32::INFINITY, ..base.clone() },
        AgentConfig { sigma_floor: f32::NAN, ..base.clone() },
        AgentConfig { entropy_beta: f32::INFINITY, ..base.clone() },
        AgentConfig { entropy_beta: f32::NAN, ..base.clone() },
        AgentConfig { entropy_beta: -0.5, ..base.clone() },
    ];
    for c in cases {
        let err = c.validate().unwrap_err();
        assert!(matches!(err, AgentError::InvalidConfig(_)), "{c:?}: {err}");
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = AgentConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, AgentError::Io(_)));
}

#[test]
fn round_trips_through_json() {
    let c = AgentConfig { seed: 17, ..AgentConfig::default() };
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(AgentConfig::from_json_str(&json).unwrap(), c);
}
