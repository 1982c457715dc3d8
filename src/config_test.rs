use super::*;
use rand::RngCore;

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// defaults
// =============================================================================

#[test]
fn missing_vars_use_defaults() {
    let config = SceneConfig::from_vars(|_| None).unwrap();
    assert_eq!(config, SceneConfig::default());
    assert_eq!(config.stage_delay, Duration::from_millis(500));
    assert_eq!(config.timings.appear, Duration::from_millis(100));
    assert_eq!(config.timings.connect, Duration::from_millis(800));
    assert_eq!(config.connection_probability, 0.5);
    assert_eq!(config.seed, None);
}

#[test]
fn blank_values_use_defaults() {
    let config = SceneConfig::from_vars(vars(&[(STAGE_DELAY_VAR, "  "), (SEED_VAR, "")])).unwrap();
    assert_eq!(config, SceneConfig::default());
}

// =============================================================================
// overrides
// =============================================================================

#[test]
fn values_override_defaults() {
    let config = SceneConfig::from_vars(vars(&[
        (STAGE_DELAY_VAR, "10"),
        (APPEAR_DELAY_VAR, "0"),
        (CONNECT_DELAY_VAR, " 25 "),
        (CONNECTION_PROBABILITY_VAR, "1"),
        (SEED_VAR, "42"),
    ]))
    .unwrap();
    assert_eq!(config.stage_delay, Duration::from_millis(10));
    assert_eq!(config.timings.appear, Duration::ZERO);
    assert_eq!(config.timings.connect, Duration::from_millis(25));
    assert_eq!(config.timings.stagger, Duration::from_millis(100));
    assert_eq!(config.connection_probability, 1.0);
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.interpreter().connection_probability(), 1.0);
}

#[test]
fn seeded_rng_is_reproducible() {
    let config = SceneConfig { seed: Some(7), ..SceneConfig::default() };
    assert_eq!(config.rng().next_u64(), config.rng().next_u64());
}

// =============================================================================
// errors
// =============================================================================

#[test]
fn unparsable_delay_is_an_error() {
    let err = SceneConfig::from_vars(vars(&[(CONNECT_DELAY_VAR, "soon")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: CONNECT_DELAY_VAR, .. }));
    assert_eq!(err.error_code(), "E_CONFIG_INVALID");
    assert!(err.to_string().contains("SCENE_CONNECT_DELAY_MS"));
}

#[test]
fn negative_delay_is_an_error() {
    assert!(SceneConfig::from_vars(vars(&[(STAGE_DELAY_VAR, "-1")])).is_err());
}

#[test]
fn probability_out_of_range_is_an_error() {
    let err = SceneConfig::from_vars(vars(&[(CONNECTION_PROBABILITY_VAR, "1.5")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: CONNECTION_PROBABILITY_VAR, .. }));
    assert!(SceneConfig::from_vars(vars(&[(CONNECTION_PROBABILITY_VAR, "NaN")])).is_err());
}

#[test]
fn from_env_reads_process_environment() {
    unsafe { std::env::remove_var(SEED_VAR) };
    let config = SceneConfig::from_env().unwrap();
    assert_eq!(config.seed, None);
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(ConfigError::NotUnicode { key: SEED_VAR }.error_code(), "E_CONFIG_NOT_UNICODE");
}
