//! Runtime configuration parsed from environment variables.
//!
//! Every knob has a default from [`crate::consts`]. A variable that is set
//! but unparsable is an error rather than a silent fallback, so a typo in a
//! deployment shows up at startup.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::HashMap;
use std::env::VarError;
use std::str::FromStr;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::consts::{CONNECTION_PROBABILITY, STAGE_DELAY_MS};
use crate::error::ErrorCode;
use crate::interpret::Interpreter;
use crate::render::RenderTimings;

pub const STAGE_DELAY_VAR: &str = "SCENE_STAGE_DELAY_MS";
pub const APPEAR_DELAY_VAR: &str = "SCENE_APPEAR_DELAY_MS";
pub const CONNECT_DELAY_VAR: &str = "SCENE_CONNECT_DELAY_MS";
pub const CONNECTION_PROBABILITY_VAR: &str = "SCENE_CONNECTION_PROBABILITY";
pub const SEED_VAR: &str = "SCENE_SEED";

const KEYS: [&str; 5] = [STAGE_DELAY_VAR, APPEAR_DELAY_VAR, CONNECT_DELAY_VAR, CONNECTION_PROBABILITY_VAR, SEED_VAR];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is not valid: {reason}")]
    Invalid { key: &'static str, value: String, reason: String },
    #[error("{key} is not valid unicode")]
    NotUnicode { key: &'static str },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "E_CONFIG_INVALID",
            Self::NotUnicode { .. } => "E_CONFIG_NOT_UNICODE",
        }
    }
}

/// Typed settings for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Length of each simulated processing stage.
    pub stage_delay: Duration,
    pub timings: RenderTimings,
    pub connection_probability: f64,
    /// Fixed seed for reproducible runs; fresh entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            stage_delay: Duration::from_millis(STAGE_DELAY_MS),
            timings: RenderTimings::default(),
            connection_probability: CONNECTION_PROBABILITY,
            seed: None,
        }
    }
}

impl SceneConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `SCENE_STAGE_DELAY_MS`: default 500
    /// - `SCENE_APPEAR_DELAY_MS`: default 100
    /// - `SCENE_CONNECT_DELAY_MS`: default 800
    /// - `SCENE_CONNECTION_PROBABILITY`: default 0.5, must lie in `[0, 1]`
    /// - `SCENE_SEED`: unset means fresh entropy per session
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut vars = HashMap::new();
        for key in KEYS {
            match std::env::var(key) {
                Ok(value) => {
                    vars.insert(key, value);
                }
                Err(VarError::NotPresent) => {}
                Err(VarError::NotUnicode(_)) => return Err(ConfigError::NotUnicode { key }),
            }
        }
        Self::from_vars(|key| vars.get(key).cloned())
    }

    /// Build config from an arbitrary lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let stage_delay = parse_var(&lookup, STAGE_DELAY_VAR)?.map_or(defaults.stage_delay, Duration::from_millis);
        let appear = parse_var(&lookup, APPEAR_DELAY_VAR)?.map_or(defaults.timings.appear, Duration::from_millis);
        let connect = parse_var(&lookup, CONNECT_DELAY_VAR)?.map_or(defaults.timings.connect, Duration::from_millis);

        let connection_probability =
            parse_var::<f64, _>(&lookup, CONNECTION_PROBABILITY_VAR)?.unwrap_or(defaults.connection_probability);
        if !(0.0..=1.0).contains(&connection_probability) {
            return Err(ConfigError::Invalid {
                key: CONNECTION_PROBABILITY_VAR,
                value: connection_probability.to_string(),
                reason: "must be between 0 and 1".into(),
            });
        }

        let seed = parse_var(&lookup, SEED_VAR)?;

        Ok(Self {
            stage_delay,
            timings: RenderTimings { appear, connect, stagger: defaults.timings.stagger },
            connection_probability,
            seed,
        })
    }

    /// Interpreter bound to the standard catalog and this probability.
    #[must_use]
    pub fn interpreter(&self) -> Interpreter {
        Interpreter::default().with_connection_probability(self.connection_probability)
    }

    /// Generator for a session: seeded when a seed is configured.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::Invalid { key, value: raw.clone(), reason: e.to_string() })
}
