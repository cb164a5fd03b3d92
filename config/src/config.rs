use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The contents of `<agentCoordPath>/config.json`.
///
/// Parsing is a single explicit step: `serde` deserializes into this struct with
/// field-level defaults, then [`Config::validate`] checks ranges and returns a
/// structured error. Nothing here panics on malformed input.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    #[serde(default = "default_max_attempts")]
    pub per_task_max_attempts: u32,

    #[serde(default)]
    pub per_task_timeout_secs: Option<u64>,

    #[serde(default = "default_reject_threshold")]
    pub reject_threshold: u32,

    #[serde(default = "default_scope_creep_tolerance")]
    pub scope_creep_tolerance: f64,

    #[serde(default = "default_worker_grace_period_secs")]
    pub worker_grace_period_secs: u64,
}

fn default_max_workers() -> usize {
    4
}

fn default_max_attempts() -> u32 {
    3
}

fn default_reject_threshold() -> u32 {
    3
}

fn default_scope_creep_tolerance() -> f64 {
    0.4
}

fn default_worker_grace_period_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_workers: default_max_workers(),
            per_task_max_attempts: default_max_attempts(),
            per_task_timeout_secs: None,
            reject_threshold: default_reject_threshold(),
            scope_creep_tolerance: default_scope_creep_tolerance(),
            worker_grace_period_secs: default_worker_grace_period_secs(),
        }
    }
}

impl Config {
    /// Reads and validates `config.json` at `path`. A missing file is not an
    /// error: callers get the default configuration, matching the CLI's
    /// `--config <path>` being optional.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Config::default());
            }
            Err(err) => return Err(err.into()),
        };
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_workers == 0 {
            return Err(ConfigError::Validation(
                "maxWorkers must be at least 1".into(),
            ));
        }
        if !(1..=10).contains(&self.per_task_max_attempts) {
            return Err(ConfigError::Validation(
                "perTaskMaxAttempts must be in [1, 10]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.scope_creep_tolerance) {
            return Err(ConfigError::Validation(
                "scopeCreepTolerance must be in [0.0, 1.0]".into(),
            ));
        }
        if self.reject_threshold == 0 {
            return Err(ConfigError::Validation(
                "rejectThreshold must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
