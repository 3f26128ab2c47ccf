use serde::Deserialize;
use std::{env, fs, path::Path};
use thiserror::Error;

use crate::core::queue::DEFAULT_CAPACITY;
use crate::device::topics::{TopicPath, DEFAULT_PREFIX};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct QueueConfig {
    pub initial_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DeviceConfig {
    /// `building/room/domain/device`
    pub topic_prefix: String,
    /// Extra `class/type[/unit]` suffixes to subscribe to on login.
    pub subscribe: Vec<String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            topic_prefix: DEFAULT_PREFIX.to_string(),
            subscribe: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_ms: u64,
    /// Stop after this many ticks; run forever when unset.
    pub ticks: Option<u64>,
    /// Inject a controller set-temp command every N ticks (0 disables).
    pub command_every: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            ticks: None,
            command_every: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub queue: QueueConfig,
    pub device: DeviceConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Reads and validates a TOML config file. Missing keys take defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let raw: String = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Load configuration from an optional file path and environment variables.
    ///
    /// Precedence: built-in defaults, then the file (`path`, else
    /// `THERMOQ_CONFIG`), then `THERMOQ_INITIAL_CAPACITY` and
    /// `THERMOQ_TOPIC_PREFIX`.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let effective_path = path
            .map(str::to_string)
            .or_else(|| env::var("THERMOQ_CONFIG").ok());

        let mut config = match effective_path {
            Some(p) => {
                let raw = fs::read_to_string(p)?;
                toml::from_str(&raw)?
            }
            None => Config::default(),
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `THERMOQ_*` overrides looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("THERMOQ_INITIAL_CAPACITY") {
            self.queue.initial_capacity = v
                .parse()
                .map_err(|e| ConfigError::Parse(format!("THERMOQ_INITIAL_CAPACITY: {e}")))?;
        }

        if let Some(v) = lookup("THERMOQ_TOPIC_PREFIX") {
            self.device.topic_prefix = v;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.initial_capacity == 0 {
            return Err(ConfigError::Invalid(
                "queue.initial_capacity must be at least 1".into(),
            ));
        }

        let prefix_segments = self.device.topic_prefix.split('/').count();
        if prefix_segments != 4 {
            return Err(ConfigError::Invalid(format!(
                "device.topic_prefix must have 4 segments, got {prefix_segments}"
            )));
        }

        for suffix in &self.device.subscribe {
            let full = format!("{}/{}", self.device.topic_prefix, suffix);
            TopicPath::parse(&full).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }

        if self.simulation.tick_ms == 0 {
            return Err(ConfigError::Invalid(
                "simulation.tick_ms must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
