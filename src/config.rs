// Demo configuration
// Every section has defaults, so an empty file (or no file at all) reproduces
// the reference transcripts.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{PatternError, Result};

/// Environment variable naming the TOML file read by [`PatternsConfig::load`].
pub const CONFIG_ENV: &str = "PATTERNS_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// Default `env_logger` filter; `RUST_LOG` wins when set.
    pub log_level: String,
    pub chain: ChainConfig,
    pub singleton: SingletonConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub handlers: Vec<HandlerSpec>,
    pub requests: Vec<String>,
    /// Index into `handlers` of the node used as the subchain entry point.
    pub subchain_from: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerSpec {
    pub name: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingletonConfig {
    pub delay_ms: u64,
    pub seeds: Vec<String>,
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            chain: ChainConfig::default(),
            singleton: SingletonConfig::default(),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            handlers: vec![
                HandlerSpec::new("Monkey", "Banana"),
                HandlerSpec::new("Squirrel", "Nut"),
                HandlerSpec::new("Dog", "MeatBall"),
            ],
            requests: vec!["Nut".into(), "Banana".into(), "Cup of coffee".into()],
            subchain_from: 1,
        }
    }
}

impl Default for SingletonConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            seeds: vec!["FOO".into(), "BAR".into()],
        }
    }
}

impl HandlerSpec {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
        }
    }
}

impl SingletonConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl PatternsConfig {
    /// Reads the file named by `PATTERNS_CONFIG`, or falls back to defaults.
    pub fn load() -> Result<Self> {
        match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(path),
            None => {
                debug!("{CONFIG_ENV} not set, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PatternError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("config read from {}", path.display());
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut config: PatternsConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configs that cannot drive the demos. An out-of-range
    /// `subchain_from` is clamped rather than rejected.
    pub fn validate(&mut self) -> Result<()> {
        if self.chain.handlers.is_empty() {
            return Err(PatternError::invalid_config("chain.handlers must not be empty"));
        }
        for (i, spec) in self.chain.handlers.iter().enumerate() {
            if spec.name.trim().is_empty() {
                return Err(PatternError::invalid_config(format!(
                    "chain.handlers[{i}] has an empty name"
                )));
            }
            if spec.token.is_empty() {
                return Err(PatternError::invalid_config(format!(
                    "chain.handlers[{i}] ({}) has an empty token",
                    spec.name
                )));
            }
        }
        if self.singleton.seeds.is_empty() {
            return Err(PatternError::invalid_config("singleton.seeds must not be empty"));
        }

        let last = self.chain.handlers.len() - 1;
        if self.chain.subchain_from > last {
            debug!(
                "chain.subchain_from {} out of range, clamping to {last}",
                self.chain.subchain_from
            );
            self.chain.subchain_from = last;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
