use crate::casino::phase::SevenOutPolicy;
use crate::casino::series::TableRules;
use crapsline_types::craps::MAX_SETTLEMENTS_PER_ROLL;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;

/// Table configuration, usually read from YAML.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_max_bets_per_series")]
    pub max_bets_per_series: usize,
    #[serde(default = "default_min_stake")]
    pub min_stake: u64,
    #[serde(default = "default_max_stake")]
    pub max_stake: u64,
    #[serde(default)]
    pub after_seven_out: SevenOutPolicy,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid yaml: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
    #[error("max_bets_per_series must be <= {max} (got {value})")]
    TooManyBets { max: usize, value: usize },
    #[error("min_stake ({min}) must be <= max_stake ({max})")]
    StakeRange { min: u64, max: u64 },
}

pub struct ValidatedConfig {
    pub rules: TableRules,
    pub log_level: Level,
}

fn default_max_bets_per_series() -> usize {
    20
}

fn default_min_stake() -> u64 {
    1
}

fn default_max_stake() -> u64 {
    1_000_000_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_bets_per_series: default_max_bets_per_series(),
            min_stake: default_min_stake(),
            max_stake: default_max_stake(),
            after_seven_out: SevenOutPolicy::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.max_bets_per_series == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "max_bets_per_series",
                value: 0,
            });
        }
        if self.max_bets_per_series > MAX_SETTLEMENTS_PER_ROLL {
            return Err(ConfigError::TooManyBets {
                max: MAX_SETTLEMENTS_PER_ROLL,
                value: self.max_bets_per_series,
            });
        }
        if self.min_stake == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "min_stake",
                value: self.min_stake,
            });
        }
        if self.min_stake > self.max_stake {
            return Err(ConfigError::StakeRange {
                min: self.min_stake,
                max: self.max_stake,
            });
        }

        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;

        Ok(ValidatedConfig {
            rules: TableRules {
                max_bets: self.max_bets_per_series,
                min_stake: self.min_stake,
                max_stake: self.max_stake,
                after_seven_out: self.after_seven_out,
            },
            log_level,
        })
    }
}
