//! Configuration module - environment variable parsing (headless runner)

use std::env;
use std::path::PathBuf;

use crate::combat::{ProfileError, WeaponProfile};
use crate::logger::LogLevel;

/// Конфигурация headless прогона
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Seed для DeterministicRng (GUNLINE_SEED)
    pub seed: u64,
    /// Сколько fixed ticks прогнать (GUNLINE_TICKS)
    pub ticks: u32,
    /// Частота FixedUpdate (GUNLINE_TICK_HZ)
    pub tick_hz: f64,
    /// JSON профиль оружия (GUNLINE_PROFILE), None = пистолет по умолчанию
    pub profile_path: Option<PathBuf>,
    /// Минимальный уровень логов (GUNLINE_LOG_LEVEL)
    pub log_level: LogLevel,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks: 600,
            tick_hz: 60.0,
            profile_path: None,
            log_level: LogLevel::Info,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// То же, что `from_env`, но с произвольным источником (тесты не трогают process env)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let seed = match lookup("GUNLINE_SEED") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("GUNLINE_SEED", raw))?,
            None => defaults.seed,
        };

        let ticks = match lookup("GUNLINE_TICKS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::Invalid("GUNLINE_TICKS", raw))?,
            None => defaults.ticks,
        };

        let tick_hz = match lookup("GUNLINE_TICK_HZ") {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(hz) if hz.is_finite() && hz > 0.0 => hz,
                _ => return Err(ConfigError::Invalid("GUNLINE_TICK_HZ", raw)),
            },
            None => defaults.tick_hz,
        };

        let log_level = match lookup("GUNLINE_LOG_LEVEL") {
            Some(raw) => {
                LogLevel::parse(&raw).ok_or(ConfigError::Invalid("GUNLINE_LOG_LEVEL", raw))?
            }
            None => defaults.log_level,
        };

        let profile_path = lookup("GUNLINE_PROFILE")
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            seed,
            ticks,
            tick_hz,
            profile_path,
            log_level,
        })
    }

    /// Профиль оружия: из файла, если задан путь, иначе пистолет
    pub fn load_profile(&self) -> Result<WeaponProfile, ConfigError> {
        match &self.profile_path {
            Some(path) => Ok(WeaponProfile::load(path)?),
            None => Ok(WeaponProfile::default()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),

    #[error("Failed to load weapon profile: {0}")]
    Profile(#[from] ProfileError),
}
