//! Starting values for a new orchestra.

use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::values::Room;

/// Environment variable overriding [`OrchestraConfig::starting_budget`].
pub const STARTING_BUDGET_VAR: &str = "MAESTRO_STARTING_BUDGET";
/// Environment variable overriding [`OrchestraConfig::required_practice_for_concert`].
pub const REQUIRED_PRACTICE_VAR: &str = "MAESTRO_REQUIRED_PRACTICE_FOR_CONCERT";
/// Environment variable overriding [`OrchestraConfig::schedule_days`].
pub const SCHEDULE_DAYS_VAR: &str = "MAESTRO_SCHEDULE_DAYS";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable is set but does not parse.
    #[error("{var} must be a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    /// The schedule needs at least one day.
    #[error("schedule must have at least one day")]
    EmptySchedule,
}

/// Values every new orchestra starts from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrchestraConfig {
    pub starting_budget: i64,
    /// Practice minutes each concert consumes when the week resolves.
    pub required_practice_for_concert: i64,
    /// Number of day slots in the weekly schedule.
    pub schedule_days: usize,
    pub default_practice_room: Room,
}

impl Default for OrchestraConfig {
    fn default() -> Self {
        Self {
            starting_budget: 1000,
            required_practice_for_concert: 2,
            schedule_days: 7,
            default_practice_room: Room::new(
                3,
                0,
                "The smallest room at a very small music school - it even smells a bit",
            ),
        }
    }
}

impl OrchestraConfig {
    /// Builds a configuration from the defaults, overridden by any of the
    /// `MAESTRO_*` environment variables that are set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a variable does not parse, and
    /// `ConfigError::EmptySchedule` if the schedule would have no days.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(budget) = parse_var(&lookup, STARTING_BUDGET_VAR, "integer")? {
            config.starting_budget = budget;
        }
        if let Some(minutes) = parse_var(&lookup, REQUIRED_PRACTICE_VAR, "integer")? {
            config.required_practice_for_concert = minutes;
        }
        if let Some(days) = parse_var(&lookup, SCHEDULE_DAYS_VAR, "day count")? {
            config.schedule_days = days;
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants a configuration must satisfy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptySchedule` if `schedule_days` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schedule_days == 0 {
            return Err(ConfigError::EmptySchedule);
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::Invalid {
            var,
            expected,
            value,
        })
}
