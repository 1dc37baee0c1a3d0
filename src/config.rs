//! Locator options.
//!
//! Options are read once when a locator is created. They can be built in code,
//! read from the environment, or (with the `config` feature) parsed from JSON.

use std::env;
#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, ResolveResult};

/// Environment variable prefix used by [`LocatorOptions::from_env`].
pub const DEFAULT_ENV_PREFIX: &str = "FERROUS_LOCATOR";

const DEFAULT_MAX_DEPTH: usize = 1024;

/// Resolution limits for a [`ServiceLocator`](crate::ServiceLocator).
///
/// # Examples
///
/// ```
/// use ferrous_locator::{LocatorOptions, ServiceLocator};
///
/// let options = LocatorOptions::default().with_max_resolution_depth(64);
/// assert_eq!(options.max_resolution_depth, 64);
/// assert!(options.detect_cycles);
///
/// let locator = ServiceLocator::with_options(options);
/// assert_eq!(locator.options().max_resolution_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct LocatorOptions {
    /// How deep nested dependency resolution may go before failing
    pub max_resolution_depth: usize,
    /// Whether re-entering a key under resolution fails with a cycle error
    pub detect_cycles: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            max_resolution_depth: DEFAULT_MAX_DEPTH,
            detect_cycles: true,
        }
    }
}

impl LocatorOptions {
    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }

    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// Reads options from `FERROUS_LOCATOR_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> ResolveResult<Self> {
        Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Reads `<PREFIX>_MAX_RESOLUTION_DEPTH` and `<PREFIX>_DETECT_CYCLES`.
    pub fn from_env_with_prefix(prefix: &str) -> ResolveResult<Self> {
        let mut options = Self::default();
        let prefix = prefix.to_uppercase();

        if let Some(raw) = read_var(&prefix, "MAX_RESOLUTION_DEPTH") {
            options.max_resolution_depth = raw.trim().parse().map_err(|_| {
                ResolveError::InvalidOptions(format!(
                    "{}_MAX_RESOLUTION_DEPTH is not a positive integer: {:?}",
                    prefix, raw
                ))
            })?;
        }

        if let Some(raw) = read_var(&prefix, "DETECT_CYCLES") {
            options.detect_cycles = parse_bool(&raw).ok_or_else(|| {
                ResolveError::InvalidOptions(format!(
                    "{}_DETECT_CYCLES is not a boolean: {:?}",
                    prefix, raw
                ))
            })?;
        }

        options.validate()?;
        Ok(options)
    }

    /// Parses options from a JSON object; missing fields keep their defaults.
    ///
    /// ```
    /// use ferrous_locator::LocatorOptions;
    ///
    /// let options = LocatorOptions::from_json(r#"{ "detect_cycles": false }"#).unwrap();
    /// assert!(!options.detect_cycles);
    /// assert_eq!(options.max_resolution_depth, 1024);
    /// ```
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> ResolveResult<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| ResolveError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    fn validate(&self) -> ResolveResult<()> {
        if self.max_resolution_depth == 0 {
            return Err(ResolveError::InvalidOptions(
                "max_resolution_depth must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn read_var(prefix: &str, name: &str) -> Option<String> {
    env::var(format!("{}_{}", prefix, name)).ok()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
