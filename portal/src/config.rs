//! Configuration for the portal binary.
//!
//! Loads configuration from `BOOKFAIR_*` environment variables with sensible
//! defaults.

use crate::catalog::{CatalogError, CatalogGenerator, GridDimensions};
use crate::projections::DEFAULT_PAGE_SIZE;
use crate::state::DEFAULT_MAX_SELECTION;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Invalid configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid or reserved probability out of range
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A setting that must be positive is zero
    #[error("{0} must be at least 1")]
    Zero(&'static str),
}

/// Stall catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Grid rows (`BOOKFAIR_ROWS`)
    pub rows: u8,
    /// Grid columns (`BOOKFAIR_COLUMNS`)
    pub columns: u8,
    /// Chance of a stall starting out reserved (`BOOKFAIR_RESERVED_PROBABILITY`)
    pub reserved_probability: f64,
    /// Fixed RNG seed for a reproducible hall (`BOOKFAIR_SEED`)
    pub seed: Option<u64>,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Stall catalog
    pub catalog: CatalogConfig,
    /// Stalls one vendor may select (`BOOKFAIR_MAX_SELECTION`)
    pub max_selection: usize,
    /// Reservations per list page (`BOOKFAIR_PAGE_SIZE`)
    pub page_size: usize,
    /// Session flag file (`BOOKFAIR_SESSION_FILE`); in-memory when unset
    pub session_file: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is unset (`BOOKFAIR_LOG`)
    pub log_filter: String,
}

impl Config {
    /// Load configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (the environment, a map in tests)
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            catalog: CatalogConfig {
                rows: parsed(&lookup, "BOOKFAIR_ROWS").unwrap_or(10),
                columns: parsed(&lookup, "BOOKFAIR_COLUMNS").unwrap_or(8),
                reserved_probability: parsed(&lookup, "BOOKFAIR_RESERVED_PROBABILITY")
                    .unwrap_or(CatalogGenerator::DEFAULT_RESERVED_PROBABILITY),
                seed: parsed(&lookup, "BOOKFAIR_SEED"),
            },
            max_selection: parsed(&lookup, "BOOKFAIR_MAX_SELECTION")
                .unwrap_or(DEFAULT_MAX_SELECTION),
            page_size: parsed(&lookup, "BOOKFAIR_PAGE_SIZE").unwrap_or(DEFAULT_PAGE_SIZE),
            session_file: lookup("BOOKFAIR_SESSION_FILE")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            log_filter: lookup("BOOKFAIR_LOG").unwrap_or_else(|| "bookfair=info".to_string()),
        }
    }

    /// Builds the catalog generator, validating every setting
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unusable grid, probability, quota or
    /// page size.
    pub fn generator(&self) -> Result<CatalogGenerator, ConfigError> {
        if self.max_selection == 0 {
            return Err(ConfigError::Zero("BOOKFAIR_MAX_SELECTION"));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Zero("BOOKFAIR_PAGE_SIZE"));
        }
        let dimensions = GridDimensions::new(self.catalog.rows, self.catalog.columns)?;
        Ok(CatalogGenerator::new(dimensions, self.catalog.reserved_probability)?)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_describe_standard_hall() {
        let config = Config::default();
        assert_eq!(config.catalog.rows, 10);
        assert_eq!(config.catalog.columns, 8);
        assert_eq!(config.max_selection, 3);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.catalog.seed, None);
        assert_eq!(config.session_file, None);
        assert_eq!(config.log_filter, "bookfair=info");
        assert!(config.generator().is_ok());
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("BOOKFAIR_ROWS", "4"),
            ("BOOKFAIR_SEED", "42"),
            ("BOOKFAIR_SESSION_FILE", "/tmp/session.json"),
        ]));
        assert_eq!(config.catalog.rows, 4);
        assert_eq!(config.catalog.seed, Some(42));
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/session.json")));
    }

    #[test]
    fn garbage_falls_back_to_default() {
        let config = Config::from_lookup(lookup(&[("BOOKFAIR_COLUMNS", "eight")]));
        assert_eq!(config.catalog.columns, 8);
    }

    #[test]
    fn invalid_settings_are_reported() {
        let config = Config::from_lookup(lookup(&[("BOOKFAIR_RESERVED_PROBABILITY", "2")]));
        assert_eq!(
            config.generator().err(),
            Some(ConfigError::Catalog(CatalogError::InvalidProbability(2.0)))
        );

        let config = Config::from_lookup(lookup(&[("BOOKFAIR_MAX_SELECTION", "0")]));
        assert_eq!(config.generator().err(), Some(ConfigError::Zero("BOOKFAIR_MAX_SELECTION")));
    }
}
