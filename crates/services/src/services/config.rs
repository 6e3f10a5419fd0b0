//! Configuration for health trend analysis.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use ts_rs::TS;

pub const DEFAULT_MAX_DAYS: u32 = 30;

pub const MAX_DAYS_ENV: &str = "HEALTH_TREND_MAX_DAYS";
pub const ORDERING_ENV: &str = "HEALTH_TREND_ORDERING";

#[derive(Debug, Error)]
pub enum HealthTrendConfigError {
    #[error("invalid HEALTH_TREND_MAX_DAYS value: {0:?}")]
    InvalidMaxDays(String),
    #[error("invalid HEALTH_TREND_ORDERING value: {0:?} (expected trust_caller or sort_by_date)")]
    InvalidOrdering(String),
    #[error("max_days must be at least 1")]
    ZeroMaxDays,
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How the analyzer treats the order of incoming snapshots
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SnapshotOrdering {
    /// Snapshots are analyzed in the order given, newest first.
    #[default]
    TrustCaller,
    /// Snapshots are sorted newest first by snapshot date before analysis.
    SortByDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct HealthTrendConfig {
    #[serde(default = "default_max_days")]
    pub max_days: u32,
    #[serde(default)]
    pub ordering: SnapshotOrdering,
}

fn default_max_days() -> u32 {
    DEFAULT_MAX_DAYS
}

impl Default for HealthTrendConfig {
    fn default() -> Self {
        Self {
            max_days: default_max_days(),
            ordering: SnapshotOrdering::default(),
        }
    }
}

impl HealthTrendConfig {
    /// Parse and validate a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self, HealthTrendConfigError> {
        let config = Self::parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document without validating it, for layering further overrides on top
    pub fn parse_toml(content: &str) -> Result<Self, HealthTrendConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply HEALTH_TREND_MAX_DAYS / HEALTH_TREND_ORDERING overrides from a lookup,
    /// typically `std::env::var`
    pub fn apply_lookup<F>(&mut self, lookup: F) -> Result<(), HealthTrendConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(MAX_DAYS_ENV) {
            self.max_days = raw
                .trim()
                .parse()
                .map_err(|_| HealthTrendConfigError::InvalidMaxDays(raw.clone()))?;
        }

        if let Some(raw) = lookup(ORDERING_ENV) {
            self.ordering = raw
                .trim()
                .parse()
                .map_err(|_| HealthTrendConfigError::InvalidOrdering(raw.clone()))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), HealthTrendConfigError> {
        if self.max_days == 0 {
            return Err(HealthTrendConfigError::ZeroMaxDays);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = HealthTrendConfig::default();
        assert_eq!(config.max_days, 30);
        assert_eq!(config.ordering, SnapshotOrdering::TrustCaller);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lookup_overrides() {
        let mut config = HealthTrendConfig::default();
        config
            .apply_lookup(lookup_from(&[
                (MAX_DAYS_ENV, " 14 "),
                (ORDERING_ENV, "sort_by_date"),
            ]))
            .unwrap();

        assert_eq!(config.max_days, 14);
        assert_eq!(config.ordering, SnapshotOrdering::SortByDate);
    }

    #[test]
    fn test_lookup_without_keys_keeps_values() {
        let mut config = HealthTrendConfig {
            max_days: 7,
            ordering: SnapshotOrdering::SortByDate,
        };
        config.apply_lookup(|_| None).unwrap();
        assert_eq!(config.max_days, 7);
        assert_eq!(config.ordering, SnapshotOrdering::SortByDate);
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let mut config = HealthTrendConfig::default();
        let err = config
            .apply_lookup(lookup_from(&[(MAX_DAYS_ENV, "-3")]))
            .unwrap_err();
        assert!(matches!(err, HealthTrendConfigError::InvalidMaxDays(ref v) if v == "-3"));

        let err = config
            .apply_lookup(lookup_from(&[(ORDERING_ENV, "newest")]))
            .unwrap_err();
        assert!(matches!(err, HealthTrendConfigError::InvalidOrdering(_)));
    }

    #[test]
    fn test_zero_max_days_rejected() {
        let config = HealthTrendConfig {
            max_days: 0,
            ordering: SnapshotOrdering::TrustCaller,
        };
        assert!(matches!(
            config.validate(),
            Err(HealthTrendConfigError::ZeroMaxDays)
        ));
    }

    #[test]
    fn test_from_toml_fills_defaults() {
        let config = HealthTrendConfig::from_toml_str("ordering = \"sort_by_date\"\n").unwrap();
        assert_eq!(config.max_days, DEFAULT_MAX_DAYS);
        assert_eq!(config.ordering, SnapshotOrdering::SortByDate);

        let config = HealthTrendConfig::from_toml_str("max_days = 90\n").unwrap();
        assert_eq!(config.max_days, 90);
        assert_eq!(config.ordering, SnapshotOrdering::TrustCaller);
    }

    #[test]
    fn test_parse_toml_defers_validation() {
        let config = HealthTrendConfig::parse_toml("max_days = 0\n").unwrap();
        assert_eq!(config.max_days, 0);
        assert!(config.validate().is_err());

        assert!(matches!(
            HealthTrendConfig::parse_toml("ordering = \"newest\"\n"),
            Err(HealthTrendConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_toml_errors() {
        assert!(matches!(
            HealthTrendConfig::from_toml_str("max_days = 0\n"),
            Err(HealthTrendConfigError::ZeroMaxDays)
        ));
        assert!(matches!(
            HealthTrendConfig::from_toml_str("max_days = \"a lot\"\n"),
            Err(HealthTrendConfigError::Parse(_))
        ));
    }
}
