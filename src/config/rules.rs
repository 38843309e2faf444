use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    /// Wallclock seconds under which a prior-year solve counts as trivial.
    pub easy_time_limit: f64,
    /// Divisions with at most this many eligible old benchmarks keep all of them.
    pub small_division: usize,
    /// Upper bound of the medium band, which is cut down to `medium_quota`.
    pub medium_division: usize,
    pub medium_quota: usize,
    /// Share of eligible old benchmarks kept in large divisions.
    pub large_fraction: f64,
    /// Maximum number of old candidates a single family may contribute.
    pub family_cap: Option<usize>,
    /// New benchmarks bypass sampling and are always selected.
    pub include_new: bool,
}

impl RulesConfig {
    /// Rule set of the 2019 single query track.
    pub fn smtcomp_2019() -> Self {
        Self {
            easy_time_limit: 1.0,
            small_division: 300,
            medium_division: 600,
            medium_quota: 300,
            large_fraction: 0.5,
            family_cap: None,
            include_new: true,
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read(path).map_err(|source| ConfigError::RulesIo {
            path: path.to_path_buf(),
            source,
        })?;
        let rules: RulesConfig =
            serde_json::from_slice(&raw).map_err(|source| ConfigError::RulesParse {
                path: path.to_path_buf(),
                source,
            })?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.easy_time_limit.is_finite() || self.easy_time_limit < 0.0 {
            return Err(ConfigError::InvalidRules(format!(
                "easy_time_limit must be a non-negative number, got {}",
                self.easy_time_limit
            )));
        }
        if !(self.large_fraction > 0.0 && self.large_fraction <= 1.0) {
            return Err(ConfigError::InvalidRules(format!(
                "large_fraction must be in (0, 1], got {}",
                self.large_fraction
            )));
        }
        if self.small_division > self.medium_division {
            return Err(ConfigError::InvalidRules(format!(
                "small_division ({}) exceeds medium_division ({})",
                self.small_division, self.medium_division
            )));
        }
        if self.medium_quota > self.medium_division {
            return Err(ConfigError::InvalidRules(format!(
                "medium_quota ({}) exceeds medium_division ({})",
                self.medium_quota, self.medium_division
            )));
        }
        if self.family_cap == Some(0) {
            return Err(ConfigError::InvalidRules(
                "family_cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of old benchmarks to draw from a pool of `eligible`.
    pub fn old_quota(&self, eligible: usize) -> usize {
        let quota = if eligible <= self.small_division {
            eligible
        } else if eligible <= self.medium_division {
            self.medium_quota
        } else {
            (eligible as f64 * self.large_fraction).ceil() as usize
        };
        quota.min(eligible)
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::smtcomp_2019()
    }
}
