pub mod rules;

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::identifiers::Division;
pub use rules::RulesConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No seed given; a selection must be reproducible")]
    MissingSeed,
    #[error("Failed to read rules file {path}: {source}")]
    RulesIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse rules file {path}: {source}")]
    RulesParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid rules: {0}")]
    InvalidRules(String),
    #[error("Selection list and manifest would both be written to {0}")]
    OutputCollision(PathBuf),
}

/// Which directory of a benchmark path names its family.
///
/// The rules have always said top-most, but the scoring tools historically
/// used the bottom-most directory, so both are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyChoice {
    Top,
    #[default]
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub seed: u64,
    pub filter: bool,
    pub family: FamilyChoice,
    /// Restrict selection to these divisions. `None` keeps all.
    pub divisions: Option<BTreeSet<Division>>,
    pub rules: RulesConfig,
}

impl SelectionConfig {
    pub fn new(seed: Option<u64>) -> Result<Self, ConfigError> {
        let seed = seed.ok_or(ConfigError::MissingSeed)?;
        Ok(Self {
            seed,
            filter: false,
            family: FamilyChoice::default(),
            divisions: None,
            rules: RulesConfig::default(),
        })
    }

    pub fn with_filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_family(mut self, family: FamilyChoice) -> Self {
        self.family = family;
        self
    }

    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_divisions<I, S>(mut self, divisions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<Division> = divisions.into_iter().map(Division::new).collect();
        self.divisions = if set.is_empty() { None } else { Some(set) };
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules.validate()
    }

    pub fn admits(&self, division: &Division) -> bool {
        self.divisions
            .as_ref()
            .map_or(true, |allowed| allowed.contains(division))
    }
}
