//! Deterministic, rule-constrained benchmark selection for competition tracks.
//!
//! `benchmark-selection` loads results exports of the new and the prior-year
//! benchmarks, classifies every benchmark as new, old or duplicate, applies
//! the competition's eligibility filters and draws a seeded sample per
//! division. The same seed, rules and inputs always produce the same list,
//! byte-for-byte.

pub mod config;
pub mod dataset;
pub mod output;
pub mod run;
pub mod selection;
pub mod types;

pub use config::{ConfigError, FamilyChoice, RulesConfig, SelectionConfig};
pub use dataset::{Dataset, InputError};
pub use run::{run, RunReport, RunRequest};
pub use selection::Selector;
pub use types::{SelectionError, SelectionResult};
