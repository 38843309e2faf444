use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::dataset::InputError;
use crate::output::OutputError;
use crate::types::identifiers::Division;

/// Per-division accounting of one selection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionSummary {
    pub division: Division,

    pub new: usize,
    pub old: usize,
    pub duplicates: usize,

    pub removed_easy: usize,
    pub removed_disagreement: usize,
    pub removed_family_cap: usize,

    /// Size of the pool the quota was drawn from.
    pub eligible_old: usize,
    pub quota: usize,
    pub selected: usize,
}

impl DivisionSummary {
    pub fn new(division: Division) -> Self {
        Self {
            division,
            new: 0,
            old: 0,
            duplicates: 0,
            removed_easy: 0,
            removed_disagreement: 0,
            removed_family_cap: 0,
            eligible_old: 0,
            quota: 0,
            selected: 0,
        }
    }

    pub fn candidates(&self) -> usize {
        self.new + self.old + self.duplicates
    }

    pub fn removed(&self) -> usize {
        self.removed_easy + self.removed_disagreement + self.removed_family_cap
    }
}

/// Metadata describing the outcome of the selection process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionMetadata {
    pub seed: u64,
    pub filter: bool,

    pub candidates_considered: usize,
    pub excluded_by_division: usize,
    /// Candidates left after filtering: new benchmarks plus the sampled pools.
    pub candidates_eligible: usize,
    pub selected: usize,

    pub divisions: Vec<DivisionSummary>,
}

/// The final, ordered selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Benchmark paths as spelled in the exports.
    pub names: Vec<String>,
    pub selection: SelectionMetadata,
}

impl SelectionResult {
    /// One name per line, in selection order, newline terminated.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.names.iter().map(|n| n.len() + 1).sum());
        for name in &self.names {
            out.push_str(name);
            out.push('\n');
        }
        out
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl SelectionError {
    pub fn exit_code(&self) -> u8 {
        match self {
            SelectionError::Input(_) => 1,
            SelectionError::Config(_) => 2,
            SelectionError::Output(_) => 3,
        }
    }
}
