use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{FamilyChoice, RulesConfig, SelectionConfig};
use crate::types::identifiers::{ContentDigest, Division};
use crate::types::selection_result::{DivisionSummary, SelectionResult};

/// An input file as it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFile {
    pub path: String,
    pub sha256: ContentDigest,
}

impl InputFile {
    pub fn new(path: &Path, contents: &[u8]) -> Self {
        Self {
            path: path.display().to_string(),
            sha256: ContentDigest::from_content(contents),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestInputs {
    pub new_csv: InputFile,
    pub old_csv: Option<InputFile>,
}

/// Audit record of one selection run.
///
/// Everything except `created_at` is a function of the inputs, so two runs
/// with the same seed and files agree on every other field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionManifest {
    pub seed: u64,
    pub filter: bool,
    pub family: FamilyChoice,
    pub divisions: Option<BTreeSet<Division>>,
    pub rules: RulesConfig,
    pub inputs: ManifestInputs,
    pub summary: Vec<DivisionSummary>,
    pub selected_count: usize,
    pub selection_digest: ContentDigest,
    pub created_at: DateTime<Utc>, // informational only
}

impl SelectionManifest {
    pub fn new(
        config: &SelectionConfig,
        inputs: ManifestInputs,
        result: &SelectionResult,
        selection_digest: ContentDigest,
    ) -> Self {
        Self {
            seed: config.seed,
            filter: config.filter,
            family: config.family,
            divisions: config.divisions.clone(),
            rules: config.rules.clone(),
            inputs,
            summary: result.selection.divisions.clone(),
            selected_count: result.names.len(),
            selection_digest,
            created_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
