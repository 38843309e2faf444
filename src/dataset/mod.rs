pub mod loader;
pub mod record;

use std::collections::HashMap;

use tracing::warn;

use crate::config::FamilyChoice;
use crate::types::identifiers::{BenchmarkName, BenchmarkNameError};

pub use loader::{load_dataset, load_dataset_file, InputError, REQUIRED_COLUMNS};
pub use record::{BenchmarkRecord, JobResult, Verdict};

// This is intentionally thin:
// no mutation after load
// lookups and iteration only

/// Benchmarks of one results export, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<BenchmarkRecord>,
    index: HashMap<BenchmarkName, usize>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &BenchmarkName) -> Option<&BenchmarkRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    pub fn get_str(&self, name: &str) -> Option<&BenchmarkRecord> {
        let name = BenchmarkName::parse(name).ok()?;
        self.get(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BenchmarkRecord> {
        self.records.iter()
    }
}

/// Folds job pair rows into one record per benchmark.
pub struct DatasetBuilder {
    family: FamilyChoice,
    dataset: Dataset,
}

impl DatasetBuilder {
    pub fn new(family: FamilyChoice) -> Self {
        Self {
            family,
            dataset: Dataset::empty(),
        }
    }

    /// Add one row for the benchmark at `path`. The first spelling of a key wins.
    pub fn push(&mut self, path: &str, job: Option<JobResult>) -> Result<(), BenchmarkNameError> {
        let name = BenchmarkName::parse(path)?;
        let path = path.trim();
        let family = self.family;
        let Dataset { records, index } = &mut self.dataset;

        let slot = match index.get(&name) {
            Some(&slot) => {
                let kept = &records[slot].path;
                if kept != path {
                    warn!(%name, kept = %kept, folded = %path, "two paths share one benchmark key");
                }
                slot
            }
            None => {
                records.push(BenchmarkRecord {
                    division: name.division(),
                    family: name.family(family),
                    path: path.to_string(),
                    name: name.clone(),
                    results: Vec::new(),
                });
                index.insert(name, records.len() - 1);
                records.len() - 1
            }
        };

        if let Some(job) = job {
            records[slot].results.push(job);
        }
        Ok(())
    }

    pub fn finish(self) -> Dataset {
        self.dataset
    }
}
