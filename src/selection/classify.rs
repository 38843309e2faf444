use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{BenchmarkRecord, Dataset, JobResult};
use crate::types::identifiers::{BenchmarkName, Division, Family};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Only in the new results.
    New,
    /// Only in the prior-year results.
    Old,
    /// In both; already seen, so it competes as an old benchmark.
    Duplicate,
}

/// A benchmark from the union of both datasets.
/// Borrows the records to avoid cloning results before selection.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub name: &'a BenchmarkName,
    /// Path as spelled in the export, new export first.
    pub path: &'a str,
    pub division: &'a Division,
    pub family: &'a Family,
    pub class: Classification,

    pub new: Option<&'a BenchmarkRecord>,
    pub old: Option<&'a BenchmarkRecord>,
}

impl<'a> Candidate<'a> {
    fn from_new(record: &'a BenchmarkRecord) -> Self {
        Self {
            name: &record.name,
            path: &record.path,
            division: &record.division,
            family: &record.family,
            class: Classification::New,
            new: Some(record),
            old: None,
        }
    }

    fn from_old(record: &'a BenchmarkRecord) -> Self {
        Self {
            name: &record.name,
            path: &record.path,
            division: &record.division,
            family: &record.family,
            class: Classification::Old,
            new: None,
            old: Some(record),
        }
    }

    pub fn is_new(&self) -> bool {
        self.class == Classification::New
    }

    /// Every job pair known for this benchmark, new results first.
    pub fn results(&self) -> impl Iterator<Item = &'a JobResult> {
        let new = self.new.map(|r| r.results.as_slice()).unwrap_or_default();
        let old = self.old.map(|r| r.results.as_slice()).unwrap_or_default();
        new.iter().chain(old.iter())
    }
}

/// Union of both datasets keyed by name, sorted by name.
///
/// Sorting makes the selection independent of row order in the exports.
pub fn classify<'a>(new: &'a Dataset, old: &'a Dataset) -> Vec<Candidate<'a>> {
    let mut by_name: BTreeMap<&'a BenchmarkName, Candidate<'a>> = BTreeMap::new();

    for record in new.iter() {
        by_name.insert(&record.name, Candidate::from_new(record));
    }

    for record in old.iter() {
        match by_name.entry(&record.name) {
            Entry::Occupied(mut seen) => {
                let candidate = seen.get_mut();
                candidate.class = Classification::Duplicate;
                candidate.old = Some(record);
            }
            Entry::Vacant(slot) => {
                slot.insert(Candidate::from_old(record));
            }
        }
    }

    by_name.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FamilyChoice;
    use crate::dataset::DatasetBuilder;

    fn dataset(names: &[&str]) -> Dataset {
        let mut builder = DatasetBuilder::new(FamilyChoice::Bot);
        for name in names {
            builder.push(name, None).unwrap();
        }
        builder.finish()
    }

    #[test]
    fn union_is_sorted_and_classified() {
        let new = dataset(&["QF_BV/f/c", "QF_BV/f/a"]);
        let old = dataset(&["QF_BV/f/b", "QF_BV/f/a"]);

        let candidates = classify(&new, &old);
        let seen: Vec<(&str, Classification)> = candidates
            .iter()
            .map(|c| (c.name.as_str(), c.class))
            .collect();

        assert_eq!(
            seen,
            vec![
                ("QF_BV/f/a", Classification::Duplicate),
                ("QF_BV/f/b", Classification::Old),
                ("QF_BV/f/c", Classification::New),
            ]
        );
        assert!(candidates[0].new.is_some() && candidates[0].old.is_some());
    }

    #[test]
    fn duplicate_keeps_the_new_spelling() {
        let new = dataset(&["SMT-LIB/QF_BV/f/a"]);
        let old = dataset(&["Archive/QF_BV/f/a"]);

        let candidates = classify(&new, &old);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].class, Classification::Duplicate);
        assert_eq!(candidates[0].path, "SMT-LIB/QF_BV/f/a");
    }

    #[test]
    fn empty_old_means_everything_is_new() {
        let new = dataset(&["a", "b"]);
        let old = Dataset::empty();
        assert!(classify(&new, &old).iter().all(|c| c.is_new()));
    }
}
