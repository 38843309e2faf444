use std::collections::{BTreeMap, BTreeSet};

use rand::seq::index;
use rand::Rng;

use super::classify::Candidate;
use crate::dataset::{BenchmarkRecord, Dataset, Verdict};
use crate::types::identifiers::Family;

/// Why a candidate was dropped before sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Easy,
    Disagreement,
}

/// Solved correctly by every prior run within `limit` seconds.
/// A benchmark nobody ran is never easy.
pub fn is_easy(record: &BenchmarkRecord, limit: f64) -> bool {
    !record.results.is_empty() && record.results.iter().all(|r| r.solved_within(limit))
}

/// Solvers that gave a definite answer contradicting a known expected status.
pub fn unsound_solvers<'a>(datasets: &[&'a Dataset]) -> BTreeSet<&'a str> {
    datasets
        .iter()
        .copied()
        .flat_map(|dataset| dataset.iter())
        .flat_map(|record| record.results.iter())
        .filter(|job| job.is_wrong())
        .map(|job| job.solver.as_str())
        .collect()
}

/// Unknown-status benchmark for which sound solvers report both sat and unsat.
pub fn is_disputed(candidate: &Candidate<'_>, unsound: &BTreeSet<&str>) -> bool {
    let known = [candidate.new, candidate.old]
        .into_iter()
        .flatten()
        .any(|record| record.expected().is_definite());
    if known {
        return false;
    }

    let mut sat = false;
    let mut unsat = false;
    for job in candidate.results() {
        if unsound.contains(job.solver.as_str()) {
            continue;
        }
        match job.result {
            Verdict::Sat => sat = true,
            Verdict::Unsat => unsat = true,
            Verdict::Unknown => {}
        }
    }
    sat && unsat
}

/// First rule a candidate fails, in rule order.
pub fn removal(
    candidate: &Candidate<'_>,
    easy_time_limit: f64,
    unsound: &BTreeSet<&str>,
) -> Option<Removal> {
    if candidate
        .old
        .is_some_and(|prior| is_easy(prior, easy_time_limit))
    {
        return Some(Removal::Easy);
    }
    if is_disputed(candidate, unsound) {
        return Some(Removal::Disagreement);
    }
    None
}

/// Cut every family to at most `cap` old candidates, chosen at random.
/// New candidates are never capped. Survivors keep their relative order.
/// Returns the survivors and the number removed.
pub fn cap_families<'a, R: Rng + ?Sized>(
    pool: Vec<Candidate<'a>>,
    cap: usize,
    rng: &mut R,
) -> (Vec<Candidate<'a>>, usize) {
    let mut families: BTreeMap<&Family, Vec<usize>> = BTreeMap::new();
    for (i, candidate) in pool.iter().enumerate() {
        if !candidate.is_new() {
            families.entry(candidate.family).or_default().push(i);
        }
    }

    let mut keep = vec![true; pool.len()];
    let mut removed = 0;
    for members in families.values().filter(|m| m.len() > cap) {
        members.iter().for_each(|&i| keep[i] = false);
        for picked in index::sample(rng, members.len(), cap).into_iter() {
            keep[members[picked]] = true;
        }
        removed += members.len() - cap;
    }

    let survivors = pool
        .into_iter()
        .zip(keep)
        .filter_map(|(candidate, kept)| kept.then_some(candidate))
        .collect();
    (survivors, removed)
}
