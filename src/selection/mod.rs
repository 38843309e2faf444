pub mod classify;
pub mod filters;
pub mod sampling;

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::SelectionConfig;
use crate::dataset::Dataset;
use crate::types::identifiers::Division;
use crate::types::selection_result::{DivisionSummary, SelectionMetadata, SelectionResult};
pub use classify::{classify, Candidate, Classification};
pub use filters::{cap_families, is_disputed, is_easy, removal, unsound_solvers, Removal};
pub use sampling::draw;

/// Rule-constrained, seeded benchmark selection.
///
/// `select` is a pure function of the config and the two datasets: one
/// generator seeded from `config.seed` is consumed division by division in
/// sorted order, family caps before sampling.
pub struct Selector {
	config: SelectionConfig,
}

impl Selector {
	pub fn new(config: SelectionConfig) -> Self {
		Self { config }
	}

	pub fn select(&self, new: &Dataset, old: &Dataset) -> SelectionResult {
		let config = &self.config;
		let rules = &config.rules;
		let mut rng = StdRng::seed_from_u64(config.seed);

		if new.is_empty() {
			warn!("new results are empty, only prior benchmarks can be selected");
		}

		// 1. Classification Phase
		let candidates = classify(new, old);
		let candidates_considered = candidates.len();

		let mut divisions: BTreeMap<&Division, Vec<Candidate<'_>>> = BTreeMap::new();
		let mut excluded_by_division = 0;
		for candidate in candidates {
			if config.admits(candidate.division) {
				divisions.entry(candidate.division).or_default().push(candidate);
			} else {
				excluded_by_division += 1;
			}
		}

		if let Some(loose) = divisions.keys().find(|d| !d.is_known()) {
			warn!(
				benchmarks = divisions[loose].len(),
				"benchmarks without a division are selected as one group"
			);
		}

		let unsound: BTreeSet<&str> = if config.filter {
			unsound_solvers(&[new, old])
		} else {
			BTreeSet::new()
		};
		if !unsound.is_empty() {
			debug!(?unsound, "ignoring unsound solvers when looking for disagreements");
		}

		let mut names = Vec::new();
		let mut summaries = Vec::with_capacity(divisions.len());
		let mut candidates_eligible = 0;

		for (division, members) in divisions {
			let mut summary = DivisionSummary::new(division.clone());
			let mut fresh = Vec::new();
			let mut pool = Vec::new();

			for candidate in members {
				match candidate.class {
					Classification::New => summary.new += 1,
					Classification::Old => summary.old += 1,
					Classification::Duplicate => summary.duplicates += 1,
				}

				// 2. Filtering Phase
				if config.filter {
					match removal(&candidate, rules.easy_time_limit, &unsound) {
						Some(Removal::Easy) => {
							summary.removed_easy += 1;
							continue;
						}
						Some(Removal::Disagreement) => {
							summary.removed_disagreement += 1;
							continue;
						}
						None => {}
					}
				}

				if candidate.is_new() && rules.include_new {
					fresh.push(candidate);
				} else {
					pool.push(candidate);
				}
			}

			if config.filter {
				if let Some(cap) = rules.family_cap {
					let (kept, removed) = cap_families(pool, cap, &mut rng);
					pool = kept;
					summary.removed_family_cap = removed;
				}
			}

			// 3. Sampling Phase
			summary.eligible_old = pool.len();
			summary.quota = rules.old_quota(pool.len());
			let drawn = draw(pool, summary.quota, &mut rng);

			summary.selected = fresh.len() + drawn.len();
			candidates_eligible += fresh.len() + summary.eligible_old;

			info!(
				division = %summary.division,
				new = summary.new,
				old = summary.old,
				duplicates = summary.duplicates,
				removed = summary.removed(),
				quota = summary.quota,
				selected = summary.selected,
				"division selected"
			);

			names.extend(fresh.iter().chain(drawn.iter()).map(|c| c.path.to_string()));
			summaries.push(summary);
		}

		debug_assert!({
			let unique: BTreeSet<_> = names.iter().collect();
			unique.len() == names.len()
		});

		let selection = SelectionMetadata {
			seed: config.seed,
			filter: config.filter,
			candidates_considered,
			excluded_by_division,
			candidates_eligible,
			selected: names.len(),
			divisions: summaries,
		};

		SelectionResult { names, selection }
	}
}
