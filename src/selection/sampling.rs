use std::collections::BTreeMap;

use rand::seq::{index, SliceRandom};
use rand::Rng;

use super::classify::Candidate;
use crate::types::identifiers::Family;

/// Draw `quota` candidates from `pool` with family coverage.
///
/// A pool that fits the quota is returned whole, in its original order, and
/// consumes no randomness. Otherwise families are visited in random order and
/// each contributes one random member until the quota runs out; the remainder
/// is drawn uniformly from what is left. The returned order is the draw order.
pub fn draw<'a, R: Rng + ?Sized>(
    pool: Vec<Candidate<'a>>,
    quota: usize,
    rng: &mut R,
) -> Vec<Candidate<'a>> {
    if quota >= pool.len() {
        return pool;
    }

    let mut families: BTreeMap<&Family, Vec<usize>> = BTreeMap::new();
    for (i, candidate) in pool.iter().enumerate() {
        families.entry(candidate.family).or_default().push(i);
    }
    let mut groups: Vec<Vec<usize>> = families.into_values().collect();
    groups.shuffle(rng);

    let mut taken = vec![false; pool.len()];
    let mut order = Vec::with_capacity(quota);

    // 1. Coverage: one member per family
    for members in groups.iter().take(quota) {
        let pick = members[rng.gen_range(0..members.len())];
        taken[pick] = true;
        order.push(pick);
    }

    // 2. Fill: uniform over the rest
    let rest: Vec<usize> = (0..pool.len()).filter(|&i| !taken[i]).collect();
    let remaining = quota - order.len();
    for picked in index::sample(rng, rest.len(), remaining).into_iter() {
        order.push(rest[picked]);
    }

    debug_assert_eq!(order.len(), quota);

    let mut slots: Vec<Option<Candidate<'a>>> = pool.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FamilyChoice;
    use crate::dataset::{Dataset, DatasetBuilder};
    use crate::selection::classify::classify;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn old_pool(families: usize, per_family: usize) -> Dataset {
        let mut builder = DatasetBuilder::new(FamilyChoice::Top);
        for f in 0..families {
            for b in 0..per_family {
                let raw = format!("QF_LIA/fam{f:02}/b{b:03}.smt2");
                builder.push(&raw, None).unwrap();
            }
        }
        builder.finish()
    }

    #[test]
    fn pool_within_quota_is_kept_in_order() {
        let old = old_pool(2, 3);
        let new = Dataset::empty();
        let pool = classify(&new, &old);
        let expected: Vec<String> = pool.iter().map(|c| c.name.to_string()).collect();

        let mut rng = StdRng::seed_from_u64(1);
        let drawn = draw(pool, 6, &mut rng);
        let got: Vec<String> = drawn.iter().map(|c| c.name.to_string()).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn every_family_is_covered_when_quota_allows() {
        let old = old_pool(5, 20);
        let new = Dataset::empty();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let drawn = draw(classify(&new, &old), 8, &mut rng);
            assert_eq!(drawn.len(), 8);

            let families: BTreeSet<&str> = drawn.iter().map(|c| c.family.as_str()).collect();
            assert_eq!(families.len(), 5, "seed {seed} missed a family");

            let names: BTreeSet<&str> = drawn.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names.len(), 8, "seed {seed} drew a duplicate");
        }
    }

    #[test]
    fn more_families_than_quota() {
        let old = old_pool(10, 2);
        let new = Dataset::empty();
        let mut rng = StdRng::seed_from_u64(3);
        let drawn = draw(classify(&new, &old), 4, &mut rng);

        let families: BTreeSet<&str> = drawn.iter().map(|c| c.family.as_str()).collect();
        assert_eq!(families.len(), 4);
    }
}
