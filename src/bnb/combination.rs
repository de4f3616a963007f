//! Capacity-bounded gem combination enumeration.

use crate::model::{scoring, Core, Gem};

/// Every index subset of `willpower` with at most `max_len` members whose
/// willpower sum stays within `capacity`.
///
/// Subsets are produced in depth-first, index-increasing order, so each
/// subset appears once. The empty subset always comes first.
pub fn combination_indices(capacity: u32, willpower: &[u32], max_len: usize) -> Vec<Vec<usize>> {
    let mut out = vec![Vec::new()];
    let mut current = Vec::with_capacity(max_len);
    extend(capacity, willpower, max_len, 0, 0, &mut current, &mut out);
    out
}

fn extend(
    capacity: u32,
    willpower: &[u32],
    max_len: usize,
    start: usize,
    used: u32,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if current.len() >= max_len {
        return;
    }
    for i in start..willpower.len() {
        let next = used.saturating_add(willpower[i]);
        if next > capacity {
            continue;
        }
        current.push(i);
        out.push(current.clone());
        extend(capacity, willpower, max_len, i + 1, next, current, out);
        current.pop();
    }
}

/// Valid gem combinations for `core` drawn from `gems`.
///
/// Gems of the other category are ignored. The empty combination is
/// always included as the first entry.
pub fn valid_combinations<'g>(core: &Core, gems: &'g [Gem], max_gems: usize) -> Vec<Vec<&'g Gem>> {
    let compatible: Vec<&Gem> = gems
        .iter()
        .filter(|g| g.category == core.category())
        .collect();
    let willpower: Vec<u32> = compatible.iter().map(|g| g.willpower()).collect();

    combination_indices(scoring::capacity(core.rarity), &willpower, max_gems)
        .into_iter()
        .map(|combo| combo.into_iter().map(|i| compatible[i]).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CoreKind, GemCategory, Rarity};

    #[test]
    fn test_empty_pool_yields_empty_combination() {
        let combos = combination_indices(10, &[], 4);
        assert_eq!(combos, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_order_and_capacity() {
        let combos = combination_indices(5, &[2, 3, 4], 4);
        assert_eq!(
            combos,
            vec![vec![], vec![0], vec![0, 1], vec![1], vec![2]]
        );
    }

    #[test]
    fn test_max_len_caps_subset_size() {
        let willpower = vec![1; 6];
        let combos = combination_indices(100, &willpower, 4);
        assert!(combos.iter().all(|c| c.len() <= 4));
        // C(6,0) + C(6,1) + C(6,2) + C(6,3) + C(6,4)
        assert_eq!(combos.len(), 1 + 6 + 15 + 20 + 15);
    }

    #[test]
    fn test_no_duplicates() {
        let combos = combination_indices(20, &[1, 2, 3, 4, 5], 4);
        let mut seen = std::collections::HashSet::new();
        for combo in &combos {
            assert!(combo.windows(2).all(|w| w[0] < w[1]));
            assert!(seen.insert(combo.clone()), "duplicate combination {combo:?}");
        }
    }

    #[test]
    fn test_skips_oversized_but_continues() {
        // Index 1 alone exceeds capacity, later indices still combine.
        let combos = combination_indices(6, &[3, 9, 3], 4);
        assert_eq!(combos, vec![vec![], vec![0], vec![0, 2], vec![2]]);
    }

    #[test]
    fn test_valid_combinations_filters_category() {
        let core = Core::new("c", CoreKind::OrderOfTheStar, Rarity::Epic);
        let gems = vec![
            Gem::new("o1", GemCategory::Order, 5, 10),
            Gem::new("x1", GemCategory::Chaos, 1, 10),
            Gem::new("o2", GemCategory::Order, 5, 10),
        ];
        let combos = valid_combinations(&core, &gems, 4);
        let ids: Vec<Vec<&str>> = combos
            .iter()
            .map(|c| c.iter().map(|g| g.id.as_str()).collect())
            .collect();
        // Both order gems together need 10 willpower, over Epic capacity 9.
        assert_eq!(ids, vec![vec![], vec!["o1"], vec!["o2"]]);
    }
}
