//! Splitting a grid into independent per-category problems.

use crate::model::{Core, CoreResult, Gem, GemCategory};

/// The cores and gems of one category.
///
/// Cores keep their index in the caller's list so results can be merged
/// back in input order.
#[derive(Debug, Clone)]
pub(crate) struct Partition<'a> {
    pub category: GemCategory,
    pub cores: Vec<(usize, &'a Core)>,
    pub gems: Vec<&'a Gem>,
}

impl<'a> Partition<'a> {
    fn new(category: GemCategory, cores: &'a [Core], gems: &'a [Gem]) -> Self {
        Self {
            category,
            cores: cores
                .iter()
                .enumerate()
                .filter(|(_, c)| c.category() == category)
                .collect(),
            gems: gems.iter().filter(|g| g.category == category).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cores.is_empty()
    }
}

/// Splits `cores` and `gems` into one partition per category, in
/// [`GemCategory::ALL`] order.
pub(crate) fn partition<'a>(cores: &'a [Core], gems: &'a [Gem]) -> [Partition<'a>; 2] {
    GemCategory::ALL.map(|category| Partition::new(category, cores, gems))
}

/// Merges per-partition results, keyed by input index, into one list in
/// the order of `cores`. Cores without a result receive an empty one.
pub(crate) fn merge_results(
    cores: &[Core],
    parts: impl IntoIterator<Item = Vec<(usize, CoreResult)>>,
) -> Vec<CoreResult> {
    let mut slots: Vec<Option<CoreResult>> = vec![None; cores.len()];
    for (index, result) in parts.into_iter().flatten() {
        if let Some(slot) = slots.get_mut(index) {
            *slot = Some(result);
        }
    }
    slots
        .into_iter()
        .zip(cores)
        .map(|(slot, core)| slot.unwrap_or_else(|| CoreResult::empty(core)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CoreKind, Rarity};

    fn grid() -> (Vec<Core>, Vec<Gem>) {
        let cores = vec![
            Core::new("c-sun", CoreKind::ChaosOfTheSun, Rarity::Relic),
            Core::new("o-sun", CoreKind::OrderOfTheSun, Rarity::Epic),
            Core::new("o-star", CoreKind::OrderOfTheStar, Rarity::Ancient),
        ];
        let gems = vec![
            Gem::new("g1", GemCategory::Order, 4, 5),
            Gem::new("g2", GemCategory::Chaos, 4, 5),
            Gem::new("g3", GemCategory::Order, 3, 4),
        ];
        (cores, gems)
    }

    #[test]
    fn test_partition_by_category() {
        let (cores, gems) = grid();
        let [order, chaos] = partition(&cores, &gems);

        assert_eq!(order.category, GemCategory::Order);
        let order_cores: Vec<usize> = order.cores.iter().map(|(i, _)| *i).collect();
        assert_eq!(order_cores, vec![1, 2]);
        let order_gems: Vec<&str> = order.gems.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(order_gems, vec!["g1", "g3"]);

        assert_eq!(chaos.category, GemCategory::Chaos);
        assert_eq!(chaos.cores.len(), 1);
        assert_eq!(chaos.cores[0].0, 0);
        assert_eq!(chaos.gems.len(), 1);
    }

    #[test]
    fn test_partition_without_cores_is_empty() {
        let (cores, gems) = grid();
        let [order, _] = partition(&cores[..1], &gems);
        assert!(order.is_empty());
        assert_eq!(order.gems.len(), 2);
    }

    #[test]
    fn test_merge_restores_input_order() {
        let (cores, gems) = grid();
        let order_part = vec![
            (2, CoreResult::new(&cores[2], vec![gems[0].clone()])),
            (1, CoreResult::empty(&cores[1])),
        ];
        let merged = merge_results(&cores, vec![order_part]);

        let ids: Vec<&str> = merged.iter().map(|r| r.core_id.as_str()).collect();
        assert_eq!(ids, vec!["c-sun", "o-sun", "o-star"]);
        // Core 0 had no result and is filled in empty.
        assert!(merged[0].gems.is_empty());
        assert_eq!(merged[2].gems.len(), 1);
    }
}
