//! Tier tables and the threshold scoring model.
//!
//! A core's score is the sum of the weights of every breakpoint its total
//! points reach. The tables below are static game data.

use super::types::{Core, CoreKind, CoreResult, Gem, Rarity};

/// Breakpoint value and its score weight.
const BREAKPOINT_WEIGHTS: [(u32, f64); 6] = [
    (10, 1.0),
    (14, 5.0),
    (17, 5.0),
    (18, 0.5),
    (19, 0.5),
    (20, 0.5),
];

/// Extra weight of the 17-point breakpoint on Ancient cores.
pub const ANCIENT_17P_BONUS: f64 = 1.5;

/// Fixed bonus when both synergy partners reach [`SYNERGY_THRESHOLD`].
pub const SYNERGY_BONUS: f64 = 10.0;

/// Points each synergy partner needs on its own.
pub const SYNERGY_THRESHOLD: u32 = 14;

/// First synergy partner.
pub const SYNERGY_FIRST: CoreKind = CoreKind::OrderOfTheSun;

/// Second synergy partner.
pub const SYNERGY_SECOND: CoreKind = CoreKind::OrderOfTheMoon;

/// Game rule: at most this many gems fit in one core.
pub const MAX_GEMS_PER_CORE: usize = 4;

/// Maximum total willpower of a core of the given tier.
pub fn capacity(rarity: Rarity) -> u32 {
    match rarity {
        Rarity::Epic => 9,
        Rarity::Legendary => 12,
        Rarity::Relic => 15,
        Rarity::Ancient => 17,
    }
}

/// Breakpoints of the given tier, ascending.
pub fn breakpoints(rarity: Rarity) -> &'static [u32] {
    match rarity {
        Rarity::Epic => &[10],
        Rarity::Legendary => &[10, 14],
        Rarity::Relic | Rarity::Ancient => &[10, 14, 17, 18, 19, 20],
    }
}

/// Score weight of a single breakpoint on a core of the given tier.
pub fn breakpoint_weight(breakpoint: u32, rarity: Rarity) -> f64 {
    let base = BREAKPOINT_WEIGHTS
        .iter()
        .find(|&&(bp, _)| bp == breakpoint)
        .map_or(0.0, |&(_, w)| w);
    if breakpoint == 17 && rarity == Rarity::Ancient {
        base + ANCIENT_17P_BONUS
    } else {
        base
    }
}

/// Sum of willpower across `gems`, saturating at `u32::MAX`.
pub fn total_willpower(gems: &[Gem]) -> u32 {
    gems.iter().map(Gem::willpower).fold(0, u32::saturating_add)
}

/// Sum of points across `gems`, saturating at `u32::MAX`.
pub fn total_points(gems: &[Gem]) -> u32 {
    gems.iter().map(Gem::points).fold(0, u32::saturating_add)
}

/// Breakpoints of `rarity` reached by `points`, ascending.
pub fn breakpoints_hit(points: u32, rarity: Rarity) -> Vec<u32> {
    breakpoints(rarity)
        .iter()
        .copied()
        .filter(|&bp| bp <= points)
        .collect()
}

/// Score of a core of tier `rarity` holding `points` points.
pub fn score(points: u32, rarity: Rarity) -> f64 {
    breakpoints(rarity)
        .iter()
        .take_while(|&&bp| bp <= points)
        .map(|&bp| breakpoint_weight(bp, rarity))
        .sum()
}

/// Highest score a core of the given tier can reach.
pub fn max_score(rarity: Rarity) -> f64 {
    breakpoints(rarity)
        .iter()
        .map(|&bp| breakpoint_weight(bp, rarity))
        .sum()
}

/// Whether `cores` contain both synergy partner kinds.
pub fn has_synergy_pair(cores: &[Core]) -> bool {
    cores.iter().any(|c| c.kind == SYNERGY_FIRST) && cores.iter().any(|c| c.kind == SYNERGY_SECOND)
}

/// Upper bound on the total score of `cores`, ignoring gem availability.
pub fn max_possible_score(cores: &[Core]) -> f64 {
    let base: f64 = cores.iter().map(|c| max_score(c.rarity)).sum();
    if has_synergy_pair(cores) {
        base + SYNERGY_BONUS
    } else {
        base
    }
}

/// Synergy bonus realized by already computed `results`.
///
/// The partners are the first core of each partner kind in `cores`. A
/// partner without a matching result counts as holding zero points.
pub fn synergy_bonus(cores: &[Core], results: &[CoreResult]) -> f64 {
    let points_of = |kind: CoreKind| -> Option<u32> {
        let core = cores.iter().find(|c| c.kind == kind)?;
        Some(
            results
                .iter()
                .find(|r| r.core_id == core.id)
                .map_or(0, |r| r.total_points),
        )
    };

    match (points_of(SYNERGY_FIRST), points_of(SYNERGY_SECOND)) {
        (Some(first), Some(second))
            if first >= SYNERGY_THRESHOLD && second >= SYNERGY_THRESHOLD =>
        {
            SYNERGY_BONUS
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GemCategory, Rarity};

    #[test]
    fn test_capacity_table() {
        assert_eq!(capacity(Rarity::Epic), 9);
        assert_eq!(capacity(Rarity::Legendary), 12);
        assert_eq!(capacity(Rarity::Relic), 15);
        assert_eq!(capacity(Rarity::Ancient), 17);
    }

    #[test]
    fn test_totals() {
        let gems = vec![
            Gem::new("a", GemCategory::Order, 3, 4),
            Gem {
                id: "b".into(),
                name: String::new(),
                category: GemCategory::Order,
                willpower: None,
                points: Some(5),
                quantity: None,
            },
        ];
        assert_eq!(total_willpower(&gems), 3);
        assert_eq!(total_points(&gems), 9);
        assert_eq!(total_points(&[]), 0);
    }

    #[test]
    fn test_totals_saturate() {
        let gems = vec![
            Gem::new("a", GemCategory::Order, 1, 10),
            Gem::new("b", GemCategory::Order, u32::MAX, u32::MAX),
        ];
        assert_eq!(total_points(&gems), u32::MAX);
        assert_eq!(total_willpower(&gems), u32::MAX);
        assert_eq!(score(total_points(&gems), Rarity::Relic), 12.5);
    }

    #[test]
    fn test_breakpoints_hit() {
        assert_eq!(breakpoints_hit(9, Rarity::Relic), Vec::<u32>::new());
        assert_eq!(breakpoints_hit(10, Rarity::Relic), vec![10]);
        assert_eq!(breakpoints_hit(18, Rarity::Relic), vec![10, 14, 17, 18]);
        assert_eq!(breakpoints_hit(30, Rarity::Legendary), vec![10, 14]);
    }

    #[test]
    fn test_score() {
        assert_eq!(score(0, Rarity::Epic), 0.0);
        assert_eq!(score(10, Rarity::Epic), 1.0);
        assert_eq!(score(14, Rarity::Legendary), 6.0);
        assert_eq!(score(17, Rarity::Relic), 11.0);
        assert_eq!(score(17, Rarity::Ancient), 12.5);
        assert_eq!(score(20, Rarity::Relic), 12.5);
        assert_eq!(score(20, Rarity::Ancient), 14.0);
    }

    #[test]
    fn test_max_score_includes_ancient_bonus() {
        assert_eq!(max_score(Rarity::Epic), 1.0);
        assert_eq!(max_score(Rarity::Legendary), 6.0);
        assert_eq!(max_score(Rarity::Relic), 12.5);
        assert_eq!(max_score(Rarity::Ancient), 14.0);
        for rarity in Rarity::ALL {
            assert_eq!(max_score(rarity), score(u32::MAX, rarity));
        }
    }

    #[test]
    fn test_max_possible_score() {
        let cores = vec![
            Core::new("sun", CoreKind::OrderOfTheSun, Rarity::Relic),
            Core::new("moon", CoreKind::OrderOfTheMoon, Rarity::Epic),
            Core::new("star", CoreKind::ChaosOfTheStar, Rarity::Ancient),
        ];
        assert_eq!(max_possible_score(&cores), 12.5 + 1.0 + 14.0 + SYNERGY_BONUS);
        assert_eq!(max_possible_score(&cores[1..]), 15.0);
        assert_eq!(max_possible_score(&[]), 0.0);
    }

    #[test]
    fn test_synergy_bonus_requires_both_partners() {
        let cores = vec![
            Core::new("sun", CoreKind::OrderOfTheSun, Rarity::Legendary),
            Core::new("moon", CoreKind::OrderOfTheMoon, Rarity::Legendary),
        ];
        let gem = |id: &str, points| Gem::new(id, GemCategory::Order, 1, points);

        let both = vec![
            CoreResult::new(&cores[0], vec![gem("a", 14)]),
            CoreResult::new(&cores[1], vec![gem("b", 15)]),
        ];
        assert_eq!(synergy_bonus(&cores, &both), SYNERGY_BONUS);

        let one = vec![
            CoreResult::new(&cores[0], vec![gem("a", 14)]),
            CoreResult::new(&cores[1], vec![gem("b", 13)]),
        ];
        assert_eq!(synergy_bonus(&cores, &one), 0.0);

        assert_eq!(synergy_bonus(&cores[..1], &both[..1]), 0.0);
    }
}
