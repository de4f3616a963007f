//! Crate-level entry points with the default configuration.

use crate::bnb::{BnbRunner, SolverConfig};
use crate::model::{scoring, Core, CoreResult, Gem};

/// Assigns `gems` to `cores` maximizing the total score.
///
/// Returns one result per core, in the order of `cores`. Cores that
/// receive nothing get an empty result.
///
/// # Examples
///
/// ```
/// use u_arkgrid::model::{Core, CoreKind, Gem, GemCategory, Rarity};
///
/// let cores = vec![
///     Core::new("sun", CoreKind::OrderOfTheSun, Rarity::Legendary),
///     Core::new("moon", CoreKind::OrderOfTheMoon, Rarity::Legendary),
/// ];
/// let gems = vec![
///     Gem::new("a", GemCategory::Order, 6, 14),
///     Gem::new("b", GemCategory::Order, 6, 14),
/// ];
///
/// let results = u_arkgrid::solve(&cores, &gems);
/// assert_eq!(results.len(), 2);
/// assert_eq!(u_arkgrid::synergy_bonus(&cores, &results), 10.0);
/// ```
pub fn solve(cores: &[Core], gems: &[Gem]) -> Vec<CoreResult> {
    BnbRunner::run(cores, gems, &SolverConfig::default()).results
}

/// Like [`solve`], reporting progress as a non-decreasing percentage.
/// 100 is reported exactly once, when the search completes.
pub fn solve_with_progress<F: FnMut(u8)>(
    cores: &[Core],
    gems: &[Gem],
    on_progress: F,
) -> Vec<CoreResult> {
    BnbRunner::run_with_progress(cores, gems, &SolverConfig::default(), on_progress).results
}

/// Upper bound on the total score of `cores`, ignoring which gems exist.
pub fn max_possible_score(cores: &[Core]) -> f64 {
    scoring::max_possible_score(cores)
}

/// Synergy bonus realized by `results`; no search is performed.
pub fn synergy_bonus(cores: &[Core], results: &[CoreResult]) -> f64 {
    scoring::synergy_bonus(cores, results)
}
