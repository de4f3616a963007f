//! Branch-and-bound execution engine.
//!
//! # Algorithm
//!
//! 1. Split cores and gems by category; each category is solved alone
//! 2. Order the category's cores by ascending rarity
//! 3. Enumerate every core's valid combinations against the category's
//!    full gem pool and sort them by descending score
//! 4. Depth-first over the cores: try each combination whose gems are all
//!    unused, mark its gems, recurse, then unmark
//! 5. Before expanding a core, prune when the accumulated score plus an
//!    optimistic bound for the remaining cores and the synergy bonus
//!    cannot beat the incumbent
//! 6. At a leaf, add the synergy bonus and replace the incumbent only on
//!    strict improvement, so ties keep the assignment found first
//!
//! The bound never underestimates what the remaining cores can reach,
//! so the returned assignment is optimal.

use std::collections::HashSet;
use std::convert::Infallible;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::combination::combination_indices;
use super::config::SolverConfig;
use super::partition::{merge_results, partition, Partition};
use super::result::{GridSolution, SolveOutcome};
use super::stats::BnbStatistics;
use crate::error::SolveError;
use crate::model::scoring::{
    self, SYNERGY_BONUS, SYNERGY_FIRST, SYNERGY_SECOND, SYNERGY_THRESHOLD,
};
use crate::model::{Core, CoreKind, CoreResult, Gem, GemCategory};

/// A scored gem combination for one core.
#[derive(Debug, Clone)]
struct Combination {
    /// Indices into the category's gem pool.
    gems: Vec<usize>,
    points: u32,
    score: f64,
}

/// Read-only search data for one category.
struct CategoryTree<'a> {
    category: GemCategory,
    cores: Vec<(usize, &'a Core)>,
    gems: Vec<&'a Gem>,
    /// Positions into `cores`, by ascending rarity. Search depth `d`
    /// assigns core `cores[order[d]]`.
    order: Vec<usize>,
    /// Combinations per depth, best score first.
    combos: Vec<Vec<Combination>>,
    /// Highest point total any combination reaches, per depth.
    max_points: Vec<u32>,
    /// `remaining[d]` bounds the score obtainable from depth `d` onward.
    remaining: Vec<f64>,
    /// Depths of the first and second synergy partner.
    partners: Option<(usize, usize)>,
    tight_bound: bool,
}

impl<'a> CategoryTree<'a> {
    fn build(part: Partition<'a>, config: &SolverConfig) -> Self {
        let mut order: Vec<usize> = (0..part.cores.len()).collect();
        order.sort_by_key(|&p| part.cores[p].1.rarity);

        let willpower: Vec<u32> = part.gems.iter().map(|g| g.willpower()).collect();
        let combos: Vec<Vec<Combination>> = order
            .iter()
            .map(|&p| {
                let core = part.cores[p].1;
                let mut list: Vec<Combination> =
                    combination_indices(core.capacity(), &willpower, config.max_gems_per_core)
                        .into_iter()
                        .map(|gems| {
                            let points = gems
                                .iter()
                                .fold(0u32, |acc, &i| acc.saturating_add(part.gems[i].points()));
                            Combination {
                                score: scoring::score(points, core.rarity),
                                points,
                                gems,
                            }
                        })
                        .collect();
                // Stable, so equal scores keep enumeration order.
                list.sort_by(|a, b| b.score.total_cmp(&a.score));
                list
            })
            .collect();

        let max_points: Vec<u32> = combos
            .iter()
            .map(|list| list.iter().map(|c| c.points).max().unwrap_or(0))
            .collect();

        let mut remaining = vec![0.0; order.len() + 1];
        for d in (0..order.len()).rev() {
            let top = if config.tight_bound {
                combos[d].first().map_or(0.0, |c| c.score)
            } else {
                scoring::max_score(part.cores[order[d]].1.rarity)
            };
            remaining[d] = remaining[d + 1] + top;
        }

        let depth_of = |kind: CoreKind| -> Option<usize> {
            let p = part.cores.iter().position(|(_, c)| c.kind == kind)?;
            order.iter().position(|&q| q == p)
        };
        let partners = depth_of(SYNERGY_FIRST).zip(depth_of(SYNERGY_SECOND));

        Self {
            category: part.category,
            cores: part.cores,
            gems: part.gems,
            order,
            combos,
            max_points,
            remaining,
            partners,
            tight_bound: config.tight_bound,
        }
    }

    fn depth(&self) -> usize {
        self.order.len()
    }

    fn top_level_branches(&self) -> usize {
        self.combos.first().map_or(0, Vec::len)
    }

    fn chosen_points(&self, depth: usize, chosen: &[usize]) -> u32 {
        self.combos[depth][chosen[depth]].points
    }

    /// Optimistic synergy bonus for a node at `depth`.
    fn synergy_bound(&self, depth: usize, chosen: &[usize]) -> f64 {
        let Some((first, second)) = self.partners else {
            return 0.0;
        };
        if !self.tight_bound {
            return SYNERGY_BONUS;
        }
        let reachable = |d: usize| {
            if d < depth {
                self.chosen_points(d, chosen) >= SYNERGY_THRESHOLD
            } else {
                self.max_points[d] >= SYNERGY_THRESHOLD
            }
        };
        if reachable(first) && reachable(second) {
            SYNERGY_BONUS
        } else {
            0.0
        }
    }

    /// Synergy bonus realized by a complete assignment.
    fn synergy(&self, chosen: &[usize]) -> f64 {
        match self.partners {
            Some((first, second))
                if self.chosen_points(first, chosen) >= SYNERGY_THRESHOLD
                    && self.chosen_points(second, chosen) >= SYNERGY_THRESHOLD =>
            {
                SYNERGY_BONUS
            }
            _ => 0.0,
        }
    }

    fn solve<C: CancelPolicy>(
        &self,
        hooks: &mut Hooks<'_, '_, C>,
    ) -> ControlFlow<C::Break, CategorySolution> {
        let start = Instant::now();
        let mut searcher = Searcher {
            tree: self,
            state: SearchState::new(self.gems.len(), self.depth()),
        };
        searcher.search(0, 0.0, hooks)?;
        searcher.state.stats.time_total = start.elapsed();
        ControlFlow::Continue(self.materialize(searcher.state))
    }

    fn materialize(&self, state: SearchState) -> CategorySolution {
        let chosen = state.best.unwrap_or_default();
        let results = self
            .order
            .iter()
            .enumerate()
            .map(|(d, &p)| {
                let (index, core) = self.cores[p];
                let gems: Vec<Gem> = chosen
                    .get(d)
                    .map(|&k| {
                        self.combos[d][k]
                            .gems
                            .iter()
                            .map(|&g| self.gems[g].clone())
                            .collect()
                    })
                    .unwrap_or_default();
                (index, CoreResult::new(core, gems))
            })
            .collect();

        CategorySolution {
            results,
            score: state.best_score.max(0.0),
            stats: state.stats,
        }
    }
}

/// Mutable backtracking state, owned by one category solve.
struct SearchState {
    used: Vec<bool>,
    chosen: Vec<usize>,
    best: Option<Vec<usize>>,
    best_score: f64,
    stats: BnbStatistics,
}

impl SearchState {
    fn new(gem_count: usize, depth: usize) -> Self {
        Self {
            used: vec![false; gem_count],
            chosen: vec![0; depth],
            best: None,
            // Below every reachable score, so the first leaf always wins.
            best_score: -1.0,
            stats: BnbStatistics::default(),
        }
    }
}

/// Decides whether a running search stops early.
///
/// Searches that cannot be stopped use [`NeverCancel`], whose `Break` is
/// uninhabited, so their callers get a plain solution back.
trait CancelPolicy {
    type Break;

    /// Called at every node, and with `force` set before every top-level
    /// branch.
    fn poll(&mut self, force: bool) -> ControlFlow<Self::Break>;
}

struct NeverCancel;

impl CancelPolicy for NeverCancel {
    type Break = Infallible;

    #[inline]
    fn poll(&mut self, _force: bool) -> ControlFlow<Infallible> {
        ControlFlow::Continue(())
    }
}

/// The search was stopped through its cancel flag.
#[derive(Debug, Clone, Copy)]
struct Cancelled;

/// Stops once a shared flag is set. The flag is read every `interval`
/// polls, or immediately on a forced poll.
struct CancelFlag<'f> {
    flag: &'f AtomicBool,
    interval: u64,
    since: u64,
}

impl<'f> CancelFlag<'f> {
    fn new(flag: &'f AtomicBool, interval: u64) -> Self {
        Self {
            flag,
            interval: interval.max(1),
            since: 0,
        }
    }
}

impl CancelPolicy for CancelFlag<'_> {
    type Break = Cancelled;

    fn poll(&mut self, force: bool) -> ControlFlow<Cancelled> {
        self.since += 1;
        if !force && self.since < self.interval {
            return ControlFlow::Continue(());
        }
        self.since = 0;
        if self.flag.load(Ordering::Relaxed) {
            ControlFlow::Break(Cancelled)
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Observers of a running search.
struct Hooks<'h, 'p, C> {
    cancel: C,
    progress: Option<&'h mut Progress<'p>>,
}

impl<C> Hooks<'_, '_, C> {
    fn branch_done(&mut self) {
        if let Some(progress) = self.progress.as_deref_mut() {
            progress.branch_done();
        }
    }
}

struct Searcher<'t, 'a> {
    tree: &'t CategoryTree<'a>,
    state: SearchState,
}

impl Searcher<'_, '_> {
    fn search<C: CancelPolicy>(
        &mut self,
        depth: usize,
        score: f64,
        hooks: &mut Hooks<'_, '_, C>,
    ) -> ControlFlow<C::Break> {
        self.state.stats.on_node_explored();
        hooks.cancel.poll(false)?;

        let tree = self.tree;
        if depth == tree.depth() {
            self.evaluate_leaf(score);
            return ControlFlow::Continue(());
        }

        let bound = score + tree.remaining[depth] + tree.synergy_bound(depth, &self.state.chosen);
        if bound <= self.state.best_score {
            self.state.stats.on_pruning_bound();
            return ControlFlow::Continue(());
        }

        for (k, combo) in tree.combos[depth].iter().enumerate() {
            if depth == 0 {
                hooks.cancel.poll(true)?;
            }
            self.branch(depth, k, combo, score, hooks)?;
            if depth == 0 {
                hooks.branch_done();
            }
        }
        ControlFlow::Continue(())
    }

    fn branch<C: CancelPolicy>(
        &mut self,
        depth: usize,
        k: usize,
        combo: &Combination,
        score: f64,
        hooks: &mut Hooks<'_, '_, C>,
    ) -> ControlFlow<C::Break> {
        if combo.gems.iter().any(|&g| self.state.used[g]) {
            self.state.stats.on_pruning_conflict();
            return ControlFlow::Continue(());
        }

        for &g in &combo.gems {
            self.state.used[g] = true;
        }
        self.state.chosen[depth] = k;
        let flow = self.search(depth + 1, score + combo.score, hooks);
        for &g in &combo.gems {
            self.state.used[g] = false;
        }
        flow
    }

    fn evaluate_leaf(&mut self, score: f64) {
        self.state.stats.on_leaf();
        let total = score + self.tree.synergy(&self.state.chosen);
        if total > self.state.best_score {
            self.state.best_score = total;
            self.state.best = Some(self.state.chosen.clone());
            self.state.stats.on_improvement();
            debug!(
                target: "u_arkgrid::bnb",
                category = ?self.tree.category,
                score = total,
                nodes = self.state.stats.nodes_explored,
                "incumbent improved"
            );
        }
    }
}

/// Best assignment of one category, keyed by input core index.
struct CategorySolution {
    results: Vec<(usize, CoreResult)>,
    score: f64,
    stats: BnbStatistics,
}

/// Percentage reporting driven by completed top-level branches.
///
/// Reports are strictly increasing and 100 is only sent by
/// [`Progress::finish`].
struct Progress<'p> {
    callback: &'p mut dyn FnMut(u8),
    total: usize,
    done: usize,
    interval: usize,
    pending: usize,
    reported: Option<u8>,
}

impl<'p> Progress<'p> {
    fn new(callback: &'p mut dyn FnMut(u8), total: usize, interval: usize) -> Self {
        Self {
            callback,
            total,
            done: 0,
            interval: interval.max(1),
            pending: 0,
            reported: None,
        }
    }

    fn start(&mut self) {
        self.emit(0);
    }

    fn branch_done(&mut self) {
        self.done += 1;
        self.pending += 1;
        if self.pending >= self.interval {
            self.pending = 0;
            let percent = (self.done * 100 / self.total.max(1)).min(99);
            self.emit(percent as u8);
        }
    }

    fn finish(&mut self) {
        self.emit(100);
    }

    fn emit(&mut self, percent: u8) {
        if self.reported.map_or(true, |last| percent > last) {
            self.reported = Some(percent);
            (self.callback)(percent);
        }
    }
}

/// Runs the exact branch-and-bound solver.
pub struct BnbRunner;

impl BnbRunner {
    /// Solves the grid to optimality.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`SolverConfig::validate`].
    ///
    /// # Examples
    ///
    /// ```
    /// use u_arkgrid::bnb::{BnbRunner, SolverConfig};
    /// use u_arkgrid::model::{Core, CoreKind, Gem, GemCategory, Rarity};
    ///
    /// let cores = vec![Core::new("sun", CoreKind::OrderOfTheSun, Rarity::Epic)];
    /// let gems = vec![
    ///     Gem::new("a", GemCategory::Order, 5, 10),
    ///     Gem::new("b", GemCategory::Order, 5, 10),
    /// ];
    ///
    /// let solution = BnbRunner::run(&cores, &gems, &SolverConfig::default());
    /// assert_eq!(solution.total_score, 1.0);
    /// assert_eq!(solution.results[0].gems.len(), 1);
    /// ```
    pub fn run(cores: &[Core], gems: &[Gem], config: &SolverConfig) -> GridSolution {
        config.validate().expect("invalid SolverConfig");
        solve_to_completion(cores, gems, config, None)
    }

    /// Solves the grid, reporting progress as a percentage in `0..=100`.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`SolverConfig::validate`].
    pub fn run_with_progress<F: FnMut(u8)>(
        cores: &[Core],
        gems: &[Gem],
        config: &SolverConfig,
        mut on_progress: F,
    ) -> GridSolution {
        config.validate().expect("invalid SolverConfig");
        solve_to_completion(cores, gems, config, Some(&mut on_progress))
    }

    /// Solves the grid with optional progress reporting and an optional
    /// cancellation flag.
    ///
    /// Setting the flag stops the search at the next check and yields
    /// [`SolveOutcome::Cancelled`]; no partial assignment is returned.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`SolverConfig::validate`].
    pub fn run_with_cancel(
        cores: &[Core],
        gems: &[Gem],
        config: &SolverConfig,
        on_progress: Option<&mut dyn FnMut(u8)>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> SolveOutcome {
        config.validate().expect("invalid SolverConfig");
        solve_cancellable(cores, gems, config, on_progress, cancel.as_deref())
    }

    /// Validates `config` and the input, then runs like
    /// [`BnbRunner::run_with_cancel`].
    pub fn try_run(
        cores: &[Core],
        gems: &[Gem],
        config: &SolverConfig,
        on_progress: Option<&mut dyn FnMut(u8)>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SolveOutcome, SolveError> {
        config.validate()?;
        validate_input(cores, gems)?;
        Ok(solve_cancellable(cores, gems, config, on_progress, cancel.as_deref()))
    }
}

/// Checks the caller contract: unique ids and pre-expanded quantities.
pub fn validate_input(cores: &[Core], gems: &[Gem]) -> Result<(), SolveError> {
    let mut core_ids = HashSet::with_capacity(cores.len());
    for core in cores {
        if !core_ids.insert(core.id.as_str()) {
            return Err(SolveError::DuplicateCoreId(core.id.clone()));
        }
    }

    let mut gem_ids = HashSet::with_capacity(gems.len());
    for gem in gems {
        if let Some(quantity) = gem.quantity.filter(|&q| q > 1) {
            return Err(SolveError::UnexpandedQuantity {
                id: gem.id.clone(),
                quantity,
            });
        }
        if !gem_ids.insert(gem.id.as_str()) {
            return Err(SolveError::DuplicateGemId(gem.id.clone()));
        }
    }
    Ok(())
}

fn solve_to_completion(
    cores: &[Core],
    gems: &[Gem],
    config: &SolverConfig,
    on_progress: Option<&mut dyn FnMut(u8)>,
) -> GridSolution {
    match solve_grid(cores, gems, config, on_progress, || NeverCancel) {
        ControlFlow::Continue(solution) => solution,
        ControlFlow::Break(never) => match never {},
    }
}

fn solve_cancellable(
    cores: &[Core],
    gems: &[Gem],
    config: &SolverConfig,
    on_progress: Option<&mut dyn FnMut(u8)>,
    cancel: Option<&AtomicBool>,
) -> SolveOutcome {
    let Some(flag) = cancel else {
        return SolveOutcome::Solved(solve_to_completion(cores, gems, config, on_progress));
    };

    let interval = config.cancel_check_interval;
    let make_cancel = || CancelFlag::new(flag, interval);
    match solve_grid(cores, gems, config, on_progress, make_cancel) {
        ControlFlow::Continue(solution) => SolveOutcome::Solved(solution),
        ControlFlow::Break(Cancelled) => {
            warn!(
                target: "u_arkgrid::bnb",
                cores = cores.len(),
                gems = gems.len(),
                "search cancelled"
            );
            SolveOutcome::Cancelled
        }
    }
}

/// Solves every category, creating one cancel policy per category search.
fn solve_grid<C, M>(
    cores: &[Core],
    gems: &[Gem],
    config: &SolverConfig,
    on_progress: Option<&mut dyn FnMut(u8)>,
    make_cancel: M,
) -> ControlFlow<C::Break, GridSolution>
where
    C: CancelPolicy,
    C::Break: Send,
    M: Fn() -> C + Sync,
{
    let start = Instant::now();

    let trees: Vec<CategoryTree<'_>> = partition(cores, gems)
        .into_iter()
        .filter(|part| !part.is_empty())
        .map(|part| CategoryTree::build(part, config))
        .collect();

    for tree in &trees {
        debug!(
            target: "u_arkgrid::bnb",
            category = ?tree.category,
            cores = tree.cores.len(),
            gems = tree.gems.len(),
            combinations = tree.combos.iter().map(Vec::len).sum::<usize>(),
            "solving category"
        );
    }

    let mut progress = on_progress.map(|callback| {
        let total = trees.iter().map(CategoryTree::top_level_branches).sum();
        Progress::new(callback, total, config.progress_interval)
    });

    let parts = match progress.as_mut() {
        Some(progress) => {
            progress.start();
            solve_sequential(&trees, &make_cancel, Some(progress))?
        }
        None => solve_unobserved(&trees, config, &make_cancel)?,
    };

    if let Some(progress) = progress.as_mut() {
        progress.finish();
    }

    let mut stats = BnbStatistics::default();
    let mut total_score = 0.0;
    for part in &parts {
        stats.merge(&part.stats);
        total_score += part.score;
    }
    stats.time_total = start.elapsed();

    let results = merge_results(cores, parts.into_iter().map(|part| part.results));

    info!(
        target: "u_arkgrid::bnb",
        cores = cores.len(),
        gems = gems.len(),
        total_score,
        %stats,
        "grid solved"
    );

    ControlFlow::Continue(GridSolution {
        results,
        total_score,
        stats,
    })
}

fn solve_one<C: CancelPolicy>(
    tree: &CategoryTree<'_>,
    cancel: C,
    progress: Option<&mut Progress<'_>>,
) -> ControlFlow<C::Break, CategorySolution> {
    let mut hooks = Hooks { cancel, progress };
    tree.solve(&mut hooks)
}

fn solve_sequential<C: CancelPolicy, M: Fn() -> C>(
    trees: &[CategoryTree<'_>],
    make_cancel: &M,
    mut progress: Option<&mut Progress<'_>>,
) -> ControlFlow<C::Break, Vec<CategorySolution>> {
    let mut parts = Vec::with_capacity(trees.len());
    for tree in trees {
        parts.push(solve_one(tree, make_cancel(), progress.as_deref_mut())?);
    }
    ControlFlow::Continue(parts)
}

#[cfg(feature = "parallel")]
fn solve_unobserved<C, M>(
    trees: &[CategoryTree<'_>],
    config: &SolverConfig,
    make_cancel: &M,
) -> ControlFlow<C::Break, Vec<CategorySolution>>
where
    C: CancelPolicy,
    C::Break: Send,
    M: Fn() -> C + Sync,
{
    if let [first, second] = trees {
        if config.parallel {
            let (a, b) = rayon::join(
                || solve_one(first, make_cancel(), None),
                || solve_one(second, make_cancel(), None),
            );
            return ControlFlow::Continue(vec![a?, b?]);
        }
    }
    solve_sequential(trees, make_cancel, None)
}

#[cfg(not(feature = "parallel"))]
fn solve_unobserved<C: CancelPolicy, M: Fn() -> C>(
    trees: &[CategoryTree<'_>],
    _config: &SolverConfig,
    make_cancel: &M,
) -> ControlFlow<C::Break, Vec<CategorySolution>> {
    solve_sequential(trees, make_cancel, None)
}
