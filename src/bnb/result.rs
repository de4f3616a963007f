//! Solve results.

use super::stats::BnbStatistics;
use crate::model::CoreResult;

/// The optimal assignment for a whole grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSolution {
    /// One result per input core, in input order.
    pub results: Vec<CoreResult>,

    /// Sum of per-core scores plus every realized synergy bonus.
    pub total_score: f64,

    /// Search statistics merged across both categories.
    pub stats: BnbStatistics,
}

impl GridSolution {
    /// Sum of per-core scores, excluding synergy.
    pub fn base_score(&self) -> f64 {
        self.results.iter().map(|r| r.score).sum()
    }

    /// Synergy bonus included in [`GridSolution::total_score`].
    pub fn synergy(&self) -> f64 {
        self.total_score - self.base_score()
    }
}

/// How a cancellable solve ended.
///
/// A cancelled solve never carries a partial assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// The search ran to completion; the solution is optimal.
    Solved(GridSolution),
    /// The caller cancelled the search before it completed.
    Cancelled,
}

impl SolveOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SolveOutcome::Cancelled)
    }

    /// The solution, if the search completed.
    pub fn into_solution(self) -> Option<GridSolution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            SolveOutcome::Cancelled => None,
        }
    }
}
