//! Counters collected while searching.

use std::time::Duration;

/// Statistics collected during a branch-and-bound solve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BnbStatistics {
    /// Search nodes entered, including leaves.
    pub nodes_explored: u64,
    /// Combinations skipped because one of their gems was already used.
    pub prunings_conflict: u64,
    /// Subtrees abandoned because their bound could not beat the incumbent.
    pub prunings_bound: u64,
    /// Complete assignments evaluated.
    pub leaves_evaluated: u64,
    /// Times the incumbent was replaced by a strictly better assignment.
    pub improvements: u64,
    /// Wall time spent searching.
    pub time_total: Duration,
}

impl BnbStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_conflict(&mut self) {
        self.prunings_conflict = self.prunings_conflict.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_leaf(&mut self) {
        self.leaves_evaluated = self.leaves_evaluated.saturating_add(1);
    }

    #[inline]
    pub fn on_improvement(&mut self) {
        self.improvements = self.improvements.saturating_add(1);
    }

    /// Adds the counters of an independently solved partition.
    pub fn merge(&mut self, other: &BnbStatistics) {
        self.nodes_explored = self.nodes_explored.saturating_add(other.nodes_explored);
        self.prunings_conflict = self.prunings_conflict.saturating_add(other.prunings_conflict);
        self.prunings_bound = self.prunings_bound.saturating_add(other.prunings_bound);
        self.leaves_evaluated = self.leaves_evaluated.saturating_add(other.leaves_evaluated);
        self.improvements = self.improvements.saturating_add(other.improvements);
        self.time_total += other.time_total;
    }
}

impl std::fmt::Display for BnbStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "nodes={} leaves={} improvements={} pruned(bound)={} pruned(conflict)={} time={:.3}ms",
            self.nodes_explored,
            self.leaves_evaluated,
            self.improvements,
            self.prunings_bound,
            self.prunings_conflict,
            self.time_total.as_secs_f64() * 1000.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = BnbStatistics::default();
        stats.on_node_explored();
        stats.on_node_explored();
        stats.on_pruning_bound();
        stats.on_pruning_conflict();
        stats.on_leaf();
        stats.on_improvement();
        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.prunings_bound, 1);
        assert_eq!(stats.prunings_conflict, 1);
        assert_eq!(stats.leaves_evaluated, 1);
        assert_eq!(stats.improvements, 1);
    }

    #[test]
    fn test_merge() {
        let mut a = BnbStatistics {
            nodes_explored: 3,
            time_total: Duration::from_millis(2),
            ..Default::default()
        };
        let b = BnbStatistics {
            nodes_explored: 4,
            prunings_bound: 1,
            time_total: Duration::from_millis(5),
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.nodes_explored, 7);
        assert_eq!(a.prunings_bound, 1);
        assert_eq!(a.time_total, Duration::from_millis(7));
    }

    #[test]
    fn test_display() {
        let stats = BnbStatistics::default();
        assert!(stats.to_string().starts_with("nodes=0 leaves=0"));
    }
}
