//! Branch-and-bound configuration.

use crate::error::SolveError;
use crate::model::scoring::MAX_GEMS_PER_CORE;

/// Configuration for the branch-and-bound solver.
///
/// Apart from `max_gems_per_core`, which can lower the per-core gem cap
/// below the game's [`MAX_GEMS_PER_CORE`], these settings do not change
/// the optimum; they only affect pacing and how much of the tree is pruned.
///
/// # Examples
///
/// ```
/// use u_arkgrid::bnb::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_progress_interval(8)
///     .with_tight_bound(false);
/// assert_eq!(config.progress_interval, 8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Maximum number of gems placed in one core, in
    /// `1..=MAX_GEMS_PER_CORE`.
    pub max_gems_per_core: usize,

    /// Top-level branches completed between two progress reports.
    pub progress_interval: usize,

    /// Search nodes visited between two cancellation checks.
    pub cancel_check_interval: u64,

    /// Bound the remaining score by each core's best combination instead
    /// of its tier maximum.
    pub tight_bound: bool,

    /// Solve the two categories on separate rayon workers. Only honored
    /// with the `parallel` feature and when no progress callback is set.
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_gems_per_core: MAX_GEMS_PER_CORE,
            progress_interval: 1,
            cancel_check_interval: 4096,
            tight_bound: true,
            parallel: true,
        }
    }
}

impl SolverConfig {
    pub fn with_max_gems_per_core(mut self, n: usize) -> Self {
        self.max_gems_per_core = n;
        self
    }

    pub fn with_progress_interval(mut self, n: usize) -> Self {
        self.progress_interval = n;
        self
    }

    pub fn with_cancel_check_interval(mut self, n: u64) -> Self {
        self.cancel_check_interval = n;
        self
    }

    pub fn with_tight_bound(mut self, tight: bool) -> Self {
        self.tight_bound = tight;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.max_gems_per_core == 0 {
            return Err(SolveError::InvalidConfig(
                "max_gems_per_core must be at least 1".into(),
            ));
        }
        if self.max_gems_per_core > MAX_GEMS_PER_CORE {
            return Err(SolveError::InvalidConfig(format!(
                "max_gems_per_core must not exceed {MAX_GEMS_PER_CORE}"
            )));
        }
        if self.progress_interval == 0 {
            return Err(SolveError::InvalidConfig(
                "progress_interval must be at least 1".into(),
            ));
        }
        if self.cancel_check_interval == 0 {
            return Err(SolveError::InvalidConfig(
                "cancel_check_interval must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.max_gems_per_core, 4);
        assert_eq!(config.progress_interval, 1);
        assert_eq!(config.cancel_check_interval, 4096);
        assert!(config.tight_bound);
        assert!(config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SolverConfig::default()
            .with_max_gems_per_core(3)
            .with_progress_interval(5)
            .with_cancel_check_interval(64)
            .with_tight_bound(false)
            .with_parallel(false);
        assert_eq!(config.max_gems_per_core, 3);
        assert_eq!(config.progress_interval, 5);
        assert_eq!(config.cancel_check_interval, 64);
        assert!(!config.tight_bound);
        assert!(!config.parallel);
    }

    #[test]
    fn test_validate_zero_intervals() {
        assert!(SolverConfig::default()
            .with_progress_interval(0)
            .validate()
            .is_err());
        assert!(SolverConfig::default()
            .with_cancel_check_interval(0)
            .validate()
            .is_err());
        assert!(SolverConfig::default()
            .with_max_gems_per_core(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_gem_cap() {
        assert!(SolverConfig::default()
            .with_max_gems_per_core(MAX_GEMS_PER_CORE)
            .validate()
            .is_ok());
        assert!(SolverConfig::default()
            .with_max_gems_per_core(1)
            .validate()
            .is_ok());
        assert!(matches!(
            SolverConfig::default().with_max_gems_per_core(5).validate(),
            Err(SolveError::InvalidConfig(_))
        ));
    }
}
