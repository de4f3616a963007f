//! Exact branch-and-bound assignment of gems to cores.
//!
//! Each core accepts up to four gems of its category whose willpower
//! fits its capacity, and scores by the breakpoints its points reach.
//! The solver enumerates every valid combination per core, then searches
//! core by core for the disjoint assignment with the highest total score,
//! including the Sun/Moon synergy bonus.
//!
//! The two categories never share gems or cores, so they are solved as
//! independent problems and merged back in input order.
//!
//! # References
//!
//! - Land & Doig (1960), "An automatic method of solving discrete
//!   programming problems", *Econometrica* 28(3), 497-520
//! - Martello & Toth (1990), "Knapsack Problems: Algorithms and Computer
//!   Implementations", ch. 6 (multiple knapsack)

mod combination;
mod config;
mod partition;
mod result;
mod runner;
mod stats;

pub use combination::{combination_indices, valid_combinations};
pub use config::SolverConfig;
pub use result::{GridSolution, SolveOutcome};
pub use runner::{validate_input, BnbRunner};
pub use stats::BnbStatistics;
