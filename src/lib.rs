//! Exact optimizer for Ark Grid gem assignment.
//!
//! Assigns a pool of astrogems to a fixed set of cores so that the total
//! score is maximized:
//!
//! - **Model**: gems, cores, and the threshold scoring tables
//!   ([`model`], [`model::scoring`]).
//! - **Branch-and-bound**: combination enumeration, category
//!   partitioning, and the exact search ([`bnb`]).
//! - **Entry points**: [`solve`], [`solve_with_progress`],
//!   [`max_possible_score`], [`synergy_bonus`].
//!
//! Gems entered with a quantity must be expanded into singleton gems with
//! distinct ids before solving.
//!
//! # Features
//!
//! - `serde`: (de)serialization of the data model
//! - `parallel`: solve the two categories on rayon workers
//! - `wasm`: `wasm-bindgen` exports for the web front end

pub mod bnb;
pub mod error;
pub mod model;
mod solver;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::SolveError;
pub use solver::{max_possible_score, solve, solve_with_progress, synergy_bonus};
