//! Ark Grid data model and scoring.
//!
//! # Key Components
//!
//! - **Types**: [`Gem`], [`Core`], [`CoreResult`] and the enums describing
//!   them ([`GemCategory`], [`CoreKind`], [`Rarity`])
//! - **Scoring**: [`scoring`] — tier tables, breakpoint scoring, and the
//!   Sun/Moon synergy bonus
//!
//! All scoring functions are pure. Capacities, breakpoints, and weights are
//! static game data and are never computed.

pub mod scoring;
mod types;

pub use types::{Core, CoreKind, CoreResult, Gem, GemCategory, Rarity};
