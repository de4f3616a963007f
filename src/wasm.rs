//! WebAssembly bindings.
//!
//! Inputs and outputs are plain JS objects using the web front end's
//! field names (`type`, `name`, `willpower`, `astrogems`, `breakpointsHit`, ...).
//! Gem names pass through to the returned `astrogems` unchanged.

use wasm_bindgen::prelude::*;

use crate::bnb::{BnbRunner, SolverConfig};
use crate::model::{scoring, Core, Gem};

/// Solves the grid and returns one result object per core.
///
/// Rejects duplicate ids and gems whose quantity was not expanded.
#[wasm_bindgen(js_name = solveArkGrid)]
pub fn solve_ark_grid(cores: JsValue, gems: JsValue) -> Result<JsValue, JsError> {
    let cores: Vec<Core> = serde_wasm_bindgen::from_value(cores)?;
    let gems: Vec<Gem> = serde_wasm_bindgen::from_value(gems)?;

    let outcome = BnbRunner::try_run(&cores, &gems, &SolverConfig::default(), None, None)?;
    let solution = outcome
        .into_solution()
        .ok_or_else(|| JsError::new("search was cancelled"))?;

    Ok(serde_wasm_bindgen::to_value(&solution.results)?)
}

/// Upper bound on the total score of the given cores.
#[wasm_bindgen(js_name = getMaxPossibleScore)]
pub fn get_max_possible_score(cores: JsValue) -> Result<f64, JsError> {
    let cores: Vec<Core> = serde_wasm_bindgen::from_value(cores)?;
    Ok(scoring::max_possible_score(&cores))
}
