//! # ILS-VRP
//!
//! An iterated local search solver for multi-vehicle routing and job
//! sequencing problems.
//!
//! The problem definition is pluggable: a [`Model`] declares typed
//! attribute tables, an ordered list of feasibility constraints, and an
//! ordered list of named objectives; a [`Problem`] carries the data. The
//! solver itself is two stages: [`NearestSearch`] greedily constructs an
//! initial solution along closeness-ranked neighbour lists, and [`Ils`]
//! improves it with reversible move operators (insertion, swap, two-opt)
//! under an iteration and wall-clock budget.
//!
//! [`Model`]: crate::model::Model
//! [`Problem`]: crate::problem::Problem
//! [`NearestSearch`]: crate::nearest::NearestSearch
//! [`Ils`]: crate::ils::Ils

pub mod config;
pub mod error;
pub mod ils;
pub mod model;
pub mod nearest;
pub mod operators;
pub mod problem;
pub mod solution;
pub mod utils;

pub use crate::config::SearchConfig;
pub use crate::error::SolverError;
pub use crate::ils::Ils;
pub use crate::model::Model;
pub use crate::nearest::NearestSearch;
pub use crate::problem::Problem;
pub use crate::solution::{Route, Solution};

/// Run the full pipeline: construct an initial solution with
/// [`NearestSearch`], then improve it with [`Ils`] under the same
/// configuration.
pub fn solve(problem: &mut Problem, config: SearchConfig) -> Result<Solution, SolverError> {
    let mut nearest = NearestSearch::new(config.clone());
    let initial = nearest.solve(problem)?;

    let mut ils = Ils::new(config);
    ils.set_initial_solution(initial);
    ils.solve(problem)
}
