//! Reversible move operators over a [`Solution`].
//!
//! Every operator is a small struct owning nothing but the undo record of
//! its last applied move. `try_move` mutates the solution in place and
//! reports whether anything changed; `recover` is the exact inverse of the
//! last applied move, valid until the next `try_move` on the same operator
//! and provided no other structural mutation touched the solution in
//! between. A move that reports "not applied" leaves the solution
//! untouched and makes the following `recover` a no-op.

pub mod create_route;
pub mod inject;
pub mod two_opt;
pub mod two_point;

pub use create_route::CreateRoute;
pub use inject::{InjectAfter, InjectBefore};
pub use two_opt::TwoOptExchange;
pub use two_point::TwoPointSwap;

use crate::error::SolverError;
use crate::solution::Solution;

/// Where a job currently lives inside a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobLocation {
    /// Position within the unassigned-job list.
    Unassigned { pos: usize },
    /// Route index and position within that route's job sequence.
    InRoute { route: usize, pos: usize },
}

/// Find `job` in the solution: the unassigned list is scanned first, then
/// each route in order. A job that is nowhere in the solution means the
/// job-universe invariant was already broken, so this is an error rather
/// than a sentinel.
pub(crate) fn locate_job(
    solution: &Solution,
    operator: &'static str,
    job: usize,
) -> Result<JobLocation, SolverError> {
    if let Some(pos) = solution.unassigned_jobs.iter().position(|&j| j == job) {
        return Ok(JobLocation::Unassigned { pos });
    }

    for (route, r) in solution.routes.iter().enumerate() {
        if let Some(pos) = r.jobs.iter().position(|&j| j == job) {
            return Ok(JobLocation::InRoute { route, pos });
        }
    }

    Err(SolverError::JobNotFound { operator, job })
}

/// Remove the job at `location` from its container.
pub(crate) fn remove_at(solution: &mut Solution, location: JobLocation) -> usize {
    match location {
        JobLocation::Unassigned { pos } => solution.unassigned_jobs.remove(pos),
        JobLocation::InRoute { route, pos } => solution.routes[route].jobs.remove(pos),
    }
}

/// Reinsert `job` at `location`, the inverse of [`remove_at`].
pub(crate) fn insert_at(solution: &mut Solution, location: JobLocation, job: usize) {
    match location {
        JobLocation::Unassigned { pos } => solution.unassigned_jobs.insert(pos, job),
        JobLocation::InRoute { route, pos } => solution.routes[route].jobs.insert(pos, job),
    }
}

/// Common interface of the pairwise operators the improvement driver
/// sweeps: inject before/after, two-point swap, and two-opt exchange.
pub trait PairwiseMove {
    /// Operator name used in logs and error context.
    fn name(&self) -> &'static str;

    /// Apply the move for endpoints `a` and `b`. Returns `Ok(true)` when
    /// the solution was mutated, `Ok(false)` when the move does not apply
    /// to the current state (nothing changed).
    fn try_move(
        &mut self,
        solution: &mut Solution,
        a: usize,
        b: usize,
    ) -> Result<bool, SolverError>;

    /// Undo the last applied move exactly. A no-op when the last call did
    /// not move anything.
    fn recover(&mut self, solution: &mut Solution) -> Result<(), SolverError>;
}
