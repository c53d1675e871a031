//! Error types for the solver library.

use thiserror::Error;

/// Errors raised by problem setup, the move operators, and the search
/// drivers.
///
/// Infeasible trial moves are not errors: operators report them through
/// their return value and the drivers recover and continue. The variants
/// here cover setup failures and contract violations that must stop the
/// current run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolverError {
    /// Neighbour lists were requested but no closeness function has been
    /// set on the problem.
    #[error("closeness function is not defined for the problem")]
    ClosenessUndefined,

    /// A move referenced a job that exists neither in the unassigned list
    /// nor in any route. The job-universe invariant was already broken
    /// before the call.
    #[error("{operator}: job {job} not found in solution")]
    JobNotFound {
        operator: &'static str,
        job: usize,
    },

    /// A pairwise operator was invoked with `a == b`.
    #[error("{operator}: identical jobs {job} passed as both endpoints")]
    IdenticalJobs {
        operator: &'static str,
        job: usize,
    },

    /// `recover` found the solution in a state the pending undo record
    /// cannot apply to; a structural mutation intervened since the move.
    #[error("{operator}: cannot recover, solution changed since the last move")]
    RecoverConflict { operator: &'static str },

    /// A seed solution was bound to a different problem than the one being
    /// solved.
    #[error("initial solution does not belong to the problem being solved")]
    ProblemMismatch,
}
