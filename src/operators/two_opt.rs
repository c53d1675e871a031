//! Two-opt exchange: reverse a segment within a route, or exchange the
//! tails of two routes.

use log::debug;

use super::{locate_job, JobLocation, PairwiseMove};
use crate::error::SolverError;
use crate::solution::Solution;

struct Undo {
    route_a: usize,
    jobs_a: Vec<usize>,
    route_b: Option<usize>,
    jobs_b: Vec<usize>,
}

/// Same route: reverse the inclusive segment between the two jobs.
/// Different routes: swap everything after each job between the routes.
/// When both jobs already end their routes there is nothing to exchange
/// and the move is a no-op.
///
/// Recovery restores the touched route(s) from full pre-move snapshots,
/// coarser than the positional undo of the other operators but exact.
#[derive(Default)]
pub struct TwoOptExchange {
    undo: Option<Undo>,
}

impl TwoOptExchange {
    pub const NAME: &'static str = "TwoOptExchange";

    pub fn new() -> Self {
        TwoOptExchange::default()
    }
}

impl PairwiseMove for TwoOptExchange {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn try_move(
        &mut self,
        solution: &mut Solution,
        a: usize,
        b: usize,
    ) -> Result<bool, SolverError> {
        debug!("{}: trying to exchange at job {} and job {}", Self::NAME, a, b);
        self.undo = None;

        if a == b {
            return Err(SolverError::IdenticalJobs {
                operator: Self::NAME,
                job: a,
            });
        }

        let loc_a = locate_job(solution, Self::NAME, a)?;
        let loc_b = locate_job(solution, Self::NAME, b)?;
        let (JobLocation::InRoute { route: ra, pos: pa }, JobLocation::InRoute { route: rb, pos: pb }) =
            (loc_a, loc_b)
        else {
            debug!("{}: job {} or {} is unassigned, skipping move", Self::NAME, a, b);
            return Ok(false);
        };

        let a_is_end = pa == solution.routes[ra].jobs.len() - 1;
        let b_is_end = pb == solution.routes[rb].jobs.len() - 1;
        if a_is_end && b_is_end {
            return Ok(false);
        }

        if ra == rb {
            let jobs_a = solution.routes[ra].jobs.clone();
            let start = pa.min(pb);
            let end = pa.max(pb);
            solution.routes[ra].jobs[start..=end].reverse();
            self.undo = Some(Undo {
                route_a: ra,
                jobs_a,
                route_b: None,
                jobs_b: Vec::new(),
            });
        } else {
            let jobs_a = solution.routes[ra].jobs.clone();
            let jobs_b = solution.routes[rb].jobs.clone();
            let tail_a = solution.routes[ra].jobs.split_off(pa + 1);
            let tail_b = solution.routes[rb].jobs.split_off(pb + 1);
            solution.routes[ra].jobs.extend(tail_b);
            solution.routes[rb].jobs.extend(tail_a);
            self.undo = Some(Undo {
                route_a: ra,
                jobs_a,
                route_b: Some(rb),
                jobs_b,
            });
        }

        Ok(true)
    }

    fn recover(&mut self, solution: &mut Solution) -> Result<(), SolverError> {
        let Some(undo) = self.undo.take() else {
            return Ok(());
        };

        let routes = solution.routes.len();
        if undo.route_a >= routes || undo.route_b.map_or(false, |r| r >= routes) {
            return Err(SolverError::RecoverConflict {
                operator: Self::NAME,
            });
        }

        solution.routes[undo.route_a].jobs = undo.jobs_a;
        if let Some(rb) = undo.route_b {
            solution.routes[rb].jobs = undo.jobs_b;
        }
        Ok(())
    }
}
