//! Two-point swap: exchange the values stored at two route positions.

use log::debug;

use super::{locate_job, JobLocation, PairwiseMove};
use crate::error::SolverError;
use crate::solution::Solution;

struct Undo {
    a: usize,
    b: usize,
    slot_a: (usize, usize),
    slot_b: (usize, usize),
}

/// Swaps two jobs in place: positions stay, values change. The undo state
/// is just the two original values and their slots.
#[derive(Default)]
pub struct TwoPointSwap {
    undo: Option<Undo>,
}

impl TwoPointSwap {
    pub const NAME: &'static str = "TwoPointSwap";

    pub fn new() -> Self {
        TwoPointSwap::default()
    }
}

impl PairwiseMove for TwoPointSwap {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn try_move(
        &mut self,
        solution: &mut Solution,
        a: usize,
        b: usize,
    ) -> Result<bool, SolverError> {
        debug!("{}: trying to swap job {} and job {}", Self::NAME, a, b);
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
            // Swapping needs both jobs to occupy a route slot.
            debug!("{}: job {} or {} is unassigned, skipping move", Self::NAME, a, b);
            return Ok(false);
        };

        solution.routes[ra].jobs[pa] = b;
        solution.routes[rb].jobs[pb] = a;

        self.undo = Some(Undo {
            a,
            b,
            slot_a: (ra, pa),
            slot_b: (rb, pb),
        });
        Ok(true)
    }

    fn recover(&mut self, solution: &mut Solution) -> Result<(), SolverError> {
        let Some(undo) = self.undo.take() else {
            return Ok(());
        };

        let (ra, pa) = undo.slot_a;
        let (rb, pb) = undo.slot_b;
        let intact = solution.routes.get(ra).and_then(|r| r.jobs.get(pa)) == Some(&undo.b)
            && solution.routes.get(rb).and_then(|r| r.jobs.get(pb)) == Some(&undo.a);
        if !intact {
            return Err(SolverError::RecoverConflict {
                operator: Self::NAME,
            });
        }

        solution.routes[ra].jobs[pa] = undo.a;
        solution.routes[rb].jobs[pb] = undo.b;
        Ok(())
    }
}
