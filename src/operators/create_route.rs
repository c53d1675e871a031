//! Route-creation operator: pull a job out of wherever it lives and open a
//! new singleton route for it.

use log::debug;

use super::{insert_at, locate_job, remove_at, JobLocation};
use crate::error::SolverError;
use crate::solution::{Route, Solution};

struct Undo {
    job: usize,
    origin: JobLocation,
}

/// Creates a new route holding a single job.
///
/// Recovery is LIFO: it assumes the created route is still the last one in
/// the solution, so no other structural mutation may happen between
/// `try_move` and `recover`.
#[derive(Default)]
pub struct CreateRoute {
    undo: Option<Undo>,
}

impl CreateRoute {
    pub const NAME: &'static str = "CreateRoute";

    pub fn new() -> Self {
        CreateRoute::default()
    }

    /// Remove `job` from its current container and append the new route
    /// `(vehicle_idx, [job])`.
    pub fn try_move(
        &mut self,
        solution: &mut Solution,
        vehicle_idx: usize,
        job: usize,
    ) -> Result<bool, SolverError> {
        debug!(
            "{}: trying to create route for vehicle {} with job {}",
            Self::NAME,
            vehicle_idx,
            job
        );
        self.undo = None;

        let origin = locate_job(solution, Self::NAME, job)?;
        remove_at(solution, origin);
        solution.routes.push(Route::with_job(vehicle_idx, job));

        self.undo = Some(Undo { job, origin });
        Ok(true)
    }

    /// Drop the route appended by the last `try_move` and put its job back
    /// where it came from.
    pub fn recover(&mut self, solution: &mut Solution) -> Result<(), SolverError> {
        let Some(undo) = self.undo.take() else {
            return Ok(());
        };

        let matches = solution
            .routes
            .last()
            .map_or(false, |route| route.jobs == [undo.job]);
        if !matches {
            return Err(SolverError::RecoverConflict {
                operator: Self::NAME,
            });
        }

        solution.routes.pop();
        insert_at(solution, undo.origin, undo.job);
        Ok(())
    }
}
