//! Insertion operators: move job `b` directly before or after job `a`.

use log::debug;

use super::{insert_at, locate_job, remove_at, JobLocation, PairwiseMove};
use crate::error::SolverError;
use crate::solution::Solution;

#[derive(Clone, Copy)]
enum Placement {
    Before,
    After,
}

struct Undo {
    job: usize,
    origin: JobLocation,
    inserted_route: usize,
    inserted_pos: usize,
}

/// Shared implementation of both insertion directions.
///
/// When `b` starts in the same route ahead of `a`, removing it shifts
/// `a`'s index down by one, so the insertion index drops by one as well
/// (`idx_a - 1` for before, `idx_a` for after). Cross-route moves and
/// moves where `b` sits behind `a` need no adjustment.
fn inject(
    solution: &mut Solution,
    name: &'static str,
    placement: Placement,
    a: usize,
    b: usize,
) -> Result<Option<Undo>, SolverError> {
    if a == b {
        return Err(SolverError::IdenticalJobs {
            operator: name,
            job: a,
        });
    }

    let loc_a = locate_job(solution, name, a)?;
    let JobLocation::InRoute {
        route: route_a,
        pos: pos_a,
    } = loc_a
    else {
        // The anchor job is unassigned; there is no position to insert at.
        debug!("{}: job {} is unassigned, skipping move", name, a);
        return Ok(None);
    };

    let origin = locate_job(solution, name, b)?;
    remove_at(solution, origin);

    let shifted = matches!(
        origin,
        JobLocation::InRoute { route, pos } if route == route_a && pos < pos_a
    );
    let inserted_pos = match (placement, shifted) {
        (Placement::Before, true) => pos_a - 1,
        (Placement::Before, false) => pos_a,
        (Placement::After, true) => pos_a,
        (Placement::After, false) => pos_a + 1,
    };

    solution.routes[route_a].jobs.insert(inserted_pos, b);

    Ok(Some(Undo {
        job: b,
        origin,
        inserted_route: route_a,
        inserted_pos,
    }))
}

fn recover_inject(
    solution: &mut Solution,
    name: &'static str,
    undo: Undo,
) -> Result<(), SolverError> {
    let Some(route) = solution.routes.get_mut(undo.inserted_route) else {
        return Err(SolverError::RecoverConflict { operator: name });
    };
    if route.jobs.get(undo.inserted_pos) != Some(&undo.job) {
        return Err(SolverError::RecoverConflict { operator: name });
    }

    route.jobs.remove(undo.inserted_pos);
    insert_at(solution, undo.origin, undo.job);
    Ok(())
}

/// Moves job `b` immediately before job `a`.
#[derive(Default)]
pub struct InjectBefore {
    undo: Option<Undo>,
}

impl InjectBefore {
    pub const NAME: &'static str = "InjectBefore";

    pub fn new() -> Self {
        InjectBefore::default()
    }
}

impl PairwiseMove for InjectBefore {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn try_move(
        &mut self,
        solution: &mut Solution,
        a: usize,
        b: usize,
    ) -> Result<bool, SolverError> {
        debug!("{}: trying to inject job {} before job {}", Self::NAME, b, a);
        self.undo = inject(solution, Self::NAME, Placement::Before, a, b)?;
        Ok(self.undo.is_some())
    }

    fn recover(&mut self, solution: &mut Solution) -> Result<(), SolverError> {
        match self.undo.take() {
            Some(undo) => recover_inject(solution, Self::NAME, undo),
            None => Ok(()),
        }
    }
}

/// Moves job `b` immediately after job `a`.
#[derive(Default)]
pub struct InjectAfter {
    undo: Option<Undo>,
}

impl InjectAfter {
    pub const NAME: &'static str = "InjectAfter";

    pub fn new() -> Self {
        InjectAfter::default()
    }
}

impl PairwiseMove for InjectAfter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn try_move(
        &mut self,
        solution: &mut Solution,
        a: usize,
        b: usize,
    ) -> Result<bool, SolverError> {
        debug!("{}: trying to inject job {} after job {}", Self::NAME, b, a);
        self.undo = inject(solution, Self::NAME, Placement::After, a, b)?;
        Ok(self.undo.is_some())
    }

    fn recover(&mut self, solution: &mut Solution) -> Result<(), SolverError> {
        match self.undo.take() {
            Some(undo) => recover_inject(solution, Self::NAME, undo),
            None => Ok(()),
        }
    }
}
