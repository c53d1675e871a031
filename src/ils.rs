//! Iterated local search: repeated repair and first-improving operator
//! sweeps under an iteration and wall-clock budget.

use std::time::{Duration, Instant};

use log::info;

use crate::config::SearchConfig;
use crate::error::SolverError;
use crate::operators::{InjectAfter, InjectBefore, PairwiseMove, TwoOptExchange, TwoPointSwap};
use crate::problem::Problem;
use crate::solution::Solution;

/// The improvement driver. Holds the configuration and an optional seed
/// solution; all search state lives inside [`Ils::solve`].
pub struct Ils {
    config: SearchConfig,
    init_solution: Option<Solution>,
}

impl Ils {
    pub fn new(config: SearchConfig) -> Self {
        Ils {
            config,
            init_solution: None,
        }
    }

    /// Seed the search with an existing solution. The seed must belong to
    /// the problem passed to [`Ils::solve`]; a mismatch is a setup error.
    pub fn set_initial_solution(&mut self, solution: Solution) {
        self.init_solution = Some(solution);
    }

    /// Run the search and return the best solution found.
    ///
    /// The deadline (`max_time` minutes) is checked after every operator
    /// sweep, never inside one, so the call can overrun by at most one
    /// sweep. Once the loop has started the best solution so far is always
    /// returned; only setup errors fail the call.
    pub fn solve(&mut self, problem: &mut Problem) -> Result<Solution, SolverError> {
        let start = Instant::now();
        let deadline = Duration::from_secs_f64(self.config.max_time * 60.0);

        let size = self.config.resolve_neighbourhood_size(problem.num_nodes);
        problem.ensure_neighbours(size)?;

        let mut working = match &self.init_solution {
            Some(seed) => {
                if seed.problem_id() != problem.id() {
                    return Err(SolverError::ProblemMismatch);
                }
                seed.clone()
            }
            None => Solution::new(problem),
        };
        working.eval_solution(problem, false);
        let mut best = working.clone();
        // The single staging copy every trial move mutates; accepted states
        // are merged into `working`, rejected moves are recovered in place.
        let mut cache = working.clone();
        info!("Ils: initial solution: {}", working.report(problem));

        let mut repair_ops: [Box<dyn PairwiseMove>; 2] =
            [Box::new(InjectBefore::new()), Box::new(InjectAfter::new())];
        let mut sweep_ops: [Box<dyn PairwiseMove>; 4] = [
            Box::new(InjectBefore::new()),
            Box::new(InjectAfter::new()),
            Box::new(TwoPointSwap::new()),
            Box::new(TwoOptExchange::new()),
        ];

        for iter in 0..self.config.max_iter {
            for op in repair_ops.iter_mut() {
                Self::inject_unassigned(op.as_mut(), problem, &mut cache, &mut working)?;
            }

            // The downhill pass currently shares the uphill acceptance
            // rule; the distinction is kept for the day it diverges.
            for downhill in [false, true] {
                let phase = if downhill { 'd' } else { 'u' };
                for op in sweep_ops.iter_mut() {
                    for &job in &problem.job_indexes {
                        Self::local_search(
                            op.as_mut(),
                            problem,
                            &mut cache,
                            &mut working,
                            job,
                            downhill,
                        )?;
                    }
                    if working.better_than(&best) {
                        best.assign_from(&working);
                    }
                    if self.config.log_freq > 0 && iter % self.config.log_freq == 0 {
                        info!(
                            "Ils: iter={}-{}-{:<12}: {}",
                            iter,
                            phase,
                            op.name(),
                            best.report(problem)
                        );
                    }
                    if start.elapsed() > deadline {
                        info!("Ils: time budget exhausted, returning best solution");
                        return Ok(best);
                    }
                }
            }
        }

        Ok(best)
    }

    /// Repair pass: place each unassigned job next to the first assigned
    /// job that keeps the solution feasible. Merges into `working` when
    /// the unassigned count dropped.
    fn inject_unassigned(
        op: &mut dyn PairwiseMove,
        problem: &Problem,
        cache: &mut Solution,
        working: &mut Solution,
    ) -> Result<(), SolverError> {
        let num_unassigned = cache.unassigned_jobs.len();
        if num_unassigned == 0 {
            return Ok(());
        }

        let pending = cache.unassigned_jobs.clone();
        for unassigned in pending {
            for &job in &problem.job_indexes {
                if job == unassigned || cache.unassigned_jobs.contains(&job) {
                    continue;
                }
                if !op.try_move(cache, job, unassigned)? {
                    continue;
                }
                if cache.eval_constraint(problem) {
                    break;
                }
                op.recover(cache)?;
            }
        }

        if cache.unassigned_jobs.len() < num_unassigned {
            working.assign_from(cache);
        }
        Ok(())
    }

    /// One first-improving scan over `job`'s neighbour list. The first
    /// feasible trial that beats `working` is accepted; every other trial
    /// is recovered.
    fn local_search(
        op: &mut dyn PairwiseMove,
        problem: &Problem,
        cache: &mut Solution,
        working: &mut Solution,
        job: usize,
        _downhill: bool,
    ) -> Result<(), SolverError> {
        for &neighbour in problem.neighbours(job) {
            if !op.try_move(cache, job, neighbour)? {
                continue;
            }
            cache.eval_solution(problem, false);
            if cache.is_feasible && cache.better_than(working) {
                working.assign_from(cache);
                return Ok(());
            }
            op.recover(cache)?;
        }

        Ok(())
    }
}
