//! Nearest-neighbour constructive search.
//!
//! Seeds one route per vehicle with a random unassigned job, extends each
//! route greedily along the tail job's neighbour list, then repairs
//! leftover unassigned jobs by neighbour-guided insertion. Jobs that still
//! cannot be placed stay unassigned; that is an expected outcome, not an
//! error.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::SearchConfig;
use crate::error::SolverError;
use crate::operators::{CreateRoute, InjectAfter, InjectBefore, PairwiseMove};
use crate::problem::Problem;
use crate::solution::Solution;

/// Greedy constructor producing an initial feasible solution.
pub struct NearestSearch {
    config: SearchConfig,
    rng: ChaCha8Rng,
}

impl NearestSearch {
    pub fn new(config: SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        NearestSearch { config, rng }
    }

    /// Build a solution from scratch. Takes the problem mutably because
    /// the neighbour lists are built on demand.
    pub fn solve(&mut self, problem: &mut Problem) -> Result<Solution, SolverError> {
        let size = self.config.resolve_neighbourhood_size(problem.num_nodes);
        problem.ensure_neighbours(size)?;

        let mut solution = Solution::new(problem);
        solution.eval_solution(problem, false);
        info!(
            "NearestSearch: initial num of unassigned jobs: {}",
            solution.unassigned_jobs.len()
        );

        // All trial moves run on the cache; only constraint-checked states
        // are merged back into the authoritative solution.
        let mut cache = solution.clone();
        let mut create_route = CreateRoute::new();
        let mut inject_after = InjectAfter::new();

        for vehicle_idx in 0..problem.num_vehicles {
            if solution.unassigned_jobs.is_empty() {
                break;
            }

            let Some(&pick) = cache.unassigned_jobs.choose(&mut self.rng) else {
                break;
            };
            create_route.try_move(&mut cache, vehicle_idx, pick)?;
            if !cache.eval_constraint(problem) {
                // This vehicle cannot serve the picked job; skip it.
                debug!(
                    "NearestSearch: route for vehicle {} infeasible, skipping",
                    vehicle_idx
                );
                cache.assign_from(&solution);
                continue;
            }
            solution.assign_from(&cache);

            // Keep extending the tail with its closest unassigned
            // neighbour for as long as the result stays feasible.
            let mut tail = pick;
            'extend: loop {
                for &neighbour in problem.neighbours(tail) {
                    if !cache.unassigned_jobs.contains(&neighbour) {
                        continue;
                    }
                    inject_after.try_move(&mut cache, tail, neighbour)?;
                    if cache.eval_constraint(problem) {
                        solution.assign_from(&cache);
                        tail = neighbour;
                        continue 'extend;
                    }
                    debug!(
                        "NearestSearch: extending with neighbour {} failed, recovering",
                        neighbour
                    );
                    cache.assign_from(&solution);
                }
                break;
            }
        }

        self.repair(problem, &mut solution, &mut cache)?;

        solution.eval_solution(problem, false);
        info!(
            "NearestSearch: final num of unassigned jobs: {}",
            solution.unassigned_jobs.len()
        );

        Ok(solution)
    }

    /// Try to place every remaining unassigned job next to one of its
    /// assigned neighbours, first before then after, until an iteration
    /// makes no further progress.
    fn repair(
        &mut self,
        problem: &Problem,
        solution: &mut Solution,
        cache: &mut Solution,
    ) -> Result<(), SolverError> {
        let mut inject_before = InjectBefore::new();
        let mut inject_after = InjectAfter::new();

        loop {
            let before_count = solution.unassigned_jobs.len();
            let pending = solution.unassigned_jobs.clone();

            for job in pending {
                'candidates: for &neighbour in problem.neighbours(job) {
                    if cache.unassigned_jobs.contains(&neighbour) {
                        continue;
                    }

                    let placements: [&mut dyn PairwiseMove; 2] =
                        [&mut inject_before, &mut inject_after];
                    for op in placements {
                        if !op.try_move(cache, neighbour, job)? {
                            continue;
                        }
                        if cache.eval_constraint(problem) {
                            solution.assign_from(cache);
                            break 'candidates;
                        }
                        op.recover(cache)?;
                    }
                }
            }

            if solution.unassigned_jobs.len() >= before_count {
                break;
            }
        }

        Ok(())
    }
}
