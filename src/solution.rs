//! Solution representation: vehicle routes, the unassigned-job pool, and
//! the cached evaluation results.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::problem::Problem;

/// An ordered sequence of jobs served by one vehicle. The depot is
/// implicit and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub vehicle_idx: usize,
    pub jobs: Vec<usize>,
}

impl Route {
    pub fn new(vehicle_idx: usize) -> Self {
        Route {
            vehicle_idx,
            jobs: Vec::new(),
        }
    }

    pub fn with_job(vehicle_idx: usize, job: usize) -> Self {
        Route {
            vehicle_idx,
            jobs: vec![job],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Mutable search state bound to one problem.
///
/// `is_feasible` and `objective_values` are caches: they are only valid
/// after the corresponding `eval_*` call and go stale on every raw
/// mutation. The invariant that must hold after each committed mutation is
/// that `unassigned_jobs` plus all route jobs partition the problem's job
/// universe exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub routes: Vec<Route>,
    pub unassigned_jobs: Vec<usize>,
    pub is_feasible: bool,
    pub objective_values: Vec<f64>,
    problem_id: u64,
}

impl Solution {
    /// Create an empty solution: no routes, every job unassigned.
    pub fn new(problem: &Problem) -> Self {
        Solution {
            routes: Vec::new(),
            unassigned_jobs: problem.job_indexes.clone(),
            is_feasible: true,
            objective_values: Vec::new(),
            problem_id: problem.id(),
        }
    }

    /// Id of the problem this solution was created for.
    pub fn problem_id(&self) -> u64 {
        self.problem_id
    }

    /// First route assigned to `vehicle_idx`, if any.
    pub fn get_route(&self, vehicle_idx: usize) -> Option<&Route> {
        self.routes.iter().find(|r| r.vehicle_idx == vehicle_idx)
    }

    /// Recompute `unassigned_jobs` as the job universe minus every job
    /// present in a route. Returns the new unassigned count.
    pub fn eval_unassigned_jobs(&mut self, problem: &Problem) -> usize {
        let assigned: HashSet<usize> = self
            .routes
            .iter()
            .flat_map(|route| route.jobs.iter().copied())
            .collect();
        self.unassigned_jobs = problem
            .job_indexes
            .iter()
            .copied()
            .filter(|job| !assigned.contains(job))
            .collect();

        self.unassigned_jobs.len()
    }

    /// Evaluate the feasibility predicates in declaration order, stopping
    /// at the first failure. Updates and returns `is_feasible`.
    pub fn eval_constraint(&mut self, problem: &Problem) -> bool {
        self.is_feasible = true;
        for constraint in &problem.model.constraints {
            if !constraint(self, problem) {
                self.is_feasible = false;
                break;
            }
        }

        self.is_feasible
    }

    /// Apply every objective function in declaration order and cache the
    /// resulting vector.
    pub fn eval_objective(&mut self, problem: &Problem) -> &[f64] {
        let mut values = Vec::with_capacity(problem.model.objectives.len());
        for objective in &problem.model.objectives {
            values.push((objective.function)(self, problem));
        }
        self.objective_values = values;

        &self.objective_values
    }

    /// Full re-evaluation: unassigned jobs, then constraints, then
    /// objectives. Objectives are skipped for an infeasible solution
    /// unless `allow_infeasible` is set.
    pub fn eval_solution(&mut self, problem: &Problem, allow_infeasible: bool) {
        self.eval_unassigned_jobs(problem);
        if self.eval_constraint(problem) || allow_infeasible {
            self.eval_objective(problem);
        }
    }

    /// Overwrite this solution with a full value copy of `other`. No
    /// state is shared afterwards.
    pub fn assign_from(&mut self, other: &Solution) {
        self.routes.clone_from(&other.routes);
        self.unassigned_jobs.clone_from(&other.unassigned_jobs);
        self.objective_values.clone_from(&other.objective_values);
        self.is_feasible = other.is_feasible;
        self.problem_id = other.problem_id;
    }

    /// First-differing-index comparison of the objective vectors: scan
    /// both vectors together and let the first strict difference decide.
    /// Equal vectors (or an empty overlap) compare as "not better".
    ///
    /// This is the comparison rule the search accepts moves with; see
    /// DESIGN.md for the regression tests pinning it.
    pub fn better_than(&self, other: &Solution) -> bool {
        for (own, theirs) in self.objective_values.iter().zip(&other.objective_values) {
            match own.partial_cmp(theirs) {
                Some(std::cmp::Ordering::Less) => return true,
                Some(std::cmp::Ordering::Greater) => return false,
                _ => continue,
            }
        }

        false
    }

    /// Human-readable one-line summary with the objective names taken
    /// from the problem's model.
    pub fn report(&self, problem: &Problem) -> String {
        let objectives: Vec<String> = problem
            .model
            .objectives
            .iter()
            .zip(&self.objective_values)
            .map(|(objective, value)| format!("{}: {:.2}", objective.name, value))
            .collect();

        format!(
            "is_feasible: {}, num_unassigned_jobs: {}, objectives: [{}]",
            self.is_feasible,
            self.unassigned_jobs.len(),
            objectives.join(", ")
        )
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "is_feasible: {}, num_unassigned_jobs: {}, objectives: {:?}",
            self.is_feasible,
            self.unassigned_jobs.len(),
            self.objective_values
        )
    }
}
