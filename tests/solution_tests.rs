//! Unit tests for the Solution and Route types.

use ils_vrp::model::Model;
use ils_vrp::problem::Problem;
use ils_vrp::solution::{Route, Solution};

/// Problem with one depot (index 0) and `num_jobs` jobs laid out on a
/// line, so the travel cost between nodes `i` and `j` is `|i - j|`.
fn line_problem(num_vehicles: usize, num_jobs: usize) -> Problem {
    let mut model = Model::new();
    model.add_objective("num_unassigned_jobs", |solution, _problem| {
        solution.unassigned_jobs.len() as f64
    });
    model.add_objective("distance", |solution, _problem| {
        let mut total = 0.0;
        for route in &solution.routes {
            let mut prev = 0.0;
            for &job in &route.jobs {
                total += (job as f64 - prev).abs();
                prev = job as f64;
            }
            total += prev;
        }
        total
    });

    let mut problem = Problem::new(model, num_vehicles, num_jobs + 1, vec![0]);
    problem.set_closeness(|_problem, a, b| (a as f64 - b as f64).abs());
    problem
}

fn assert_partition(solution: &Solution, problem: &Problem) {
    let mut jobs: Vec<usize> = solution
        .unassigned_jobs
        .iter()
        .copied()
        .chain(solution.routes.iter().flat_map(|r| r.jobs.iter().copied()))
        .collect();
    jobs.sort_unstable();
    assert_eq!(jobs, problem.job_indexes);
}

#[test]
fn test_new_solution_has_all_jobs_unassigned() {
    let problem = line_problem(2, 4);
    let solution = Solution::new(&problem);

    assert!(solution.routes.is_empty());
    assert_eq!(solution.unassigned_jobs, vec![1, 2, 3, 4]);
    assert!(solution.is_feasible);
    assert_partition(&solution, &problem);
}

#[test]
fn test_eval_unassigned_jobs() {
    let problem = line_problem(2, 4);
    let mut solution = Solution::new(&problem);

    solution.routes.push(Route {
        vehicle_idx: 0,
        jobs: vec![2, 4],
    });
    let count = solution.eval_unassigned_jobs(&problem);

    assert_eq!(count, 2);
    assert_eq!(solution.unassigned_jobs, vec![1, 3]);
    assert_partition(&solution, &problem);
}

#[test]
fn test_eval_constraint_short_circuits_in_order() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let calls = Arc::new(AtomicUsize::new(0));
    let first_calls = calls.clone();
    let second_calls = calls.clone();

    let mut model = Model::new();
    model.add_constraint(move |_solution, _problem| {
        first_calls.fetch_add(1, Ordering::SeqCst);
        false
    });
    model.add_constraint(move |_solution, _problem| {
        second_calls.fetch_add(100, Ordering::SeqCst);
        true
    });

    let problem = Problem::new(model, 1, 3, vec![0]);
    let mut solution = Solution::new(&problem);

    assert!(!solution.eval_constraint(&problem));
    assert!(!solution.is_feasible);
    // Only the first, failing predicate must have run.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_eval_solution_skips_objectives_when_infeasible() {
    let mut model = Model::new();
    model.add_constraint(|_solution, _problem| false);
    model.add_objective("unassigned", |solution, _problem| {
        solution.unassigned_jobs.len() as f64
    });
    let problem = Problem::new(model, 1, 3, vec![0]);

    let mut solution = Solution::new(&problem);
    solution.eval_solution(&problem, false);
    assert!(!solution.is_feasible);
    assert!(solution.objective_values.is_empty());

    solution.eval_solution(&problem, true);
    assert_eq!(solution.objective_values, vec![2.0]);
}

#[test]
fn test_eval_objective_order_matches_declaration() {
    let problem = line_problem(1, 3);
    let mut solution = Solution::new(&problem);
    solution.routes.push(Route {
        vehicle_idx: 0,
        jobs: vec![1, 2],
    });
    solution.eval_solution(&problem, false);

    assert_eq!(problem.model.objective_names(), vec!["num_unassigned_jobs", "distance"]);
    // One job left unassigned; route 0 -> 1 -> 2 -> 0 travels 4.
    assert_eq!(solution.objective_values, vec![1.0, 4.0]);
}

#[test]
fn test_assign_from_is_a_full_value_copy() {
    let problem = line_problem(2, 4);
    let mut original = Solution::new(&problem);
    original.routes.push(Route {
        vehicle_idx: 0,
        jobs: vec![1, 2],
    });
    original.eval_solution(&problem, false);

    let mut copy = Solution::new(&problem);
    copy.assign_from(&original);
    assert_eq!(copy, original);

    // Mutating the copy must not leak into the original.
    copy.routes[0].jobs.push(3);
    copy.unassigned_jobs.clear();
    assert_eq!(original.routes[0].jobs, vec![1, 2]);
    assert_eq!(original.unassigned_jobs, vec![3, 4]);
}

#[test]
fn test_better_than_first_differing_index() {
    let problem = line_problem(1, 2);
    let mut left = Solution::new(&problem);
    let mut right = Solution::new(&problem);

    left.objective_values = vec![1.0, 5.0];
    right.objective_values = vec![2.0, 3.0];
    assert!(left.better_than(&right));
    assert!(!right.better_than(&left));
}

#[test]
fn test_better_than_skips_equal_prefix() {
    let problem = line_problem(1, 2);
    let mut left = Solution::new(&problem);
    let mut right = Solution::new(&problem);

    left.objective_values = vec![4.0, 4.0, 1.0];
    right.objective_values = vec![4.0, 4.0, 2.0];
    assert!(left.better_than(&right));
    assert!(!right.better_than(&left));
}

// Regression pin: only the first differing index decides. A later, much
// better value never outweighs an earlier, worse one.
#[test]
fn test_better_than_ignores_later_indices() {
    let problem = line_problem(1, 2);
    let mut left = Solution::new(&problem);
    let mut right = Solution::new(&problem);

    left.objective_values = vec![3.0, 0.0];
    right.objective_values = vec![2.0, 9.0];
    assert!(!left.better_than(&right));
    assert!(right.better_than(&left));
}

#[test]
fn test_better_than_equal_vectors_is_false() {
    let problem = line_problem(1, 2);
    let mut left = Solution::new(&problem);
    let mut right = Solution::new(&problem);

    left.objective_values = vec![1.0, 2.0];
    right.objective_values = vec![1.0, 2.0];
    assert!(!left.better_than(&right));
    assert!(!right.better_than(&left));

    left.objective_values.clear();
    right.objective_values.clear();
    assert!(!left.better_than(&right));
}

#[test]
fn test_get_route_finds_vehicle() {
    let problem = line_problem(3, 3);
    let mut solution = Solution::new(&problem);
    solution.routes.push(Route {
        vehicle_idx: 2,
        jobs: vec![1],
    });

    assert!(solution.get_route(2).is_some());
    assert_eq!(solution.get_route(2).unwrap().jobs, vec![1]);
    assert!(solution.get_route(0).is_none());
}

#[test]
fn test_report_names_objectives() {
    let problem = line_problem(1, 2);
    let mut solution = Solution::new(&problem);
    solution.eval_solution(&problem, false);

    let report = solution.report(&problem);
    assert!(report.contains("num_unassigned_jobs: 2.00"));
    assert!(report.contains("is_feasible: true"));
}
