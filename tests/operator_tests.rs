//! Move/recover tests for every operator: each applied move must be
//! exactly reversible, and contract violations must surface as errors.

use ils_vrp::error::SolverError;
use ils_vrp::model::Model;
use ils_vrp::operators::{
    CreateRoute, InjectAfter, InjectBefore, PairwiseMove, TwoOptExchange, TwoPointSwap,
};
use ils_vrp::problem::Problem;
use ils_vrp::solution::{Route, Solution};

fn open_problem(num_jobs: usize) -> Problem {
    let mut model = Model::new();
    model.add_objective("num_unassigned_jobs", |solution, _problem| {
        solution.unassigned_jobs.len() as f64
    });
    let mut problem = Problem::new(model, 4, num_jobs + 1, vec![0]);
    problem.set_closeness(|_problem, a, b| (a as f64 - b as f64).abs());
    problem
}

/// Solution with the given routes; unassigned jobs are derived.
fn solution_with_routes(problem: &Problem, routes: &[(usize, &[usize])]) -> Solution {
    let mut solution = Solution::new(problem);
    for &(vehicle_idx, jobs) in routes {
        solution.routes.push(Route {
            vehicle_idx,
            jobs: jobs.to_vec(),
        });
    }
    solution.eval_unassigned_jobs(problem);
    solution
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
fn test_create_route_from_unassigned_and_recover() {
    let problem = open_problem(4);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2])]);
    let before = solution.clone();

    let mut op = CreateRoute::new();
    assert!(op.try_move(&mut solution, 1, 3).unwrap());
    assert_eq!(solution.routes.len(), 2);
    assert_eq!(solution.routes[1].vehicle_idx, 1);
    assert_eq!(solution.routes[1].jobs, vec![3]);
    assert!(!solution.unassigned_jobs.contains(&3));
    assert_partition(&solution, &problem);

    op.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}

#[test]
fn test_create_route_steals_job_from_route() {
    let problem = open_problem(4);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2, 3])]);
    let before = solution.clone();

    let mut op = CreateRoute::new();
    assert!(op.try_move(&mut solution, 2, 2).unwrap());
    assert_eq!(solution.routes[0].jobs, vec![1, 3]);
    assert_eq!(solution.routes[1].jobs, vec![2]);
    assert_partition(&solution, &problem);

    op.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}

#[test]
fn test_create_route_recover_detects_intervening_mutation() {
    let problem = open_problem(4);
    let mut solution = solution_with_routes(&problem, &[]);

    let mut op = CreateRoute::new();
    op.try_move(&mut solution, 0, 1).unwrap();
    // Another structural mutation breaks the LIFO discipline.
    solution.routes.push(Route {
        vehicle_idx: 1,
        jobs: vec![2],
    });

    assert_eq!(
        op.recover(&mut solution),
        Err(SolverError::RecoverConflict {
            operator: CreateRoute::NAME
        })
    );
}

#[test]
fn test_create_route_missing_job_is_an_error() {
    let problem = open_problem(3);
    let mut solution = solution_with_routes(&problem, &[]);
    solution.unassigned_jobs.retain(|&job| job != 2);

    let mut op = CreateRoute::new();
    assert_eq!(
        op.try_move(&mut solution, 0, 2),
        Err(SolverError::JobNotFound {
            operator: CreateRoute::NAME,
            job: 2
        })
    );
}

#[test]
fn test_inject_before_from_unassigned() {
    let problem = open_problem(4);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2])]);
    let before = solution.clone();

    let mut op = InjectBefore::new();
    assert!(op.try_move(&mut solution, 2, 4).unwrap());
    assert_eq!(solution.routes[0].jobs, vec![1, 4, 2]);
    assert_partition(&solution, &problem);

    op.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}

#[test]
fn test_inject_after_cross_route() {
    let problem = open_problem(5);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2]), (1, &[3, 4, 5])]);
    let before = solution.clone();

    let mut op = InjectAfter::new();
    assert!(op.try_move(&mut solution, 1, 4).unwrap());
    assert_eq!(solution.routes[0].jobs, vec![1, 4, 2]);
    assert_eq!(solution.routes[1].jobs, vec![3, 5]);
    assert_partition(&solution, &problem);

    op.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}

// When b starts ahead of a in the same route, removing b shifts a left by
// one and the insertion index must account for it.
#[test]
fn test_inject_before_same_route_b_ahead_of_a() {
    let problem = open_problem(4);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2, 3, 4])]);
    let before = solution.clone();

    let mut op = InjectBefore::new();
    assert!(op.try_move(&mut solution, 3, 1).unwrap());
    assert_eq!(solution.routes[0].jobs, vec![2, 1, 3, 4]);

    op.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}

#[test]
fn test_inject_after_same_route_b_ahead_of_a() {
    let problem = open_problem(4);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2, 3, 4])]);
    let before = solution.clone();

    let mut op = InjectAfter::new();
    assert!(op.try_move(&mut solution, 3, 1).unwrap());
    assert_eq!(solution.routes[0].jobs, vec![2, 3, 1, 4]);

    op.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}

#[test]
fn test_inject_same_route_b_behind_a_needs_no_adjustment() {
    let problem = open_problem(4);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2, 3, 4])]);
    let before = solution.clone();

    let mut op = InjectBefore::new();
    assert!(op.try_move(&mut solution, 2, 4).unwrap());
    assert_eq!(solution.routes[0].jobs, vec![1, 4, 2, 3]);

    op.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}

#[test]
fn test_inject_with_unassigned_anchor_is_not_applied() {
    let problem = open_problem(3);
    let mut solution = solution_with_routes(&problem, &[(0, &[1])]);
    let before = solution.clone();

    // Job 2 is unassigned, so there is no position to insert next to.
    let mut op = InjectAfter::new();
    assert!(!op.try_move(&mut solution, 2, 3).unwrap());
    assert_eq!(solution, before);

    op.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}

#[test]
fn test_inject_identical_jobs_is_an_error() {
    let problem = open_problem(3);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2])]);

    let mut op = InjectBefore::new();
    assert_eq!(
        op.try_move(&mut solution, 2, 2),
        Err(SolverError::IdenticalJobs {
            operator: InjectBefore::NAME,
            job: 2
        })
    );
}

#[test]
fn test_two_point_swap_cross_route_and_recover() {
    let problem = open_problem(4);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2]), (1, &[3, 4])]);
    let before = solution.clone();

    let mut op = TwoPointSwap::new();
    assert!(op.try_move(&mut solution, 1, 4).unwrap());
    assert_eq!(solution.routes[0].jobs, vec![4, 2]);
    assert_eq!(solution.routes[1].jobs, vec![3, 1]);
    assert_partition(&solution, &problem);

    op.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}

#[test]
fn test_two_point_swap_same_route() {
    let problem = open_problem(3);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2, 3])]);
    let before = solution.clone();

    let mut op = TwoPointSwap::new();
    assert!(op.try_move(&mut solution, 1, 3).unwrap());
    assert_eq!(solution.routes[0].jobs, vec![3, 2, 1]);

    op.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}

#[test]
fn test_two_point_swap_unassigned_endpoint_is_not_applied() {
    let problem = open_problem(3);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2])]);
    let before = solution.clone();

    let mut op = TwoPointSwap::new();
    assert!(!op.try_move(&mut solution, 1, 3).unwrap());
    assert_eq!(solution, before);
}

#[test]
fn test_two_opt_same_route_reverses_inclusive_segment() {
    let problem = open_problem(4);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2, 3, 4])]);
    let before = solution.clone();

    let mut op = TwoOptExchange::new();
    assert!(op.try_move(&mut solution, 1, 3).unwrap());
    assert_eq!(solution.routes[0].jobs, vec![3, 2, 1, 4]);

    op.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}

// Reversing the same segment twice restores the original order.
#[test]
fn test_two_opt_double_reversal_is_identity() {
    let problem = open_problem(5);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2, 3, 4, 5])]);
    let before = solution.clone();

    let mut op = TwoOptExchange::new();
    assert!(op.try_move(&mut solution, 2, 4).unwrap());
    assert!(op.try_move(&mut solution, 2, 4).unwrap());
    assert_eq!(solution, before);
}

#[test]
fn test_two_opt_cross_route_exchanges_tails() {
    let problem = open_problem(6);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2, 3]), (1, &[4, 5, 6])]);
    let before = solution.clone();

    let mut op = TwoOptExchange::new();
    assert!(op.try_move(&mut solution, 2, 5).unwrap());
    assert_eq!(solution.routes[0].jobs, vec![1, 2, 6]);
    assert_eq!(solution.routes[1].jobs, vec![4, 5, 3]);
    assert_partition(&solution, &problem);

    op.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}

#[test]
fn test_two_opt_both_tail_jobs_is_a_no_op() {
    let problem = open_problem(6);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2, 3]), (1, &[4, 5, 6])]);
    let before = solution.clone();

    let mut op = TwoOptExchange::new();
    assert!(!op.try_move(&mut solution, 3, 6).unwrap());
    assert_eq!(solution, before);

    op.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}

#[test]
fn test_two_opt_unassigned_endpoint_is_not_applied() {
    let problem = open_problem(4);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2, 3])]);
    let before = solution.clone();

    let mut op = TwoOptExchange::new();
    assert!(!op.try_move(&mut solution, 4, 2).unwrap());
    assert_eq!(solution, before);
}

#[test]
fn test_recover_without_move_is_a_no_op() {
    let problem = open_problem(3);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2, 3])]);
    let before = solution.clone();

    let mut inject = InjectBefore::new();
    let mut swap = TwoPointSwap::new();
    let mut two_opt = TwoOptExchange::new();
    inject.recover(&mut solution).unwrap();
    swap.recover(&mut solution).unwrap();
    two_opt.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}

// A second recover after a successful one must not rewind again.
#[test]
fn test_recover_consumes_the_undo_record() {
    let problem = open_problem(4);
    let mut solution = solution_with_routes(&problem, &[(0, &[1, 2, 3, 4])]);
    let before = solution.clone();

    let mut op = InjectAfter::new();
    assert!(op.try_move(&mut solution, 3, 1).unwrap());
    op.recover(&mut solution).unwrap();
    op.recover(&mut solution).unwrap();
    assert_eq!(solution, before);
}
