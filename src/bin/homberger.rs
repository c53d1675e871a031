//! Demo driver for Solomon/Homberger VRPTW instances.
//!
//! Parses an instance file, wires up a model with time-window and capacity
//! constraints, and runs the nearest-search plus ILS pipeline.

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::Instant;

use ils_vrp::model::{Model, NodeAttr, NodeNodeAttr, VehicleAttr};
use ils_vrp::utils::{format_duration, save_solution};
use ils_vrp::{Problem, SearchConfig, Solution};

/// Attribute handles for the Homberger problem shape.
#[derive(Clone, Copy)]
struct Attrs {
    capacity: VehicleAttr,
    start_time: VehicleAttr,
    end_time: VehicleAttr,
    depot_index: VehicleAttr,
    demand: NodeAttr,
    ready_time: NodeAttr,
    due_time: NodeAttr,
    service_time: NodeAttr,
    cost: NodeNodeAttr,
}

/// One customer row from the instance file.
struct NodeData {
    x: f64,
    y: f64,
    demand: f64,
    ready_time: f64,
    due_time: f64,
    service_time: f64,
}

fn build_model() -> (Model, Attrs) {
    let mut model = Model::new();
    let attrs = Attrs {
        capacity: model.define_vehicle_attr(),
        start_time: model.define_vehicle_attr(),
        end_time: model.define_vehicle_attr(),
        depot_index: model.define_vehicle_attr(),
        demand: model.define_node_attr(),
        ready_time: model.define_node_attr(),
        due_time: model.define_node_attr(),
        service_time: model.define_node_attr(),
        cost: model.define_node_node_attr(),
    };

    model.add_objective("num_unassigned_jobs", |solution, _problem| {
        solution.unassigned_jobs.len() as f64
    });
    model.add_objective("num_vehicles", |solution, _problem| {
        solution.routes.iter().filter(|r| !r.is_empty()).count() as f64
    });
    model.add_objective("distance", move |solution, problem| {
        let mut total = 0.0;
        for route in &solution.routes {
            let depot = problem.get_vehicle_attr(route.vehicle_idx, attrs.depot_index) as usize;
            let mut prev = depot;
            for &job in &route.jobs {
                total += problem.get_node_node_attr(prev, job, attrs.cost);
                prev = job;
            }
            if !route.is_empty() {
                total += problem.get_node_node_attr(prev, depot, attrs.cost);
            }
        }
        total
    });
    model.add_objective("time", move |solution, problem| {
        let mut total = 0.0;
        for route in &solution.routes {
            if route.is_empty() {
                continue;
            }
            let depot = problem.get_vehicle_attr(route.vehicle_idx, attrs.depot_index) as usize;
            let mut prev = depot;
            let mut leave_time = problem.get_vehicle_attr(route.vehicle_idx, attrs.start_time);
            let mut route_time = 0.0;
            for &job in &route.jobs {
                let cost = problem.get_node_node_attr(prev, job, attrs.cost);
                let service_time = problem.get_node_attr(job, attrs.service_time);
                let ready_time = problem.get_node_attr(job, attrs.ready_time);

                let arrival_time = leave_time + cost;
                let waiting_time = (ready_time - arrival_time).max(0.0);
                leave_time = arrival_time + waiting_time + service_time;
                route_time += cost + waiting_time + service_time;
                prev = job;
            }
            route_time += problem.get_node_node_attr(prev, depot, attrs.cost);
            total += route_time;
        }
        total
    });

    model.add_constraint(move |solution, problem| {
        for route in &solution.routes {
            if route.is_empty() {
                continue;
            }
            let depot = problem.get_vehicle_attr(route.vehicle_idx, attrs.depot_index) as usize;
            let mut prev = depot;
            let mut leave_time = problem.get_vehicle_attr(route.vehicle_idx, attrs.start_time);
            for &job in &route.jobs {
                let cost = problem.get_node_node_attr(prev, job, attrs.cost);
                let service_time = problem.get_node_attr(job, attrs.service_time);
                let ready_time = problem.get_node_attr(job, attrs.ready_time);
                let due_time = problem.get_node_attr(job, attrs.due_time);

                let arrival_time = leave_time + cost;
                if arrival_time > due_time {
                    return false;
                }
                let waiting_time = (ready_time - arrival_time).max(0.0);
                leave_time = arrival_time + waiting_time + service_time;
                prev = job;
            }
            let end_time = leave_time + problem.get_node_node_attr(prev, depot, attrs.cost);
            if end_time > problem.get_vehicle_attr(route.vehicle_idx, attrs.end_time) {
                return false;
            }
        }
        true
    });
    model.add_constraint(move |solution, problem| {
        for route in &solution.routes {
            let capacity = problem.get_vehicle_attr(route.vehicle_idx, attrs.capacity);
            let mut route_demand = 0.0;
            for &job in &route.jobs {
                route_demand += problem.get_node_attr(job, attrs.demand);
                if route_demand > capacity {
                    return false;
                }
            }
        }
        true
    });

    (model, attrs)
}

fn parse_instance(path: &str) -> Result<(usize, f64, Vec<NodeData>), Box<dyn Error>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let mut num_vehicles = 0;
    let mut capacity = 0.0;
    let mut nodes = Vec::new();

    while let Some(line) = lines.next() {
        let line = line?;
        if line.contains("VEHICLE") {
            lines.next();
            if let Some(counts) = lines.next() {
                let numbers: Vec<f64> = counts?
                    .split_whitespace()
                    .filter_map(|part| part.parse().ok())
                    .collect();
                if numbers.len() >= 2 {
                    num_vehicles = numbers[0] as usize;
                    capacity = numbers[1];
                }
            }
        } else if line.contains("CUSTOMER") {
            lines.next();
            lines.next();
            for row in lines.by_ref() {
                let numbers: Vec<f64> = row?
                    .split_whitespace()
                    .filter_map(|part| part.parse().ok())
                    .collect();
                if numbers.len() != 7 {
                    break;
                }
                nodes.push(NodeData {
                    x: numbers[1],
                    y: numbers[2],
                    demand: numbers[3],
                    ready_time: numbers[4],
                    due_time: numbers[5],
                    service_time: numbers[6],
                });
            }
        }
    }

    if num_vehicles == 0 || nodes.is_empty() {
        return Err(format!("could not parse instance file: {}", path).into());
    }
    Ok((num_vehicles, capacity, nodes))
}

fn build_problem(num_vehicles: usize, capacity: f64, nodes: &[NodeData]) -> Problem {
    let (model, attrs) = build_model();
    let mut problem = Problem::new(model, num_vehicles, nodes.len(), vec![0]);

    // The first customer row is the depot; every vehicle starts there.
    for vehicle_idx in 0..num_vehicles {
        problem.set_vehicle_attr(vehicle_idx, attrs.capacity, capacity);
        problem.set_vehicle_attr(vehicle_idx, attrs.start_time, nodes[0].ready_time);
        problem.set_vehicle_attr(vehicle_idx, attrs.end_time, nodes[0].due_time);
        problem.set_vehicle_attr(vehicle_idx, attrs.depot_index, 0.0);
    }

    for (idx, node) in nodes.iter().enumerate() {
        problem.set_node_attr(idx, attrs.demand, node.demand);
        problem.set_node_attr(idx, attrs.ready_time, node.ready_time);
        problem.set_node_attr(idx, attrs.due_time, node.due_time);
        problem.set_node_attr(idx, attrs.service_time, node.service_time);
    }

    for (i, from) in nodes.iter().enumerate() {
        for (j, to) in nodes.iter().enumerate() {
            let cost = ((to.x - from.x).powi(2) + (to.y - from.y).powi(2)).sqrt();
            problem.set_node_node_attr(i, j, attrs.cost, cost);
        }
    }

    let cost = attrs.cost;
    problem.set_closeness(move |problem, from, to| problem.get_node_node_attr(from, to, cost));

    problem
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let instance_path = args.get(1).map(String::as_str).unwrap_or("problems/C1_2_1.TXT");

    println!("Loading instance from: {}", instance_path);
    let (num_vehicles, capacity, nodes) = parse_instance(instance_path)?;
    println!(
        "Loaded instance: {} vehicles, {} nodes",
        num_vehicles,
        nodes.len()
    );

    let mut problem = build_problem(num_vehicles, capacity, &nodes);
    let config = SearchConfig::new()
        .with_neighbourhood_size(50)
        .with_seed(0)
        .with_max_iter(10)
        .with_max_time(3.0)
        .with_log_freq(1);

    let start_time = Instant::now();
    let solution: Solution = ils_vrp::solve(&mut problem, config)?;
    let runtime = start_time.elapsed();

    println!("Search completed in {}", format_duration(runtime));
    println!("{}", solution.report(&problem));

    let output_path = format!("{}.sol", instance_path);
    println!("Saving solution to: {}", output_path);
    save_solution(&solution, &problem, &output_path)?;

    Ok(())
}
