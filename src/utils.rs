//! Reporting helpers: duration formatting and solution export.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::problem::Problem;
use crate::solution::Solution;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Save a solution to a human-readable text file.
pub fn save_solution<P: AsRef<Path>>(
    solution: &Solution,
    problem: &Problem,
    path: P,
) -> std::io::Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "Feasible: {}", solution.is_feasible)?;
    writeln!(file, "Unassigned jobs: {}", solution.unassigned_jobs.len())?;
    for (objective, value) in problem
        .model
        .objectives
        .iter()
        .zip(&solution.objective_values)
    {
        writeln!(file, "{}: {:.2}", objective.name, value)?;
    }
    writeln!(file)?;

    for (i, route) in solution.routes.iter().enumerate() {
        write!(file, "Route #{} (vehicle {}):", i + 1, route.vehicle_idx)?;
        if route.is_empty() {
            writeln!(file, " empty")?;
            continue;
        }
        for &job in &route.jobs {
            write!(file, " {}", job)?;
        }
        writeln!(file)?;
    }

    if !solution.unassigned_jobs.is_empty() {
        writeln!(file)?;
        writeln!(file, "Unassigned: {:?}", solution.unassigned_jobs)?;
    }

    Ok(())
}

/// Save a solution as JSON.
pub fn save_solution_json<P: AsRef<Path>>(solution: &Solution, path: P) -> std::io::Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, solution)?;
    Ok(())
}
