//! Configuration shared by the constructive and improvement searches.

use serde::{Deserialize, Serialize};

/// Settings for [`NearestSearch`] and [`Ils`]. `max_iter`, `max_time`, and
/// `log_freq` only apply to the improvement driver.
///
/// [`NearestSearch`]: crate::nearest::NearestSearch
/// [`Ils`]: crate::ils::Ils
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of candidates kept per job in the neighbour lists. Defaults
    /// to the problem's node count when unset.
    pub neighbourhood_size: Option<usize>,
    /// Seed for the search's own random generator; a fresh entropy seed is
    /// drawn when unset.
    pub seed: Option<u64>,
    /// Maximum number of ILS iterations.
    pub max_iter: usize,
    /// Wall-clock budget in minutes for the ILS run.
    pub max_time: f64,
    /// Progress is logged every `log_freq` iterations.
    pub log_freq: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            neighbourhood_size: None,
            seed: None,
            max_iter: 10,
            max_time: 3.0,
            log_freq: 1,
        }
    }
}

impl SearchConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        SearchConfig::default()
    }

    /// Set the neighbour-list size.
    pub fn with_neighbourhood_size(mut self, size: usize) -> Self {
        self.neighbourhood_size = Some(size);
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the maximum iteration count.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the time budget in minutes.
    pub fn with_max_time(mut self, minutes: f64) -> Self {
        self.max_time = minutes;
        self
    }

    /// Set the logging cadence.
    pub fn with_log_freq(mut self, log_freq: usize) -> Self {
        self.log_freq = log_freq;
        self
    }

    /// Neighbour-list size to use for `problem_nodes` total nodes.
    pub fn resolve_neighbourhood_size(&self, problem_nodes: usize) -> usize {
        self.neighbourhood_size.unwrap_or(problem_nodes)
    }
}
