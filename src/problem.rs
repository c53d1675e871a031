//! Immutable per-run problem context: attribute tables, the closeness
//! ranking, and the per-job neighbour lists that prune the search.

use std::sync::atomic::{AtomicU64, Ordering};

use itertools::Itertools;
use log::{debug, info};

use crate::error::SolverError;
use crate::model::{
    GlobalAttr, Model, NodeAttr, NodeNodeAttr, VehicleAttr, VehicleNodeNodeAttr,
};

static NEXT_PROBLEM_ID: AtomicU64 = AtomicU64::new(0);

/// Ranks how close two nodes are; smaller means closer. Used solely to
/// order and truncate the neighbour lists.
pub type Closeness = Box<dyn Fn(&Problem, usize, usize) -> f64 + Send + Sync>;

/// A problem instance: the model, the attribute data, and the derived
/// neighbour structure. Everything except the neighbour lists is fixed
/// after construction.
///
/// Depot nodes occupy the lowest indices; `job_indexes` is every node
/// index past the depots.
pub struct Problem {
    pub model: Model,
    pub num_vehicles: usize,
    pub num_nodes: usize,
    pub depot_indexes: Vec<usize>,
    pub job_indexes: Vec<usize>,
    global_attrs: Vec<f64>,
    vehicle_attrs: Vec<Vec<f64>>,
    node_attrs: Vec<Vec<f64>>,
    node_node_attrs: Vec<Vec<Vec<f64>>>,
    vehicle_node_node_attrs: Vec<Vec<Vec<Vec<f64>>>>,
    closeness: Option<Closeness>,
    neighbour_array: Option<Vec<Vec<usize>>>,
    neighbourhood_size: usize,
    id: u64,
}

impl Problem {
    /// Create a problem with zero-initialised attribute tables shaped by
    /// the model's declarations. Attribute values are filled in afterwards
    /// through the typed setters.
    pub fn new(
        model: Model,
        num_vehicles: usize,
        num_nodes: usize,
        depot_indexes: Vec<usize>,
    ) -> Self {
        let job_indexes = (depot_indexes.len()..num_nodes).collect();
        let global_attrs = vec![0.0; model.num_global_attrs];
        let vehicle_attrs = vec![vec![0.0; model.num_vehicle_attrs]; num_vehicles];
        let node_attrs = vec![vec![0.0; model.num_node_attrs]; num_nodes];
        let node_node_attrs = vec![vec![vec![0.0; model.num_node_node_attrs]; num_nodes]; num_nodes];
        let vehicle_node_node_attrs =
            vec![
                vec![vec![vec![0.0; model.num_vehicle_node_node_attrs]; num_nodes]; num_nodes];
                num_vehicles
            ];

        info!(
            "problem created: {} vehicles, {} nodes",
            num_vehicles, num_nodes
        );

        Problem {
            model,
            num_vehicles,
            num_nodes,
            depot_indexes,
            job_indexes,
            global_attrs,
            vehicle_attrs,
            node_attrs,
            node_node_attrs,
            vehicle_node_node_attrs,
            closeness: None,
            neighbour_array: None,
            neighbourhood_size: 0,
            id: NEXT_PROBLEM_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Identifier used to check that a seed solution belongs to this
    /// problem. Unique per constructed problem within the process.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn get_global_attr(&self, attr: GlobalAttr) -> f64 {
        self.global_attrs[attr.0]
    }

    pub fn set_global_attr(&mut self, attr: GlobalAttr, value: f64) {
        self.global_attrs[attr.0] = value;
    }

    pub fn get_vehicle_attr(&self, vehicle_idx: usize, attr: VehicleAttr) -> f64 {
        self.vehicle_attrs[vehicle_idx][attr.0]
    }

    pub fn set_vehicle_attr(&mut self, vehicle_idx: usize, attr: VehicleAttr, value: f64) {
        self.vehicle_attrs[vehicle_idx][attr.0] = value;
    }

    pub fn get_node_attr(&self, node_idx: usize, attr: NodeAttr) -> f64 {
        self.node_attrs[node_idx][attr.0]
    }

    pub fn set_node_attr(&mut self, node_idx: usize, attr: NodeAttr, value: f64) {
        self.node_attrs[node_idx][attr.0] = value;
    }

    pub fn get_node_node_attr(&self, from: usize, to: usize, attr: NodeNodeAttr) -> f64 {
        self.node_node_attrs[from][to][attr.0]
    }

    pub fn set_node_node_attr(&mut self, from: usize, to: usize, attr: NodeNodeAttr, value: f64) {
        self.node_node_attrs[from][to][attr.0] = value;
    }

    pub fn get_vehicle_node_node_attr(
        &self,
        vehicle_idx: usize,
        from: usize,
        to: usize,
        attr: VehicleNodeNodeAttr,
    ) -> f64 {
        self.vehicle_node_node_attrs[vehicle_idx][from][to][attr.0]
    }

    pub fn set_vehicle_node_node_attr(
        &mut self,
        vehicle_idx: usize,
        from: usize,
        to: usize,
        attr: VehicleNodeNodeAttr,
        value: f64,
    ) {
        self.vehicle_node_node_attrs[vehicle_idx][from][to][attr.0] = value;
    }

    /// Set the closeness ranking used to build neighbour lists.
    pub fn set_closeness<F>(&mut self, closeness: F)
    where
        F: Fn(&Problem, usize, usize) -> f64 + Send + Sync + 'static,
    {
        self.closeness = Some(Box::new(closeness));
    }

    /// Neighbour list of `node`, ascending by closeness. Empty until
    /// [`Problem::update_neighbours`] has run.
    pub fn neighbours(&self, node: usize) -> &[usize] {
        match &self.neighbour_array {
            Some(array) => &array[node],
            None => &[],
        }
    }

    /// Rebuild the neighbour lists only when they are absent or were built
    /// with a different size.
    pub fn ensure_neighbours(&mut self, neighbourhood_size: usize) -> Result<(), SolverError> {
        if self.neighbour_array.is_none() || self.neighbourhood_size != neighbourhood_size {
            self.update_neighbours(neighbourhood_size)?;
        }
        Ok(())
    }

    /// Rank every node's job candidates by closeness and keep the closest
    /// `neighbourhood_size` of them. Ties break on job index so the order
    /// is stable and runs stay reproducible. Depots get a list too (ranked
    /// over the same job candidates) so the array indexes by node.
    pub fn update_neighbours(&mut self, neighbourhood_size: usize) -> Result<(), SolverError> {
        let closeness = self
            .closeness
            .as_ref()
            .ok_or(SolverError::ClosenessUndefined)?;
        info!("updating neighbourhood with size: {}", neighbourhood_size);

        let mut array = Vec::with_capacity(self.num_nodes);
        for node_idx in 0..self.num_nodes {
            let mut ranked = Vec::with_capacity(self.job_indexes.len());
            for &neighbour_idx in &self.job_indexes {
                if neighbour_idx != node_idx {
                    ranked.push((closeness(self, node_idx, neighbour_idx), neighbour_idx));
                }
            }
            let neighbours: Vec<usize> = ranked
                .into_iter()
                .sorted_by(|a, b| {
                    a.0.partial_cmp(&b.0)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.1.cmp(&b.1))
                })
                .map(|(_, neighbour_idx)| neighbour_idx)
                .take(neighbourhood_size)
                .collect();
            debug!("node {}: {} neighbours", node_idx, neighbours.len());
            array.push(neighbours);
        }

        self.neighbour_array = Some(array);
        self.neighbourhood_size = neighbourhood_size;
        Ok(())
    }
}
