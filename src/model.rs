//! Typed attribute registry plus the objective and constraint declarations
//! that define a concrete routing problem variant.
//!
//! Attributes come in five classes (global, per-vehicle, per-node,
//! node-to-node, vehicle-node-to-node). Declaring one returns a `Copy`
//! handle that indexes a fixed-shape table on the [`Problem`]; there is no
//! runtime field lookup by name on the hot path.
//!
//! [`Problem`]: crate::problem::Problem

use crate::problem::Problem;
use crate::solution::Solution;

/// Handle for a scalar attribute shared by the whole problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalAttr(pub(crate) usize);

/// Handle for a per-vehicle attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleAttr(pub(crate) usize);

/// Handle for a per-node attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeAttr(pub(crate) usize);

/// Handle for an attribute defined on ordered node pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeNodeAttr(pub(crate) usize);

/// Handle for an attribute defined on (vehicle, node, node) triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleNodeNodeAttr(pub(crate) usize);

/// A feasibility predicate over the current solution state.
pub type Constraint = Box<dyn Fn(&Solution, &Problem) -> bool + Send + Sync>;

/// A scalar objective function together with its display name.
pub struct Objective {
    pub name: String,
    pub function: Box<dyn Fn(&Solution, &Problem) -> f64 + Send + Sync>,
}

impl Objective {
    pub fn new<F>(name: &str, function: F) -> Self
    where
        F: Fn(&Solution, &Problem) -> f64 + Send + Sync + 'static,
    {
        Objective {
            name: name.to_string(),
            function: Box::new(function),
        }
    }
}

/// Declares the data shape, objectives, and constraints of a problem
/// variant. Built once, then consumed by [`Problem::new`].
///
/// Constraints and objectives are evaluated in declaration order; the
/// constraint order determines short-circuit behaviour and the objective
/// order determines solution comparison.
///
/// [`Problem::new`]: crate::problem::Problem::new
#[derive(Default)]
pub struct Model {
    pub(crate) num_global_attrs: usize,
    pub(crate) num_vehicle_attrs: usize,
    pub(crate) num_node_attrs: usize,
    pub(crate) num_node_node_attrs: usize,
    pub(crate) num_vehicle_node_node_attrs: usize,
    pub constraints: Vec<Constraint>,
    pub objectives: Vec<Objective>,
}

impl Model {
    pub fn new() -> Self {
        Model::default()
    }

    pub fn define_global_attr(&mut self) -> GlobalAttr {
        let attr = GlobalAttr(self.num_global_attrs);
        self.num_global_attrs += 1;
        attr
    }

    pub fn define_vehicle_attr(&mut self) -> VehicleAttr {
        let attr = VehicleAttr(self.num_vehicle_attrs);
        self.num_vehicle_attrs += 1;
        attr
    }

    pub fn define_node_attr(&mut self) -> NodeAttr {
        let attr = NodeAttr(self.num_node_attrs);
        self.num_node_attrs += 1;
        attr
    }

    pub fn define_node_node_attr(&mut self) -> NodeNodeAttr {
        let attr = NodeNodeAttr(self.num_node_node_attrs);
        self.num_node_node_attrs += 1;
        attr
    }

    pub fn define_vehicle_node_node_attr(&mut self) -> VehicleNodeNodeAttr {
        let attr = VehicleNodeNodeAttr(self.num_vehicle_node_node_attrs);
        self.num_vehicle_node_node_attrs += 1;
        attr
    }

    /// Append a feasibility predicate. Order matters: predicates run in
    /// declaration order and evaluation stops at the first failure.
    pub fn add_constraint<F>(&mut self, constraint: F)
    where
        F: Fn(&Solution, &Problem) -> bool + Send + Sync + 'static,
    {
        self.constraints.push(Box::new(constraint));
    }

    /// Append a named objective. Order matters: the objective vector is
    /// compared index by index.
    pub fn add_objective<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&Solution, &Problem) -> f64 + Send + Sync + 'static,
    {
        self.objectives.push(Objective::new(name, function));
    }

    /// Display names of the declared objectives, in declaration order.
    pub fn objective_names(&self) -> Vec<&str> {
        self.objectives.iter().map(|o| o.name.as_str()).collect()
    }
}
