//! Flow model compilation.
//!
//! Turns a recipe catalog and a [`PlanRequest`] into a solver-agnostic linear
//! program: one non-negative variable per recipe, a flow balance row per
//! produced product and an optional supply row per capped raw material.

use std::collections::BTreeMap;

use crate::graph::ProductGraph;
use crate::models::{Objective, PlanRequest, Recipe};

/// Relation between a constraint's left-hand side and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ge,
    Le,
}

impl Comparison {
    /// Whether `lhs <op> rhs` holds within `tolerance`.
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Comparison::Eq => (lhs - rhs).abs() <= tolerance,
            Comparison::Ge => lhs >= rhs - tolerance,
            Comparison::Le => lhs <= rhs + tolerance,
        }
    }
}

/// Optimization direction of the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Maximize,
    Minimize,
}

/// A linear constraint `Σ coeff * var[idx] <op> rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Name such as `flow_balance_Iron Ingot` or `raw_supply_Iron Ore`
    pub name: String,
    /// `(variable index, coefficient)`, at most one term per variable
    pub terms: Vec<(usize, f64)>,
    pub op: Comparison,
    pub rhs: f64,
}

impl Constraint {
    /// Left-hand side value for the given variable values.
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(idx, coeff)| coeff * values.get(idx).copied().unwrap_or(0.0))
            .sum()
    }

    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.op.holds(self.lhs(values), self.rhs, tolerance)
    }
}

/// A compiled linear program over recipe machine levels.
///
/// Variable `i` is the machine level of the `i`-th recipe of the compiled
/// slice. Every variable is continuous with bounds `[0, ∞)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowModel {
    pub sense: Sense,
    /// Objective coefficient per variable
    pub objective: Vec<f64>,
    pub constraints: Vec<Constraint>,
}

impl FlowModel {
    pub fn variable_count(&self) -> usize {
        self.objective.len()
    }

    /// Objective value for the given variable values.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .zip(values)
            .map(|(coeff, value)| coeff * value)
            .sum()
    }

    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }
}

pub fn flow_balance_name(product: &str) -> String {
    format!("flow_balance_{}", product)
}

pub fn raw_supply_name(product: &str) -> String {
    format!("raw_supply_{}", product)
}

/// Compiles the flow balance model for `request`.
///
/// - Every produced product gets `production - consumption = 0`, except the
///   target which gets `production - consumption >= target_min_rate`.
/// - The target row is emitted even when no recipe makes the target, so an
///   unreachable target with a positive floor is infeasible.
/// - Every raw material with an entry in `raw_capacity` gets
///   `consumption <= capacity`. Capacities for other products are ignored.
///
/// The compiler does not check feasibility; that is the solver's job.
///
/// # Example
///
/// ```
/// use flowplan::graph::ProductGraph;
/// use flowplan::model::{compile, Comparison};
/// use flowplan::models::{PlanRequest, Recipe};
///
/// let recipes = vec![
///     Recipe::new(0, "Smelter").with_ingredient("Ore", 10.0).with_output("Ingot", 10.0),
///     Recipe::new(1, "Press").with_ingredient("Ingot", 10.0).with_output("Plate", 5.0),
/// ];
/// let graph = ProductGraph::build(&recipes);
/// let model = compile(&recipes, &graph, &PlanRequest::new("Plate", 5.0).with_capacity("Ore", 10.0));
///
/// let ingot = model.constraint("flow_balance_Ingot").unwrap();
/// assert_eq!(ingot.terms, vec![(0, 10.0), (1, -10.0)]);
/// assert_eq!(ingot.op, Comparison::Eq);
/// assert_eq!(model.constraint("flow_balance_Plate").unwrap().op, Comparison::Ge);
/// assert_eq!(model.constraint("raw_supply_Ore").unwrap().rhs, 10.0);
/// assert_eq!(model.objective, vec![0.0, 5.0]);
/// ```
pub fn compile(recipes: &[Recipe], graph: &ProductGraph, request: &PlanRequest) -> FlowModel {
    let (sense, objective) = match request.objective {
        Objective::MaximizeTarget => (
            Sense::Maximize,
            recipes
                .iter()
                .map(|r| r.output_rate(&request.target).unwrap_or(0.0))
                .collect(),
        ),
        Objective::MinimizeMachines => (Sense::Minimize, vec![1.0; recipes.len()]),
    };

    let mut constraints = Vec::new();

    for product in graph.produced() {
        let terms = net_flow_terms(recipes, graph, product);
        if *product == request.target {
            constraints.push(Constraint {
                name: flow_balance_name(product),
                terms,
                op: Comparison::Ge,
                rhs: request.target_min_rate,
            });
        } else {
            constraints.push(Constraint {
                name: flow_balance_name(product),
                terms,
                op: Comparison::Eq,
                rhs: 0.0,
            });
        }
    }

    if !graph.is_produced(&request.target) {
        constraints.push(Constraint {
            name: flow_balance_name(&request.target),
            terms: Vec::new(),
            op: Comparison::Ge,
            rhs: request.target_min_rate,
        });
    }

    for (product, capacity) in &request.raw_capacity {
        if !graph.is_raw(product) {
            continue;
        }
        let terms = graph
            .consumers(product)
            .iter()
            .filter_map(|&idx| {
                recipes[idx]
                    .ingredient_rate(product)
                    .map(|rate| (idx, rate))
            })
            .collect();
        constraints.push(Constraint {
            name: raw_supply_name(product),
            terms,
            op: Comparison::Le,
            rhs: *capacity,
        });
    }

    FlowModel {
        sense,
        objective,
        constraints,
    }
}

/// Net production coefficient of every recipe touching `product`.
///
/// A recipe that both makes and consumes the product contributes a single
/// term, `output - ingredient`.
fn net_flow_terms(recipes: &[Recipe], graph: &ProductGraph, product: &str) -> Vec<(usize, f64)> {
    let mut net: BTreeMap<usize, f64> = BTreeMap::new();
    for &idx in graph.producers(product) {
        if let Some(rate) = recipes[idx].output_rate(product) {
            *net.entry(idx).or_insert(0.0) += rate;
        }
    }
    for &idx in graph.consumers(product) {
        if let Some(rate) = recipes[idx].ingredient_rate(product) {
            *net.entry(idx).or_insert(0.0) -= rate;
        }
    }
    net.into_iter().collect()
}
