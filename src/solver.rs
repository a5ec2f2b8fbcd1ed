//! LP solver adapter.
//!
//! The planner talks to solvers only through [`LpSolver`], so any back end
//! that can take a [`FlowModel`] and return a status plus variable values can
//! be swapped in. [`MinilpSolver`] is the default, pure Rust implementation.

use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem, Variable};

use crate::model::{Comparison, FlowModel, Sense};
use crate::models::SolveStatus;

/// Tolerance used when checking constraints that have no terms.
const EMPTY_ROW_TOLERANCE: f64 = 1e-9;

/// Result of one solver call.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: SolveStatus,
    /// Objective value; 0 unless the status is optimal
    pub objective: f64,
    /// Value per model variable; empty unless the status is optimal
    pub values: Vec<f64>,
}

impl Solution {
    /// A solution carrying only a non-optimal status.
    pub fn without_values(status: SolveStatus) -> Self {
        Solution {
            status,
            objective: 0.0,
            values: Vec::new(),
        }
    }
}

/// A synchronous linear program solver.
///
/// Implementations must report infeasible, unbounded and unsolved models
/// through [`Solution::status`] rather than retrying with relaxed constraints.
pub trait LpSolver {
    fn solve(&self, model: &FlowModel) -> Solution;
}

/// Solver backed by the `minilp` simplex implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinilpSolver;

impl LpSolver for MinilpSolver {
    fn solve(&self, model: &FlowModel) -> Solution {
        if model.variable_count() == 0 {
            return Solution::without_values(SolveStatus::NotSolved);
        }

        let direction = match model.sense {
            Sense::Maximize => OptimizationDirection::Maximize,
            Sense::Minimize => OptimizationDirection::Minimize,
        };
        let mut problem = Problem::new(direction);
        let vars: Vec<Variable> = model
            .objective
            .iter()
            .map(|&coeff| problem.add_var(coeff, (0.0, f64::INFINITY)))
            .collect();

        for constraint in &model.constraints {
            if constraint.terms.is_empty() {
                // 0 <op> rhs: decide it here instead of handing an empty row to the solver
                if constraint.op.holds(0.0, constraint.rhs, EMPTY_ROW_TOLERANCE) {
                    continue;
                }
                return Solution::without_values(SolveStatus::Infeasible);
            }

            let mut expr = LinearExpr::empty();
            for &(idx, coeff) in &constraint.terms {
                expr.add(vars[idx], coeff);
            }
            let op = match constraint.op {
                Comparison::Eq => ComparisonOp::Eq,
                Comparison::Ge => ComparisonOp::Ge,
                Comparison::Le => ComparisonOp::Le,
            };
            problem.add_constraint(expr, op, constraint.rhs);
        }

        match problem.solve() {
            Ok(solution) => {
                let objective = solution.objective();
                let values: Vec<f64> = vars.iter().map(|&var| solution[var]).collect();
                // minilp can report a self-feeding loop as Ok with infinite levels
                if !objective.is_finite() || values.iter().any(|v| !v.is_finite()) {
                    return Solution::without_values(SolveStatus::Unbounded);
                }
                Solution {
                    status: SolveStatus::Optimal,
                    objective,
                    values,
                }
            }
            Err(minilp::Error::Infeasible) => Solution::without_values(SolveStatus::Infeasible),
            Err(minilp::Error::Unbounded) => Solution::without_values(SolveStatus::Unbounded),
        }
    }
}
