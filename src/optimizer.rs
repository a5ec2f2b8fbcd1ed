//! Production optimization for flowplan.
//!
//! This module runs the planning pipeline (compile the flow model, solve it,
//! read back machine levels) and derives the flat reports from a solved
//! plan: the machine list, the per-machine summary, the target's total output
//! and the surplus audit.

use std::collections::BTreeMap;

use crate::error::PlanError;
use crate::graph::ProductGraph;
use crate::model::compile;
use crate::models::{
    insert_rate, PlanLine, PlanRequest, Recipe, SolveStatus, SolvedPlan, SummaryLine,
};
use crate::solver::LpSolver;

/// Solved levels below this are treated as an unused recipe.
pub const ACTIVE_LEVEL_EPSILON: f64 = 1e-9;

/// Net flows at or below this are not reported as surplus.
pub const SURPLUS_EPSILON: f64 = 1e-9;

/// Computes machine levels that meet `request`.
///
/// `graph` must have been built from the same `recipes` slice. Any status
/// other than optimal ends the attempt and is returned verbatim as a
/// [`PlanError`]; no relaxation or retry happens here.
///
/// # Example
///
/// ```
/// use flowplan::graph::ProductGraph;
/// use flowplan::models::{Objective, PlanRequest, Recipe};
/// use flowplan::optimizer::optimize;
/// use flowplan::solver::MinilpSolver;
///
/// let recipes = vec![
///     Recipe::new(0, "Smelter").with_ingredient("Ore", 10.0).with_output("Ingot", 10.0),
///     Recipe::new(1, "Press").with_ingredient("Ingot", 10.0).with_output("Plate", 5.0),
/// ];
/// let graph = ProductGraph::build(&recipes);
/// let request = PlanRequest::new("Plate", 5.0).with_objective(Objective::MinimizeMachines);
///
/// let plan = optimize(&recipes, &graph, &request, &MinilpSolver).unwrap();
/// assert!((plan.level(0) - 1.0).abs() < 1e-6);
/// assert!((plan.level(1) - 1.0).abs() < 1e-6);
/// ```
pub fn optimize<S: LpSolver + ?Sized>(
    recipes: &[Recipe],
    graph: &ProductGraph,
    request: &PlanRequest,
    solver: &S,
) -> Result<SolvedPlan, PlanError> {
    validate_rate("target minimum rate", request.target_min_rate)?;
    for (product, capacity) in &request.raw_capacity {
        validate_rate(&format!("capacity of {}", product), *capacity)?;
    }

    let model = compile(recipes, graph, request);
    let solution = solver.solve(&model);
    if let Some(err) = PlanError::from_status(solution.status, &request.target) {
        return Err(err);
    }

    let levels = recipes
        .iter()
        .enumerate()
        .map(|(idx, recipe)| {
            let value = solution.values.get(idx).copied().unwrap_or(0.0);
            let level = if value > ACTIVE_LEVEL_EPSILON { value } else { 0.0 };
            (recipe.id, level)
        })
        .collect();

    let ignored_capacities = request
        .raw_capacity
        .keys()
        .filter(|product| !graph.is_raw(product))
        .cloned()
        .collect();

    Ok(SolvedPlan {
        target: request.target.clone(),
        status: SolveStatus::Optimal,
        objective: solution.objective,
        levels,
        ignored_capacities,
    })
}

fn validate_rate(what: &str, value: f64) -> Result<(), PlanError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PlanError::InvalidRate {
            what: what.to_string(),
            value,
        })
    }
}

/// Lists the recipes that run at a positive level, in catalog order.
pub fn plan_lines(recipes: &[Recipe], plan: &SolvedPlan) -> Vec<PlanLine> {
    recipes
        .iter()
        .filter(|recipe| plan.is_active(recipe.id))
        .map(|recipe| {
            let level = plan.level(recipe.id);
            PlanLine {
                recipe_id: recipe.id,
                machine: recipe.machine.clone(),
                technology: recipe.technology.clone(),
                level,
                outputs: recipe
                    .outputs
                    .iter()
                    .map(|(product, rate)| (product.clone(), level * rate))
                    .collect(),
            }
        })
        .collect()
}

/// Groups active recipes by `(machine, output product)`.
///
/// A recipe with several outputs counts toward each of its groups, with its
/// full level and its full ingredient demand. Groups appear in the order
/// they are first met in the catalog.
pub fn production_summary(recipes: &[Recipe], plan: &SolvedPlan) -> Vec<SummaryLine> {
    let mut summary: Vec<SummaryLine> = Vec::new();

    for recipe in recipes.iter().filter(|r| plan.is_active(r.id)) {
        let level = plan.level(recipe.id);
        for (product, _) in &recipe.outputs {
            let idx = match summary
                .iter()
                .position(|s| s.machine == recipe.machine && s.product == *product)
            {
                Some(idx) => idx,
                None => {
                    summary.push(SummaryLine {
                        machine: recipe.machine.clone(),
                        product: product.clone(),
                        units: 0.0,
                        inputs: Vec::new(),
                    });
                    summary.len() - 1
                }
            };

            let line = &mut summary[idx];
            line.units += level;
            for (ingredient, rate) in &recipe.ingredients {
                let total = lookup_total(&line.inputs, ingredient) + rate * level;
                insert_rate(&mut line.inputs, ingredient.clone(), total);
            }
        }
    }
    summary
}

fn lookup_total(rates: &[(String, f64)], product: &str) -> f64 {
    rates
        .iter()
        .find(|(name, _)| name == product)
        .map_or(0.0, |(_, rate)| *rate)
}

/// Gross output rate of `product` across all solved recipe levels.
pub fn target_production(recipes: &[Recipe], plan: &SolvedPlan, product: &str) -> f64 {
    recipes
        .iter()
        .filter_map(|recipe| {
            recipe
                .output_rate(product)
                .map(|rate| rate * plan.level(recipe.id))
        })
        .sum()
}

/// Production minus consumption of `product` at the solved levels.
pub fn net_flow(recipes: &[Recipe], plan: &SolvedPlan, product: &str) -> f64 {
    recipes
        .iter()
        .map(|recipe| {
            let level = plan.level(recipe.id);
            let made = recipe.output_rate(product).unwrap_or(0.0);
            let used = recipe.ingredient_rate(product).unwrap_or(0.0);
            (made - used) * level
        })
        .sum()
}

/// Produced products left over at the solved levels.
///
/// Only products with a strictly positive surplus are returned. The target
/// usually appears here since nothing consumes it.
pub fn audit_unused(
    recipes: &[Recipe],
    graph: &ProductGraph,
    plan: &SolvedPlan,
) -> BTreeMap<String, f64> {
    graph
        .produced()
        .iter()
        .filter_map(|product| {
            let surplus = net_flow(recipes, plan, product);
            (surplus > SURPLUS_EPSILON).then(|| (product.clone(), surplus))
        })
        .collect()
}
