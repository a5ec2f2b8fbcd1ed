//! Production chain tracing.
//!
//! Walks a solved plan backwards from a product to the raw materials that
//! feed it, scaling each active recipe to the rate required of it.

use std::collections::HashSet;

use crate::graph::ProductGraph;
use crate::models::{ChainNode, ChainStep, Recipe, SolvedPlan};

/// Expands `required` units/minute of `product` into its production chain.
///
/// Every branch ends in a raw material, an externally supplied product (no
/// active recipe makes it) or a cycle marker, so tracing always terminates.
///
/// Cycle detection is scoped to the current path: a product reached again
/// through a sibling branch is expanded normally; only a product that is its
/// own ancestor becomes a [`ChainNode::Cycle`].
///
/// When several active recipes make the same product, each one is scaled as
/// if it alone supplied the whole required rate. Inputs are therefore counted
/// once per producer.
///
/// # Example
///
/// ```
/// use flowplan::chain::trace_chain;
/// use flowplan::graph::ProductGraph;
/// use flowplan::models::{ChainNode, Objective, PlanRequest, Recipe};
/// use flowplan::optimizer::optimize;
/// use flowplan::solver::MinilpSolver;
///
/// let recipes = vec![
///     Recipe::new(0, "Smelter").with_ingredient("Ore", 10.0).with_output("Ingot", 10.0),
///     Recipe::new(1, "Press").with_ingredient("Ingot", 10.0).with_output("Plate", 5.0),
/// ];
/// let graph = ProductGraph::build(&recipes);
/// let request = PlanRequest::new("Plate", 5.0).with_objective(Objective::MinimizeMachines);
/// let plan = optimize(&recipes, &graph, &request, &MinilpSolver).unwrap();
///
/// let chain = trace_chain(&recipes, &graph, &plan, "Plate", 5.0);
/// let ore = chain.raw_totals()["Ore"];
/// assert!((ore - 10.0).abs() < 1e-6);
/// assert!(matches!(chain, ChainNode::Produced { .. }));
/// ```
pub fn trace_chain(
    recipes: &[Recipe],
    graph: &ProductGraph,
    plan: &SolvedPlan,
    product: &str,
    required: f64,
) -> ChainNode {
    let tracer = Tracer {
        recipes,
        graph,
        plan,
    };
    let mut path_guard = HashSet::new();
    tracer.trace(product, required, &mut path_guard)
}

struct Tracer<'a> {
    recipes: &'a [Recipe],
    graph: &'a ProductGraph,
    plan: &'a SolvedPlan,
}

impl Tracer<'_> {
    fn trace(&self, product: &str, required: f64, path_guard: &mut HashSet<String>) -> ChainNode {
        if self.graph.is_raw(product) {
            return ChainNode::Raw {
                product: product.to_string(),
                required,
            };
        }
        if path_guard.contains(product) {
            return ChainNode::Cycle {
                product: product.to_string(),
                required,
            };
        }

        let active: Vec<&Recipe> = self
            .graph
            .producers(product)
            .iter()
            .map(|&idx| &self.recipes[idx])
            .filter(|recipe| self.plan.is_active(recipe.id))
            .collect();

        if active.is_empty() {
            return ChainNode::External {
                product: product.to_string(),
                required,
            };
        }

        path_guard.insert(product.to_string());
        let steps = active
            .into_iter()
            .map(|recipe| self.step(recipe, product, required, path_guard))
            .collect();
        path_guard.remove(product);

        ChainNode::Produced {
            product: product.to_string(),
            required,
            steps,
        }
    }

    fn step(
        &self,
        recipe: &Recipe,
        product: &str,
        required: f64,
        path_guard: &mut HashSet<String>,
    ) -> ChainStep {
        let level = self.plan.level(recipe.id);
        let produced = recipe.output_rate(product).unwrap_or(0.0) * level;
        let scale = if produced == 0.0 { 0.0 } else { required / produced };

        let inputs = recipe
            .ingredients
            .iter()
            .map(|(ingredient, rate)| self.trace(ingredient, rate * level * scale, path_guard))
            .collect();

        ChainStep {
            recipe_id: recipe.id,
            machine: recipe.machine.clone(),
            technology: recipe.technology.clone(),
            level: level * scale,
            rate: produced * scale,
            inputs,
        }
    }
}
