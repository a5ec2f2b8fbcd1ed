//! Product classification and recipe adjacency.
//!
//! The graph is derived from an immutable recipe slice in one pass. Indices
//! returned by [`ProductGraph::producers`] and [`ProductGraph::consumers`] are
//! positions in that slice.

use std::collections::{BTreeSet, HashMap};

use crate::models::Recipe;

/// Products of a recipe catalog, split into raw and produced.
///
/// # Example
///
/// ```
/// use flowplan::graph::ProductGraph;
/// use flowplan::models::Recipe;
///
/// let recipes = vec![
///     Recipe::new(0, "Smelter").with_ingredient("Iron Ore", 10.0).with_output("Iron Ingot", 10.0),
///     Recipe::new(1, "Assembler").with_ingredient("Iron Ingot", 20.0).with_output("Gear", 5.0),
/// ];
/// let graph = ProductGraph::build(&recipes);
///
/// assert!(graph.is_raw("Iron Ore"));
/// assert!(graph.is_produced("Iron Ingot"));
/// assert_eq!(graph.producers("Gear"), &[1]);
/// assert_eq!(graph.consumers("Iron Ingot"), &[1]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProductGraph {
    produced: BTreeSet<String>,
    consumed: BTreeSet<String>,
    raw: BTreeSet<String>,
    producers: HashMap<String, Vec<usize>>,
    consumers: HashMap<String, Vec<usize>>,
}

impl ProductGraph {
    /// Classifies every product named by `recipes`.
    ///
    /// A product is raw when some recipe consumes it and none produces it.
    /// Classification depends only on which recipes exist, never on how much
    /// they are run.
    pub fn build(recipes: &[Recipe]) -> Self {
        let mut graph = ProductGraph::default();

        for (idx, recipe) in recipes.iter().enumerate() {
            for (product, _) in &recipe.outputs {
                graph.produced.insert(product.clone());
                push_unique(graph.producers.entry(product.clone()).or_default(), idx);
            }
            for (product, _) in &recipe.ingredients {
                graph.consumed.insert(product.clone());
                push_unique(graph.consumers.entry(product.clone()).or_default(), idx);
            }
        }

        graph.raw = graph
            .consumed
            .difference(&graph.produced)
            .cloned()
            .collect();
        graph
    }

    /// Products appearing in at least one recipe's outputs.
    pub fn produced(&self) -> &BTreeSet<String> {
        &self.produced
    }

    /// Products appearing in at least one recipe's ingredients.
    pub fn consumed(&self) -> &BTreeSet<String> {
        &self.consumed
    }

    /// Products consumed but never produced.
    pub fn raw(&self) -> &BTreeSet<String> {
        &self.raw
    }

    pub fn is_raw(&self, product: &str) -> bool {
        self.raw.contains(product)
    }

    pub fn is_produced(&self, product: &str) -> bool {
        self.produced.contains(product)
    }

    /// Every product in the catalog, sorted by name.
    pub fn products(&self) -> impl Iterator<Item = &String> {
        self.produced.union(&self.consumed)
    }

    /// Positions of the recipes that output `product`.
    pub fn producers(&self, product: &str) -> &[usize] {
        self.producers.get(product).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Positions of the recipes that consume `product`.
    pub fn consumers(&self, product: &str) -> &[usize] {
        self.consumers.get(product).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn push_unique(indices: &mut Vec<usize>, idx: usize) {
    if indices.last() != Some(&idx) {
        indices.push(idx);
    }
}
