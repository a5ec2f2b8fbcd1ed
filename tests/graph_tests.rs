//! Tests for product classification.

use flowplan::graph::ProductGraph;
use flowplan::models::Recipe;
use std::collections::BTreeSet;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn smelting_chain() -> Vec<Recipe> {
    vec![
        Recipe::new(0, "Smelter")
            .with_ingredient("Iron Ore", 15.0)
            .with_output("Iron Ingot", 15.0),
        Recipe::new(1, "Assembler")
            .with_ingredient("Iron Ingot", 15.0)
            .with_output("Iron Frame", 7.5),
        Recipe::new(2, "Assembler")
            .with_ingredient("Iron Frame", 5.0)
            .with_ingredient("Copper Wire", 15.0)
            .with_output("Mechanical Components", 10.0),
    ]
}

#[test]
fn test_raw_is_consumed_minus_produced() {
    let graph = ProductGraph::build(&smelting_chain());

    assert_eq!(graph.raw(), &set(&["Copper Wire", "Iron Ore"]));
    assert_eq!(
        graph.produced(),
        &set(&["Iron Frame", "Iron Ingot", "Mechanical Components"])
    );
    assert!(graph.raw().is_disjoint(graph.produced()));

    let expected: BTreeSet<String> = graph
        .consumed()
        .difference(graph.produced())
        .cloned()
        .collect();
    assert_eq!(graph.raw(), &expected);
}

#[test]
fn test_self_loop_product_is_produced() {
    let recipes = vec![Recipe::new(0, "Bioreactor")
        .with_ingredient("Spores", 1.0)
        .with_ingredient("Water", 2.0)
        .with_output("Spores", 3.0)];
    let graph = ProductGraph::build(&recipes);

    assert!(graph.is_produced("Spores"));
    assert!(!graph.is_raw("Spores"));
    assert!(graph.is_raw("Water"));
}

#[test]
fn test_unmentioned_product_is_excluded() {
    let graph = ProductGraph::build(&smelting_chain());

    assert!(!graph.is_raw("Gold Ore"));
    assert!(!graph.is_produced("Gold Ore"));
    assert!(graph.producers("Gold Ore").is_empty());
    assert!(graph.consumers("Gold Ore").is_empty());
    assert!(graph.products().all(|p| p != "Gold Ore"));
    assert_eq!(graph.products().count(), 5);
}

#[test]
fn test_adjacency_keeps_input_order() {
    let mut recipes = smelting_chain();
    recipes.push(
        Recipe::new(7, "Smelter")
            .with_ingredient("Iron Ore", 30.0)
            .with_ingredient("Coal", 5.0)
            .with_output("Iron Ingot", 40.0),
    );
    let graph = ProductGraph::build(&recipes);

    assert_eq!(graph.producers("Iron Ingot"), &[0, 3]);
    assert_eq!(graph.consumers("Iron Ore"), &[0, 3]);
    assert_eq!(graph.consumers("Iron Frame"), &[2]);
}

#[test]
fn test_empty_catalog() {
    let graph = ProductGraph::build(&[]);

    assert!(graph.raw().is_empty());
    assert!(graph.produced().is_empty());
    assert_eq!(graph.products().count(), 0);
}
