//! Tests for flow model compilation.

use flowplan::graph::ProductGraph;
use flowplan::model::{compile, Comparison, FlowModel, Sense};
use flowplan::models::{Objective, PlanRequest, Recipe};

fn two_step_chain() -> Vec<Recipe> {
    vec![
        Recipe::new(0, "Smelter")
            .with_ingredient("A", 10.0)
            .with_output("B", 10.0),
        Recipe::new(1, "Assembler")
            .with_ingredient("B", 10.0)
            .with_output("C", 5.0),
    ]
}

fn build(recipes: &[Recipe], request: &PlanRequest) -> FlowModel {
    let graph = ProductGraph::build(recipes);
    compile(recipes, &graph, request)
}

#[test]
fn test_one_variable_per_recipe_and_target_objective() {
    let recipes = two_step_chain();
    let model = build(&recipes, &PlanRequest::new("C", 5.0));

    assert_eq!(model.variable_count(), 2);
    assert_eq!(model.sense, Sense::Maximize);
    assert_eq!(model.objective, vec![0.0, 5.0]);
}

#[test]
fn test_flow_balance_rows() {
    let recipes = two_step_chain();
    let model = build(&recipes, &PlanRequest::new("C", 5.0));

    let b = model.constraint("flow_balance_B").unwrap();
    assert_eq!(b.terms, vec![(0, 10.0), (1, -10.0)]);
    assert_eq!(b.op, Comparison::Eq);
    assert_eq!(b.rhs, 0.0);

    let c = model.constraint("flow_balance_C").unwrap();
    assert_eq!(c.terms, vec![(1, 5.0)]);
    assert_eq!(c.op, Comparison::Ge);
    assert_eq!(c.rhs, 5.0);

    // Raw materials never get a balance row
    assert!(model.constraint("flow_balance_A").is_none());
    assert_eq!(model.constraints.len(), 2);
}

#[test]
fn test_raw_capacity_rows() {
    let recipes = two_step_chain();
    let request = PlanRequest::new("C", 5.0)
        .with_capacity("A", 12.0)
        .with_capacity("B", 3.0)
        .with_capacity("Unobtainium", 1.0);
    let model = build(&recipes, &request);

    let a = model.constraint("raw_supply_A").unwrap();
    assert_eq!(a.terms, vec![(0, 10.0)]);
    assert_eq!(a.op, Comparison::Le);
    assert_eq!(a.rhs, 12.0);

    assert!(model.constraint("raw_supply_B").is_none());
    assert!(model.constraint("raw_supply_Unobtainium").is_none());
}

#[test]
fn test_self_loop_coefficients_are_merged() {
    let recipes = vec![Recipe::new(0, "Bioreactor")
        .with_ingredient("Water", 2.0)
        .with_ingredient("Spores", 1.0)
        .with_output("Spores", 3.0)];
    let model = build(&recipes, &PlanRequest::new("Spores", 1.0));

    let spores = model.constraint("flow_balance_Spores").unwrap();
    assert_eq!(spores.terms, vec![(0, 2.0)]);
    // Objective counts gross output of the target
    assert_eq!(model.objective, vec![3.0]);
}

#[test]
fn test_unproduced_target_gets_empty_row() {
    let recipes = two_step_chain();
    let model = build(&recipes, &PlanRequest::new("Z", 5.0));

    let z = model.constraint("flow_balance_Z").unwrap();
    assert!(z.terms.is_empty());
    assert_eq!(z.op, Comparison::Ge);
    assert_eq!(z.rhs, 5.0);
    assert_eq!(model.objective, vec![0.0, 0.0]);

    // C is no longer the target, so it must balance to zero
    assert_eq!(model.constraint("flow_balance_C").unwrap().op, Comparison::Eq);
}

#[test]
fn test_minimize_machines_objective() {
    let recipes = two_step_chain();
    let request = PlanRequest::new("C", 5.0).with_objective(Objective::MinimizeMachines);
    let model = build(&recipes, &request);

    assert_eq!(model.sense, Sense::Minimize);
    assert_eq!(model.objective, vec![1.0, 1.0]);
    assert_eq!(model.constraint("flow_balance_C").unwrap().op, Comparison::Ge);
}

#[test]
fn test_constraint_evaluation() {
    let recipes = two_step_chain();
    let model = build(&recipes, &PlanRequest::new("C", 5.0).with_capacity("A", 10.0));

    let balanced = [1.0, 1.0];
    assert!(model.constraints.iter().all(|c| c.is_satisfied(&balanced, 1e-9)));
    assert_eq!(model.evaluate(&balanced), 5.0);

    let unbalanced = [2.0, 1.0];
    let b = model.constraint("flow_balance_B").unwrap();
    assert_eq!(b.lhs(&unbalanced), 10.0);
    assert!(!b.is_satisfied(&unbalanced, 1e-9));
    assert!(!model.constraint("raw_supply_A").unwrap().is_satisfied(&unbalanced, 1e-9));
}

#[test]
fn test_comparison_tolerance() {
    assert!(Comparison::Eq.holds(1.0 + 1e-10, 1.0, 1e-9));
    assert!(!Comparison::Eq.holds(1.1, 1.0, 1e-9));
    assert!(Comparison::Ge.holds(5.0 - 1e-10, 5.0, 1e-9));
    assert!(!Comparison::Ge.holds(4.0, 5.0, 1e-9));
    assert!(Comparison::Le.holds(0.0, 0.0, 0.0));
    assert!(!Comparison::Le.holds(1.0, 0.0, 1e-9));
}
