//! Display and formatting utilities for flowplan.
//!
//! This module provides functions for formatting output and displaying
//! planning results to the user in a readable format.

use std::collections::BTreeMap;

use crate::graph::ProductGraph;
use crate::models::{ChainNode, PlanLine, SolvedPlan, SummaryLine};

/// Formats a rate in units per minute with two decimals.
///
/// # Example
///
/// ```
/// use flowplan::display::format_rate;
///
/// assert_eq!(format_rate(12.5), "12.50/min");
/// assert_eq!(format_rate(0.0), "0.00/min");
/// ```
pub fn format_rate(rate: f64) -> String {
    format!("{:.2}/min", rate)
}

/// Formats one machine plan line.
///
/// # Example
///
/// ```
/// use flowplan::display::format_plan_line;
/// use flowplan::models::PlanLine;
///
/// let line = PlanLine {
///     recipe_id: 4,
///     machine: "Smelter".to_string(),
///     technology: "Basic Logistics".to_string(),
///     level: 1.5,
///     outputs: vec![("Iron Ingot".to_string(), 22.5)],
/// };
/// assert_eq!(
///     format_plan_line(&line),
///     "Recipe 4 (Smelter, Basic Logistics): run at 1.50 units -> produces Iron Ingot: 22.50/min"
/// );
/// ```
pub fn format_plan_line(line: &PlanLine) -> String {
    let outputs = line
        .outputs
        .iter()
        .map(|(product, rate)| format!("{}: {}", product, format_rate(*rate)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Recipe {} ({}, {}): run at {:.2} units -> produces {}",
        line.recipe_id, line.machine, line.technology, line.level, outputs
    )
}

/// Renders a chain trace as an indented tree, four spaces per level.
pub fn render_chain(node: &ChainNode) -> String {
    let mut out = String::new();
    write_chain(&mut out, node, 0);
    out
}

fn write_chain(out: &mut String, node: &ChainNode, indent: usize) {
    let prefix = " ".repeat(indent);
    match node {
        ChainNode::Raw { product, required } => {
            out.push_str(&format!(
                "{}Raw material: {} required: {}\n",
                prefix,
                product,
                format_rate(*required)
            ));
        }
        ChainNode::Cycle { product, required } => {
            out.push_str(&format!(
                "{}(Cycle detected at {}; not expanded further) required: {}\n",
                prefix,
                product,
                format_rate(*required)
            ));
        }
        ChainNode::External { product, required } => {
            out.push_str(&format!(
                "{}(No on-site recipe for {}; assume external supply) required: {}\n",
                prefix,
                product,
                format_rate(*required)
            ));
        }
        ChainNode::Produced { product, steps, .. } => {
            for step in steps {
                out.push_str(&format!(
                    "{}-> Use machine '{}' ({}) at scaled level {:.2} to produce {} at {}\n",
                    prefix,
                    step.machine,
                    step.technology,
                    step.level,
                    product,
                    format_rate(step.rate)
                ));
                for input in &step.inputs {
                    write_chain(out, input, indent + 4);
                }
            }
        }
    }
}

/// Formats one production summary group.
///
/// # Example
///
/// ```
/// use flowplan::display::format_summary_line;
/// use flowplan::models::SummaryLine;
///
/// let line = SummaryLine {
///     machine: "Smelter".to_string(),
///     product: "Iron Ingot".to_string(),
///     units: 2.0,
///     inputs: vec![("Iron Ore".to_string(), 30.0)],
/// };
/// assert_eq!(
///     format_summary_line(&line),
///     "Smelter producing Iron Ingot: 2.00 units needing Iron Ore: 30.00/min"
/// );
/// ```
pub fn format_summary_line(line: &SummaryLine) -> String {
    let task = format!("{} producing {}: {:.2} units", line.machine, line.product, line.units);
    if line.inputs.is_empty() {
        return task;
    }
    let inputs = line
        .inputs
        .iter()
        .map(|(product, rate)| format!("{}: {}", product, format_rate(*rate)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} needing {}", task, inputs)
}

/// Displays the raw/produced classification of a catalog.
pub fn display_products(graph: &ProductGraph) {
    println!("[RAW MATERIALS]");
    println!("----------------------------------------------------------------");
    for product in graph.raw() {
        println!("  {}", product);
    }
    println!();
    println!("[PRODUCED]");
    println!("----------------------------------------------------------------");
    for product in graph.produced() {
        println!("  {}", product);
    }
}

/// Displays the complete planning results to stdout.
///
/// This function prints:
/// - The solver status and target output
/// - The machines to run, with their output rates
/// - Machine units and input demand per machine type and product
/// - The production chain from the target down to raw materials
/// - Surplus production left unused by the plan
///
/// # Arguments
///
/// * `plan` - The solved plan
/// * `lines` - Plan lines from [`crate::optimizer::plan_lines`]
/// * `summary` - Groups from [`crate::optimizer::production_summary`]
/// * `target_rate` - Total output rate of the target product
/// * `chain` - Chain trace of the target product
/// * `surplus` - Result of [`crate::optimizer::audit_unused`]
pub fn display_results(
    plan: &SolvedPlan,
    lines: &[PlanLine],
    summary: &[SummaryLine],
    target_rate: f64,
    chain: &ChainNode,
    surplus: &BTreeMap<String, f64>,
) {
    println!();
    println!("+================================================================+");
    println!("|               PRODUCTION CHAIN PLANNING RESULTS                |");
    println!("+================================================================+");
    println!();
    println!("Optimization status: {}", plan.status);
    for product in &plan.ignored_capacities {
        println!(
            "[WARNING] Capacity for {} ignored: it is not a raw material.",
            product
        );
    }

    println!();
    println!("[MACHINES TO RUN] (nonzero levels)");
    println!("----------------------------------------------------------------");
    if lines.is_empty() {
        println!("  No machines needed.");
    }
    for line in lines {
        println!("  * {}", format_plan_line(line));
    }

    println!();
    println!("[PRODUCTION SUMMARY]");
    println!("----------------------------------------------------------------");
    for line in summary {
        println!("  - {}", format_summary_line(line));
    }

    println!();
    println!("[SUMMARY]");
    println!("----------------------------------------------------------------");
    println!("  Total production of {}: {}", plan.target, format_rate(target_rate));
    println!("  Machine units:       {:.2}", lines.iter().map(|l| l.level).sum::<f64>());

    println!();
    println!("[PRODUCTION CHAIN] (from target down to raw materials)");
    println!("----------------------------------------------------------------");
    print!("{}", render_chain(chain));
    if chain.contains_cycle() {
        println!();
        println!("  Note: cyclic branches are shown once and not expanded.");
    }

    let raw = chain.raw_totals();
    if !raw.is_empty() {
        println!();
        println!("[RAW MATERIALS REQUIRED]");
        println!("----------------------------------------------------------------");
        for (product, rate) in &raw {
            println!("  {:<40} {:>14}", product, format_rate(*rate));
        }
    }

    println!();
    println!("[UNUSED PRODUCTION]");
    println!("----------------------------------------------------------------");
    if surplus.is_empty() {
        println!("  None.");
    }
    for (product, rate) in surplus {
        println!("  {:<40} {:>14}", product, format_rate(*rate));
    }
    println!();
}
