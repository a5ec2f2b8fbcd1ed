//! flowplan - Command Line Interface
//!
//! This is the main entry point for the production chain planner.
//! Run with `--help` to see all available options.

use clap::{Parser, ValueEnum};
use std::error::Error;
use std::path::PathBuf;

use flowplan::{
    chain::trace_chain,
    data::{load_raw_capacities, load_recipes, parse_capacity_arg},
    display::{display_products, display_results},
    graph::ProductGraph,
    models::{Objective, PlanRequest},
    optimizer::{audit_unused, optimize, plan_lines, production_summary, target_production},
    solver::MinilpSolver,
    wasm::plan_from_report,
};

/// Objective sense accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ObjectiveArg {
    /// Maximize the target's output rate
    MaxTarget,
    /// Minimize the total machine count meeting the minimum rate
    MinMachines,
}

impl From<ObjectiveArg> for Objective {
    fn from(arg: ObjectiveArg) -> Self {
        match arg {
            ObjectiveArg::MaxTarget => Objective::MaximizeTarget,
            ObjectiveArg::MinMachines => Objective::MinimizeMachines,
        }
    }
}

/// Command-line arguments for flowplan.
#[derive(Parser, Debug)]
#[command(name = "flowplan")]
#[command(author, version, about = "Plan machine counts and production chains from a recipe sheet", long_about = None)]
struct Args {
    /// Recipe table (CSV with Output, Machine, Ingredients, Technology columns)
    #[arg(short, long)]
    recipes: PathBuf,

    /// Product to plan for
    #[arg(short, long, required_unless_present = "list_products")]
    target: Option<String>,

    /// Minimum output rate of the target (units/minute)
    #[arg(short, long, default_value = "0.0")]
    min_rate: f64,

    /// Raw material supply limit as NAME=RATE (repeatable)
    #[arg(long = "raw-limit", value_name = "NAME=RATE")]
    raw_limit: Vec<String>,

    /// CSV file of raw material supply limits (product, rate columns)
    #[arg(long)]
    raw_limits: Option<PathBuf>,

    /// Objective to optimize
    #[arg(short, long, value_enum, default_value = "max-target")]
    objective: ObjectiveArg,

    /// Print the result as JSON instead of the text report
    #[arg(long, default_value = "false")]
    json: bool,

    /// Print the raw/produced classification of the recipe table and exit
    #[arg(long, default_value = "false")]
    list_products: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let report = load_recipes(&args.recipes)?;
    for skipped in &report.skipped {
        eprintln!(
            "[WARNING] Skipped row {} ({:?}): {:?}",
            skipped.row, skipped.reason, skipped.output
        );
    }
    let recipes = &report.recipes;
    let graph = ProductGraph::build(recipes);

    if args.list_products {
        display_products(&graph);
        return Ok(());
    }

    // Capacity file first, then individual overrides
    let mut request = PlanRequest::new(args.target.unwrap_or_default(), args.min_rate)
        .with_objective(args.objective.into());
    if let Some(path) = &args.raw_limits {
        request.raw_capacity.extend(load_raw_capacities(path)?);
    }
    for arg in &args.raw_limit {
        let (product, rate) = parse_capacity_arg(arg)?;
        request.raw_capacity.insert(product, rate);
    }

    if args.json {
        let result = plan_from_report(&report, &request);
        println!("{}", serde_json::to_string_pretty(&result)?);
        if !result.success {
            std::process::exit(1);
        }
        return Ok(());
    }

    println!("flowplan - Production Chain Planner");
    println!("================================================================");
    println!();
    println!("Configuration:");
    println!("  Target:          {}", request.target);
    println!("  Minimum rate:    {:.2}/min", request.target_min_rate);
    println!("  Objective:       {:?}", request.objective);
    println!("  Recipes loaded:  {}", recipes.len());
    println!("  Raw materials:   {}", graph.raw().len());
    for (product, rate) in &request.raw_capacity {
        println!("  Limit:           {} <= {:.2}/min", product, rate);
    }

    let plan = match optimize(recipes, &graph, &request, &MinilpSolver) {
        Ok(plan) => plan,
        Err(e) => {
            println!();
            if let Some(status) = e.status() {
                println!("Optimization status: {}", status);
            }
            println!("[WARNING] {}", e);
            println!("Try a different target, a lower minimum rate or looser raw limits.");
            std::process::exit(1);
        }
    };

    let lines = plan_lines(recipes, &plan);
    let summary = production_summary(recipes, &plan);
    let produced = target_production(recipes, &plan, &request.target);
    let chain = trace_chain(recipes, &graph, &plan, &request.target, produced);
    let surplus = audit_unused(recipes, &graph, &plan);

    display_results(&plan, &lines, &summary, produced, &chain, &surplus);

    Ok(())
}
