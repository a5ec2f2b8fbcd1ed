//! # flowplan
//!
//! A command-line tool and library for planning production chains in factory
//! games.
//!
//! Given a recipe catalog (each recipe turns ingredient flows into output flows
//! on one machine type), flowplan computes how many machine-units of each recipe
//! to run so that a chosen product reaches a target rate while every
//! intermediate product stays in balance. It then explains the plan as a tree
//! from the target down to raw materials.
//!
//! The pipeline:
//!
//! - Recipes are loaded from the recipe sheet's CSV export
//! - Products are classified as raw (consumed, never produced) or produced
//! - A flow balance linear program is compiled and solved
//! - The solved machine levels are reported as a plan, a chain trace and a
//!   surplus audit
//!
//! ## Modules
//!
//! - [`models`] - Core data structures for recipes, requests, plans and chains
//! - [`data`] - CSV loading and the `Name (Nx) R/min` cell parser
//! - [`graph`] - Raw/produced classification and recipe adjacency
//! - [`model`] - Flow balance model compilation
//! - [`solver`] - LP solver adapter
//! - [`optimizer`] - Planning pipeline and flat reports
//! - [`chain`] - Production chain tracing
//! - [`display`] - Output formatting and display utilities
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```
//! use flowplan::{
//!     chain::trace_chain,
//!     data::load_recipes_from_str,
//!     graph::ProductGraph,
//!     models::PlanRequest,
//!     optimizer::{optimize, plan_lines, target_production},
//!     solver::MinilpSolver,
//! };
//!
//! let csv = "Output,Machine,Ingredients,Technology\n\
//!            Iron Ingot (1x) 10/min,Smelter,Iron Ore (1x) 10/min,Basics\n\
//!            Iron Gear (2x) 5/min,Assembler,Iron Ingot (2x) 10/min,Basics\n";
//! let recipes = load_recipes_from_str(csv).unwrap().recipes;
//! let graph = ProductGraph::build(&recipes);
//!
//! // Make as many gears as 20 ore/min allows, at least 5/min
//! let request = PlanRequest::new("Iron Gear", 5.0).with_capacity("Iron Ore", 20.0);
//! let plan = optimize(&recipes, &graph, &request, &MinilpSolver).unwrap();
//!
//! let gears = target_production(&recipes, &plan, "Iron Gear");
//! assert!((gears - 10.0).abs() < 1e-6);
//! assert_eq!(plan_lines(&recipes, &plan).len(), 2);
//!
//! let chain = trace_chain(&recipes, &graph, &plan, "Iron Gear", gears);
//! assert!((chain.raw_totals()["Iron Ore"] - 20.0).abs() < 1e-6);
//! ```
//!
//! ## Objectives
//!
//! 1. **Maximize target** (default): push the target's output as high as the
//!    raw material capacities allow, never below the requested floor.
//!
//! 2. **Minimize machines**: the smallest total machine count that meets the
//!    floor. Useful when no capacities are given, since maximizing is then
//!    usually unbounded.

pub mod chain;
pub mod data;
pub mod display;
pub mod error;
pub mod graph;
pub mod model;
pub mod models;
pub mod optimizer;
pub mod solver;
pub mod wasm;
