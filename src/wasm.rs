//! WebAssembly bindings for flowplan.
//!
//! This module provides JavaScript-accessible functions for the production
//! planner. Every function takes and returns strings (CSV text and JSON) so
//! the JavaScript side needs no generated types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

use crate::chain::trace_chain;
use crate::data::load_recipes_from_str;
use crate::display::render_chain;
use crate::graph::ProductGraph;
use crate::models::{
    ChainNode, LoadReport, Objective, PlanLine, PlanRequest, SkippedRow, SolveStatus,
    SummaryLine,
};
use crate::optimizer::{
    audit_unused, optimize, plan_lines, production_summary, target_production,
};
use crate::solver::MinilpSolver;

/// JavaScript-friendly input for planning.
#[derive(Debug, Clone, Deserialize)]
pub struct JsPlanInput {
    pub target: String,
    #[serde(default)]
    pub min_rate: f64,
    #[serde(default)]
    pub raw_limits: BTreeMap<String, f64>,
    #[serde(default)]
    pub objective: Objective,
}

/// JavaScript-friendly planning result.
#[derive(Debug, Clone, Serialize, Default)]
pub struct JsPlanResult {
    pub success: bool,
    pub error: Option<String>,
    pub status: Option<SolveStatus>,
    pub objective: f64,
    pub target_production: f64,
    pub plan: Vec<PlanLine>,
    pub summary: Vec<SummaryLine>,
    pub chain: Option<ChainNode>,
    pub chain_text: String,
    pub raw_materials: BTreeMap<String, f64>,
    pub surplus: BTreeMap<String, f64>,
    pub ignored_capacities: Vec<String>,
    pub skipped_rows: Vec<SkippedRow>,
}

impl JsPlanResult {
    fn failure(error: String, status: Option<SolveStatus>, skipped_rows: Vec<SkippedRow>) -> Self {
        JsPlanResult {
            success: false,
            error: Some(error),
            status,
            skipped_rows,
            ..Default::default()
        }
    }
}

/// JavaScript-friendly product classification.
#[derive(Debug, Clone, Serialize, Default)]
pub struct JsProductList {
    pub raw: Vec<String>,
    pub produced: Vec<String>,
    pub error: Option<String>,
}

#[cfg(target_arch = "wasm32")]
fn warn_skipped(skipped: &[SkippedRow]) {
    for row in skipped {
        let message = format!("flowplan: skipped row {} ({:?})", row.row, row.reason);
        web_sys::console::warn_1(&JsValue::from_str(&message));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn warn_skipped(_skipped: &[SkippedRow]) {}

/// Serializes a result for JavaScript.
///
/// Never returns an empty string: a serialization failure becomes
/// `{"success": false, "error": ...}`.
pub fn to_json_or_error<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        serde_json::json!({
            "success": false,
            "error": format!("Serialization failed: {}", e),
        })
        .to_string()
    })
}

/// Plan production for a recipe table.
///
/// Takes the recipe CSV text and a JSON input (`target`, optional `min_rate`,
/// `raw_limits` and `objective`) and returns a JSON [`JsPlanResult`].
#[wasm_bindgen]
pub fn plan(recipes_csv: &str, input_json: &str) -> String {
    to_json_or_error(&plan_result(recipes_csv, input_json))
}

/// Non-serialized form of [`plan`].
pub fn plan_result(recipes_csv: &str, input_json: &str) -> JsPlanResult {
    let input: JsPlanInput = match serde_json::from_str(input_json) {
        Ok(i) => i,
        Err(e) => return JsPlanResult::failure(format!("Invalid input: {}", e), None, vec![]),
    };

    let report = match load_recipes_from_str(recipes_csv) {
        Ok(r) => r,
        Err(e) => return JsPlanResult::failure(format!("Invalid recipes: {}", e), None, vec![]),
    };
    warn_skipped(&report.skipped);

    let request = PlanRequest {
        target: input.target,
        target_min_rate: input.min_rate,
        raw_capacity: input.raw_limits,
        objective: input.objective,
    };
    plan_from_report(&report, &request)
}

/// Runs the whole pipeline on already loaded recipes and collects every report.
pub fn plan_from_report(report: &LoadReport, request: &PlanRequest) -> JsPlanResult {
    let recipes = &report.recipes;
    let graph = ProductGraph::build(recipes);

    let solved = match optimize(recipes, &graph, request, &MinilpSolver) {
        Ok(p) => p,
        Err(e) => return JsPlanResult::failure(e.to_string(), e.status(), report.skipped.clone()),
    };

    let produced = target_production(recipes, &solved, &request.target);
    let chain = trace_chain(recipes, &graph, &solved, &request.target, produced);

    JsPlanResult {
        success: true,
        error: None,
        status: Some(solved.status),
        objective: solved.objective,
        target_production: produced,
        plan: plan_lines(recipes, &solved),
        summary: production_summary(recipes, &solved),
        chain_text: render_chain(&chain),
        raw_materials: chain.raw_totals(),
        chain: Some(chain),
        surplus: audit_unused(recipes, &graph, &solved),
        ignored_capacities: solved.ignored_capacities,
        skipped_rows: report.skipped.clone(),
    }
}

/// Get the version of the planner.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the raw and produced products of a recipe table.
/// Returns a JSON [`JsProductList`].
#[wasm_bindgen]
pub fn list_products(recipes_csv: &str) -> String {
    let list = match load_recipes_from_str(recipes_csv) {
        Ok(report) => {
            let graph = ProductGraph::build(&report.recipes);
            JsProductList {
                raw: graph.raw().iter().cloned().collect(),
                produced: graph.produced().iter().cloned().collect(),
                error: None,
            }
        }
        Err(e) => JsProductList {
            error: Some(format!("Invalid recipes: {}", e)),
            ..Default::default()
        },
    };
    to_json_or_error(&list)
}
