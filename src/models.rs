//! Data models and structures for flowplan.
//!
//! This module contains the core data structures used throughout the crate:
//! recipes, plan requests, solved plans, report lines and chain trace nodes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a recipe: the zero-based data row of the source table.
pub type RecipeId = usize;

/// A conversion rule run by one machine type.
///
/// Rates are per machine-unit, in units per minute. Outputs and ingredients
/// keep the order in which they appeared in the source cell.
///
/// # Example
///
/// ```
/// use flowplan::models::Recipe;
///
/// let smelt = Recipe::new(3, "Smelter")
///     .with_technology("Basic Logistics")
///     .with_ingredient("Copper Ore", 15.0)
///     .with_output("Copper Ingot", 15.0);
///
/// assert_eq!(smelt.output_rate("Copper Ingot"), Some(15.0));
/// assert_eq!(smelt.ingredient_rate("Copper Ore"), Some(15.0));
/// assert_eq!(smelt.output_rate("Copper Ore"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    /// Source row of the recipe
    pub id: RecipeId,
    /// Machine type running the recipe (e.g., "Smelter")
    pub machine: String,
    /// Technology tag unlocking the recipe; may be empty
    pub technology: String,
    /// Products made, with their rate per machine-unit
    pub outputs: Vec<(String, f64)>,
    /// Products consumed, with their rate per machine-unit
    pub ingredients: Vec<(String, f64)>,
}

impl Recipe {
    /// Creates a recipe with no outputs or ingredients.
    pub fn new(id: RecipeId, machine: impl Into<String>) -> Self {
        Recipe {
            id,
            machine: machine.into(),
            technology: String::new(),
            outputs: Vec::new(),
            ingredients: Vec::new(),
        }
    }

    /// Sets the technology tag.
    pub fn with_technology(mut self, technology: impl Into<String>) -> Self {
        self.technology = technology.into();
        self
    }

    /// Adds an output, replacing the rate if the product is already listed.
    pub fn with_output(mut self, product: impl Into<String>, rate: f64) -> Self {
        insert_rate(&mut self.outputs, product.into(), rate);
        self
    }

    /// Adds an ingredient, replacing the rate if the product is already listed.
    pub fn with_ingredient(mut self, product: impl Into<String>, rate: f64) -> Self {
        insert_rate(&mut self.ingredients, product.into(), rate);
        self
    }

    /// Production rate of `product` per machine-unit, if this recipe makes it.
    pub fn output_rate(&self, product: &str) -> Option<f64> {
        lookup_rate(&self.outputs, product)
    }

    /// Consumption rate of `product` per machine-unit, if this recipe uses it.
    pub fn ingredient_rate(&self, product: &str) -> Option<f64> {
        lookup_rate(&self.ingredients, product)
    }
}

/// Inserts `(product, rate)` into an ordered rate list with map semantics:
/// a repeated product keeps its first position and takes the latest rate.
pub fn insert_rate(rates: &mut Vec<(String, f64)>, product: String, rate: f64) {
    match rates.iter_mut().find(|(name, _)| *name == product) {
        Some(entry) => entry.1 = rate,
        None => rates.push((product, rate)),
    }
}

fn lookup_rate(rates: &[(String, f64)], product: &str) -> Option<f64> {
    rates
        .iter()
        .find(|(name, _)| name == product)
        .map(|(_, rate)| *rate)
}

/// One parsed `Name (Nx) R/min` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRate {
    /// Product name
    pub name: String,
    /// Stack multiplier shown in the source; informational only
    pub multiplier: f64,
    /// Rate in units per minute
    pub rate: f64,
}

/// What the optimizer should do with the target product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Objective {
    /// Maximize the output rate of the target product
    #[default]
    #[serde(alias = "max-target")]
    MaximizeTarget,
    /// Minimize the total number of machine-units that meet the target floor
    #[serde(alias = "min-machines")]
    MinimizeMachines,
}

/// Everything the planner needs to know about one planning attempt.
///
/// # Example
///
/// ```
/// use flowplan::models::{Objective, PlanRequest};
///
/// let request = PlanRequest::new("Copper Frame", 20.0)
///     .with_capacity("Copper Ore", 120.0)
///     .with_objective(Objective::MinimizeMachines);
///
/// assert_eq!(request.target, "Copper Frame");
/// assert_eq!(request.raw_capacity.get("Copper Ore"), Some(&120.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    /// Product whose output is being planned
    pub target: String,
    /// Minimum output rate of the target (units/minute)
    pub target_min_rate: f64,
    /// Optional supply limit per raw material (units/minute)
    pub raw_capacity: BTreeMap<String, f64>,
    /// Objective sense
    pub objective: Objective,
}

impl PlanRequest {
    pub fn new(target: impl Into<String>, target_min_rate: f64) -> Self {
        PlanRequest {
            target: target.into(),
            target_min_rate,
            raw_capacity: BTreeMap::new(),
            objective: Objective::default(),
        }
    }

    pub fn with_capacity(mut self, product: impl Into<String>, rate: f64) -> Self {
        self.raw_capacity.insert(product.into(), rate);
        self
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }
}

/// Outcome reported by an LP solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    NotSolved,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::NotSolved => "Not Solved",
        };
        f.write_str(label)
    }
}

/// Machine levels chosen by the solver for one request.
///
/// Built once by [`crate::optimizer::optimize`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolvedPlan {
    /// Target product of the request
    pub target: String,
    /// Solver status (always `Optimal` for plans returned by the optimizer)
    pub status: SolveStatus,
    /// Objective value at the optimum
    pub objective: f64,
    /// Machine level per recipe; unused recipes are stored as 0
    pub levels: BTreeMap<RecipeId, f64>,
    /// Capacity entries that do not name a raw material and were not applied
    pub ignored_capacities: Vec<String>,
}

impl SolvedPlan {
    /// Level of a recipe, 0 when the recipe is unknown to the plan.
    pub fn level(&self, id: RecipeId) -> f64 {
        self.levels.get(&id).copied().unwrap_or(0.0)
    }

    /// Whether a recipe runs at a positive level.
    pub fn is_active(&self, id: RecipeId) -> bool {
        self.level(id) > 0.0
    }

    /// Levels in the order of `recipes`, suitable for evaluating a compiled model.
    pub fn levels_for(&self, recipes: &[Recipe]) -> Vec<f64> {
        recipes.iter().map(|r| self.level(r.id)).collect()
    }
}

/// One line of the machine plan: a recipe that runs at a positive level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanLine {
    pub recipe_id: RecipeId,
    pub machine: String,
    pub technology: String,
    /// Machine-units running concurrently
    pub level: f64,
    /// Resulting output rate per product (`level * rate`)
    pub outputs: Vec<(String, f64)>,
}

/// Machine units grouped by machine type and the product they make.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub machine: String,
    pub product: String,
    /// Sum of levels of every active recipe in the group
    pub units: f64,
    /// Total ingredient demand of the group (`rate * level`), first-seen order
    pub inputs: Vec<(String, f64)>,
}

/// A node of the production chain trace.
///
/// Each node pairs a product with the rate required of it; produced nodes
/// expand into the recipes that supply it and, recursively, their inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainNode {
    /// Consumed but never produced by any recipe
    Raw { product: String, required: f64 },
    /// Already on the current path; not expanded again
    Cycle { product: String, required: f64 },
    /// Produced somewhere in the catalog but not by any active recipe
    External { product: String, required: f64 },
    /// Supplied by one or more active recipes
    Produced {
        product: String,
        required: f64,
        steps: Vec<ChainStep>,
    },
}

/// A recipe run scaled to supply a produced chain node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainStep {
    pub recipe_id: RecipeId,
    pub machine: String,
    pub technology: String,
    /// Machine level scaled to the node's required rate
    pub level: f64,
    /// Rate of the node's product supplied by this step
    pub rate: f64,
    /// Ingredient sub-chains, in the recipe's ingredient order
    pub inputs: Vec<ChainNode>,
}

impl ChainNode {
    pub fn product(&self) -> &str {
        match self {
            ChainNode::Raw { product, .. }
            | ChainNode::Cycle { product, .. }
            | ChainNode::External { product, .. }
            | ChainNode::Produced { product, .. } => product,
        }
    }

    pub fn required(&self) -> f64 {
        match self {
            ChainNode::Raw { required, .. }
            | ChainNode::Cycle { required, .. }
            | ChainNode::External { required, .. }
            | ChainNode::Produced { required, .. } => *required,
        }
    }

    /// Child nodes across all steps of a produced node.
    pub fn children(&self) -> impl Iterator<Item = &ChainNode> {
        let steps: &[ChainStep] = match self {
            ChainNode::Produced { steps, .. } => steps,
            _ => &[],
        };
        steps.iter().flat_map(|step| step.inputs.iter())
    }

    /// Total required rate per raw material across the whole tree.
    pub fn raw_totals(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        self.collect_raw(&mut totals);
        totals
    }

    fn collect_raw(&self, totals: &mut BTreeMap<String, f64>) {
        if let ChainNode::Raw { product, required } = self {
            *totals.entry(product.clone()).or_insert(0.0) += required;
        }
        for child in self.children() {
            child.collect_raw(totals);
        }
    }

    /// Whether any branch of the tree stopped at a cycle.
    pub fn contains_cycle(&self) -> bool {
        matches!(self, ChainNode::Cycle { .. }) || self.children().any(ChainNode::contains_cycle)
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        1 + self.children().map(ChainNode::depth).max().unwrap_or(0)
    }
}

/// Why a source row did not become a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Blank output cell or a single-letter section divider
    SectionHeader,
    /// Output cell present but no entry matched `Name (Nx) R/min`
    UnparsableOutput,
}

/// A source row dropped while loading recipes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    /// Zero-based data row of the source table
    pub row: usize,
    pub reason: SkipReason,
    /// Raw output cell, for diagnostics
    pub output: String,
}

/// Recipes loaded from a table, plus the rows that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub recipes: Vec<Recipe>,
    pub skipped: Vec<SkippedRow>,
}

// ============================================================================
// CSV Row Structures
// ============================================================================

/// CSV row structure for the recipe table.
///
/// Only the four recipe columns are read; any other column is ignored.
#[derive(Debug, Deserialize)]
pub struct RecipeRow {
    /// Newline-separated `Name (Nx) R/min` entries
    #[serde(rename = "Output", alias = "Ouput")]
    pub output: Option<String>,
    /// Machine type
    #[serde(rename = "Machine")]
    pub machine: Option<String>,
    /// Newline-separated `Name (Nx) R/min` entries
    #[serde(rename = "Ingredients")]
    pub ingredients: Option<String>,
    /// Technology tag
    #[serde(rename = "Technology", alias = "technology")]
    pub technology: Option<String>,
}

/// CSV row structure for raw material capacity files.
#[derive(Debug, Deserialize)]
pub struct CapacityRow {
    /// Raw material name
    pub product: String,
    /// Available supply in units per minute
    pub rate: f64,
}
