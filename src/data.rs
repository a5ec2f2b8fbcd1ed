//! Data loading functionality for flowplan.
//!
//! This module reads the recipe table (a CSV export of the recipe sheet) and
//! turns its `Name (Nx) R/min` cells into strongly typed [`Recipe`]s. It also
//! loads raw material capacities from CSV files and command line arguments.

use csv::ReaderBuilder;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::LoadError;
use crate::models::{
    insert_rate, CapacityRow, ItemRate, LoadReport, Recipe, RecipeRow, SkipReason, SkippedRow,
};

/// Parser for the recipe sheet's cell mini-language.
///
/// Each line of a cell looks like `Copper Frame (20x) 20/min`: a product
/// name, a stack multiplier and a rate per minute.
///
/// # Example
///
/// ```
/// use flowplan::data::RateParser;
///
/// let parser = RateParser::new().unwrap();
/// let item = parser.parse_item("Copper Frame (20x) 20/min").unwrap();
/// assert_eq!(item.name, "Copper Frame");
/// assert_eq!(item.multiplier, 20.0);
/// assert_eq!(item.rate, 20.0);
/// ```
#[derive(Debug, Clone)]
pub struct RateParser {
    item: Regex,
    section: Regex,
}

impl RateParser {
    pub fn new() -> Result<Self, LoadError> {
        Ok(RateParser {
            item: Regex::new(r"^(.+?)\s*\(([\d.]+)x\)\s*([\d.]+)/min")?,
            section: Regex::new(r"^[A-Z]\s*$")?,
        })
    }

    /// Parses one `Name (Nx) R/min` entry.
    ///
    /// Returns `None` when the line does not follow the grammar or a number
    /// cannot be read (e.g. `1.2.3`).
    pub fn parse_item(&self, line: &str) -> Option<ItemRate> {
        let caps = self.item.captures(line.trim())?;
        let name = caps.get(1)?.as_str().trim();
        if name.is_empty() {
            return None;
        }
        let multiplier = caps.get(2)?.as_str().parse::<f64>().ok()?;
        let rate = caps.get(3)?.as_str().parse::<f64>().ok()?;
        Some(ItemRate {
            name: name.to_string(),
            multiplier,
            rate,
        })
    }

    /// Parses a multi-line cell into an ordered product → rate list.
    ///
    /// Blank and unparsable lines are dropped. A product listed twice keeps
    /// its first position and the last rate.
    pub fn parse_rates(&self, cell: &str) -> Vec<(String, f64)> {
        let mut rates = Vec::new();
        for line in cell.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(item) = self.parse_item(line) {
                insert_rate(&mut rates, item.name, item.rate);
            }
        }
        rates
    }

    /// Whether an output cell is a section divider rather than a recipe.
    pub fn is_section_header(&self, cell: &str) -> bool {
        self.section.is_match(cell)
    }
}

/// Loads recipes from any CSV reader.
///
/// # CSV Format
///
/// Expected columns: `Output, Machine, Ingredients, Technology`. The legacy
/// spellings `Ouput` and `technology` are accepted; other columns are ignored.
///
/// Rows with an empty output cell or a single-letter section divider, and rows
/// whose output cell holds no parsable entry, are skipped and listed in
/// [`LoadReport::skipped`].
pub fn load_recipes_from_reader<R: Read>(reader: R) -> Result<LoadReport, LoadError> {
    let parser = RateParser::new()?;
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let mut report = LoadReport::default();
    for (row, result) in rdr.deserialize().enumerate() {
        let record: RecipeRow = result?;
        let output = record.output.unwrap_or_default();

        if output.trim().is_empty() || parser.is_section_header(&output) {
            report.skipped.push(SkippedRow {
                row,
                reason: SkipReason::SectionHeader,
                output,
            });
            continue;
        }

        let outputs = parser.parse_rates(&output);
        if outputs.is_empty() {
            report.skipped.push(SkippedRow {
                row,
                reason: SkipReason::UnparsableOutput,
                output,
            });
            continue;
        }

        let ingredients = record
            .ingredients
            .as_deref()
            .map(|cell| parser.parse_rates(cell))
            .unwrap_or_default();

        report.recipes.push(Recipe {
            id: row,
            machine: record.machine.unwrap_or_default().trim().to_string(),
            technology: record.technology.unwrap_or_default().trim().to_string(),
            outputs,
            ingredients,
        });
    }
    Ok(report)
}

/// Loads recipes from CSV text.
pub fn load_recipes_from_str(text: &str) -> Result<LoadReport, LoadError> {
    load_recipes_from_reader(text.as_bytes())
}

/// Loads recipes from a CSV file.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use flowplan::data::load_recipes;
///
/// let report = load_recipes(Path::new("recipes.csv")).unwrap();
/// println!("Loaded {} recipes", report.recipes.len());
/// ```
pub fn load_recipes(path: &Path) -> Result<LoadReport, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_recipes_from_reader(file)
}

/// Loads raw material capacities from a CSV file.
///
/// # CSV Format
///
/// Expected columns: `product, rate`. A product listed twice keeps the last rate.
pub fn load_raw_capacities(path: &Path) -> Result<BTreeMap<String, f64>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut capacities = BTreeMap::new();
    for result in rdr.deserialize() {
        let row: CapacityRow = result?;
        if !row.rate.is_finite() || row.rate < 0.0 {
            return Err(LoadError::InvalidCapacity(format!("{}={}", row.product, row.rate)));
        }
        capacities.insert(row.product, row.rate);
    }
    Ok(capacities)
}

/// Parses a `NAME=RATE` capacity argument.
///
/// # Example
///
/// ```
/// use flowplan::data::parse_capacity_arg;
///
/// let (name, rate) = parse_capacity_arg("Copper Ore=120").unwrap();
/// assert_eq!(name, "Copper Ore");
/// assert_eq!(rate, 120.0);
/// assert!(parse_capacity_arg("Copper Ore").is_err());
/// ```
pub fn parse_capacity_arg(arg: &str) -> Result<(String, f64), LoadError> {
    let invalid = || LoadError::InvalidCapacity(arg.to_string());
    let (name, rate) = arg.rsplit_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    let rate: f64 = rate.trim().parse().map_err(|_| invalid())?;
    if name.is_empty() || !rate.is_finite() || rate < 0.0 {
        return Err(invalid());
    }
    Ok((name.to_string(), rate))
}
