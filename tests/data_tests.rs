//! Tests for data loading functionality.

use flowplan::data::{
    load_raw_capacities, load_recipes, load_recipes_from_str, parse_capacity_arg, RateParser,
};
use flowplan::error::LoadError;
use flowplan::models::SkipReason;
use std::path::Path;

fn parser() -> RateParser {
    RateParser::new().expect("patterns compile")
}

#[test]
fn test_parse_item_basic() {
    let item = parser().parse_item("Copper Frame (20x) 20/min").unwrap();
    assert_eq!(item.name, "Copper Frame");
    assert_eq!(item.multiplier, 20.0);
    assert_eq!(item.rate, 20.0);
}

#[test]
fn test_parse_item_decimal_and_whitespace() {
    let item = parser().parse_item("   Atlantum Ore (4x) 27.0/min   ").unwrap();
    assert_eq!(item.name, "Atlantum Ore");
    assert_eq!(item.multiplier, 4.0);
    assert_eq!(item.rate, 27.0);
}

#[test]
fn test_parse_item_name_with_parentheses() {
    let item = parser()
        .parse_item("Research Core 590nm (Yellow) (1x) 5/min")
        .unwrap();
    assert_eq!(item.name, "Research Core 590nm (Yellow)");
    assert_eq!(item.rate, 5.0);
}

#[test]
fn test_parse_item_rejects_bad_lines() {
    let p = parser();
    assert!(p.parse_item("Copper Wire").is_none());
    assert!(p.parse_item("Copper Wire 20/min").is_none());
    assert!(p.parse_item("(2x) 20/min").is_none());
    assert!(p.parse_item("Copper Wire (1.2.3x) 20/min").is_none());
    assert!(p.parse_item("").is_none());
}

#[test]
fn test_parse_rates_multiline() {
    let rates = parser().parse_rates("Atlantum Ore (4x) 27.0/min \nLimestone (6x) 40.5/min");
    assert_eq!(
        rates,
        vec![
            ("Atlantum Ore".to_string(), 27.0),
            ("Limestone".to_string(), 40.5)
        ]
    );
}

#[test]
fn test_parse_rates_skips_blank_and_invalid_lines() {
    let rates = parser().parse_rates("\nIron Ingot (1x) 15/min\n\nnot an entry\n  \n");
    assert_eq!(rates, vec![("Iron Ingot".to_string(), 15.0)]);
}

#[test]
fn test_parse_rates_duplicate_keeps_last_rate() {
    let rates = parser().parse_rates("Iron Ingot (1x) 15/min\nSand (1x) 2/min\nIron Ingot (2x) 30/min");
    assert_eq!(
        rates,
        vec![("Iron Ingot".to_string(), 30.0), ("Sand".to_string(), 2.0)]
    );
}

#[test]
fn test_section_header_detection() {
    let p = parser();
    assert!(p.is_section_header("A"));
    assert!(p.is_section_header("Z  "));
    assert!(!p.is_section_header("AB"));
    assert!(!p.is_section_header("a"));
    assert!(!p.is_section_header("Iron Ingot (1x) 15/min"));
}

#[test]
fn test_load_from_str_current_headers() {
    let csv = "Output,Machine,Ingredients,Technology\n\
               Iron Ingot (1x) 15/min,Smelter,Iron Ore (1x) 15/min,Basic Smelting\n";
    let report = load_recipes_from_str(csv).unwrap();

    assert_eq!(report.recipes.len(), 1);
    assert!(report.skipped.is_empty());
    let recipe = &report.recipes[0];
    assert_eq!(recipe.id, 0);
    assert_eq!(recipe.machine, "Smelter");
    assert_eq!(recipe.technology, "Basic Smelting");
    assert_eq!(recipe.output_rate("Iron Ingot"), Some(15.0));
    assert_eq!(recipe.ingredient_rate("Iron Ore"), Some(15.0));
}

#[test]
fn test_load_from_str_without_ingredients() {
    let csv = "Output,Machine,Ingredients,Technology\n\
               Limestone (6x) 40.5/min,Mining Drill,,Mining\n";
    let report = load_recipes_from_str(csv).unwrap();

    assert_eq!(report.recipes.len(), 1);
    assert!(report.recipes[0].ingredients.is_empty());
}

#[test]
fn test_load_from_str_skips_rows() {
    let csv = "Output,Machine,Ingredients,Technology\n\
               C,,,\n\
               ,,,\n\
               Iron Ingot (1x) 15/min,Smelter,Iron Ore (1x) 15/min,Basic Smelting\n\
               Mystery,Smelter,Iron Ore (1x) 15/min,Basic Smelting\n";
    let report = load_recipes_from_str(csv).unwrap();

    assert_eq!(report.recipes.len(), 1);
    assert_eq!(report.recipes[0].id, 2);

    let reasons: Vec<(usize, SkipReason)> =
        report.skipped.iter().map(|s| (s.row, s.reason)).collect();
    assert_eq!(
        reasons,
        vec![
            (0, SkipReason::SectionHeader),
            (1, SkipReason::SectionHeader),
            (3, SkipReason::UnparsableOutput),
        ]
    );
    assert_eq!(report.skipped[2].output, "Mystery");
}

#[test]
fn test_load_recipe_file() {
    let path = Path::new("data/recipes.csv");
    if !path.exists() {
        return;
    }

    let report = load_recipes(path).expect("Failed to load data");
    let ids: Vec<usize> = report.recipes.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 4, 5, 6, 7]);
    assert_eq!(report.skipped.len(), 3);

    let core = &report.recipes[5];
    assert_eq!(core.machine, "Research Core Assembler");
    assert_eq!(core.output_rate("Research Core 380nm (Purple)"), Some(5.0));
    assert_eq!(
        core.ingredients,
        vec![
            ("Mechanical Components".to_string(), 10.0),
            ("Limestone".to_string(), 20.0)
        ]
    );
}

#[test]
fn test_loaded_recipes_have_valid_data() {
    let path = Path::new("data/recipes.csv");
    if !path.exists() {
        return;
    }

    let report = load_recipes(path).expect("Failed to load data");
    for recipe in &report.recipes {
        assert!(!recipe.outputs.is_empty(), "Recipe should have an output");
        assert!(!recipe.machine.is_empty(), "Machine should not be empty");
        for (_, rate) in recipe.outputs.iter().chain(recipe.ingredients.iter()) {
            assert!(*rate >= 0.0, "Rates should be non-negative");
        }
    }
}

#[test]
fn test_load_missing_file() {
    let err = load_recipes(Path::new("data/does_not_exist.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn test_load_raw_capacities() {
    let path = Path::new("data/raw_limits.csv");
    if !path.exists() {
        return;
    }

    let limits = load_raw_capacities(path).expect("Failed to load limits");
    assert_eq!(limits.get("Limestone"), Some(&40.0));
    assert_eq!(limits.get("Iron Ore"), Some(&120.0));
    assert_eq!(limits.len(), 2);
}

#[test]
fn test_parse_capacity_arg() {
    assert_eq!(
        parse_capacity_arg(" Iron Ore = 90.5 ").unwrap(),
        ("Iron Ore".to_string(), 90.5)
    );
    assert_eq!(
        parse_capacity_arg("Water=Ice=4").unwrap(),
        ("Water=Ice".to_string(), 4.0)
    );
    assert!(matches!(
        parse_capacity_arg("Iron Ore=-1"),
        Err(LoadError::InvalidCapacity(_))
    ));
    assert!(parse_capacity_arg("=5").is_err());
    assert!(parse_capacity_arg("Iron Ore=lots").is_err());
}
