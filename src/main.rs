//! Datacheck CLI - Declarative Data Validation
//!
//! This is a demonstration CLI for the datacheck library.

use anyhow::{Context, Result};
use datacheck::prelude::*;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("datacheck");

    if args.len() < 2 {
        print_usage(program);
        return ExitCode::FAILURE;
    }

    let result = match args[1].as_str() {
        "list" => {
            list_validators();
            Ok(true)
        }
        "check" => {
            if args.len() < 4 {
                eprintln!("Error: Please specify a spec file and a value file");
                eprintln!("Usage: {} check <spec.json> <value.json> [--all]", program);
                return ExitCode::FAILURE;
            }
            let collect_all = args[4..].iter().any(|a| a == "--all");
            run_check(Path::new(&args[2]), Path::new(&args[3]), collect_all)
        }
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(true)
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(program);
            Ok(false)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn print_usage(program: &str) {
    println!("Datacheck v{}", datacheck::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list                                List built-in validators and types");
    println!("  check <spec> <value> [--all]        Validate a JSON value against a JSON spec");
    println!("  help                                Show this help message");
    println!();
    println!("Check options:");
    println!("  --all    Report every error instead of stopping at the first");
    println!();
    println!("Set RUST_LOG=debug to trace validation.");
}

fn list_validators() {
    let registry = Registry::with_builtins();

    println!("Validators ({} total):", registry.len());
    for name in registry.validator_names() {
        println!("  • {}", name);
    }
    println!();
    println!("Types:");
    for name in registry.type_names() {
        println!("  • {}", name);
    }
}

/// Load a JSON file as a [`Value`], keeping key order.
fn load_json(path: &Path) -> Result<Value, DatacheckError> {
    let text = std::fs::read_to_string(path)?;
    let json: serde_json::Value = serde_json::from_str(&text)?;
    Ok(Value::from(json))
}

/// Run `check` under the requested policy, folding failures into [`DatacheckError`].
fn validate(value: Value, check: &CompiledCheck, collect_all: bool) -> Result<Value, DatacheckError> {
    if collect_all {
        Ok(all_blocking(value, check)?)
    } else {
        Ok(ok_blocking(value, check)?)
    }
}

/// Validate and print the outcome. Returns whether the value was valid.
fn run_check(spec_path: &Path, value_path: &Path, collect_all: bool) -> Result<bool> {
    let spec = load_json(spec_path).with_context(|| format!("failed to load {}", spec_path.display()))?;
    let value = load_json(value_path).with_context(|| format!("failed to load {}", value_path.display()))?;

    let check = DEFAULT_REGISTRY
        .compile_value(&spec)
        .map_err(DatacheckError::from)
        .with_context(|| format!("invalid spec {}", spec_path.display()))?;

    let errors = match validate(value, &check, collect_all) {
        Ok(clean) => {
            println!("{}", serde_json::to_string_pretty(&clean)?);
            return Ok(true);
        }
        Err(DatacheckError::Validation(error)) => ValidationErrors::new(vec![error]),
        Err(DatacheckError::Validations(errors)) => errors,
        Err(other) => return Err(other.into()),
    };

    eprintln!("✗ Validation failed with {} error(s)", errors.len());
    for line in errors.detailed_errors() {
        eprintln!("  {}", line);
    }
    Ok(false)
}
