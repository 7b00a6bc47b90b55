//! `cube-check`: Assembles a data cube and validates it against the
//! standard integrity rules without writing anything.
//!
//! **Usage:**
//! ```text
//! cube-check (--config <toml> | --preset <name>) --rows <json> [--exhaustive] [--json]
//! ```
//!
//! By default rules are evaluated in order and the first violation is
//! reported. `--exhaustive` evaluates every rule and lists witnesses.
//! Exits non-zero if any rule is violated.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use datacube::assemble;
use datacube_clients::{init_logging, InputArgs};
use datacube_conformance::{ConstraintEngine, DEFAULT_MAX_WITNESSES};

/// Check the integrity of an RDF data cube.
#[derive(Parser)]
#[command(name = "cube-check", about = "Validate an RDF data cube against its integrity rules")]
struct Args {
    #[command(flatten)]
    input: InputArgs,

    /// Evaluate every rule instead of stopping at the first violation.
    #[arg(long)]
    exhaustive: bool,

    /// Witness lines printed per violated rule (with --exhaustive).
    #[arg(long, default_value_t = DEFAULT_MAX_WITNESSES)]
    max_witnesses: usize,

    /// Print the exhaustive report as JSON.
    #[arg(long, requires = "exhaustive")]
    json: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let (vocab, plan) = args.input.plan()?;
    let rows = args.input.rows()?;
    let cube = assemble(&vocab, &plan, rows)
        .with_context(|| format!("Failed to assemble cube `{}`", plan.dataset_id))?;
    let engine = ConstraintEngine::standard();

    if !args.exhaustive {
        if let Err(err) = engine.check(&cube.graph, &vocab) {
            eprintln!("Check FAILED: {err}");
            process::exit(1);
        }
        println!(
            "Check PASSED: {} observations, {} rules.",
            cube.observations.len(),
            engine.rule_names().count()
        );
        return Ok(());
    }

    let report = engine.audit(&cube.graph, &vocab, args.max_witnesses);
    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize report to JSON")?;
        println!("{json}");
    } else {
        println!("Data Cube Integrity Report: {}", plan.dataset_id);
        println!("==========================");
        println!();
        println!("{report}");
    }

    if !report.all_passed() {
        eprintln!(
            "Check FAILED: {} rule(s) violated.",
            report.failure_count()
        );
        process::exit(1);
    }
    Ok(())
}
