//! `cube-build`: Assembles a data cube, validates it, and writes it to the
//! output directory.
//!
//! **Outputs** (for dataset id `<id>`):
//! - `<out>/<id>.nt`: N-Triples
//! - `<out>/<id>.ttl`: Turtle
//! - `<out>/<id>.trig`: TriG, one named graph
//! - `<out>/<id>.jsonld`: JSON-LD
//!
//! **Usage:**
//! ```text
//! cube-build (--config <toml> | --preset <name>) --rows <json> [--out <path>] [--format <fmt>]...
//! ```
//!
//! Nothing is written if the cube violates an integrity rule; the full audit
//! is printed instead and the process exits non-zero.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use datacube::{assemble, Format};
use datacube_clients::{init_logging, parse_format, InputArgs};
use datacube_conformance::{
    publish_cube, ConstraintEngine, PublishOptions, ValidationError, DEFAULT_MAX_WITNESSES,
};

/// Build and publish an RDF data cube.
#[derive(Parser)]
#[command(name = "cube-build", about = "Build, validate, and write an RDF data cube")]
struct Args {
    #[command(flatten)]
    input: InputArgs,

    /// Output directory for generated artifacts.
    #[arg(long, default_value = "public")]
    out: PathBuf,

    /// Output format (repeatable; default: every format).
    #[arg(long = "format", value_parser = parse_format)]
    formats: Vec<Format>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let (vocab, plan) = args.input.plan()?;
    let rows = args.input.rows()?;
    let cube = assemble(&vocab, &plan, rows)
        .with_context(|| format!("Failed to assemble cube `{}`", plan.dataset_id))?;

    println!(
        "Cube {}: {} observations, {} triples",
        plan.dataset_id,
        cube.observations.len(),
        cube.graph.len()
    );

    let engine = ConstraintEngine::standard();
    let options = PublishOptions {
        out_dir: args.out,
        formats: if args.formats.is_empty() {
            Format::ALL.to_vec()
        } else {
            args.formats
        },
    };

    match publish_cube(&vocab, &cube, &plan.dataset_id, &engine, &options) {
        Ok(written) => {
            for publication in &written {
                println!("  Written: {}", publication.path.display());
            }
            println!("Build complete.");
            Ok(())
        }
        Err(err) if err.downcast_ref::<ValidationError>().is_some() => {
            eprintln!("Build FAILED: {err}");
            println!();
            println!("{}", engine.audit(&cube.graph, &vocab, DEFAULT_MAX_WITNESSES));
            process::exit(1);
        }
        Err(err) => Err(err),
    }
}
