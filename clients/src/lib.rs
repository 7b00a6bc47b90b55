//! Shared plumbing for the data cube binaries: input arguments, plan and row
//! loading, and logging setup.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Args;
use datacube::{presets, CubePlan, DatasetConfig, Format, Row, Vocabulary};
use tracing_subscriber::EnvFilter;

/// Where the cube definition and its rows come from.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Dataset configuration (TOML).
    #[arg(long, conflicts_with = "preset", required_unless_present = "preset")]
    pub config: Option<PathBuf>,

    /// Built-in cube definition instead of a configuration file.
    #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(presets::NAMES))]
    pub preset: Option<String>,

    /// Input rows: a JSON array of objects.
    #[arg(long)]
    pub rows: PathBuf,
}

impl InputArgs {
    /// Resolves the vocabulary and plan this input describes.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or resolved.
    pub fn plan(&self) -> Result<(Vocabulary, CubePlan)> {
        match (&self.config, &self.preset) {
            (Some(path), _) => load_plan(path),
            (None, Some(name)) => {
                let vocab = Vocabulary::default();
                let plan = presets::by_name(name, &vocab)
                    .ok_or_else(|| anyhow!("Unknown preset `{name}`"))?;
                Ok((vocab, plan))
            }
            (None, None) => Err(anyhow!("Either --config or --preset is required")),
        }
    }

    /// Reads the input rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of
    /// flat objects.
    pub fn rows(&self) -> Result<Vec<Row>> {
        load_rows(&self.rows)
    }
}

/// Loads a dataset configuration and resolves it into a plan.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or resolved.
pub fn load_plan(path: &Path) -> Result<(Vocabulary, CubePlan)> {
    let config = DatasetConfig::load(path)
        .with_context(|| format!("Failed to load configuration {}", path.display()))?;
    let vocab = config.vocabulary();
    let plan = config
        .plan(&vocab)
        .with_context(|| format!("Failed to resolve configuration {}", path.display()))?;
    Ok((vocab, plan))
}

/// Reads rows from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    datacube::row::parse_rows(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parses a `--format` value.
///
/// # Errors
///
/// Returns a message naming the accepted formats.
pub fn parse_format(name: &str) -> Result<Format, String> {
    Format::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Format::ALL.iter().map(|f| f.extension()).collect();
        format!("unknown format `{name}` (expected one of: {})", known.join(", "))
    })
}

/// Installs the log subscriber: `info` by default, overridden by `RUST_LOG`.
/// Logs go to stderr so stdout stays free for reports.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_parse_by_extension() {
        assert_eq!(parse_format("ttl"), Ok(Format::Turtle));
        assert!(parse_format("xml").is_err_and(|e| e.contains("nt, ttl, trig, jsonld")));
    }

    #[test]
    fn preset_input_resolves_without_a_file() -> Result<()> {
        let args = InputArgs {
            config: None,
            preset: Some("population".into()),
            rows: PathBuf::from("rows.json"),
        };
        let (_, plan) = args.plan()?;
        assert_eq!(plan.dataset_id, "population");
        Ok(())
    }

    #[test]
    fn rows_load_from_json_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("rows.json");
        fs::write(&path, r#"[{"okresCode": "Benešov", "population": 99950}]"#)?;
        let rows = load_rows(&path)?;
        assert_eq!(rows.len(), 1);
        assert!(load_rows(&dir.path().join("missing.json")).is_err());
        Ok(())
    }
}
