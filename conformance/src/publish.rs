//! Validated publishing: build, check, then write atomically.
//!
//! Nothing is written unless the cube assembles and passes every rule. Every
//! output is first staged to a flushed temporary file in the target
//! directory; only then are they renamed into place. If a rename fails, the
//! files already renamed are removed, so a publication lands whole or not at
//! all.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use datacube::{assemble, Cube, CubePlan, Format, Row, Vocabulary};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::engine::ConstraintEngine;

/// Where and how to publish a cube.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Output directory; created if missing.
    pub out_dir: PathBuf,
    /// Formats to write, one file each.
    pub formats: Vec<Format>,
}

/// One written artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// Final path of the file.
    pub path: PathBuf,
    /// Format it was written in.
    pub format: Format,
    /// Size in bytes.
    pub bytes: usize,
}

/// Assembles `rows` under `plan`, then publishes the cube as
/// [`publish_cube`] does.
///
/// # Errors
///
/// Returns the assembly error, the [`ValidationError`](crate::ValidationError)
/// of the first violated rule, or the I/O error of the failed write. Each is
/// reachable through `downcast_ref`.
pub fn publish(
    vocab: &Vocabulary,
    plan: &CubePlan,
    rows: Vec<Row>,
    engine: &ConstraintEngine,
    options: &PublishOptions,
) -> Result<(Cube, Vec<Publication>)> {
    let cube = assemble(vocab, plan, rows)
        .with_context(|| format!("Failed to assemble cube `{}`", plan.dataset_id))?;
    let written = publish_cube(vocab, &cube, &plan.dataset_id, engine, options)?;
    Ok((cube, written))
}

/// Validates `cube` and writes one file per requested format as
/// `<file_stem>.<extension>`. Every format is rendered and staged before
/// the first file is renamed into place.
///
/// # Errors
///
/// Returns the [`ValidationError`](crate::ValidationError) of the first
/// violated rule, or the I/O error of the failed write.
pub fn publish_cube(
    vocab: &Vocabulary,
    cube: &Cube,
    file_stem: &str,
    engine: &ConstraintEngine,
    options: &PublishOptions,
) -> Result<Vec<Publication>> {
    engine.check(&cube.graph, vocab)?;

    let rendered = options
        .formats
        .iter()
        .map(|&format| {
            format
                .render(&cube.graph, &cube.dataset.iri)
                .map(|text| (format, text))
                .with_context(|| format!("Failed to render {}", format.extension()))
        })
        .collect::<Result<Vec<_>>>()?;

    fs::create_dir_all(&options.out_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            options.out_dir.display()
        )
    })?;

    let mut staged = Vec::with_capacity(rendered.len());
    for (format, text) in rendered {
        let path = options
            .out_dir
            .join(format!("{file_stem}.{}", format.extension()));
        let tmp = stage(&options.out_dir, text.as_bytes())?;
        staged.push((tmp, path, format, text.len()));
    }

    let mut written: Vec<Publication> = Vec::with_capacity(staged.len());
    for (tmp, path, format, bytes) in staged {
        if let Err(err) = tmp.persist(&path).map_err(|e| e.error) {
            for publication in &written {
                if let Err(cleanup) = fs::remove_file(&publication.path) {
                    warn!(path = %publication.path.display(), error = %cleanup, "failed to roll back");
                }
            }
            return Err(err).with_context(|| format!("Failed to write {}", path.display()));
        }
        written.push(Publication {
            path,
            format,
            bytes,
        });
    }
    for publication in &written {
        info!(path = %publication.path.display(), bytes = publication.bytes, "published");
    }
    Ok(written)
}

/// Writes `contents` to `path` through a temporary file in the same
/// directory, renamed into place after a flush.
///
/// # Errors
///
/// Returns the I/O error of the failed step; the temporary file is removed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    stage(dir, contents)?
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Writes `contents` to a flushed temporary file in `dir`. Dropping the
/// returned handle deletes the file.
fn stage(dir: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents)
        .with_context(|| format!("Failed to write {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush {}", tmp.path().display()))?;
    Ok(tmp)
}
