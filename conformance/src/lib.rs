//! Integrity constraints for statistical data cubes.
//!
//! A finished cube graph is well formed only if every integrity rule holds.
//! This crate provides the rules, an engine that evaluates an ordered rule
//! list, and a publisher that refuses to persist a cube that fails it.
//!
//! # Rules
//!
//! | Rule | Standard |
//! |------|----------|
//! | `IC-unique-dataset` | W3C Data Cube IC-1 |
//! | `IC-unique-structure` | W3C Data Cube IC-2 |
//! | `IC-structure-has-measure` | W3C Data Cube IC-3 |
//! | `IC-dimension-range` | W3C Data Cube IC-4 |
//! | `IC-dangling-structure` | declared-property closure |
//! | `IC-missing-value` | W3C Data Cube IC-11 / IC-14 |
//! | `IC-duplicate-slice` | W3C Data Cube IC-12 |
//! | `IC-shared-component` | component ownership |
//!
//! # Entry Point
//!
//! ```
//! use datacube::row::{row, FieldValue};
//! use datacube::{assemble, presets, Vocabulary};
//! use datacube_conformance::ConstraintEngine;
//!
//! let vocab = Vocabulary::default();
//! let rows = vec![row([
//!     ("okresCode", FieldValue::from("Benešov")),
//!     ("krajCode", FieldValue::from("Středočeský kraj")),
//!     ("population", FieldValue::Integer(99_950)),
//! ])];
//! let cube = assemble(&vocab, &presets::population::plan(&vocab), rows)?;
//!
//! let engine = ConstraintEngine::standard();
//! engine.check(&cube.graph, &vocab)?;
//! assert!(engine.audit(&cube.graph, &vocab, 5).all_passed());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod engine;
pub mod error;
pub mod publish;
pub mod report;
pub mod rule;
pub mod rules;

pub use engine::{ConstraintEngine, DEFAULT_MAX_WITNESSES};
pub use error::ValidationError;
pub use publish::{publish, publish_cube, write_atomic, Publication, PublishOptions};
pub use report::{ConformanceReport, RuleResult, Severity};
pub use rule::IntegrityRule;
