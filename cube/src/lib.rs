//! Statistical data cubes as RDF graphs.
//!
//! The `datacube` crate turns tabular statistical records into a graph that
//! follows the W3C RDF Data Cube vocabulary: dimension and measure
//! properties, a data structure definition binding them through
//! per-structure components, a dataset, and one observation per input row.
//! Graphs can be written as N-Triples, Turtle, TriG, or JSON-LD.
//!
//! # Entry Point
//!
//! ```
//! use datacube::row::{row, FieldValue};
//! use datacube::{assemble, presets, Vocabulary};
//!
//! let vocab = Vocabulary::default();
//! let plan = presets::population::plan(&vocab);
//! let rows = vec![row([
//!     ("okresCode", FieldValue::from("Benešov")),
//!     ("krajCode", FieldValue::from("Středočeský kraj")),
//!     ("population", FieldValue::Integer(99_950)),
//! ])];
//! let cube = assemble(&vocab, &plan, rows)?;
//! assert_eq!(cube.observations.len(), 1);
//! assert!(cube.observations[0].iri.as_str().ends_with("/observation-000"));
//! # Ok::<(), datacube::CubeError>(())
//! ```
//!
//! # Serialization
//!
//! ```
//! # use datacube::{assemble, presets, Vocabulary};
//! # let vocab = Vocabulary::default();
//! # let cube = assemble(&vocab, &presets::population::plan(&vocab), vec![])?;
//! let turtle = datacube::serializer::turtle::to_turtle(&cube.graph);
//! let json_ld = datacube::serializer::jsonld::to_json_ld(&cube.graph);
//! assert!(turtle.contains("qb:DataSet"));
//! assert!(json_ld["@graph"].is_array());
//! # Ok::<(), datacube::CubeError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod address;
pub mod assemble;
pub mod builder;
mod canon;
pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod lookup;
pub mod model;
pub mod pattern;
pub mod prepare;
pub mod presets;
pub mod provenance;
pub mod row;
pub mod serializer;
pub mod term;
pub mod vocab;

pub use assemble::{assemble, Cube, CubePlan};
pub use builder::CubeBuilder;
pub use config::DatasetConfig;
pub use error::{AddressError, ConfigError, CubeError, Result};
pub use graph::Graph;
pub use row::{FieldValue, Row};
pub use serializer::Format;
pub use term::{BlankNode, Datatype, Iri, Literal, Subject, Term, Triple};
pub use vocab::{Namespace, Vocabulary, VocabularyConfig};
