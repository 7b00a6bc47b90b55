//! Error types for cube assembly.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while minting identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// A categorical value was empty or whitespace-only.
    #[error("cannot mint an identifier from an empty value")]
    EmptyValue,
    /// The identifier is not under the expected vocabulary.
    #[error("identifier `{iri}` is not under vocabulary `{base}`")]
    ForeignIdentifier {
        /// The identifier that was decoded.
        iri: String,
        /// The vocabulary base it was expected under.
        base: String,
    },
    /// The percent-encoded tail is not valid UTF-8.
    #[error("identifier `{0}` does not decode to UTF-8")]
    InvalidEncoding(String),
}

/// Errors raised while assembling a cube.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CubeError {
    /// A row lacks a value for a declared dimension or measure.
    #[error("row {row_index}: missing value for `{field}`")]
    MissingField {
        /// Zero-based position of the row in the input sequence.
        row_index: usize,
        /// Name of the missing field.
        field: String,
    },
    /// A row value cannot be represented in the declared range.
    #[error("row {row_index}: value `{value}` of `{field}` is not a valid {expected}")]
    InvalidValue {
        /// Zero-based position of the row.
        row_index: usize,
        /// Name of the field.
        field: String,
        /// The offending value as text.
        value: String,
        /// Human-readable name of the expected range.
        expected: &'static str,
    },
    /// A lookup stage had no entry for a code.
    #[error("lookup `{stage}` has no entry for code `{code}`")]
    UnresolvedCode {
        /// Name of the lookup table that missed.
        stage: String,
        /// The code that could not be mapped.
        code: String,
    },
    /// The same property name was declared twice with different definitions.
    #[error("`{name}` is already declared with a different definition")]
    ConflictingDeclaration {
        /// The property name.
        name: String,
    },
    /// A dimension uses resource encoding under an unregistered vocabulary.
    #[error("dimension `{dimension}` refers to unknown vocabulary `{vocabulary}`")]
    UnknownVocabulary {
        /// The dimension name.
        dimension: String,
        /// The missing vocabulary prefix.
        vocabulary: String,
    },
    /// A compact IRI in the configuration has an unregistered prefix.
    #[error("cannot expand `{0}`: unknown prefix")]
    UnknownPrefix(String),
    /// A structure was declared with no measure.
    #[error("structure declares no measure")]
    NoMeasure,
    /// A date in the dataset metadata is not `YYYY-M-D`.
    #[error("invalid date `{0}`: expected year-month-day")]
    InvalidDate(String),
    /// Identifier construction failed.
    #[error(transparent)]
    Address(#[from] AddressError),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CubeError>;

/// Errors raised while loading a dataset configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration or lookup file could not be read.
    #[error("cannot read `{}`", path.display())]
    Read {
        /// The file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid TOML for this schema.
    #[error("cannot parse `{}`", path.display())]
    Parse {
        /// The file.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
    /// A lookup file is not a JSON object of code → value.
    #[error("lookup file `{}` is not a JSON object of strings", path.display())]
    LookupFile {
        /// The file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A derived field refers to a lookup table that is not defined.
    #[error("derived field `{target}` uses undefined lookup `{lookup}`")]
    UnknownLookup {
        /// The derived field.
        target: String,
        /// The missing table.
        lookup: String,
    },
    /// A lookup table has neither inline entries nor a file.
    #[error("lookup `{0}` needs `entries` or `file`")]
    EmptyLookup(String),
    /// A resource-encoded dimension names no category vocabulary.
    #[error("dimension `{0}` uses resource encoding but names no vocabulary")]
    MissingVocabulary(String),
    /// A measure range is not a supported datatype.
    #[error("measure `{measure}` has unsupported range `{range}`")]
    UnsupportedRange {
        /// The measure.
        measure: String,
        /// The configured range.
        range: String,
    },
    /// A compact IRI could not be expanded.
    #[error(transparent)]
    Cube(#[from] CubeError),
}
