//! Cube entity model.
//!
//! `*Spec` types describe what to declare; the builder answers each
//! declaration with a handle ([`DimensionProperty`], [`MeasureProperty`],
//! [`DataStructureDefinition`], [`Dataset`], [`Observation`]) naming the
//! graph nodes it created. Handles are immutable once returned.

use crate::term::{BlankNode, Datatype, Iri, Term};

/// A label in one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Label text.
    pub text: String,
    /// BCP 47 language tag (`cs`, `en`).
    pub language: String,
}

impl Label {
    /// Creates a label.
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
        }
    }
}

/// How a dimension value is written on an observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueEncoding {
    /// As a plain string literal.
    Literal,
    /// As an IRI minted under the named category vocabulary.
    Resource {
        /// Prefix of the category vocabulary (e.g. `okresy`).
        vocabulary: String,
    },
}

/// SKOS relation from a dimension (or concept) to another concept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyLink {
    /// `skos:broader`; the inverse `skos:narrower` is emitted on the target.
    Broader(Iri),
    /// `skos:narrower`; the inverse `skos:broader` is emitted on the target.
    Narrower(Iri),
    /// `skos:related`.
    Related(Iri),
}

/// A free-standing SKOS concept used as a taxonomy anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptSpec {
    /// Local name under the ontology namespace.
    pub name: String,
    /// Labels per language.
    pub labels: Vec<Label>,
}

/// Declaration of a categorical axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionSpec {
    /// Local name under the ontology namespace.
    pub name: String,
    /// Row field the value is read from.
    pub field: String,
    /// Labels per language.
    pub labels: Vec<Label>,
    /// Plain preferred label.
    pub preferred_label: String,
    /// Declared ranges (datatype and/or external concept scheme).
    pub range: Vec<Iri>,
    /// Taxonomy links.
    pub taxonomy: Vec<TaxonomyLink>,
    /// Whether the dimension is itself typed `skos:Concept`.
    pub concept: bool,
    /// Value encoding on observations.
    pub encoding: ValueEncoding,
}

/// Declaration of a quantitative axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureSpec {
    /// Local name under the ontology namespace.
    pub name: String,
    /// Row field the value is read from.
    pub field: String,
    /// Labels per language.
    pub labels: Vec<Label>,
    /// Plain preferred label.
    pub preferred_label: String,
    /// Value datatype (`Integer` for counts and populations).
    pub range: Datatype,
    /// Standard measure this one specializes (`rdfs:subPropertyOf`).
    pub base_measure: Iri,
}

/// A declared dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionProperty {
    /// The property IRI.
    pub iri: Iri,
    /// The declaration it was built from.
    pub spec: DimensionSpec,
}

/// A declared measure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureProperty {
    /// The property IRI.
    pub iri: Iri,
    /// The declaration it was built from.
    pub spec: MeasureSpec,
}

/// The role a component plays in its structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentRole {
    /// Bound with `qb:dimension`.
    Dimension,
    /// Bound with `qb:measure`.
    Measure,
}

/// A structure-scoped binding of one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// The component's blank node (never shared).
    pub node: BlankNode,
    /// The bound property.
    pub property: Iri,
    /// Dimension or measure.
    pub role: ComponentRole,
}

/// A declared structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataStructureDefinition {
    /// The structure IRI.
    pub iri: Iri,
    /// Dimensions in declaration order.
    pub dimensions: Vec<DimensionProperty>,
    /// Measures in declaration order.
    pub measures: Vec<MeasureProperty>,
    /// One component per dimension and measure.
    pub components: Vec<Component>,
}

impl DataStructureDefinition {
    /// Number of value facts every observation must carry.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.dimensions.len() + self.measures.len()
    }
}

/// Descriptive dataset metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatasetMetadata {
    /// Labels per language.
    pub labels: Vec<Label>,
    /// `dct:title` per language.
    pub titles: Vec<Label>,
    /// `dct:description`.
    pub description: Option<String>,
    /// `rdfs:comment`.
    pub comment: Option<String>,
    /// `dct:issued` as given (`2023-3-12`); normalized on declaration.
    pub issued: Option<String>,
    /// `dct:publisher`.
    pub publisher: Option<String>,
    /// `dct:subject` IRIs.
    pub subjects: Vec<Iri>,
    /// Also type the dataset `prov:Entity`.
    pub provenance_entity: bool,
}

/// A declared dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    /// The dataset IRI.
    pub iri: Iri,
    /// The structure it references.
    pub structure: DataStructureDefinition,
}

/// One emitted observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// The observation IRI.
    pub iri: Iri,
    /// Position of the source row.
    pub row_index: usize,
    /// `(property, value)` in structure order: dimensions then measures.
    pub values: Vec<(Iri, Term)>,
}
