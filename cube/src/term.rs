//! RDF terms: IRIs, blank nodes, literals, and the triples built from them.
//!
//! Terms are plain owned values with total ordering so a [`Graph`](crate::Graph)
//! can keep its facts in a sorted set. Equality is structural: two IRIs are
//! equal iff their strings are byte-identical, two literals are equal iff
//! lexical form, datatype, and language tag all match.

use std::fmt;

use crate::vocab::iris::{XSD_DATE, XSD_DECIMAL, XSD_INTEGER, XSD_STRING};

/// An absolute IRI.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Iri(String);

impl Iri {
    /// Wraps an absolute IRI string.
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Returns the IRI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the part of the IRI after the last `#` or `/`.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.0
            .rfind(['#', '/'])
            .map_or(self.0.as_str(), |i| &self.0[i + 1..])
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// An anonymous node, unique within the graph that allocated it.
///
/// Blank nodes are only handed out by
/// [`Graph::new_blank_node`](crate::Graph::new_blank_node); the numeric id has
/// no meaning outside that graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlankNode(pub(crate) u64);

impl BlankNode {
    /// Returns the graph-local identifier.
    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:b{}", self.0)
    }
}

/// XSD datatypes the cube emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Datatype {
    /// `xsd:string`.
    String,
    /// `xsd:integer`.
    Integer,
    /// `xsd:decimal`.
    Decimal,
    /// `xsd:date`.
    Date,
}

impl Datatype {
    /// Returns the full IRI of the datatype.
    #[must_use]
    pub fn iri(self) -> &'static str {
        match self {
            Datatype::String => XSD_STRING,
            Datatype::Integer => XSD_INTEGER,
            Datatype::Decimal => XSD_DECIMAL,
            Datatype::Date => XSD_DATE,
        }
    }

    /// Resolves a full datatype IRI back to a [`Datatype`].
    #[must_use]
    pub fn from_iri(iri: &str) -> Option<Self> {
        match iri {
            XSD_STRING => Some(Datatype::String),
            XSD_INTEGER => Some(Datatype::Integer),
            XSD_DECIMAL => Some(Datatype::Decimal),
            XSD_DATE => Some(Datatype::Date),
            _ => None,
        }
    }
}

/// A literal value with an optional datatype or language tag.
///
/// A literal carries either a datatype or a language tag, never both; plain
/// literals carry neither.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    lexical: String,
    datatype: Option<Datatype>,
    language: Option<String>,
}

impl Literal {
    /// A plain (untyped, untagged) literal.
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            lexical: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// A language-tagged literal such as `"Okres"@cs`.
    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: value.into(),
            datatype: None,
            language: Some(language.into().to_ascii_lowercase()),
        }
    }

    /// A typed literal.
    pub fn typed(value: impl Into<String>, datatype: Datatype) -> Self {
        Self {
            lexical: value.into(),
            datatype: Some(datatype),
            language: None,
        }
    }

    /// An `xsd:integer` literal.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), Datatype::Integer)
    }

    /// The lexical form.
    #[must_use]
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    /// The datatype, if any.
    #[must_use]
    pub fn datatype(&self) -> Option<Datatype> {
        self.datatype
    }

    /// The language tag, if any.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// Any RDF term.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// A named resource.
    Iri(Iri),
    /// An anonymous resource.
    Blank(BlankNode),
    /// A value.
    Literal(Literal),
}

impl Term {
    /// Returns the IRI if this term is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Returns the blank node if this term is one.
    #[must_use]
    pub fn as_blank(&self) -> Option<BlankNode> {
        match self {
            Term::Blank(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the literal if this term is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(l) => Some(l),
            _ => None,
        }
    }

    /// True for IRIs and blank nodes.
    #[must_use]
    pub fn is_resource(&self) -> bool {
        !matches!(self, Term::Literal(_))
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<&Iri> for Term {
    fn from(iri: &Iri) -> Self {
        Term::Iri(iri.clone())
    }
}

impl From<BlankNode> for Term {
    fn from(b: BlankNode) -> Self {
        Term::Blank(b)
    }
}

impl From<Literal> for Term {
    fn from(l: Literal) -> Self {
        Term::Literal(l)
    }
}

/// A subject/predicate/object fact.
///
/// The subject must be a resource (IRI or blank node); this is enforced by
/// [`Graph::add`](crate::Graph::add) taking a [`Subject`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triple {
    /// Subject term (never a literal).
    pub subject: Term,
    /// Predicate IRI.
    pub predicate: Iri,
    /// Object term.
    pub object: Term,
}

/// The subject position of a triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// A named subject.
    Iri(Iri),
    /// An anonymous subject.
    Blank(BlankNode),
}

impl From<Subject> for Term {
    fn from(s: Subject) -> Self {
        match s {
            Subject::Iri(i) => Term::Iri(i),
            Subject::Blank(b) => Term::Blank(b),
        }
    }
}

impl From<Iri> for Subject {
    fn from(iri: Iri) -> Self {
        Subject::Iri(iri)
    }
}

impl From<&Iri> for Subject {
    fn from(iri: &Iri) -> Self {
        Subject::Iri(iri.clone())
    }
}

impl From<BlankNode> for Subject {
    fn from(b: BlankNode) -> Self {
        Subject::Blank(b)
    }
}
