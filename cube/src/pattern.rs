//! Basic graph patterns for boolean and enumerating queries.
//!
//! A [`Pattern`] is a conjunction of triple patterns over variables and
//! constants, plus optional `distinct` filters between variables. It is the
//! query language behind [`Graph::ask`](crate::Graph::ask) and
//! [`Graph::solutions`](crate::Graph::solutions).
//!
//! ```
//! use datacube::pattern::{var, Node, Pattern};
//! use datacube::vocab::iris::QB_COMPONENT;
//!
//! // A component attached to two different structures.
//! let shared = Pattern::new()
//!     .triple(var("s1"), Node::iri(QB_COMPONENT), var("c"))
//!     .triple(var("s2"), Node::iri(QB_COMPONENT), var("c"))
//!     .distinct("s1", "s2");
//! assert_eq!(shared.len(), 2);
//! ```

use std::collections::BTreeMap;

use crate::term::{Iri, Term};

/// A variable or a constant in a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A named variable.
    Var(String),
    /// A fixed term.
    Const(Term),
}

impl Node {
    /// A constant IRI node.
    #[must_use]
    pub fn iri(iri: &str) -> Self {
        Node::Const(Term::Iri(Iri::new(iri)))
    }
}

impl From<Term> for Node {
    fn from(t: Term) -> Self {
        Node::Const(t)
    }
}

impl From<&Iri> for Node {
    fn from(iri: &Iri) -> Self {
        Node::Const(Term::Iri(iri.clone()))
    }
}

/// Shorthand for [`Node::Var`].
#[must_use]
pub fn var(name: &str) -> Node {
    Node::Var(name.to_owned())
}

/// One `subject predicate object` pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    /// Subject position.
    pub subject: Node,
    /// Predicate position.
    pub predicate: Node,
    /// Object position.
    pub object: Node,
}

/// Variable assignments of one solution.
pub type Bindings = BTreeMap<String, Term>;

/// A conjunctive pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    triples: Vec<TriplePattern>,
    distinct: Vec<(String, String)>,
}

impl Pattern {
    /// An empty pattern (matches once, with no bindings).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple pattern.
    #[must_use]
    pub fn triple(mut self, subject: Node, predicate: Node, object: Node) -> Self {
        self.triples.push(TriplePattern {
            subject,
            predicate,
            object,
        });
        self
    }

    /// Requires two variables to be bound to different terms.
    #[must_use]
    pub fn distinct(mut self, a: &str, b: &str) -> Self {
        self.distinct.push((a.to_owned(), b.to_owned()));
        self
    }

    /// Number of triple patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// True when the pattern has no triple patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub(crate) fn triple_patterns(&self) -> &[TriplePattern] {
        &self.triples
    }

    /// Checks the `distinct` filters whose variables are both bound.
    pub(crate) fn filters_hold(&self, bindings: &Bindings) -> bool {
        self.distinct.iter().all(|(a, b)| match (bindings.get(a), bindings.get(b)) {
            (Some(x), Some(y)) => x != y,
            _ => true,
        })
    }
}

/// Resolves a node against the current bindings.
pub(crate) fn resolve<'a>(node: &'a Node, bindings: &'a Bindings) -> Option<&'a Term> {
    match node {
        Node::Const(t) => Some(t),
        Node::Var(name) => bindings.get(name),
    }
}

/// Binds `node` to `term`, failing on a conflicting earlier binding.
pub(crate) fn bind(node: &Node, term: &Term, bindings: &mut Bindings) -> bool {
    match node {
        Node::Const(t) => t == term,
        Node::Var(name) => match bindings.get(name) {
            Some(existing) => existing == term,
            None => {
                bindings.insert(name.clone(), term.clone());
                true
            }
        },
    }
}
