//! In-memory RDF graph.
//!
//! A [`Graph`] is a deduplicated set of triples plus a registry of namespace
//! bindings used only for presentation. Facts are kept in two sorted
//! indexes (subject-predicate-object and predicate-object-subject) so the
//! lookups the builder and the integrity rules need are range scans.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::canon;
use crate::pattern::{bind, resolve, Bindings, Pattern, TriplePattern};
use crate::term::{BlankNode, Iri, Subject, Term, Triple};
use crate::vocab::Namespace;

/// Orders triples by predicate, object, then subject.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PosKey(Triple);

impl Ord for PosKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .predicate
            .cmp(&other.0.predicate)
            .then_with(|| self.0.object.cmp(&other.0.object))
            .then_with(|| self.0.subject.cmp(&other.0.subject))
    }
}

impl PartialOrd for PosKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn min_term() -> Term {
    Term::Iri(Iri::new(String::new()))
}

/// A set of RDF facts with namespace bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    spo: BTreeSet<Triple>,
    pos: BTreeSet<PosKey>,
    namespaces: Vec<Namespace>,
    next_blank: u64,
}

impl Graph {
    /// Creates an empty graph with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fact. Returns `false` if the identical fact was already present.
    pub fn add(
        &mut self,
        subject: impl Into<Subject>,
        predicate: impl Into<Iri>,
        object: impl Into<Term>,
    ) -> bool {
        let triple = Triple {
            subject: subject.into().into(),
            predicate: predicate.into(),
            object: object.into(),
        };
        if self.spo.contains(&triple) {
            return false;
        }
        self.pos.insert(PosKey(triple.clone()));
        self.spo.insert(triple)
    }

    /// Allocates a blank node never handed out before by this graph.
    pub fn new_blank_node(&mut self) -> BlankNode {
        let node = BlankNode(self.next_blank);
        self.next_blank += 1;
        node
    }

    /// Registers (or rebinds) a display prefix.
    pub fn bind_namespace(&mut self, prefix: &str, base: &str) {
        match self.namespaces.iter_mut().find(|ns| ns.prefix == prefix) {
            Some(existing) => existing.base = base.to_owned(),
            None => self.namespaces.push(Namespace::new(prefix, base)),
        }
    }

    /// Registered bindings in registration order.
    #[must_use]
    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    /// Number of facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spo.len()
    }

    /// True when the graph holds no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spo.is_empty()
    }

    /// All facts in subject-predicate-object order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.spo.iter()
    }

    /// True if the exact fact is present.
    #[must_use]
    pub fn contains(&self, subject: &Term, predicate: &str, object: &Term) -> bool {
        self.spo.contains(&Triple {
            subject: subject.clone(),
            predicate: Iri::new(predicate),
            object: object.clone(),
        })
    }

    /// Facts matching the given positions; `None` is a wildcard.
    pub fn triples_matching<'a>(
        &'a self,
        subject: Option<&Term>,
        predicate: Option<&str>,
        object: Option<&'a Term>,
    ) -> Box<dyn Iterator<Item = &'a Triple> + 'a> {
        match (subject, predicate) {
            (Some(s), p) => {
                let s = s.clone();
                let p = p.map(Iri::new);
                let start = Triple {
                    subject: s.clone(),
                    predicate: p.clone().unwrap_or_else(|| Iri::new(String::new())),
                    object: min_term(),
                };
                Box::new(
                    self.spo
                        .range(start..)
                        .take_while(move |t| {
                            t.subject == s && p.as_ref().map_or(true, |p| &t.predicate == p)
                        })
                        .filter(move |t| object.map_or(true, |o| &t.object == o)),
                )
            }
            (None, Some(p)) => {
                let p = Iri::new(p);
                let start = PosKey(Triple {
                    subject: min_term(),
                    predicate: p.clone(),
                    object: object.cloned().unwrap_or_else(min_term),
                });
                Box::new(
                    self.pos
                        .range(start..)
                        .map(|k| &k.0)
                        .take_while(move |t| {
                            t.predicate == p && object.map_or(true, |o| &t.object == o)
                        }),
                )
            }
            (None, None) => Box::new(
                self.spo
                    .iter()
                    .filter(move |t| object.map_or(true, |o| &t.object == o)),
            ),
        }
    }

    /// Objects of `subject predicate ?o`.
    pub fn objects<'a>(
        &'a self,
        subject: &Term,
        predicate: &str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples_matching(Some(subject), Some(predicate), None)
            .map(|t| &t.object)
    }

    /// Subjects of `?s predicate object`.
    pub fn subjects<'a>(
        &'a self,
        predicate: &str,
        object: &'a Term,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples_matching(None, Some(predicate), Some(object))
            .map(|t| &t.subject)
    }

    /// Subjects typed with `rdf:type class`.
    pub fn instances_of<'a>(&'a self, class: &'a Term) -> impl Iterator<Item = &'a Term> + 'a {
        self.subjects(crate::vocab::iris::RDF_TYPE, class)
    }

    /// True iff at least one solution of `pattern` exists.
    #[must_use]
    pub fn ask(&self, pattern: &Pattern) -> bool {
        let mut found = false;
        self.solve(pattern.triple_patterns(), pattern, Bindings::new(), &mut |_| {
            found = true;
            true
        });
        found
    }

    /// All solutions of `pattern`.
    #[must_use]
    pub fn solutions(&self, pattern: &Pattern) -> Vec<Bindings> {
        let mut out = Vec::new();
        self.solve(pattern.triple_patterns(), pattern, Bindings::new(), &mut |b| {
            out.push(b.clone());
            false
        });
        out
    }

    /// True if `other` holds the same facts up to blank-node renaming.
    #[must_use]
    pub fn is_isomorphic(&self, other: &Graph) -> bool {
        canon::isomorphic(self, other)
    }

    /// Depth-first join over the remaining patterns. `emit` returns `true`
    /// to stop the search; the same flag is propagated upward.
    fn solve(
        &self,
        remaining: &[TriplePattern],
        pattern: &Pattern,
        bindings: Bindings,
        emit: &mut dyn FnMut(&Bindings) -> bool,
    ) -> bool {
        let Some((first, rest)) = remaining.split_first() else {
            return pattern.filters_hold(&bindings) && emit(&bindings);
        };

        let subject = resolve(&first.subject, &bindings).cloned();
        let predicate = match resolve(&first.predicate, &bindings) {
            Some(Term::Iri(iri)) => Some(iri.as_str().to_owned()),
            Some(_) => return false,
            None => None,
        };
        let object = resolve(&first.object, &bindings).cloned();

        for triple in self.triples_matching(subject.as_ref(), predicate.as_deref(), object.as_ref())
        {
            let mut next = bindings.clone();
            let predicate_term = Term::Iri(triple.predicate.clone());
            if bind(&first.subject, &triple.subject, &mut next)
                && bind(&first.predicate, &predicate_term, &mut next)
                && bind(&first.object, &triple.object, &mut next)
                && pattern.filters_hold(&next)
                && self.solve(rest, pattern, next, emit)
            {
                return true;
            }
        }
        false
    }
}
