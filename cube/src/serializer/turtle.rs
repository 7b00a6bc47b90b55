//! Turtle 1.1 serializer.
//!
//! Writes one `@prefix` line per graph binding, then one block per subject
//! with predicates separated by `;` and repeated objects by `,`. IRIs are
//! abbreviated where a binding yields a valid prefixed name.

use super::{compact, escape, ntriples_term};
use crate::graph::Graph;
use crate::term::{Term, Triple};
use crate::vocab::iris::RDF_TYPE;
use crate::vocab::Namespace;

/// Serializes `graph` as Turtle.
#[must_use]
pub fn to_turtle(graph: &Graph) -> String {
    let mut out = String::with_capacity(graph.len() * 96);
    prefixes(&mut out, graph.namespaces());
    out.push('\n');
    body(&mut out, graph, "");
    out
}

pub(super) fn prefixes(out: &mut String, namespaces: &[Namespace]) {
    for ns in namespaces {
        out.push_str(&format!("@prefix {}: <{}> .\n", ns.prefix, ns.base));
    }
}

/// Subject blocks, each line prefixed with `indent`.
pub(super) fn body(out: &mut String, graph: &Graph, indent: &str) {
    let ns = graph.namespaces();
    let triples: Vec<&Triple> = graph.iter().collect();
    for block in triples.chunk_by(|a, b| a.subject == b.subject) {
        out.push_str(indent);
        out.push_str(&term(&block[0].subject, ns));
        out.push('\n');

        let predicates: Vec<&[&Triple]> = block.chunk_by(|a, b| a.predicate == b.predicate).collect();
        for (i, group) in predicates.iter().enumerate() {
            let predicate = group[0].predicate.as_str();
            let verb = if predicate == RDF_TYPE {
                "a".to_owned()
            } else {
                iri(predicate, ns)
            };
            let objects: Vec<String> = group.iter().map(|t| term(&t.object, ns)).collect();
            out.push_str(indent);
            out.push_str("    ");
            out.push_str(&verb);
            out.push(' ');
            out.push_str(&objects.join(" , "));
            out.push_str(if i + 1 == predicates.len() { " .\n" } else { " ;\n" });
        }
        out.push('\n');
    }
}

fn iri(iri: &str, ns: &[Namespace]) -> String {
    compact(iri, ns).unwrap_or_else(|| format!("<{iri}>"))
}

fn term(term: &Term, ns: &[Namespace]) -> String {
    match term {
        Term::Iri(i) => iri(i.as_str(), ns),
        Term::Blank(_) => ntriples_term(term),
        Term::Literal(lit) => {
            let quoted = format!("\"{}\"", escape(lit.lexical()));
            match (lit.language(), lit.datatype()) {
                (Some(lang), _) => format!("{quoted}@{lang}"),
                (None, Some(dt)) => format!("{quoted}^^{}", iri(dt.iri(), ns)),
                (None, None) => quoted,
            }
        }
    }
}
