//! N-Triples serializer.
//!
//! One fact per line with absolute IRIs; bindings are not used. Suitable
//! for bulk loading and line-oriented diffs.

use super::ntriples_term;
use crate::graph::Graph;

/// Serializes `graph` as N-Triples.
#[must_use]
pub fn to_ntriples(graph: &Graph) -> String {
    let mut out = String::with_capacity(graph.len() * 128);
    for t in graph.iter() {
        out.push_str(&ntriples_term(&t.subject));
        out.push_str(" <");
        out.push_str(t.predicate.as_str());
        out.push_str("> ");
        out.push_str(&ntriples_term(&t.object));
        out.push_str(" .\n");
    }
    out
}
