//! TriG serializer: the whole graph as one named graph.

use super::turtle::{body, prefixes};
use crate::graph::Graph;
use crate::term::Iri;

/// Serializes `graph` as TriG, naming the graph `name`.
#[must_use]
pub fn to_trig(graph: &Graph, name: &Iri) -> String {
    let mut out = String::with_capacity(graph.len() * 100);
    prefixes(&mut out, graph.namespaces());
    out.push('\n');
    out.push_str(&format!("<{}> {{\n", name.as_str()));
    body(&mut out, graph, "    ");
    out.push_str("}\n");
    out
}
