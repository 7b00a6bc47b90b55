//! JSON-LD 1.1 serializer.
//!
//! The `@context` maps every graph binding to its base IRI; `@graph` holds
//! one node object per subject. Keys and `@id`s use compact IRIs where a
//! binding fits.

use serde_json::{json, Map, Value};

use super::compact;
use crate::graph::Graph;
use crate::term::{Term, Triple};
use crate::vocab::iris::RDF_TYPE;
use crate::vocab::Namespace;

/// Serializes `graph` to a JSON-LD document.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json_ld(graph: &Graph) -> Value {
    json!({
        "@context": context(graph.namespaces()),
        "@graph": nodes(graph),
    })
}

fn context(namespaces: &[Namespace]) -> Value {
    let mut ctx = Map::new();
    for ns in namespaces {
        ctx.insert(ns.prefix.clone(), json!(ns.base));
    }
    Value::Object(ctx)
}

fn nodes(graph: &Graph) -> Value {
    let ns = graph.namespaces();
    let triples: Vec<&Triple> = graph.iter().collect();
    let nodes = triples
        .chunk_by(|a, b| a.subject == b.subject)
        .map(|block| {
            let mut node = Map::new();
            node.insert("@id".to_owned(), json!(id(&block[0].subject, ns)));
            for group in block.chunk_by(|a, b| a.predicate == b.predicate) {
                let predicate = group[0].predicate.as_str();
                if predicate == RDF_TYPE {
                    let types: Vec<Value> = group.iter().map(|t| json!(id(&t.object, ns))).collect();
                    node.insert("@type".to_owned(), Value::Array(types));
                } else {
                    let values: Vec<Value> = group.iter().map(|t| value(&t.object, ns)).collect();
                    node.insert(iri(predicate, ns), Value::Array(values));
                }
            }
            Value::Object(node)
        })
        .collect();
    Value::Array(nodes)
}

fn iri(iri: &str, ns: &[Namespace]) -> String {
    compact(iri, ns).unwrap_or_else(|| iri.to_owned())
}

fn id(term: &Term, ns: &[Namespace]) -> String {
    match term {
        Term::Iri(i) => iri(i.as_str(), ns),
        Term::Blank(b) => b.to_string(),
        Term::Literal(lit) => lit.lexical().to_owned(),
    }
}

fn value(term: &Term, ns: &[Namespace]) -> Value {
    match term {
        Term::Literal(lit) => {
            let mut v = json!({ "@value": lit.lexical() });
            if let Some(lang) = lit.language() {
                v["@language"] = json!(lang);
            } else if let Some(dt) = lit.datatype() {
                v["@type"] = json!(iri(dt.iri(), ns));
            }
            v
        }
        _ => json!({ "@id": id(term, ns) }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{Iri, Literal};
    use crate::vocab::iris::*;

    #[test]
    fn emits_context_and_graph() {
        let mut g = Graph::new();
        g.bind_namespace("qb", QB);
        g.bind_namespace("xsd", XSD);
        g.bind_namespace("ns", "https://example.org/ontology#");
        let obs = Iri::new("https://example.org/resources/population/observation-000");
        g.add(&obs, RDF_TYPE, Iri::new(QB_OBSERVATION));
        g.add(&obs, "https://example.org/ontology#mean_population", Literal::integer(95_481));
        g.add(&obs, "https://example.org/ontology#okres", Literal::lang("Benešov", "cs"));

        let doc = to_json_ld(&g);
        assert_eq!(doc["@context"]["qb"], json!(QB));
        let node = &doc["@graph"][0];
        assert_eq!(node["@id"], json!(obs.as_str()));
        assert_eq!(node["@type"], json!(["qb:Observation"]));
        assert_eq!(
            node["ns:mean_population"],
            json!([{ "@value": "95481", "@type": "xsd:integer" }])
        );
        assert_eq!(node["ns:okres"], json!([{ "@value": "Benešov", "@language": "cs" }]));
    }
}
