//! Serializers for cube graphs.
//!
//! Four formats are supported:
//! - **N-Triples** ([`ntriples`]): one fact per line, absolute IRIs
//! - **Turtle** ([`turtle`]): grouped by subject, abbreviated with the
//!   graph's namespace bindings
//! - **TriG** ([`trig`]): the Turtle body inside one named graph
//! - **JSON-LD** ([`jsonld`]): a `@context` of the bindings and a flat
//!   `@graph` of node objects
//!
//! Output is deterministic: subjects and facts are written in graph order.

pub mod jsonld;
pub mod ntriples;
pub mod trig;
pub mod turtle;

use crate::graph::Graph;
use crate::term::{Iri, Literal, Term};
use crate::vocab::Namespace;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.nt`
    NTriples,
    /// `.ttl`
    Turtle,
    /// `.trig`
    TriG,
    /// `.jsonld`
    JsonLd,
}

impl Format {
    /// Every format, in a stable order.
    pub const ALL: [Format; 4] = [Format::NTriples, Format::Turtle, Format::TriG, Format::JsonLd];

    /// Conventional file extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Format::NTriples => "nt",
            Format::Turtle => "ttl",
            Format::TriG => "trig",
            Format::JsonLd => "jsonld",
        }
    }

    /// The format for a file extension or format name (`ttl`, `turtle`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "nt" | "ntriples" | "n-triples" => Some(Format::NTriples),
            "ttl" | "turtle" => Some(Format::Turtle),
            "trig" => Some(Format::TriG),
            "jsonld" | "json-ld" => Some(Format::JsonLd),
            _ => None,
        }
    }

    /// Renders `graph`. `name` labels the named graph in TriG and is ignored
    /// by the other formats.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if JSON-LD pretty-printing fails.
    pub fn render(self, graph: &Graph, name: &Iri) -> serde_json::Result<String> {
        Ok(match self {
            Format::NTriples => ntriples::to_ntriples(graph),
            Format::Turtle => turtle::to_turtle(graph),
            Format::TriG => trig::to_trig(graph, name),
            Format::JsonLd => {
                let mut out = serde_json::to_string_pretty(&jsonld::to_json_ld(graph))?;
                out.push('\n');
                out
            }
        })
    }
}

/// Escapes a string for a quoted N-Triples/Turtle literal.
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Abbreviates `iri` with the longest matching binding whose local part is
/// a valid prefixed-name local part. Returns `None` when no binding fits.
pub(crate) fn compact(iri: &str, namespaces: &[Namespace]) -> Option<String> {
    namespaces
        .iter()
        .filter(|ns| !ns.base.is_empty() && iri.starts_with(&ns.base))
        .max_by_key(|ns| ns.base.len())
        .and_then(|ns| {
            let local = &iri[ns.base.len()..];
            is_local_name(local).then(|| format!("{}:{}", ns.prefix, local))
        })
}

fn is_local_name(local: &str) -> bool {
    let bytes = local.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = bytes.get(i + 1..i + 3);
                if !hex.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
                    return false;
                }
                i += 3;
            }
            b'-' if i == 0 => return false,
            b if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' => i += 1,
            _ => return false,
        }
    }
    true
}

/// A term as N-Triples would write it.
pub(crate) fn ntriples_term(term: &Term) -> String {
    match term {
        Term::Iri(iri) => format!("<{}>", iri.as_str()),
        Term::Blank(b) => b.to_string(),
        Term::Literal(lit) => ntriples_literal(lit),
    }
}

fn ntriples_literal(lit: &Literal) -> String {
    let quoted = format!("\"{}\"", escape(lit.lexical()));
    match (lit.language(), lit.datatype()) {
        (Some(lang), _) => format!("{quoted}@{lang}"),
        (None, Some(dt)) => format!("{quoted}^^<{}>", dt.iri()),
        (None, None) => quoted,
    }
}
