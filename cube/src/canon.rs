//! Graph isomorphism up to blank-node renaming.
//!
//! Blank nodes are first partitioned by iterative colour refinement over
//! their neighbourhoods; the remaining ambiguity (blank nodes with identical
//! colours) is resolved by a backtracking search that checks the relabelled
//! graph for set equality. Cube graphs only use blank nodes for structure
//! components, each bound to a distinct property, so refinement alone
//! normally yields a unique mapping.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::Graph;
use crate::term::{BlankNode, Term, Triple};

type Colours = BTreeMap<BlankNode, usize>;

pub(crate) fn isomorphic(a: &Graph, b: &Graph) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let ground_a: BTreeSet<&Triple> = a.iter().filter(|t| is_ground(t)).collect();
    let ground_b: BTreeSet<&Triple> = b.iter().filter(|t| is_ground(t)).collect();
    if ground_a != ground_b {
        return false;
    }

    let blanks_a = blank_nodes(a);
    let blanks_b = blank_nodes(b);
    if blanks_a.len() != blanks_b.len() {
        return false;
    }

    let (colours_a, colours_b) = refine(a, &blanks_a, b, &blanks_b);

    let mut classes_a: BTreeMap<usize, Vec<BlankNode>> = BTreeMap::new();
    for (node, colour) in &colours_a {
        classes_a.entry(*colour).or_default().push(*node);
    }
    let mut classes_b: BTreeMap<usize, Vec<BlankNode>> = BTreeMap::new();
    for (node, colour) in &colours_b {
        classes_b.entry(*colour).or_default().push(*node);
    }
    let sizes = |c: &BTreeMap<usize, Vec<BlankNode>>| -> Vec<(usize, usize)> {
        c.iter().map(|(k, v)| (*k, v.len())).collect()
    };
    if sizes(&classes_a) != sizes(&classes_b) {
        return false;
    }

    let target: BTreeSet<Triple> = b.iter().filter(|t| !is_ground(t)).cloned().collect();
    let source: Vec<&Triple> = a.iter().filter(|t| !is_ground(t)).collect();
    let order: Vec<BlankNode> = classes_a.values().flatten().copied().collect();

    let mut mapping = BTreeMap::new();
    let mut used = BTreeSet::new();
    search(&order, 0, &colours_a, &classes_b, &mut mapping, &mut used, &source, &target)
}

fn is_ground(t: &Triple) -> bool {
    t.subject.as_blank().is_none() && t.object.as_blank().is_none()
}

fn blank_nodes(g: &Graph) -> BTreeSet<BlankNode> {
    g.iter()
        .flat_map(|t| [t.subject.as_blank(), t.object.as_blank()])
        .flatten()
        .collect()
}

/// Refines both graphs with a shared colour table so colours are comparable.
fn refine(
    a: &Graph,
    blanks_a: &BTreeSet<BlankNode>,
    b: &Graph,
    blanks_b: &BTreeSet<BlankNode>,
) -> (Colours, Colours) {
    let mut colours_a: Colours = blanks_a.iter().map(|n| (*n, 0)).collect();
    let mut colours_b: Colours = blanks_b.iter().map(|n| (*n, 0)).collect();
    let mut classes = 1;

    for _ in 0..=blanks_a.len() {
        let sig_a = signatures(a, &colours_a);
        let sig_b = signatures(b, &colours_b);

        let mut table: BTreeMap<&String, usize> = BTreeMap::new();
        for sig in sig_a.values().chain(sig_b.values()) {
            let next = table.len();
            table.entry(sig).or_insert(next);
        }
        let next_a: Colours = sig_a.iter().map(|(n, s)| (*n, table[s])).collect();
        let next_b: Colours = sig_b.iter().map(|(n, s)| (*n, table[s])).collect();

        let stable = table.len() == classes;
        classes = table.len();
        colours_a = next_a;
        colours_b = next_b;
        if stable {
            break;
        }
    }
    (colours_a, colours_b)
}

fn signatures(g: &Graph, colours: &Colours) -> BTreeMap<BlankNode, String> {
    let mut edges: BTreeMap<BlankNode, Vec<String>> =
        colours.keys().map(|n| (*n, Vec::new())).collect();
    for t in g.iter() {
        if let Some(s) = t.subject.as_blank() {
            if let Some(list) = edges.get_mut(&s) {
                list.push(format!("+{}|{}", t.predicate.as_str(), key(&t.object, colours)));
            }
        }
        if let Some(o) = t.object.as_blank() {
            if let Some(list) = edges.get_mut(&o) {
                list.push(format!("-{}|{}", t.predicate.as_str(), key(&t.subject, colours)));
            }
        }
    }
    edges
        .into_iter()
        .map(|(n, mut list)| {
            list.sort();
            let own = colours.get(&n).copied().unwrap_or_default();
            (n, format!("{own}[{}]", list.join(",")))
        })
        .collect()
}

fn key(term: &Term, colours: &Colours) -> String {
    match term {
        Term::Blank(b) => format!("_:{}", colours.get(b).copied().unwrap_or_default()),
        other => format!("{other:?}"),
    }
}

#[allow(clippy::too_many_arguments)]
fn search(
    order: &[BlankNode],
    index: usize,
    colours_a: &Colours,
    classes_b: &BTreeMap<usize, Vec<BlankNode>>,
    mapping: &mut BTreeMap<BlankNode, BlankNode>,
    used: &mut BTreeSet<BlankNode>,
    source: &[&Triple],
    target: &BTreeSet<Triple>,
) -> bool {
    let Some(node) = order.get(index) else {
        return source.iter().all(|t| target.contains(&relabel(t, mapping)));
    };
    let colour = colours_a.get(node).copied().unwrap_or_default();
    let candidates = classes_b.get(&colour).map(Vec::as_slice).unwrap_or_default();
    for candidate in candidates {
        if used.contains(candidate) {
            continue;
        }
        mapping.insert(*node, *candidate);
        used.insert(*candidate);
        if search(order, index + 1, colours_a, classes_b, mapping, used, source, target) {
            return true;
        }
        mapping.remove(node);
        used.remove(candidate);
    }
    false
}

fn relabel(t: &Triple, mapping: &BTreeMap<BlankNode, BlankNode>) -> Triple {
    let map = |term: &Term| match term {
        Term::Blank(b) => Term::Blank(mapping.get(b).copied().unwrap_or(*b)),
        other => other.clone(),
    };
    Triple {
        subject: map(&t.subject),
        predicate: t.predicate.clone(),
        object: map(&t.object),
    }
}
