//! The standard integrity rules and the graph walks they share.
//!
//! | Rule | Forbids |
//! |------|---------|
//! | `IC-unique-dataset` | an observation without exactly one `qb:dataSet` |
//! | `IC-unique-structure` | a dataset without exactly one `qb:structure` |
//! | `IC-structure-has-measure` | a structure with no measure component |
//! | `IC-dimension-range` | a dimension property with no `rdfs:range` |
//! | `IC-dangling-structure` | bindings or components outside the declared properties |
//! | `IC-missing-value` | an observation lacking a declared component value |
//! | `IC-duplicate-slice` | two observations of one dataset with equal dimension tuples |
//! | `IC-shared-component` | a component attached to more than one structure |

pub mod dataset;
pub mod observation;
pub mod structure;

use std::collections::BTreeSet;

use datacube::vocab::iris::{
    QB_COMPONENT, QB_COMPONENT_PROPERTY, QB_DATASET_PROP, QB_DIMENSION, QB_MEASURE, QB_STRUCTURE,
    RDF_TYPE,
};
use datacube::{Graph, Iri, Term};

use crate::rule::IntegrityRule;

/// The standard rules in evaluation order.
#[must_use]
pub fn standard() -> Vec<Box<dyn IntegrityRule>> {
    vec![
        Box::new(dataset::UniqueDataset),
        Box::new(dataset::UniqueStructure),
        Box::new(structure::StructureHasMeasure),
        Box::new(structure::DimensionRange),
        Box::new(structure::DanglingStructure),
        Box::new(observation::MissingValue),
        Box::new(observation::DuplicateSlice),
        Box::new(structure::SharedComponent),
    ]
}

/// The role a component binds its property in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Role {
    Dimension,
    Measure,
}

/// One component node of a structure with what it binds.
#[derive(Debug, Clone)]
pub(crate) struct Component {
    pub node: Term,
    pub property: Option<Term>,
    pub role: Option<Role>,
}

/// Instances of `class`.
pub(crate) fn instances(graph: &Graph, class: &str) -> Vec<Term> {
    let class = Term::Iri(Iri::new(class));
    graph.instances_of(&class).cloned().collect()
}

/// The single object of `subject predicate ?o`; `None` when absent or ambiguous.
pub(crate) fn single_object(graph: &Graph, subject: &Term, predicate: &str) -> Option<Term> {
    let mut objects = graph.objects(subject, predicate);
    match (objects.next(), objects.next()) {
        (Some(o), None) => Some(o.clone()),
        _ => None,
    }
}

/// Components of `structure`. The property comes from the role predicate,
/// falling back to `qb:componentProperty`.
pub(crate) fn components(graph: &Graph, structure: &Term) -> Vec<Component> {
    graph
        .objects(structure, QB_COMPONENT)
        .map(|node| {
            let dimension = graph.objects(node, QB_DIMENSION).next();
            let measure = graph.objects(node, QB_MEASURE).next();
            let (property, role) = match (dimension, measure) {
                (Some(p), None) => (Some(p.clone()), Some(Role::Dimension)),
                (None, Some(p)) => (Some(p.clone()), Some(Role::Measure)),
                _ => (graph.objects(node, QB_COMPONENT_PROPERTY).next().cloned(), None),
            };
            Component {
                node: node.clone(),
                property,
                role,
            }
        })
        .collect()
}

/// Properties bound by the structure's components.
pub(crate) fn component_properties(graph: &Graph, structure: &Term) -> BTreeSet<Term> {
    components(graph, structure)
        .into_iter()
        .filter_map(|c| c.property)
        .collect()
}

/// Dimension properties of the structure, in term order.
pub(crate) fn dimension_properties(graph: &Graph, structure: &Term) -> Vec<Term> {
    let dims: BTreeSet<Term> = components(graph, structure)
        .into_iter()
        .filter(|c| c.role == Some(Role::Dimension))
        .filter_map(|c| c.property)
        .collect();
    dims.into_iter().collect()
}

/// The structure governing `observation`, when its dataset link and the
/// dataset's structure link are both unambiguous.
pub(crate) fn governing_structure(graph: &Graph, observation: &Term) -> Option<(Term, Term)> {
    let dataset = single_object(graph, observation, QB_DATASET_PROP)?;
    let structure = single_object(graph, &dataset, QB_STRUCTURE)?;
    Some((dataset, structure))
}

/// Predicates an observation binds as component values.
pub(crate) fn bound_properties(graph: &Graph, observation: &Term) -> BTreeSet<Term> {
    graph
        .triples_matching(Some(observation), None, None)
        .map(|t| t.predicate.as_str())
        .filter(|p| *p != RDF_TYPE && *p != QB_DATASET_PROP)
        .map(|p| Term::Iri(Iri::new(p)))
        .collect()
}
