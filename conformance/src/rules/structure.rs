//! Rules on data structure definitions and their components.

use std::collections::{BTreeMap, BTreeSet};

use datacube::pattern::{var, Node, Pattern};
use datacube::vocab::iris::{
    QB_COMPONENT, QB_DATA_STRUCTURE_DEFINITION, QB_DIMENSION_PROPERTY, QB_MEASURE_PROPERTY,
    QB_OBSERVATION, RDFS_RANGE, RDF_TYPE,
};
use datacube::{Graph, Iri, Term, Vocabulary};

use super::{
    bound_properties, component_properties, components, governing_structure, instances, Role,
};
use crate::rule::IntegrityRule;

/// Every structure has at least one measure.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureHasMeasure;

impl IntegrityRule for StructureHasMeasure {
    fn name(&self) -> &'static str {
        "IC-structure-has-measure"
    }

    fn description(&self) -> &'static str {
        "every data structure definition includes at least one measure"
    }

    fn witnesses(&self, graph: &Graph, vocab: &Vocabulary) -> Vec<String> {
        instances(graph, QB_DATA_STRUCTURE_DEFINITION)
            .iter()
            .filter(|dsd| {
                !components(graph, dsd)
                    .iter()
                    .any(|c| c.role == Some(Role::Measure))
            })
            .map(|dsd| format!("{} declares no measure", vocab.abbreviate(dsd)))
            .collect()
    }
}

/// Every dimension declares its value range.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionRange;

impl IntegrityRule for DimensionRange {
    fn name(&self) -> &'static str {
        "IC-dimension-range"
    }

    fn description(&self) -> &'static str {
        "every dimension property has an rdfs:range"
    }

    fn witnesses(&self, graph: &Graph, vocab: &Vocabulary) -> Vec<String> {
        instances(graph, QB_DIMENSION_PROPERTY)
            .iter()
            .filter(|dim| graph.objects(dim, RDFS_RANGE).next().is_none())
            .map(|dim| format!("{} has no range", vocab.abbreviate(dim)))
            .collect()
    }
}

/// Observations bind only structure properties, and components bind only
/// declared properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct DanglingStructure;

impl IntegrityRule for DanglingStructure {
    fn name(&self) -> &'static str {
        "IC-dangling-structure"
    }

    fn description(&self) -> &'static str {
        "observations bind only properties of their structure, and every component references a declared property"
    }

    fn witnesses(&self, graph: &Graph, vocab: &Vocabulary) -> Vec<String> {
        let mut out = Vec::new();

        let structures: BTreeSet<Term> = graph
            .triples_matching(None, Some(QB_COMPONENT), None)
            .map(|t| t.subject.clone())
            .collect();
        for structure in &structures {
            for component in components(graph, structure) {
                let node = vocab.abbreviate(&component.node);
                let owner = vocab.abbreviate(structure);
                match component.property {
                    None => out.push(format!("component {node} of {owner} binds no property")),
                    Some(property) if !is_declared(graph, &property) => out.push(format!(
                        "component {node} of {owner} references undeclared {}",
                        vocab.abbreviate(&property)
                    )),
                    Some(_) => {}
                }
            }
        }

        for observation in instances(graph, QB_OBSERVATION) {
            let Some((dataset, structure)) = governing_structure(graph, &observation) else {
                continue;
            };
            let allowed = component_properties(graph, &structure);
            for property in bound_properties(graph, &observation).difference(&allowed) {
                out.push(format!(
                    "{} binds {} outside the structure of {}",
                    vocab.abbreviate(&observation),
                    vocab.abbreviate(property),
                    vocab.abbreviate(&dataset)
                ));
            }
        }
        out
    }
}

fn is_declared(graph: &Graph, property: &Term) -> bool {
    [QB_DIMENSION_PROPERTY, QB_MEASURE_PROPERTY]
        .iter()
        .any(|class| graph.contains(property, RDF_TYPE, &Term::Iri(Iri::new(*class))))
}

/// No component node is attached to two structures.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedComponent;

impl SharedComponent {
    fn pattern() -> Pattern {
        Pattern::new()
            .triple(var("s1"), Node::iri(QB_COMPONENT), var("c"))
            .triple(var("s2"), Node::iri(QB_COMPONENT), var("c"))
            .distinct("s1", "s2")
    }
}

impl IntegrityRule for SharedComponent {
    fn name(&self) -> &'static str {
        "IC-shared-component"
    }

    fn description(&self) -> &'static str {
        "a component node belongs to exactly one data structure definition"
    }

    fn witnesses(&self, graph: &Graph, vocab: &Vocabulary) -> Vec<String> {
        let mut owners: BTreeMap<Term, BTreeSet<Term>> = BTreeMap::new();
        for solution in graph.solutions(&Self::pattern()) {
            if let Some(component) = solution.get("c") {
                let entry = owners.entry(component.clone()).or_default();
                entry.extend(solution.get("s1").cloned());
                entry.extend(solution.get("s2").cloned());
            }
        }
        owners
            .iter()
            .map(|(component, structures)| {
                let names: Vec<String> = structures.iter().map(|s| vocab.abbreviate(s)).collect();
                format!(
                    "component {} is shared by {}",
                    vocab.abbreviate(component),
                    names.join(", ")
                )
            })
            .collect()
    }

    fn is_violated(&self, graph: &Graph, _vocab: &Vocabulary) -> bool {
        graph.ask(&Self::pattern())
    }
}
