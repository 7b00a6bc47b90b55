//! Rules on observation values.

use std::collections::BTreeMap;

use datacube::vocab::iris::QB_OBSERVATION;
use datacube::{Graph, Term, Vocabulary};

use super::{component_properties, dimension_properties, governing_structure, instances};
use crate::rule::IntegrityRule;

/// Every observation carries a value for each property of its structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingValue;

impl IntegrityRule for MissingValue {
    fn name(&self) -> &'static str {
        "IC-missing-value"
    }

    fn description(&self) -> &'static str {
        "every observation has a value for each dimension and measure of its structure"
    }

    fn witnesses(&self, graph: &Graph, vocab: &Vocabulary) -> Vec<String> {
        let mut out = Vec::new();
        for observation in instances(graph, QB_OBSERVATION) {
            let Some((_, structure)) = governing_structure(graph, &observation) else {
                continue;
            };
            for property in component_properties(graph, &structure) {
                let Term::Iri(predicate) = &property else {
                    continue;
                };
                if graph.objects(&observation, predicate.as_str()).next().is_none() {
                    out.push(format!(
                        "{} has no value for {}",
                        vocab.abbreviate(&observation),
                        vocab.abbreviate(&property)
                    ));
                }
            }
        }
        out
    }
}

/// No two observations of one dataset share a dimension value tuple.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateSlice;

impl IntegrityRule for DuplicateSlice {
    fn name(&self) -> &'static str {
        "IC-duplicate-slice"
    }

    fn description(&self) -> &'static str {
        "no two observations in one dataset share the same dimension values"
    }

    fn witnesses(&self, graph: &Graph, vocab: &Vocabulary) -> Vec<String> {
        let mut slices: BTreeMap<(Term, Vec<Vec<Term>>), Vec<Term>> = BTreeMap::new();
        for observation in instances(graph, QB_OBSERVATION) {
            let Some((dataset, structure)) = governing_structure(graph, &observation) else {
                continue;
            };
            let key: Vec<Vec<Term>> = dimension_properties(graph, &structure)
                .iter()
                .filter_map(Term::as_iri)
                .map(|dim| {
                    let mut values: Vec<Term> =
                        graph.objects(&observation, dim.as_str()).cloned().collect();
                    values.sort();
                    values
                })
                .collect();
            slices.entry((dataset, key)).or_default().push(observation);
        }

        slices
            .into_iter()
            .filter(|(_, observations)| observations.len() > 1)
            .map(|((dataset, key), observations)| {
                let names: Vec<String> = observations.iter().map(|o| vocab.abbreviate(o)).collect();
                let values: Vec<String> = key
                    .iter()
                    .map(|vs| {
                        vs.iter()
                            .map(|v| vocab.abbreviate(v))
                            .collect::<Vec<_>>()
                            .join("|")
                    })
                    .collect();
                format!(
                    "{} in {} share ({})",
                    names.join(", "),
                    vocab.abbreviate(&dataset),
                    values.join(", ")
                )
            })
            .collect()
    }
}
