//! Rules on the observation → dataset → structure chain.

use datacube::vocab::iris::{QB_DATASET_PROP, QB_DATA_SET, QB_OBSERVATION, QB_STRUCTURE};
use datacube::{Graph, Vocabulary};

use super::instances;
use crate::rule::IntegrityRule;

/// Every observation belongs to exactly one dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueDataset;

impl IntegrityRule for UniqueDataset {
    fn name(&self) -> &'static str {
        "IC-unique-dataset"
    }

    fn description(&self) -> &'static str {
        "every observation has exactly one qb:dataSet"
    }

    fn witnesses(&self, graph: &Graph, vocab: &Vocabulary) -> Vec<String> {
        exactly_one(graph, vocab, QB_OBSERVATION, QB_DATASET_PROP, "dataset")
    }
}

/// Every dataset references exactly one structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueStructure;

impl IntegrityRule for UniqueStructure {
    fn name(&self) -> &'static str {
        "IC-unique-structure"
    }

    fn description(&self) -> &'static str {
        "every dataset has exactly one qb:structure"
    }

    fn witnesses(&self, graph: &Graph, vocab: &Vocabulary) -> Vec<String> {
        exactly_one(graph, vocab, QB_DATA_SET, QB_STRUCTURE, "structure")
    }
}

fn exactly_one(
    graph: &Graph,
    vocab: &Vocabulary,
    class: &str,
    predicate: &str,
    what: &str,
) -> Vec<String> {
    instances(graph, class)
        .iter()
        .filter_map(|subject| {
            let count = graph.objects(subject, predicate).count();
            (count != 1).then(|| format!("{} has {count} {what} links", vocab.abbreviate(subject)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use datacube::{Iri, Term};

    use super::*;

    fn typed(g: &mut Graph, iri: &str, class: &str) -> Iri {
        let iri = Iri::new(iri);
        g.add(&iri, datacube::vocab::iris::RDF_TYPE, Iri::new(class));
        iri
    }

    #[test]
    fn orphan_observation_is_reported() {
        let vocab = Vocabulary::default();
        let mut g = Graph::new();
        typed(&mut g, "urn:obs", QB_OBSERVATION);
        let witnesses = UniqueDataset.witnesses(&g, &vocab);
        assert_eq!(witnesses, ["<urn:obs> has 0 dataset links"]);
    }

    #[test]
    fn two_structures_are_reported() {
        let vocab = Vocabulary::default();
        let mut g = Graph::new();
        let ds = typed(&mut g, "urn:ds", QB_DATA_SET);
        g.add(&ds, QB_STRUCTURE, Iri::new("urn:a"));
        assert!(!UniqueStructure.is_violated(&g, &vocab));
        g.add(&ds, QB_STRUCTURE, Iri::new("urn:b"));
        assert!(UniqueStructure.is_violated(&g, &vocab));
        assert_eq!(g.objects(&Term::Iri(ds), QB_STRUCTURE).count(), 2);
    }
}
