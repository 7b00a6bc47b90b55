//! PROV-O description of how a dataset was created.

use crate::address;
use crate::error::Result;
use crate::graph::Graph;
use crate::term::{Datatype, Iri, Literal};
use crate::vocab::iris::*;
use crate::vocab::Vocabulary;

/// Who and what produced the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceSpec {
    /// Given name of the person responsible.
    pub person: String,
    /// Role the person played (local name under the ontology namespace).
    pub role: String,
    /// Name of the software the source data was kept in.
    pub software: String,
}

/// Adds the provenance description and links `dataset` to the creating
/// activity. Returns the activity IRI.
///
/// # Errors
///
/// Returns an error if the dataset id, person, or software name is empty.
pub fn add_provenance(
    graph: &mut Graph,
    vocab: &Vocabulary,
    dataset_id: &str,
    dataset: &Iri,
    spec: &ProvenanceSpec,
) -> Result<Iri> {
    let resources = vocab.resources();
    let base = address::encode_label(dataset_id)?;
    let person = resources.term(&format!("agents/{}", address::encode_label(&spec.person)?));
    let software = resources.term(&format!("agents/{}", address::encode_label(&spec.software)?));
    let activity = resources.term(&format!("{base}/creation-activity"));
    let association = resources.term(&format!("{base}/creation-association"));
    let role = vocab.ontology().term(&address::encode_label(&spec.role)?);

    graph.add(&person, RDF_TYPE, Iri::new(FOAF_PERSON));
    graph.add(&person, RDF_TYPE, Iri::new(PROV_AGENT_CLASS));
    graph.add(&person, FOAF_GIVEN_NAME, Literal::typed(spec.person.clone(), Datatype::String));

    graph.add(&activity, RDF_TYPE, Iri::new(PROV_ACTIVITY));
    graph.add(&activity, PROV_QUALIFIED_ASSOCIATION, association.clone());

    graph.add(&association, RDF_TYPE, Iri::new(PROV_ASSOCIATION));
    graph.add(&association, PROV_AGENT, person.clone());
    graph.add(&association, PROV_HAD_ROLE, role.clone());
    graph.add(&association, vocab.ontology().term("database"), software.clone());

    graph.add(&role, RDF_TYPE, Iri::new(PROV_ROLE));

    graph.add(&software, RDF_TYPE, Iri::new(PROV_SOFTWARE_AGENT));
    graph.add(&software, RDF_TYPE, Iri::new(PROV_AGENT_CLASS));
    graph.add(&software, FOAF_NAME, Literal::typed(spec.software.clone(), Datatype::String));

    graph.add(dataset, PROV_WAS_GENERATED_BY, activity.clone());
    Ok(activity)
}
