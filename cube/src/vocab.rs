//! Vocabulary: well-known IRIs and the per-build namespace configuration.
//!
//! The standard W3C / SDMX vocabularies live in [`iris`] as constants. The
//! deployment-specific bases (ontology terms, minted resources, and one
//! vocabulary per categorical dimension) are carried by [`Vocabulary`], an
//! immutable value built once per build session and passed explicitly to the
//! builder and the integrity rules.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::term::{Iri, Term};

/// Standard IRI constants.
pub mod iris {
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// RDF Data Cube namespace.
    pub const QB: &str = "http://purl.org/linked-data/cube#";
    /// SKOS namespace.
    pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
    /// Dublin Core terms.
    pub const DCT: &str = "http://purl.org/dc/terms/";
    /// DCAT namespace.
    pub const DCAT: &str = "http://www.w3.org/ns/dcat#";
    /// PROV-O namespace.
    pub const PROV: &str = "http://www.w3.org/ns/prov#";
    /// FOAF namespace.
    pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
    /// SDMX subject vocabulary.
    pub const SDMX_SUBJECT: &str = "http://purl.org/linked-data/sdmx/2009/subject#";
    /// SDMX concept vocabulary.
    pub const SDMX_CONCEPT: &str = "http://purl.org/linked-data/sdmx/2009/concept#";
    /// SDMX measure vocabulary.
    pub const SDMX_MEASURE: &str = "http://purl.org/linked-data/sdmx/2009/measure#";

    /// `rdf:type`.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdf:Property`.
    pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
    /// `rdfs:label`.
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// `rdfs:comment`.
    pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    /// `rdfs:range`.
    pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
    /// `rdfs:subPropertyOf`.
    pub const RDFS_SUB_PROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";

    /// `xsd:string`.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:integer`.
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:decimal`.
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `xsd:date`.
    pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

    /// `qb:DimensionProperty`.
    pub const QB_DIMENSION_PROPERTY: &str = "http://purl.org/linked-data/cube#DimensionProperty";
    /// `qb:MeasureProperty`.
    pub const QB_MEASURE_PROPERTY: &str = "http://purl.org/linked-data/cube#MeasureProperty";
    /// `qb:DataStructureDefinition`.
    pub const QB_DATA_STRUCTURE_DEFINITION: &str =
        "http://purl.org/linked-data/cube#DataStructureDefinition";
    /// `qb:DataSet`.
    pub const QB_DATA_SET: &str = "http://purl.org/linked-data/cube#DataSet";
    /// `qb:Observation`.
    pub const QB_OBSERVATION: &str = "http://purl.org/linked-data/cube#Observation";
    /// `qb:component`.
    pub const QB_COMPONENT: &str = "http://purl.org/linked-data/cube#component";
    /// `qb:dimension`.
    pub const QB_DIMENSION: &str = "http://purl.org/linked-data/cube#dimension";
    /// `qb:measure`.
    pub const QB_MEASURE: &str = "http://purl.org/linked-data/cube#measure";
    /// `qb:componentProperty`.
    pub const QB_COMPONENT_PROPERTY: &str = "http://purl.org/linked-data/cube#componentProperty";
    /// `qb:measureDimension`.
    pub const QB_MEASURE_DIMENSION: &str = "http://purl.org/linked-data/cube#measureDimension";
    /// `qb:structure`.
    pub const QB_STRUCTURE: &str = "http://purl.org/linked-data/cube#structure";
    /// `qb:dataSet`.
    pub const QB_DATASET_PROP: &str = "http://purl.org/linked-data/cube#dataSet";

    /// `skos:Concept`.
    pub const SKOS_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
    /// `skos:prefLabel`.
    pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    /// `skos:broader`.
    pub const SKOS_BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
    /// `skos:narrower`.
    pub const SKOS_NARROWER: &str = "http://www.w3.org/2004/02/skos/core#narrower";
    /// `skos:related`.
    pub const SKOS_RELATED: &str = "http://www.w3.org/2004/02/skos/core#related";

    /// `dct:title`.
    pub const DCT_TITLE: &str = "http://purl.org/dc/terms/title";
    /// `dct:description`.
    pub const DCT_DESCRIPTION: &str = "http://purl.org/dc/terms/description";
    /// `dct:issued`.
    pub const DCT_ISSUED: &str = "http://purl.org/dc/terms/issued";
    /// `dct:modified`.
    pub const DCT_MODIFIED: &str = "http://purl.org/dc/terms/modified";
    /// `dct:publisher`.
    pub const DCT_PUBLISHER: &str = "http://purl.org/dc/terms/publisher";
    /// `dct:creator`.
    pub const DCT_CREATOR: &str = "http://purl.org/dc/terms/creator";
    /// `dct:subject`.
    pub const DCT_SUBJECT: &str = "http://purl.org/dc/terms/subject";
    /// `dct:spatial`.
    pub const DCT_SPATIAL: &str = "http://purl.org/dc/terms/spatial";
    /// `dct:accrualPeriodicity`.
    pub const DCT_ACCRUAL_PERIODICITY: &str = "http://purl.org/dc/terms/accrualPeriodicity";

    /// `dcat:Dataset`.
    pub const DCAT_DATASET: &str = "http://www.w3.org/ns/dcat#Dataset";
    /// `dcat:Distribution`.
    pub const DCAT_DISTRIBUTION_CLASS: &str = "http://www.w3.org/ns/dcat#Distribution";
    /// `dcat:distribution`.
    pub const DCAT_DISTRIBUTION: &str = "http://www.w3.org/ns/dcat#distribution";
    /// `dcat:keyword`.
    pub const DCAT_KEYWORD: &str = "http://www.w3.org/ns/dcat#keyword";
    /// `dcat:theme`.
    pub const DCAT_THEME: &str = "http://www.w3.org/ns/dcat#theme";
    /// `dcat:mediaType`.
    pub const DCAT_MEDIA_TYPE: &str = "http://www.w3.org/ns/dcat#mediaType";
    /// `dcat:accessURL`.
    pub const DCAT_ACCESS_URL: &str = "http://www.w3.org/ns/dcat#accessURL";

    /// `prov:Entity`.
    pub const PROV_ENTITY: &str = "http://www.w3.org/ns/prov#Entity";
    /// `prov:Agent`.
    pub const PROV_AGENT_CLASS: &str = "http://www.w3.org/ns/prov#Agent";
    /// `prov:SoftwareAgent`.
    pub const PROV_SOFTWARE_AGENT: &str = "http://www.w3.org/ns/prov#SoftwareAgent";
    /// `prov:Activity`.
    pub const PROV_ACTIVITY: &str = "http://www.w3.org/ns/prov#Activity";
    /// `prov:Association`.
    pub const PROV_ASSOCIATION: &str = "http://www.w3.org/ns/prov#Association";
    /// `prov:Role`.
    pub const PROV_ROLE: &str = "http://www.w3.org/ns/prov#Role";
    /// `prov:qualifiedAssociation`.
    pub const PROV_QUALIFIED_ASSOCIATION: &str = "http://www.w3.org/ns/prov#qualifiedAssociation";
    /// `prov:agent`.
    pub const PROV_AGENT: &str = "http://www.w3.org/ns/prov#agent";
    /// `prov:hadRole`.
    pub const PROV_HAD_ROLE: &str = "http://www.w3.org/ns/prov#hadRole";
    /// `prov:wasGeneratedBy`.
    pub const PROV_WAS_GENERATED_BY: &str = "http://www.w3.org/ns/prov#wasGeneratedBy";

    /// `foaf:Person`.
    pub const FOAF_PERSON: &str = "http://xmlns.com/foaf/0.1/Person";
    /// `foaf:name`.
    pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";
    /// `foaf:givenName`.
    pub const FOAF_GIVEN_NAME: &str = "http://xmlns.com/foaf/0.1/givenName";

    /// `sdmx-measure:obsValue`.
    pub const SDMX_OBS_VALUE: &str = "http://purl.org/linked-data/sdmx/2009/measure#obsValue";
}

/// A prefix → base IRI binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Display prefix (e.g. `"qb"`).
    pub prefix: String,
    /// Base IRI the prefix abbreviates.
    pub base: String,
}

impl Namespace {
    /// Creates a binding.
    pub fn new(prefix: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            base: base.into(),
        }
    }

    /// Appends `local` to the base IRI.
    #[must_use]
    pub fn term(&self, local: &str) -> Iri {
        Iri::new(format!("{}{}", self.base, local))
    }
}

/// The standard prefixes every cube graph is bound with.
#[must_use]
pub fn standard_namespaces() -> Vec<Namespace> {
    vec![
        Namespace::new("rdf", iris::RDF),
        Namespace::new("rdfs", iris::RDFS),
        Namespace::new("xsd", iris::XSD),
        Namespace::new("qb", iris::QB),
        Namespace::new("skos", iris::SKOS),
        Namespace::new("dct", iris::DCT),
        Namespace::new("dcat", iris::DCAT),
        Namespace::new("prov", iris::PROV),
        Namespace::new("foaf", iris::FOAF),
        Namespace::new("sdmx-subject", iris::SDMX_SUBJECT),
        Namespace::new("sdmx-concept", iris::SDMX_CONCEPT),
        Namespace::new("sdmx-measure", iris::SDMX_MEASURE),
    ]
}

/// Deployment bases as they appear in configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct VocabularyConfig {
    /// Base for ontology terms (dimensions, measures, structure).
    #[serde(default = "default_ontology")]
    pub ontology: String,
    /// Base for minted resources (datasets, observations).
    #[serde(default = "default_resources")]
    pub resources: String,
    /// Per-category code vocabularies, keyed by prefix (e.g. `okresy`).
    #[serde(default = "default_categories")]
    pub categories: BTreeMap<String, String>,
}

fn default_ontology() -> String {
    "https://example.org/ontology#".to_owned()
}

fn default_resources() -> String {
    "https://example.org/resources/".to_owned()
}

fn default_categories() -> BTreeMap<String, String> {
    [
        ("okresy", "https://example.org/okresy/"),
        ("kraje", "https://example.org/kraje/"),
        ("obor-pece", "https://example.org/obor-pece/"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect()
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            ontology: default_ontology(),
            resources: default_resources(),
            categories: default_categories(),
        }
    }
}

/// Immutable namespace configuration for one build session.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    ontology: Namespace,
    resources: Namespace,
    categories: BTreeMap<String, Namespace>,
}

impl Vocabulary {
    /// Builds a vocabulary from its configuration.
    #[must_use]
    pub fn new(config: &VocabularyConfig) -> Self {
        Self {
            ontology: Namespace::new("ns", config.ontology.clone()),
            resources: Namespace::new("nsr", config.resources.clone()),
            categories: config
                .categories
                .iter()
                .map(|(prefix, base)| (prefix.clone(), Namespace::new(prefix.clone(), base.clone())))
                .collect(),
        }
    }

    /// Namespace of ontology terms.
    #[must_use]
    pub fn ontology(&self) -> &Namespace {
        &self.ontology
    }

    /// Namespace of minted resources.
    #[must_use]
    pub fn resources(&self) -> &Namespace {
        &self.resources
    }

    /// Looks up a category vocabulary by prefix.
    #[must_use]
    pub fn category(&self, prefix: &str) -> Option<&Namespace> {
        self.categories.get(prefix)
    }

    /// All bindings: standard prefixes, then `ns`, `nsr`, then categories.
    #[must_use]
    pub fn bindings(&self) -> Vec<Namespace> {
        let mut out = standard_namespaces();
        out.push(self.ontology.clone());
        out.push(self.resources.clone());
        out.extend(self.categories.values().cloned());
        out
    }

    /// Expands a compact IRI (`xsd:string`, `ns:Population`) or passes
    /// through an absolute IRI. Returns `None` for an unknown prefix.
    #[must_use]
    pub fn expand(&self, curie: &str) -> Option<Iri> {
        if curie.starts_with("http://") || curie.starts_with("https://") {
            return Some(Iri::new(curie));
        }
        let (prefix, local) = curie.split_once(':')?;
        self.bindings()
            .into_iter()
            .find(|ns| ns.prefix == prefix)
            .map(|ns| ns.term(local))
    }

    /// Renders a term for diagnostics: IRIs as compact names where a binding
    /// fits, everything else as N-Triples would write it.
    #[must_use]
    pub fn abbreviate(&self, term: &Term) -> String {
        term.as_iri()
            .and_then(|iri| crate::serializer::compact(iri.as_str(), &self.bindings()))
            .unwrap_or_else(|| crate::serializer::ntriples_term(term))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(&VocabularyConfig::default())
    }
}
