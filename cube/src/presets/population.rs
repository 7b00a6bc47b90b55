//! County population cube.
//!
//! One observation per county: the county (`okresCode`), its region
//! (`krajCode`, a NUTS label) and the mean population (`population`). Both
//! area dimensions are SKOS concepts narrower than `administrativeArea`.

use super::cs_en;
use crate::assemble::CubePlan;
use crate::catalog::{CatalogSpec, DistributionSpec};
use crate::model::{
    ConceptSpec, DatasetMetadata, DimensionSpec, Label, MeasureSpec, TaxonomyLink, ValueEncoding,
};
use crate::prepare::Preparation;
use crate::provenance::ProvenanceSpec;
use crate::term::{Datatype, Iri};
use crate::vocab::iris::*;
use crate::vocab::Vocabulary;

const COUNTRY_CZE: &str = "https://publications.europa.eu/resource/authority/country/CZE";
const FREQUENCY_NEVER: &str = "http://publications.europa.eu/resource/authority/frequency/NEVER";
const FILE_TYPE_TRIG: &str = "http://publications.europa.eu/resource/authority/file-type/RDF_TRIG";
const EUROVOC_DEMOGRAPHY: &str = "http://eurovoc.europa.eu/5860";
const EUROVOC_REGIONS: &str = "http://eurovoc.europa.eu/3300";

/// Returns the population plan.
#[must_use]
pub fn plan(vocab: &Vocabulary) -> CubePlan {
    let ns = vocab.ontology();
    let area = ns.term("administrativeArea");
    CubePlan {
        dataset_id: "population".to_owned(),
        concepts: vec![ConceptSpec {
            name: "administrativeArea".to_owned(),
            labels: vec![Label::new("An area with its own administration", "en")],
        }],
        dimensions: vec![
            DimensionSpec {
                name: "okres".to_owned(),
                field: "okresCode".to_owned(),
                labels: cs_en("Okres", "County"),
                preferred_label: "County".to_owned(),
                range: vec![Iri::new(XSD_STRING)],
                taxonomy: vec![
                    TaxonomyLink::Broader(area.clone()),
                    TaxonomyLink::Related(ns.term("kraj")),
                ],
                concept: true,
                encoding: ValueEncoding::Resource {
                    vocabulary: "okresy".to_owned(),
                },
            },
            DimensionSpec {
                name: "kraj".to_owned(),
                field: "krajCode".to_owned(),
                labels: cs_en("Kraj", "Region"),
                preferred_label: "Region".to_owned(),
                range: vec![Iri::new(XSD_STRING)],
                taxonomy: vec![TaxonomyLink::Broader(area)],
                concept: true,
                encoding: ValueEncoding::Resource {
                    vocabulary: "kraje".to_owned(),
                },
            },
        ],
        measures: vec![MeasureSpec {
            name: "mean_population".to_owned(),
            field: "population".to_owned(),
            labels: cs_en("Střední stav obyvatel", "Mean population"),
            preferred_label: "Mean population".to_owned(),
            range: Datatype::Integer,
            base_measure: Iri::new(SDMX_OBS_VALUE),
        }],
        metadata: DatasetMetadata {
            labels: cs_en("Počet obyvatel okresů", "County population"),
            titles: vec![],
            description: Some("County population in Czechia".to_owned()),
            comment: Some("Population in counties of Czechia".to_owned()),
            issued: Some("2023-3-12".to_owned()),
            publisher: Some("Tomas Zasadil".to_owned()),
            subjects: vec![
                ns.term("Population"),
                ns.term("RegionalStatistics"),
                ns.term("Czechia"),
            ],
            provenance_entity: true,
        },
        preparation: Preparation::default(),
        provenance: Some(ProvenanceSpec {
            person: "Bob".to_owned(),
            role: "programmer".to_owned(),
            software: "Excel".to_owned(),
        }),
        catalog: Some(catalog(vocab)),
    }
}

fn catalog(vocab: &Vocabulary) -> CatalogSpec {
    CatalogSpec {
        id: "populationDataset".to_owned(),
        titles: vec![Label::new("Population dataset", "en")],
        issued: "2023-5-08".to_owned(),
        modified: "2023-5-08".to_owned(),
        publisher: "Tomas Zasadil".to_owned(),
        spatial: Some(Iri::new(COUNTRY_CZE)),
        keywords: ["czechia", "population", "region statistics"]
            .into_iter()
            .map(|k| Label::new(k, "en"))
            .collect(),
        periodicity: Some(Iri::new(FREQUENCY_NEVER)),
        themes: vec![Iri::new(EUROVOC_DEMOGRAPHY), Iri::new(EUROVOC_REGIONS)],
        distributions: vec![DistributionSpec {
            id: "populationDatasetRDF".to_owned(),
            titles: vec![Label::new(
                "RDF-trig distribution of the population dataset",
                "en",
            )],
            media_type: Iri::new(FILE_TYPE_TRIG),
            access_url: Iri::new(format!("{}files/population.trig", base_of(vocab))),
        }],
    }
}

/// The deployment root: the resources base without its last segment.
fn base_of(vocab: &Vocabulary) -> &str {
    let resources = vocab.resources().base.trim_end_matches('/');
    resources
        .rfind('/')
        .map_or(resources, |i| &resources[..=i])
}
