//! Care providers cube.
//!
//! Input rows are individual care facilities (`KrajCode`, `OkresCode`,
//! `DruhZarizeni`); they are counted per region, county, and facility kind
//! into `Count`. Dimension values stay plain literals.

use super::cs_en;
use crate::assemble::CubePlan;
use crate::model::{DatasetMetadata, DimensionSpec, MeasureSpec, ValueEncoding};
use crate::prepare::{CountAggregate, Preparation};
use crate::term::{Datatype, Iri};
use crate::vocab::iris::*;
use crate::vocab::Vocabulary;

/// Returns the care providers plan.
#[must_use]
pub fn plan(vocab: &Vocabulary) -> CubePlan {
    let ns = vocab.ontology();
    let area_range = || vec![Iri::new(XSD_STRING), Iri::new(format!("{SDMX_CONCEPT}refArea"))];
    CubePlan {
        dataset_id: "care-providers".to_owned(),
        concepts: vec![],
        dimensions: vec![
            DimensionSpec {
                name: "okres".to_owned(),
                field: "OkresCode".to_owned(),
                labels: cs_en("Okres", "County"),
                preferred_label: "County".to_owned(),
                range: area_range(),
                taxonomy: vec![],
                concept: false,
                encoding: ValueEncoding::Literal,
            },
            DimensionSpec {
                name: "kraj".to_owned(),
                field: "KrajCode".to_owned(),
                labels: cs_en("Kraj", "Region"),
                preferred_label: "Region".to_owned(),
                range: area_range(),
                taxonomy: vec![],
                concept: false,
                encoding: ValueEncoding::Literal,
            },
            DimensionSpec {
                name: "obor_pece".to_owned(),
                field: "DruhZarizeni".to_owned(),
                labels: cs_en("Obor péče", "Field of care"),
                preferred_label: "Field of care".to_owned(),
                range: vec![Iri::new(XSD_STRING)],
                taxonomy: vec![],
                concept: false,
                encoding: ValueEncoding::Literal,
            },
        ],
        measures: vec![MeasureSpec {
            name: "number_of_care_providers".to_owned(),
            field: "Count".to_owned(),
            labels: cs_en("Počet poskytovatelů péče", "Number of care providers"),
            preferred_label: "Number of care providers".to_owned(),
            range: Datatype::Integer,
            base_measure: Iri::new(SDMX_OBS_VALUE),
        }],
        metadata: DatasetMetadata {
            labels: cs_en("Poskytovatelé zdravotních služeb", "Care Providers"),
            titles: vec![],
            description: Some("Care Providers Czechia".to_owned()),
            comment: Some(
                "Number of different types of care providers in counties of Czechia".to_owned(),
            ),
            issued: Some("2023-3-12".to_owned()),
            publisher: Some("Tomas Zasadil".to_owned()),
            subjects: vec![
                ns.term("Health"),
                ns.term("RegionalStatistics"),
                ns.term("Czechia"),
            ],
            provenance_entity: false,
        },
        preparation: Preparation {
            filters: vec![],
            derivations: vec![],
            aggregate: Some(CountAggregate {
                group_by: vec![
                    "KrajCode".to_owned(),
                    "OkresCode".to_owned(),
                    "DruhZarizeni".to_owned(),
                ],
                count_into: "Count".to_owned(),
            }),
        },
        provenance: None,
        catalog: None,
    }
}
