//! End-to-end cube assembly: presets, configuration files, and the
//! structural guarantees every assembled cube must satisfy.

use datacube::model::DatasetMetadata;
use datacube::pattern::{var, Node, Pattern};
use datacube::row::{row, FieldValue};
use datacube::vocab::iris::*;
use datacube::{assemble, presets, CubeBuilder, CubeError, DatasetConfig, Iri, Row, Term, Vocabulary};

fn county_rows() -> Vec<Row> {
    vec![
        row([
            ("okresCode", FieldValue::from("Benešov")),
            ("krajCode", FieldValue::from("Středočeský kraj")),
            ("population", FieldValue::Integer(99_950)),
        ]),
        row([
            ("okresCode", FieldValue::from("Beroun")),
            ("krajCode", FieldValue::from("Středočeský kraj")),
            ("population", FieldValue::from("95481")),
        ]),
        row([
            ("okresCode", FieldValue::from("Hlavní město Praha")),
            ("krajCode", FieldValue::from("Hlavní město Praha")),
            ("population", FieldValue::Integer(1_275_406)),
        ]),
    ]
}

#[test]
fn observations_are_named_in_row_order() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let cube = assemble(&vocab, &presets::population::plan(&vocab), county_rows())?;
    let names: Vec<&str> = cube
        .observations
        .iter()
        .map(|o| o.iri.local_name())
        .collect();
    assert_eq!(names, ["observation-000", "observation-001", "observation-002"]);
    assert_eq!(
        cube.observations[0].iri,
        Iri::new("https://example.org/resources/population/observation-000")
    );
    Ok(())
}

#[test]
fn every_observation_carries_one_value_per_component() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let cube = assemble(&vocab, &presets::population::plan(&vocab), county_rows())?;
    let arity = cube.dataset.structure.arity();
    assert_eq!(arity, 3);
    for obs in &cube.observations {
        let subject = Term::Iri(obs.iri.clone());
        let facts = cube
            .graph
            .triples_matching(Some(&subject), None, None)
            .filter(|t| t.predicate.as_str() != RDF_TYPE && t.predicate.as_str() != QB_DATASET_PROP)
            .count();
        assert_eq!(facts, arity, "{}", obs.iri);
    }
    Ok(())
}

#[test]
fn resource_encoded_values_point_into_category_vocabularies() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let cube = assemble(&vocab, &presets::population::plan(&vocab), county_rows())?;
    let prague = cube.observations[2].values[0].1.clone();
    assert_eq!(
        prague,
        Term::Iri(Iri::new("https://example.org/okresy/Hlavn%C3%AD_m%C4%9Bsto_Praha"))
    );
    Ok(())
}

#[test]
fn numeric_text_measures_become_integers() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let cube = assemble(&vocab, &presets::population::plan(&vocab), county_rows())?;
    let population = cube.observations[1].values[2].1.as_literal().cloned();
    assert_eq!(population, Some(datacube::Literal::integer(95_481)));
    Ok(())
}

#[test]
fn missing_measure_aborts_with_row_index() {
    let vocab = Vocabulary::default();
    let mut rows = county_rows();
    rows[2].insert("population".into(), FieldValue::Null);
    let result = assemble(&vocab, &presets::population::plan(&vocab), rows);
    assert!(matches!(
        result,
        Err(CubeError::MissingField { row_index: 2, ref field }) if field == "population"
    ));
}

fn declare_population<'v>(
    vocab: &'v Vocabulary,
) -> datacube::Result<(CubeBuilder<'v>, datacube::model::Dataset)> {
    let plan = presets::population::plan(vocab);
    let mut builder = CubeBuilder::new(vocab, plan.dataset_id.clone());
    let dims = plan
        .dimensions
        .iter()
        .map(|d| builder.declare_dimension(d.clone()))
        .collect::<datacube::Result<Vec<_>>>()?;
    let measures = plan
        .measures
        .iter()
        .map(|m| builder.declare_measure(m.clone()))
        .collect::<datacube::Result<Vec<_>>>()?;
    let structure = builder.declare_structure(&dims, &measures)?;
    let dataset = builder.declare_dataset(&structure, &DatasetMetadata::default())?;
    Ok((builder, dataset))
}

#[test]
fn failing_row_leaves_graph_untouched() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let (mut builder, dataset) = declare_population(&vocab)?;

    let rows = county_rows();
    builder.build_observation(&dataset, 0, &rows[0])?;
    let before = builder.graph().clone();

    let mut broken = rows[1].clone();
    broken.remove("krajCode");
    assert!(builder.build_observation(&dataset, 1, &broken).is_err());
    assert_eq!(builder.graph(), &before);
    Ok(())
}

#[test]
fn missing_measure_after_emitted_rows_keeps_their_triples_only() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let rows = county_rows();

    let (mut reference, dataset) = declare_population(&vocab)?;
    reference.build_observations(&dataset, &rows[..2])?;
    let snapshot = reference.graph().clone();

    let (mut builder, dataset) = declare_population(&vocab)?;
    let mut broken = rows[2].clone();
    broken.remove("population");
    let batch = [rows[0].clone(), rows[1].clone(), broken];
    assert_eq!(
        builder.build_observations(&dataset, &batch),
        Err(CubeError::MissingField {
            row_index: 2,
            field: "population".into()
        })
    );
    assert_eq!(builder.graph(), &snapshot);
    Ok(())
}

#[test]
fn rebuilding_yields_an_isomorphic_graph() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let plan = presets::population::plan(&vocab);
    let first = assemble(&vocab, &plan, county_rows())?;
    let second = assemble(&vocab, &plan, county_rows())?;
    assert!(first.graph.is_isomorphic(&second.graph));

    let mut shifted = second.graph.clone();
    let _ = shifted.new_blank_node();
    assert!(first.graph.is_isomorphic(&shifted));
    Ok(())
}

#[test]
fn components_are_never_shared_between_structures() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let cube = assemble(&vocab, &presets::population::plan(&vocab), county_rows())?;
    let shared = Pattern::new()
        .triple(var("s1"), Node::iri(QB_COMPONENT), var("c"))
        .triple(var("s2"), Node::iri(QB_COMPONENT), var("c"))
        .distinct("s1", "s2");
    assert!(!cube.graph.ask(&shared));
    Ok(())
}

#[test]
fn population_preset_carries_taxonomy_provenance_and_catalog() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let cube = assemble(&vocab, &presets::population::plan(&vocab), county_rows())?;
    let g = &cube.graph;
    let area = Term::Iri(vocab.ontology().term("administrativeArea"));
    let okres = Term::Iri(vocab.ontology().term("okres"));

    assert!(g.contains(&okres, SKOS_BROADER, &area));
    assert!(g.contains(&area, SKOS_NARROWER, &okres));
    assert!(g.contains(
        &Term::Iri(cube.dataset.iri.clone()),
        RDF_TYPE,
        &Term::Iri(Iri::new(PROV_ENTITY))
    ));
    assert_eq!(
        g.objects(&Term::Iri(cube.dataset.iri.clone()), PROV_WAS_GENERATED_BY).count(),
        1
    );
    assert_eq!(
        cube.catalog,
        Some(Iri::new("https://example.org/resources/populationDataset"))
    );
    Ok(())
}

#[test]
fn care_providers_are_counted_per_group() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let facility = |kraj: &str, okres: &str, kind: &str| {
        row([("KrajCode", kraj), ("OkresCode", okres), ("DruhZarizeni", kind)])
    };
    let rows = vec![
        facility("CZ010", "CZ0100", "Lékárna"),
        facility("CZ020", "CZ0201", "Lékárna"),
        facility("CZ010", "CZ0100", "Lékárna"),
        facility("CZ010", "CZ0100", "Nemocnice"),
    ];
    let cube = assemble(&vocab, &presets::care_providers::plan(&vocab), rows)?;
    assert_eq!(cube.observations.len(), 3);
    let counts: Vec<Option<i64>> = cube
        .observations
        .iter()
        .map(|o| {
            o.values[3]
                .1
                .as_literal()
                .and_then(|l| l.lexical().parse().ok())
        })
        .collect();
    assert_eq!(counts, [Some(2), Some(1), Some(1)]);
    Ok(())
}

#[test]
fn configuration_pipeline_resolves_raw_codes() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatasetConfig::from_toml_str(
        r#"
[dataset]
id = "population"
labels = { en = "County population" }
issued = "2023-3-12"

[[dimensions]]
name = "okres"
field = "okresCode"
preferred_label = "County"
range = ["xsd:string"]
encoding = "resource"
vocabulary = "okresy"

[[dimensions]]
name = "kraj"
field = "krajCode"
preferred_label = "Region"
range = ["xsd:string"]
encoding = "resource"
vocabulary = "kraje"

[[measures]]
name = "mean_population"
field = "hodnota"
preferred_label = "Mean population"

[[filters]]
field = "vuk"
equals = "DEM0004"

[[filters]]
field = "vuzemi_cis"
equals = 101

[lookups.okresy_to_kraje]
entries = { "40169" = "3018" }

[lookups.kraje]
entries = { "3018" = "CZ020" }

[lookups.okresy]
entries = { "40169" = "Benešov" }

[[derived]]
source = "vuzemi_kod"
target = "krajCode"
lookups = ["okresy_to_kraje", "kraje"]

[[derived]]
source = "vuzemi_kod"
target = "okresCode"
lookups = ["okresy"]
"#,
    )?;
    let vocab = config.vocabulary();
    let plan = config.plan(&vocab)?;
    let raw = datacube::row::parse_rows(
        r#"[
            {"vuk": "DEM0004", "vuzemi_cis": 101, "vuzemi_kod": 40169, "hodnota": 99950},
            {"vuk": "DEM0001", "vuzemi_cis": 101, "vuzemi_kod": 40169, "hodnota": 1},
            {"vuk": "DEM0004", "vuzemi_cis": 100, "vuzemi_kod": 3018, "hodnota": 1386824}
        ]"#,
    )?;
    let cube = assemble(&vocab, &plan, raw)?;
    assert_eq!(cube.observations.len(), 1);
    assert_eq!(
        cube.observations[0].values[1].1,
        Term::Iri(Iri::new("https://example.org/kraje/CZ020"))
    );
    Ok(())
}

#[test]
fn unresolved_code_is_never_passed_through() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatasetConfig::from_toml_str(
        r#"
[dataset]
id = "population"

[[dimensions]]
name = "kraj"
field = "krajCode"
preferred_label = "Region"

[[measures]]
name = "mean_population"
field = "hodnota"
preferred_label = "Mean population"

[lookups.kraje]
entries = { "3018" = "CZ020" }

[[derived]]
source = "vuzemi_kod"
target = "krajCode"
lookups = ["kraje"]
"#,
    )?;
    let vocab = config.vocabulary();
    let plan = config.plan(&vocab)?;
    let rows = vec![row([("vuzemi_kod", FieldValue::Integer(3999)), ("hodnota", FieldValue::Integer(1))])];
    let result = assemble(&vocab, &plan, rows);
    assert!(matches!(
        result,
        Err(CubeError::UnresolvedCode { ref stage, ref code }) if stage == "kraje" && code == "3999"
    ));
    Ok(())
}
