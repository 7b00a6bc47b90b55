//! The standard engine against assembled cubes: well-formed cubes pass,
//! each defect is caught by its rule, and evaluation order is respected.

use datacube::row::{row, FieldValue};
use datacube::vocab::iris::{
    QB_COMPONENT, QB_COMPONENT_PROPERTY, QB_DATA_STRUCTURE_DEFINITION, QB_DIMENSION,
    QB_DIMENSION_PROPERTY, RDFS_RANGE, RDF_TYPE, XSD_STRING,
};
use datacube::{assemble, presets, Cube, Iri, Row, Vocabulary};
use datacube_conformance::{ConstraintEngine, ValidationError};
use proptest::prelude::*;

fn county(okres: &str) -> Row {
    row([
        ("okresCode", FieldValue::from(okres)),
        ("krajCode", FieldValue::from("Středočeský kraj")),
        ("population", FieldValue::Integer(50_000)),
    ])
}

fn population(okresy: &[&str]) -> datacube::Result<Cube> {
    let vocab = Vocabulary::default();
    let rows = okresy.iter().map(|o| county(o)).collect();
    assemble(&vocab, &presets::population::plan(&vocab), rows)
}

fn violation(rule: &str) -> Result<(), ValidationError> {
    Err(ValidationError { rule: rule.into() })
}

/// Adds a declared dimension to the cube's structure that no observation
/// carries a value for.
fn add_unfilled_dimension(cube: &mut Cube, vocab: &Vocabulary) {
    let extra = vocab.ontology().term("extra");
    cube.graph.add(&extra, RDF_TYPE, Iri::new(QB_DIMENSION_PROPERTY));
    cube.graph.add(&extra, RDFS_RANGE, Iri::new(XSD_STRING));
    let node = cube.graph.new_blank_node();
    cube.graph.add(&cube.dataset.structure.iri, QB_COMPONENT, node);
    cube.graph.add(node, QB_DIMENSION, extra.clone());
    cube.graph.add(node, QB_COMPONENT_PROPERTY, extra);
}

#[test]
fn assembled_presets_are_well_formed() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let engine = ConstraintEngine::standard();
    let cube = population(&["Benešov", "Beroun", "Kladno"])?;
    assert_eq!(engine.check(&cube.graph, &vocab), Ok(()));

    let facilities = vec![
        row([("KrajCode", "CZ010"), ("OkresCode", "CZ0100"), ("DruhZarizeni", "Lékárna")]),
        row([("KrajCode", "CZ010"), ("OkresCode", "CZ0100"), ("DruhZarizeni", "Lékárna")]),
    ];
    let care = assemble(&vocab, &presets::care_providers::plan(&vocab), facilities)?;
    assert_eq!(engine.check(&care.graph, &vocab), Ok(()));
    Ok(())
}

#[test]
fn duplicate_county_is_rejected() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let cube = population(&["Benešov", "Beroun", "Benešov"])?;
    let engine = ConstraintEngine::standard();
    assert_eq!(engine.check(&cube.graph, &vocab), violation("IC-duplicate-slice"));
    Ok(())
}

#[test]
fn earlier_rule_wins_when_several_are_violated() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let mut cube = population(&["Benešov", "Benešov"])?;
    add_unfilled_dimension(&mut cube, &vocab);
    let engine = ConstraintEngine::standard();

    assert_eq!(engine.check(&cube.graph, &vocab), violation("IC-missing-value"));

    let report = engine.audit(&cube.graph, &vocab, 1);
    assert_eq!(
        report.violated_rules().collect::<Vec<_>>(),
        ["IC-missing-value", "IC-duplicate-slice"]
    );
    let missing = report.result("IC-missing-value").map(|r| (r.witnesses.len(), r.total));
    assert_eq!(missing, Some((1, 2)));
    Ok(())
}

#[test]
fn component_reused_by_a_second_structure_is_rejected() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let mut cube = population(&["Benešov"])?;
    let components: Vec<_> = cube
        .graph
        .objects(&cube.dataset.structure.iri.clone().into(), QB_COMPONENT)
        .cloned()
        .collect();
    assert_eq!(components.len(), 3);
    let other = vocab.resources().term("other-structure");
    cube.graph.add(&other, RDF_TYPE, Iri::new(QB_DATA_STRUCTURE_DEFINITION));
    for component in components {
        cube.graph.add(&other, QB_COMPONENT, component);
    }

    let engine = ConstraintEngine::standard();
    assert_eq!(engine.check(&cube.graph, &vocab), violation("IC-shared-component"));
    Ok(())
}

#[test]
fn undeclared_binding_dangles() -> datacube::Result<()> {
    let vocab = Vocabulary::default();
    let mut cube = population(&["Benešov"])?;
    let obs = cube.observations[0].iri.clone();
    cube.graph
        .add(&obs, vocab.ontology().term("note"), datacube::Literal::plain("x"));

    let engine = ConstraintEngine::standard();
    assert_eq!(engine.check(&cube.graph, &vocab), violation("IC-dangling-structure"));
    let report = engine.audit(&cube.graph, &vocab, 10);
    let witnesses = report
        .result("IC-dangling-structure")
        .map(|r| r.witnesses.clone())
        .unwrap_or_default();
    assert_eq!(witnesses.len(), 1);
    assert!(witnesses[0].contains("binds ns:note outside the structure of nsr:population"));
    Ok(())
}

#[test]
fn custom_rule_lists_are_evaluated_as_given() -> datacube::Result<()> {
    use datacube_conformance::rules::{observation, structure};

    let vocab = Vocabulary::default();
    let cube = population(&["Benešov", "Benešov"])?;
    let only_shape = ConstraintEngine::new(vec![
        Box::new(structure::SharedComponent),
        Box::new(structure::StructureHasMeasure),
    ]);
    assert_eq!(only_shape.check(&cube.graph, &vocab), Ok(()));

    let with_slices = ConstraintEngine::new(vec![Box::new(observation::DuplicateSlice)]);
    assert_eq!(with_slices.check(&cube.graph, &vocab), violation("IC-duplicate-slice"));
    Ok(())
}

// =============================================================================
// Completeness
// =============================================================================

proptest! {
    /// Any set of distinct counties assembles into a well-formed cube.
    #[test]
    fn prop_distinct_counties_are_well_formed(
        okresy in prop::collection::btree_set("[A-Za-z]{1,12}", 1..25)
    ) {
        let vocab = Vocabulary::default();
        let rows: Vec<Row> = okresy.iter().map(|o| county(o)).collect();
        let cube = assemble(&vocab, &presets::population::plan(&vocab), rows);
        prop_assert!(cube.is_ok());
        if let Ok(cube) = cube {
            let report = ConstraintEngine::standard().audit(&cube.graph, &vocab, 3);
            prop_assert!(report.all_passed(), "{}", report);
        }
    }

    /// Repeating any county makes the cube ill-formed.
    #[test]
    fn prop_repeated_county_is_detected(
        okresy in prop::collection::btree_set("[A-Za-z]{1,12}", 1..10),
        pick in any::<prop::sample::Index>()
    ) {
        let vocab = Vocabulary::default();
        let mut names: Vec<&String> = okresy.iter().collect();
        names.push(names[pick.index(names.len())]);
        let rows: Vec<Row> = names.iter().map(|o| county(o)).collect();
        let cube = assemble(&vocab, &presets::population::plan(&vocab), rows);
        prop_assert!(cube.is_ok());
        if let Ok(cube) = cube {
            prop_assert_eq!(
                ConstraintEngine::standard().check(&cube.graph, &vocab),
                violation("IC-duplicate-slice")
            );
        }
    }
}
