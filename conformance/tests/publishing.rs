//! Publishing writes every format for a well-formed cube and nothing at all
//! for a cube that fails assembly or validation.

use std::fs;

use datacube::row::{row, FieldValue};
use datacube::{presets, CubeError, Format, Row, Vocabulary};
use datacube_conformance::{publish, ConstraintEngine, PublishOptions, ValidationError};

fn county(okres: &str, population: i64) -> Row {
    row([
        ("okresCode", FieldValue::from(okres)),
        ("krajCode", FieldValue::from("Středočeský kraj")),
        ("population", FieldValue::Integer(population)),
    ])
}

#[test]
fn well_formed_cube_is_written_in_every_format() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let out_dir = dir.path().join("out");
    let vocab = Vocabulary::default();
    let options = PublishOptions {
        out_dir: out_dir.clone(),
        formats: Format::ALL.to_vec(),
    };
    let rows = vec![county("Benešov", 99_950), county("Beroun", 95_481)];
    let (cube, written) = publish(
        &vocab,
        &presets::population::plan(&vocab),
        rows,
        &ConstraintEngine::standard(),
        &options,
    )?;

    assert_eq!(cube.observations.len(), 2);
    let mut names: Vec<String> = fs::read_dir(&out_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        [
            "population.jsonld",
            "population.nt",
            "population.trig",
            "population.ttl"
        ]
    );
    for publication in &written {
        let on_disk = fs::read_to_string(&publication.path)?;
        assert_eq!(on_disk.len(), publication.bytes);
        assert_eq!(
            on_disk,
            publication.format.render(&cube.graph, &cube.dataset.iri)?
        );
    }
    Ok(())
}

#[test]
fn duplicate_slice_aborts_before_output() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let out_dir = dir.path().join("out");
    let vocab = Vocabulary::default();
    let options = PublishOptions {
        out_dir: out_dir.clone(),
        formats: vec![Format::Turtle],
    };
    let rows = vec![county("Benešov", 1), county("Benešov", 2)];
    let result = publish(
        &vocab,
        &presets::population::plan(&vocab),
        rows,
        &ConstraintEngine::standard(),
        &options,
    );

    let rule = result
        .as_ref()
        .err()
        .and_then(|e| e.downcast_ref::<ValidationError>())
        .map(|e| e.rule.as_str());
    assert_eq!(rule, Some("IC-duplicate-slice"));
    assert!(!out_dir.exists());
    Ok(())
}

#[test]
fn assembly_failure_is_reported_with_its_row() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let vocab = Vocabulary::default();
    let options = PublishOptions {
        out_dir: dir.path().to_path_buf(),
        formats: vec![Format::NTriples],
    };
    let mut broken = county("Beroun", 1);
    broken.remove("population");
    let result = publish(
        &vocab,
        &presets::population::plan(&vocab),
        vec![county("Benešov", 1), broken],
        &ConstraintEngine::standard(),
        &options,
    );

    let cause = result
        .as_ref()
        .err()
        .and_then(|e| e.downcast_ref::<CubeError>())
        .cloned();
    assert_eq!(
        cause,
        Some(CubeError::MissingField {
            row_index: 1,
            field: "population".into()
        })
    );
    assert_eq!(fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn blocked_target_rolls_back_every_format() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let out_dir = dir.path().join("out");
    // A non-empty directory where the TriG file belongs makes its rename fail
    // after the N-Triples and Turtle files are already in place.
    let blocker = out_dir.join("population.trig");
    fs::create_dir_all(&blocker)?;
    fs::write(blocker.join("keep"), "x")?;
    let vocab = Vocabulary::default();
    let options = PublishOptions {
        out_dir: out_dir.clone(),
        formats: Format::ALL.to_vec(),
    };

    let result = publish(
        &vocab,
        &presets::population::plan(&vocab),
        vec![county("Benešov", 99_950)],
        &ConstraintEngine::standard(),
        &options,
    );

    assert!(result.is_err());
    let names: Vec<String> = fs::read_dir(&out_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["population.trig"]);
    assert_eq!(fs::read_dir(&blocker)?.count(), 1);
    Ok(())
}
