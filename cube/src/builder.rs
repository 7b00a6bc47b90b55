//! RDF Data Cube assembly.
//!
//! A [`CubeBuilder`] owns the [`Graph`] of one dataset build. Declarations
//! are emitted in dependency order (concepts, dimensions, measures,
//! structure, dataset) and observations last, one per input row, in input
//! order.
//!
//! Observation emission is atomic per row: every value is validated and
//! converted before the first triple of the row is added, so a failing row
//! leaves the graph exactly as it was.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::address;
use crate::error::{CubeError, Result};
use crate::graph::Graph;
use crate::model::{
    Component, ComponentRole, ConceptSpec, DataStructureDefinition, Dataset, DatasetMetadata,
    DimensionProperty, DimensionSpec, Label, MeasureProperty, MeasureSpec, Observation,
    TaxonomyLink, ValueEncoding,
};
use crate::row::Row;
use crate::term::{Datatype, Iri, Literal, Term};
use crate::vocab::iris::*;
use crate::vocab::Vocabulary;

/// Accumulates the graph of one dataset.
#[derive(Debug)]
pub struct CubeBuilder<'v> {
    vocab: &'v Vocabulary,
    dataset_id: String,
    graph: Graph,
    concepts: BTreeMap<String, ConceptSpec>,
    dimensions: BTreeMap<String, DimensionSpec>,
    measures: BTreeMap<String, MeasureSpec>,
}

impl<'v> CubeBuilder<'v> {
    /// Starts a build for `dataset_id`, binding every vocabulary prefix on
    /// the new graph.
    pub fn new(vocab: &'v Vocabulary, dataset_id: impl Into<String>) -> Self {
        let mut graph = Graph::new();
        for ns in vocab.bindings() {
            graph.bind_namespace(&ns.prefix, &ns.base);
        }
        Self {
            vocab,
            dataset_id: dataset_id.into(),
            graph,
            concepts: BTreeMap::new(),
            dimensions: BTreeMap::new(),
            measures: BTreeMap::new(),
        }
    }

    /// The vocabulary this build uses.
    #[must_use]
    pub fn vocabulary(&self) -> &'v Vocabulary {
        self.vocab
    }

    /// The dataset identity.
    #[must_use]
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// The graph built so far.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access for collaborators that add side facts (provenance,
    /// catalog records).
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Finishes the build.
    #[must_use]
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Declares a free-standing SKOS concept.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::ConflictingDeclaration`] if `name` was declared
    /// before with different labels.
    pub fn declare_concept(&mut self, spec: ConceptSpec) -> Result<Iri> {
        let iri = self.vocab.ontology().term(&spec.name);
        if let Some(existing) = self.concepts.get(&spec.name) {
            return if existing == &spec {
                Ok(iri)
            } else {
                Err(CubeError::ConflictingDeclaration { name: spec.name })
            };
        }
        self.graph.add(&iri, RDF_TYPE, Iri::new(SKOS_CONCEPT));
        self.add_labels(&iri, RDFS_LABEL, &spec.labels);
        debug!(concept = %spec.name, "declared concept");
        self.concepts.insert(spec.name.clone(), spec);
        Ok(iri)
    }

    /// Declares a dimension property.
    ///
    /// Re-declaring an identical definition returns the same handle and adds
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::ConflictingDeclaration`] for a divergent
    /// re-declaration, or [`CubeError::UnknownVocabulary`] if the resource
    /// encoding names an unregistered vocabulary.
    pub fn declare_dimension(&mut self, spec: DimensionSpec) -> Result<DimensionProperty> {
        let iri = self.vocab.ontology().term(&spec.name);
        if let Some(existing) = self.dimensions.get(&spec.name) {
            return if existing == &spec {
                Ok(DimensionProperty { iri, spec })
            } else {
                Err(CubeError::ConflictingDeclaration { name: spec.name })
            };
        }
        if self.measures.contains_key(&spec.name) {
            return Err(CubeError::ConflictingDeclaration { name: spec.name });
        }
        if let ValueEncoding::Resource { vocabulary } = &spec.encoding {
            if self.vocab.category(vocabulary).is_none() {
                return Err(CubeError::UnknownVocabulary {
                    dimension: spec.name.clone(),
                    vocabulary: vocabulary.clone(),
                });
            }
        }

        self.graph.add(&iri, RDF_TYPE, Iri::new(RDF_PROPERTY));
        self.graph.add(&iri, RDF_TYPE, Iri::new(QB_DIMENSION_PROPERTY));
        if spec.concept {
            self.graph.add(&iri, RDF_TYPE, Iri::new(SKOS_CONCEPT));
        }
        self.add_labels(&iri, RDFS_LABEL, &spec.labels);
        self.graph
            .add(&iri, SKOS_PREF_LABEL, Literal::plain(spec.preferred_label.clone()));
        for range in &spec.range {
            self.graph.add(&iri, RDFS_RANGE, range.clone());
        }
        for link in &spec.taxonomy {
            self.add_taxonomy_link(&iri, link);
        }

        debug!(dimension = %spec.name, encoding = ?spec.encoding, "declared dimension");
        self.dimensions.insert(spec.name.clone(), spec.clone());
        Ok(DimensionProperty { iri, spec })
    }

    /// Declares a measure property.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::ConflictingDeclaration`] for a divergent
    /// re-declaration or a name already used by a dimension.
    pub fn declare_measure(&mut self, spec: MeasureSpec) -> Result<MeasureProperty> {
        let iri = self.vocab.ontology().term(&spec.name);
        if let Some(existing) = self.measures.get(&spec.name) {
            return if existing == &spec {
                Ok(MeasureProperty { iri, spec })
            } else {
                Err(CubeError::ConflictingDeclaration { name: spec.name })
            };
        }
        if self.dimensions.contains_key(&spec.name) {
            return Err(CubeError::ConflictingDeclaration { name: spec.name });
        }

        self.graph.add(&iri, RDF_TYPE, Iri::new(RDF_PROPERTY));
        self.graph.add(&iri, RDF_TYPE, Iri::new(QB_MEASURE_PROPERTY));
        self.add_labels(&iri, RDFS_LABEL, &spec.labels);
        self.graph
            .add(&iri, SKOS_PREF_LABEL, Literal::plain(spec.preferred_label.clone()));
        self.graph.add(&iri, RDFS_RANGE, Iri::new(spec.range.iri()));
        self.graph
            .add(&iri, RDFS_SUB_PROPERTY_OF, spec.base_measure.clone());

        debug!(measure = %spec.name, "declared measure");
        self.measures.insert(spec.name.clone(), spec.clone());
        Ok(MeasureProperty { iri, spec })
    }

    /// Declares the structure of this dataset: one fresh component per
    /// dimension and per measure.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::NoMeasure`] if `measures` is empty.
    pub fn declare_structure(
        &mut self,
        dimensions: &[DimensionProperty],
        measures: &[MeasureProperty],
    ) -> Result<DataStructureDefinition> {
        if measures.is_empty() {
            return Err(CubeError::NoMeasure);
        }
        let iri = address::structure_iri(self.vocab, &self.dataset_id)?;
        self.graph
            .add(&iri, RDF_TYPE, Iri::new(QB_DATA_STRUCTURE_DEFINITION));

        let bindings = dimensions
            .iter()
            .map(|d| (&d.iri, ComponentRole::Dimension))
            .chain(measures.iter().map(|m| (&m.iri, ComponentRole::Measure)));
        let mut components = Vec::with_capacity(dimensions.len() + measures.len());
        for (property, role) in bindings {
            let node = self.graph.new_blank_node();
            let role_predicate = match role {
                ComponentRole::Dimension => QB_DIMENSION,
                ComponentRole::Measure => QB_MEASURE,
            };
            self.graph.add(&iri, QB_COMPONENT, node);
            self.graph.add(node, role_predicate, property.clone());
            self.graph.add(node, QB_COMPONENT_PROPERTY, property.clone());
            components.push(Component {
                node,
                property: property.clone(),
                role,
            });
        }

        debug!(
            structure = %iri.as_str(),
            dimensions = dimensions.len(),
            measures = measures.len(),
            "declared structure"
        );
        Ok(DataStructureDefinition {
            iri,
            dimensions: dimensions.to_vec(),
            measures: measures.to_vec(),
            components,
        })
    }

    /// Declares the dataset node.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidDate`] if `metadata.issued` is not a
    /// year-month-day date.
    pub fn declare_dataset(
        &mut self,
        structure: &DataStructureDefinition,
        metadata: &DatasetMetadata,
    ) -> Result<Dataset> {
        let iri = address::dataset_iri(self.vocab, &self.dataset_id)?;
        let issued = metadata.issued.as_deref().map(normalize_date).transpose()?;

        self.graph.add(&iri, RDF_TYPE, Iri::new(QB_DATA_SET));
        if metadata.provenance_entity {
            self.graph.add(&iri, RDF_TYPE, Iri::new(PROV_ENTITY));
        }
        self.add_labels(&iri, RDFS_LABEL, &metadata.labels);
        self.add_labels(&iri, DCT_TITLE, &metadata.titles);
        self.graph.add(&iri, QB_STRUCTURE, structure.iri.clone());
        if let Some(description) = &metadata.description {
            self.graph
                .add(&iri, DCT_DESCRIPTION, Literal::plain(description.clone()));
        }
        if let Some(comment) = &metadata.comment {
            self.graph.add(&iri, RDFS_COMMENT, Literal::plain(comment.clone()));
        }
        if let Some(issued) = issued {
            self.graph
                .add(&iri, DCT_ISSUED, Literal::typed(issued, Datatype::Date));
        }
        if let Some(publisher) = &metadata.publisher {
            self.graph
                .add(&iri, DCT_PUBLISHER, Literal::plain(publisher.clone()));
        }
        for subject in &metadata.subjects {
            self.graph.add(&iri, DCT_SUBJECT, subject.clone());
        }

        info!(dataset = %iri.as_str(), "declared dataset");
        Ok(Dataset {
            iri,
            structure: structure.clone(),
        })
    }

    /// Emits one observation per row, in input order.
    ///
    /// Stops at the first failing row; observations of earlier rows stay in
    /// the graph, the failing row contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::MissingField`] or [`CubeError::InvalidValue`] for
    /// the first row that cannot be represented.
    pub fn build_observations(&mut self, dataset: &Dataset, rows: &[Row]) -> Result<Vec<Observation>> {
        let mut observations = Vec::with_capacity(rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            observations.push(self.build_observation(dataset, row_index, row)?);
        }
        info!(
            dataset = %dataset.iri.as_str(),
            observations = observations.len(),
            triples = self.graph.len(),
            "built observations"
        );
        Ok(observations)
    }

    /// Emits the observation of a single row.
    ///
    /// # Errors
    ///
    /// See [`CubeBuilder::build_observations`].
    pub fn build_observation(
        &mut self,
        dataset: &Dataset,
        row_index: usize,
        row: &Row,
    ) -> Result<Observation> {
        let values = self.row_values(dataset, row_index, row)?;
        let iri = address::observation_iri(self.vocab, &self.dataset_id, row_index)?;

        self.graph.add(&iri, RDF_TYPE, Iri::new(QB_OBSERVATION));
        self.graph.add(&iri, QB_DATASET_PROP, dataset.iri.clone());
        for (property, value) in &values {
            self.graph.add(&iri, property.clone(), value.clone());
        }

        Ok(Observation {
            iri,
            row_index,
            values,
        })
    }

    /// Validates and converts every declared value of `row` without touching
    /// the graph.
    fn row_values(&self, dataset: &Dataset, row_index: usize, row: &Row) -> Result<Vec<(Iri, Term)>> {
        let structure = &dataset.structure;
        let mut values = Vec::with_capacity(structure.arity());

        for dimension in &structure.dimensions {
            let field = &dimension.spec.field;
            let text = row
                .get(field)
                .and_then(|v| v.as_text())
                .ok_or_else(|| CubeError::MissingField {
                    row_index,
                    field: field.clone(),
                })?;
            let term = match &dimension.spec.encoding {
                ValueEncoding::Literal => Term::Literal(Literal::plain(text)),
                ValueEncoding::Resource { vocabulary } => {
                    let ns = self.vocab.category(vocabulary).ok_or_else(|| {
                        CubeError::UnknownVocabulary {
                            dimension: dimension.spec.name.clone(),
                            vocabulary: vocabulary.clone(),
                        }
                    })?;
                    Term::Iri(address::code_iri(ns, &text)?)
                }
            };
            values.push((dimension.iri.clone(), term));
        }

        for measure in &structure.measures {
            let field = &measure.spec.field;
            let value = row
                .get(field)
                .filter(|v| !v.is_missing())
                .ok_or_else(|| CubeError::MissingField {
                    row_index,
                    field: field.clone(),
                })?;
            let invalid = |expected| CubeError::InvalidValue {
                row_index,
                field: field.clone(),
                value: value.to_string(),
                expected,
            };
            let literal = match measure.spec.range {
                Datatype::Integer => {
                    Literal::integer(value.as_integer().ok_or_else(|| invalid("integer"))?)
                }
                Datatype::Decimal => Literal::typed(
                    value
                        .as_decimal()
                        .ok_or_else(|| invalid("decimal"))?
                        .to_string(),
                    Datatype::Decimal,
                ),
                Datatype::Date => {
                    let text = value.as_text().ok_or_else(|| invalid("date"))?;
                    Literal::typed(
                        normalize_date(&text).map_err(|_| invalid("date"))?,
                        Datatype::Date,
                    )
                }
                Datatype::String => {
                    Literal::typed(value.as_text().ok_or_else(|| invalid("string"))?, Datatype::String)
                }
            };
            values.push((measure.iri.clone(), Term::Literal(literal)));
        }

        Ok(values)
    }

    fn add_labels(&mut self, iri: &Iri, predicate: &str, labels: &[Label]) {
        for label in labels {
            self.graph.add(
                iri,
                predicate,
                Literal::lang(label.text.clone(), label.language.clone()),
            );
        }
    }

    fn add_taxonomy_link(&mut self, iri: &Iri, link: &TaxonomyLink) {
        match link {
            TaxonomyLink::Broader(target) => {
                self.graph.add(iri, SKOS_BROADER, target.clone());
                self.graph.add(target, SKOS_NARROWER, iri.clone());
            }
            TaxonomyLink::Narrower(target) => {
                self.graph.add(iri, SKOS_NARROWER, target.clone());
                self.graph.add(target, SKOS_BROADER, iri.clone());
            }
            TaxonomyLink::Related(target) => {
                self.graph.add(iri, SKOS_RELATED, target.clone());
            }
        }
    }
}

/// Normalizes a `YYYY-M-D` date to ISO 8601 `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns [`CubeError::InvalidDate`] if `value` is not a calendar date.
pub fn normalize_date(value: &str) -> Result<String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| CubeError::InvalidDate(value.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::{row, FieldValue};

    fn county(encoding: ValueEncoding) -> DimensionSpec {
        DimensionSpec {
            name: "okres".into(),
            field: "okresCode".into(),
            labels: vec![Label::new("Okres", "cs"), Label::new("County", "en")],
            preferred_label: "County".into(),
            range: vec![Iri::new(XSD_STRING)],
            taxonomy: vec![],
            concept: false,
            encoding,
        }
    }

    fn population() -> MeasureSpec {
        MeasureSpec {
            name: "mean_population".into(),
            field: "population".into(),
            labels: vec![Label::new("Mean population", "en")],
            preferred_label: "Mean population".into(),
            range: Datatype::Integer,
            base_measure: Iri::new(SDMX_OBS_VALUE),
        }
    }

    fn dataset(b: &mut CubeBuilder<'_>, encoding: ValueEncoding) -> Result<Dataset> {
        let d = b.declare_dimension(county(encoding))?;
        let m = b.declare_measure(population())?;
        let s = b.declare_structure(&[d], &[m])?;
        b.declare_dataset(&s, &DatasetMetadata::default())
    }

    #[test]
    fn identical_redeclaration_is_a_noop() {
        let vocab = Vocabulary::default();
        let mut b = CubeBuilder::new(&vocab, "population");
        let first = b.declare_dimension(county(ValueEncoding::Literal));
        let before = b.graph().len();
        let second = b.declare_dimension(county(ValueEncoding::Literal));
        assert_eq!(first, second);
        assert_eq!(b.graph().len(), before);
    }

    #[test]
    fn divergent_redeclaration_fails() {
        let vocab = Vocabulary::default();
        let mut b = CubeBuilder::new(&vocab, "population");
        assert!(b.declare_dimension(county(ValueEncoding::Literal)).is_ok());
        let mut other = county(ValueEncoding::Literal);
        other.preferred_label = "District".into();
        assert_eq!(
            b.declare_dimension(other),
            Err(CubeError::ConflictingDeclaration { name: "okres".into() })
        );
    }

    #[test]
    fn unknown_category_vocabulary_is_rejected() {
        let vocab = Vocabulary::default();
        let mut b = CubeBuilder::new(&vocab, "population");
        let spec = county(ValueEncoding::Resource {
            vocabulary: "obce".into(),
        });
        assert!(matches!(
            b.declare_dimension(spec),
            Err(CubeError::UnknownVocabulary { .. })
        ));
    }

    #[test]
    fn structure_requires_a_measure() {
        let vocab = Vocabulary::default();
        let mut b = CubeBuilder::new(&vocab, "population");
        assert_eq!(b.declare_structure(&[], &[]), Err(CubeError::NoMeasure));
    }

    #[test]
    fn components_are_fresh_per_property() {
        let vocab = Vocabulary::default();
        let mut b = CubeBuilder::new(&vocab, "population");
        let ds = dataset(&mut b, ValueEncoding::Literal);
        let components = ds.map(|d| d.structure.components).unwrap_or_default();
        assert_eq!(components.len(), 2);
        assert_ne!(components[0].node, components[1].node);
        assert_eq!(components[0].role, ComponentRole::Dimension);
        assert_eq!(components[1].role, ComponentRole::Measure);
    }

    #[test]
    fn resource_encoding_mints_category_iris() -> Result<()> {
        let vocab = Vocabulary::default();
        let mut b = CubeBuilder::new(&vocab, "population");
        let ds = dataset(
            &mut b,
            ValueEncoding::Resource {
                vocabulary: "okresy".into(),
            },
        )?;
        let r = row([
            ("okresCode", FieldValue::from("Praha východ")),
            ("population", FieldValue::Integer(191_000)),
        ]);
        let values = b.build_observation(&ds, 0, &r)?.values;
        assert_eq!(
            values[0].1,
            Term::Iri(Iri::new("https://example.org/okresy/Praha_v%C3%BDchod"))
        );
        assert_eq!(values[1].1, Term::Literal(Literal::integer(191_000)));
        Ok(())
    }

    #[test]
    fn non_numeric_measure_is_invalid() -> Result<()> {
        let vocab = Vocabulary::default();
        let mut b = CubeBuilder::new(&vocab, "population");
        let ds = dataset(&mut b, ValueEncoding::Literal)?;
        let before = b.graph().clone();
        let r = row([("okresCode", "Benešov"), ("population", "many")]);
        assert!(matches!(
            b.build_observation(&ds, 4, &r),
            Err(CubeError::InvalidValue { row_index: 4, .. })
        ));
        assert_eq!(b.graph(), &before);
        Ok(())
    }

    #[test]
    fn integers_beyond_i64_are_invalid() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let vocab = Vocabulary::default();
        let mut b = CubeBuilder::new(&vocab, "population");
        let ds = dataset(&mut b, ValueEncoding::Literal)?;
        let before = b.graph().clone();
        let rows = crate::row::parse_rows(
            r#"[{"okresCode": "Benešov", "population": 18446744073709551615},
                {"okresCode": "Beroun", "population": 1e30}]"#,
        )?;
        assert!(matches!(rows[0]["population"], FieldValue::Float(_)));
        for (i, r) in rows.iter().enumerate() {
            assert!(matches!(
                b.build_observation(&ds, i, r),
                Err(CubeError::InvalidValue { ref field, expected: "integer", .. }) if field == "population"
            ));
        }
        assert_eq!(b.graph(), &before);
        Ok(())
    }

    #[test]
    fn dates_are_normalized_to_iso() {
        assert_eq!(normalize_date("2023-3-12").as_deref(), Ok("2023-03-12"));
        assert_eq!(normalize_date("2023-05-08").as_deref(), Ok("2023-05-08"));
        assert!(normalize_date("12.3.2023").is_err());
        assert!(normalize_date("2023-2-30").is_err());
    }
}
