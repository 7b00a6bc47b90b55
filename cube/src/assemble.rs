//! One-call cube assembly from a resolved plan and raw rows.

use tracing::info;

use crate::builder::CubeBuilder;
use crate::catalog::{self, CatalogSpec};
use crate::error::Result;
use crate::graph::Graph;
use crate::model::{ConceptSpec, Dataset, DatasetMetadata, DimensionSpec, MeasureSpec, Observation};
use crate::prepare::Preparation;
use crate::provenance::{self, ProvenanceSpec};
use crate::row::Row;
use crate::term::Iri;
use crate::vocab::Vocabulary;

/// Everything needed to build one dataset, with every compact IRI already
/// expanded.
#[derive(Debug, Clone)]
pub struct CubePlan {
    /// Dataset identity; scopes the structure and observation IRIs.
    pub dataset_id: String,
    /// Taxonomy anchors, declared before any dimension.
    pub concepts: Vec<ConceptSpec>,
    /// Dimensions in structure order.
    pub dimensions: Vec<DimensionSpec>,
    /// Measures in structure order.
    pub measures: Vec<MeasureSpec>,
    /// Dataset node metadata.
    pub metadata: DatasetMetadata,
    /// Row selection, derivation, and aggregation.
    pub preparation: Preparation,
    /// Optional PROV description.
    pub provenance: Option<ProvenanceSpec>,
    /// Optional DCAT catalog record.
    pub catalog: Option<CatalogSpec>,
}

/// A finished, not yet validated, cube.
#[derive(Debug, Clone)]
pub struct Cube {
    /// The assembled graph.
    pub graph: Graph,
    /// The dataset handle.
    pub dataset: Dataset,
    /// Observations in row order.
    pub observations: Vec<Observation>,
    /// The catalog record, when the plan has one.
    pub catalog: Option<Iri>,
}

/// Prepares `rows` and builds the whole cube.
///
/// # Errors
///
/// Returns the first preparation, declaration, or observation error. No
/// partial cube is returned.
pub fn assemble(vocab: &Vocabulary, plan: &CubePlan, rows: Vec<Row>) -> Result<Cube> {
    let rows = plan.preparation.apply(rows)?;
    let mut builder = CubeBuilder::new(vocab, plan.dataset_id.clone());

    for concept in &plan.concepts {
        builder.declare_concept(concept.clone())?;
    }
    let dimensions = plan
        .dimensions
        .iter()
        .map(|d| builder.declare_dimension(d.clone()))
        .collect::<Result<Vec<_>>>()?;
    let measures = plan
        .measures
        .iter()
        .map(|m| builder.declare_measure(m.clone()))
        .collect::<Result<Vec<_>>>()?;
    let structure = builder.declare_structure(&dimensions, &measures)?;
    let dataset = builder.declare_dataset(&structure, &plan.metadata)?;
    let observations = builder.build_observations(&dataset, &rows)?;

    if let Some(spec) = &plan.provenance {
        provenance::add_provenance(builder.graph_mut(), vocab, &plan.dataset_id, &dataset.iri, spec)?;
    }
    let catalog = plan
        .catalog
        .as_ref()
        .map(|spec| catalog::describe(builder.graph_mut(), vocab, spec))
        .transpose()?;

    let graph = builder.into_graph();
    info!(
        dataset = %plan.dataset_id,
        observations = observations.len(),
        triples = graph.len(),
        "assembled cube"
    );
    Ok(Cube {
        graph,
        dataset,
        observations,
        catalog,
    })
}
