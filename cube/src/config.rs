//! TOML dataset configuration.
//!
//! A configuration file describes one dataset: vocabulary bases, taxonomy
//! concepts, dimensions, measures, row preparation, and optional provenance
//! and catalog sections. Compact IRIs (`xsd:string`, `ns:Population`) are
//! expanded against the configured [`Vocabulary`] when the configuration is
//! resolved into a [`CubePlan`].
//!
//! ```toml
//! [dataset]
//! id = "population"
//! labels = { cs = "Počet obyvatel okresů", en = "County population" }
//! issued = "2023-3-12"
//!
//! [[dimensions]]
//! name = "okres"
//! field = "okresCode"
//! labels = { cs = "Okres", en = "County" }
//! preferred_label = "County"
//! range = ["xsd:string"]
//! encoding = "resource"
//! vocabulary = "okresy"
//!
//! [[measures]]
//! name = "mean_population"
//! field = "population"
//! labels = { en = "Mean population" }
//! preferred_label = "Mean population"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::assemble::CubePlan;
use crate::catalog::{CatalogSpec, DistributionSpec};
use crate::error::{ConfigError, CubeError};
use crate::lookup::{Derivation, LookupChain, LookupTable};
use crate::model::{
    ConceptSpec, DatasetMetadata, DimensionSpec, Label, MeasureSpec, TaxonomyLink, ValueEncoding,
};
use crate::prepare::{CountAggregate, Preparation, RowFilter};
use crate::provenance::ProvenanceSpec;
use crate::row::FieldValue;
use crate::term::{Datatype, Iri};
use crate::vocab::{Vocabulary, VocabularyConfig};

/// Labels keyed by language tag.
pub type Labels = BTreeMap<String, String>;

/// Root of a dataset configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    /// Namespace bases.
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    /// Dataset identity and metadata.
    pub dataset: DatasetSection,
    /// Taxonomy anchors.
    #[serde(default)]
    pub concepts: Vec<ConceptConfig>,
    /// Dimensions in structure order.
    pub dimensions: Vec<DimensionConfig>,
    /// Measures in structure order.
    pub measures: Vec<MeasureConfig>,
    /// Row filters.
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
    /// Lookup tables by name.
    #[serde(default)]
    pub lookups: BTreeMap<String, LookupConfig>,
    /// Fields derived through lookup chains.
    #[serde(default)]
    pub derived: Vec<DerivedConfig>,
    /// Count aggregation.
    #[serde(default)]
    pub aggregate: Option<AggregateConfig>,
    /// PROV description.
    #[serde(default)]
    pub provenance: Option<ProvenanceConfig>,
    /// DCAT catalog record.
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
    /// Directory relative lookup files are resolved against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// `[dataset]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSection {
    /// Dataset identity.
    pub id: String,
    /// `rdfs:label` per language.
    #[serde(default)]
    pub labels: Labels,
    /// `dct:title` per language.
    #[serde(default)]
    pub titles: Labels,
    /// `dct:description`.
    #[serde(default)]
    pub description: Option<String>,
    /// `rdfs:comment`.
    #[serde(default)]
    pub comment: Option<String>,
    /// `dct:issued`, `YYYY-M-D`.
    #[serde(default)]
    pub issued: Option<String>,
    /// `dct:publisher`.
    #[serde(default)]
    pub publisher: Option<String>,
    /// `dct:subject` compact IRIs.
    #[serde(default)]
    pub subjects: Vec<String>,
    /// Also type the dataset `prov:Entity`.
    #[serde(default)]
    pub provenance_entity: bool,
}

/// `[[concepts]]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConceptConfig {
    /// Local name.
    pub name: String,
    /// Labels per language.
    #[serde(default)]
    pub labels: Labels,
}

/// How a dimension value is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingKind {
    /// Plain literal.
    #[default]
    Literal,
    /// IRI under a category vocabulary.
    Resource,
}

/// `[[dimensions]]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DimensionConfig {
    /// Local name.
    pub name: String,
    /// Row field.
    pub field: String,
    /// Labels per language.
    #[serde(default)]
    pub labels: Labels,
    /// Plain preferred label.
    pub preferred_label: String,
    /// Range compact IRIs.
    #[serde(default)]
    pub range: Vec<String>,
    /// Also type `skos:Concept`.
    #[serde(default)]
    pub concept: bool,
    /// Value encoding.
    #[serde(default)]
    pub encoding: EncodingKind,
    /// Category vocabulary prefix, for resource encoding.
    #[serde(default)]
    pub vocabulary: Option<String>,
    /// `skos:broader` targets.
    #[serde(default)]
    pub broader: Vec<String>,
    /// `skos:narrower` targets.
    #[serde(default)]
    pub narrower: Vec<String>,
    /// `skos:related` targets.
    #[serde(default)]
    pub related: Vec<String>,
}

/// `[[measures]]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeasureConfig {
    /// Local name.
    pub name: String,
    /// Row field.
    pub field: String,
    /// Labels per language.
    #[serde(default)]
    pub labels: Labels,
    /// Plain preferred label.
    pub preferred_label: String,
    /// Datatype compact IRI.
    #[serde(default = "default_measure_range")]
    pub range: String,
    /// Base measure compact IRI.
    #[serde(default = "default_base_measure")]
    pub base_measure: String,
}

fn default_measure_range() -> String {
    "xsd:integer".to_owned()
}

fn default_base_measure() -> String {
    "sdmx-measure:obsValue".to_owned()
}

/// `[[filters]]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Field to test.
    pub field: String,
    /// Required value.
    pub equals: FieldValue,
}

/// `[lookups.<name>]`: inline entries, a JSON file, or both (inline wins).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupConfig {
    /// Inline code → value entries.
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
    /// JSON object file, relative to the configuration file.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// `[[derived]]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DerivedConfig {
    /// Field holding the code.
    pub source: String,
    /// Field to write.
    pub target: String,
    /// Lookup names, applied in order.
    pub lookups: Vec<String>,
}

/// `[aggregate]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregateConfig {
    /// Grouping fields.
    pub group_by: Vec<String>,
    /// Count field.
    pub count_into: String,
}

/// `[provenance]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvenanceConfig {
    /// Person's given name.
    pub person: String,
    /// Role local name.
    pub role: String,
    /// Software name.
    pub software: String,
}

/// `[catalog]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Local name of the record.
    pub id: String,
    /// Titles per language.
    #[serde(default)]
    pub titles: Labels,
    /// Issue date.
    pub issued: String,
    /// Modification date.
    pub modified: String,
    /// Publisher name.
    pub publisher: String,
    /// Spatial coverage IRI.
    #[serde(default)]
    pub spatial: Option<String>,
    /// Keywords per language.
    #[serde(default)]
    pub keywords: BTreeMap<String, Vec<String>>,
    /// Update frequency IRI.
    #[serde(default)]
    pub periodicity: Option<String>,
    /// Theme IRIs.
    #[serde(default)]
    pub themes: Vec<String>,
    /// Distributions.
    #[serde(default)]
    pub distributions: Vec<DistributionConfig>,
}

/// `[[catalog.distributions]]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributionConfig {
    /// Local name.
    pub id: String,
    /// Titles per language.
    #[serde(default)]
    pub titles: Labels,
    /// Media type IRI.
    pub media_type: String,
    /// Access URL.
    pub access_url: String,
}

impl DatasetConfig {
    /// Parses a configuration document. Relative lookup files resolve
    /// against the working directory.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the document does not match the schema.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        debug!(path = %path.display(), dataset = %config.dataset.id, "loaded configuration");
        Ok(config)
    }

    /// The vocabulary this configuration declares.
    #[must_use]
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::new(&self.vocabulary)
    }

    /// Resolves the configuration into a build plan.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown prefix, an unsupported measure range,
    /// a resource dimension without vocabulary, or an unreadable or
    /// undefined lookup table.
    pub fn plan(&self, vocab: &Vocabulary) -> Result<CubePlan, ConfigError> {
        let expand = |curie: &str| {
            vocab
                .expand(curie)
                .ok_or_else(|| CubeError::UnknownPrefix(curie.to_owned()))
        };
        let expand_all = |curies: &[String]| {
            curies
                .iter()
                .map(|c| expand(c))
                .collect::<Result<Vec<Iri>, CubeError>>()
        };

        let concepts = self
            .concepts
            .iter()
            .map(|c| ConceptSpec {
                name: c.name.clone(),
                labels: labels(&c.labels),
            })
            .collect();

        let mut dimensions = Vec::with_capacity(self.dimensions.len());
        for d in &self.dimensions {
            let encoding = match d.encoding {
                EncodingKind::Literal => ValueEncoding::Literal,
                EncodingKind::Resource => ValueEncoding::Resource {
                    vocabulary: d
                        .vocabulary
                        .clone()
                        .ok_or_else(|| ConfigError::MissingVocabulary(d.name.clone()))?,
                },
            };
            let taxonomy = expand_all(&d.broader)?
                .into_iter()
                .map(TaxonomyLink::Broader)
                .chain(expand_all(&d.narrower)?.into_iter().map(TaxonomyLink::Narrower))
                .chain(expand_all(&d.related)?.into_iter().map(TaxonomyLink::Related))
                .collect();
            dimensions.push(DimensionSpec {
                name: d.name.clone(),
                field: d.field.clone(),
                labels: labels(&d.labels),
                preferred_label: d.preferred_label.clone(),
                range: expand_all(&d.range)?,
                taxonomy,
                concept: d.concept,
                encoding,
            });
        }

        let mut measures = Vec::with_capacity(self.measures.len());
        for m in &self.measures {
            let range_iri = expand(&m.range)?;
            let range = Datatype::from_iri(range_iri.as_str()).ok_or_else(|| {
                ConfigError::UnsupportedRange {
                    measure: m.name.clone(),
                    range: m.range.clone(),
                }
            })?;
            measures.push(MeasureSpec {
                name: m.name.clone(),
                field: m.field.clone(),
                labels: labels(&m.labels),
                preferred_label: m.preferred_label.clone(),
                range,
                base_measure: expand(&m.base_measure)?,
            });
        }

        let ds = &self.dataset;
        let metadata = DatasetMetadata {
            labels: labels(&ds.labels),
            titles: labels(&ds.titles),
            description: ds.description.clone(),
            comment: ds.comment.clone(),
            issued: ds.issued.clone(),
            publisher: ds.publisher.clone(),
            subjects: expand_all(&ds.subjects)?,
            provenance_entity: ds.provenance_entity,
        };

        let catalog = match &self.catalog {
            Some(c) => Some(CatalogSpec {
                id: c.id.clone(),
                titles: labels(&c.titles),
                issued: c.issued.clone(),
                modified: c.modified.clone(),
                publisher: c.publisher.clone(),
                spatial: c.spatial.as_deref().map(expand).transpose()?,
                keywords: c
                    .keywords
                    .iter()
                    .flat_map(|(lang, words)| words.iter().map(move |w| Label::new(w.clone(), lang.clone())))
                    .collect(),
                periodicity: c.periodicity.as_deref().map(expand).transpose()?,
                themes: expand_all(&c.themes)?,
                distributions: c
                    .distributions
                    .iter()
                    .map(|d| {
                        Ok(DistributionSpec {
                            id: d.id.clone(),
                            titles: labels(&d.titles),
                            media_type: expand(&d.media_type)?,
                            access_url: expand(&d.access_url)?,
                        })
                    })
                    .collect::<Result<Vec<_>, CubeError>>()?,
            }),
            None => None,
        };

        Ok(CubePlan {
            dataset_id: ds.id.clone(),
            concepts,
            dimensions,
            measures,
            metadata,
            preparation: self.preparation()?,
            provenance: self.provenance.as_ref().map(|p| ProvenanceSpec {
                person: p.person.clone(),
                role: p.role.clone(),
                software: p.software.clone(),
            }),
            catalog,
        })
    }

    fn preparation(&self) -> Result<Preparation, ConfigError> {
        let mut tables = BTreeMap::new();
        for (name, lookup) in &self.lookups {
            tables.insert(name.as_str(), self.lookup_table(name, lookup)?);
        }
        let derivations = self
            .derived
            .iter()
            .map(|d| {
                let stages = d
                    .lookups
                    .iter()
                    .map(|name| {
                        tables.get(name.as_str()).cloned().ok_or_else(|| ConfigError::UnknownLookup {
                            target: d.target.clone(),
                            lookup: name.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Derivation {
                    source: d.source.clone(),
                    target: d.target.clone(),
                    chain: LookupChain::new(stages),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Preparation {
            filters: self
                .filters
                .iter()
                .map(|f| RowFilter {
                    field: f.field.clone(),
                    equals: f.equals.to_string(),
                })
                .collect(),
            derivations,
            aggregate: self.aggregate.as_ref().map(|a| CountAggregate {
                group_by: a.group_by.clone(),
                count_into: a.count_into.clone(),
            }),
        })
    }

    fn lookup_table(&self, name: &str, lookup: &LookupConfig) -> Result<LookupTable, ConfigError> {
        let mut entries = BTreeMap::new();
        if let Some(file) = &lookup.file {
            let path = match &self.base_dir {
                Some(dir) if file.is_relative() => dir.join(file),
                _ => file.clone(),
            };
            let source = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            let values: BTreeMap<String, FieldValue> = serde_json::from_str(&source)
                .map_err(|source| ConfigError::LookupFile { path, source })?;
            entries.extend(values.into_iter().filter_map(|(k, v)| v.as_text().map(|v| (k, v))));
        } else if lookup.entries.is_empty() {
            return Err(ConfigError::EmptyLookup(name.to_owned()));
        }
        entries.extend(lookup.entries.clone());
        Ok(LookupTable::new(name, entries))
    }
}

fn labels(map: &Labels) -> Vec<Label> {
    map.iter()
        .map(|(language, text)| Label::new(text.clone(), language.clone()))
        .collect()
}
