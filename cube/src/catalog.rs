//! DCAT catalog record for a published dataset.
//!
//! The record describes the dataset as a catalog entry (title, keywords,
//! themes, spatial coverage, update frequency) and its downloadable
//! distribution. The publisher is an anonymous `foaf:Person`.

use crate::address;
use crate::builder::normalize_date;
use crate::error::Result;
use crate::graph::Graph;
use crate::model::Label;
use crate::term::{Datatype, Iri, Literal};
use crate::vocab::iris::*;
use crate::vocab::Vocabulary;

/// A downloadable representation of the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionSpec {
    /// Local name of the distribution resource.
    pub id: String,
    /// Titles per language.
    pub titles: Vec<Label>,
    /// Media type IRI (EU file-type authority).
    pub media_type: Iri,
    /// Where the file can be fetched.
    pub access_url: Iri,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSpec {
    /// Local name of the catalog dataset resource.
    pub id: String,
    /// Titles per language (also emitted as `rdfs:label`).
    pub titles: Vec<Label>,
    /// Issue date, `YYYY-M-D`.
    pub issued: String,
    /// Modification date, `YYYY-M-D`.
    pub modified: String,
    /// Name of the publishing person.
    pub publisher: String,
    /// Spatial coverage (EU country authority IRI).
    pub spatial: Option<Iri>,
    /// Keywords per language.
    pub keywords: Vec<Label>,
    /// Update frequency (EU frequency authority IRI).
    pub periodicity: Option<Iri>,
    /// Themes (EuroVoc IRIs).
    pub themes: Vec<Iri>,
    /// Distributions.
    pub distributions: Vec<DistributionSpec>,
}

/// Adds the catalog record to `graph` and returns its IRI.
///
/// # Errors
///
/// Returns an error for an empty id or an unparsable date.
pub fn describe(graph: &mut Graph, vocab: &Vocabulary, spec: &CatalogSpec) -> Result<Iri> {
    let dataset = vocab.resources().term(&address::encode_label(&spec.id)?);
    let issued = normalize_date(&spec.issued)?;
    let modified = normalize_date(&spec.modified)?;

    let publisher = graph.new_blank_node();
    graph.add(publisher, RDF_TYPE, Iri::new(FOAF_PERSON));
    graph.add(publisher, FOAF_NAME, Literal::plain(spec.publisher.clone()));

    graph.add(&dataset, RDF_TYPE, Iri::new(DCAT_DATASET));
    for title in &spec.titles {
        let literal = Literal::lang(title.text.clone(), title.language.clone());
        graph.add(&dataset, DCT_TITLE, literal.clone());
        graph.add(&dataset, RDFS_LABEL, literal);
    }
    graph.add(&dataset, DCT_ISSUED, Literal::typed(issued, Datatype::Date));
    graph.add(&dataset, DCT_MODIFIED, Literal::typed(modified, Datatype::Date));
    graph.add(&dataset, DCT_PUBLISHER, publisher);
    graph.add(&dataset, DCT_CREATOR, publisher);
    if let Some(spatial) = &spec.spatial {
        graph.add(&dataset, DCT_SPATIAL, spatial.clone());
    }
    for keyword in &spec.keywords {
        graph.add(
            &dataset,
            DCAT_KEYWORD,
            Literal::lang(keyword.text.clone(), keyword.language.clone()),
        );
    }
    if let Some(periodicity) = &spec.periodicity {
        graph.add(&dataset, DCT_ACCRUAL_PERIODICITY, periodicity.clone());
    }
    for theme in &spec.themes {
        graph.add(&dataset, DCAT_THEME, theme.clone());
    }

    for dist in &spec.distributions {
        let iri = vocab.resources().term(&address::encode_label(&dist.id)?);
        graph.add(&dataset, DCAT_DISTRIBUTION, iri.clone());
        graph.add(&iri, RDF_TYPE, Iri::new(DCAT_DISTRIBUTION_CLASS));
        graph.add(&iri, DCAT_MEDIA_TYPE, dist.media_type.clone());
        graph.add(&iri, DCAT_ACCESS_URL, dist.access_url.clone());
        for title in &dist.titles {
            graph.add(&iri, DCT_TITLE, Literal::lang(title.text.clone(), title.language.clone()));
        }
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;

    fn spec() -> CatalogSpec {
        CatalogSpec {
            id: "populationDataset".into(),
            titles: vec![Label::new("Population dataset", "en")],
            issued: "2023-5-08".into(),
            modified: "2023-5-08".into(),
            publisher: "Tomas Zasadil".into(),
            spatial: Some(Iri::new(
                "https://publications.europa.eu/resource/authority/country/CZE",
            )),
            keywords: vec![Label::new("population", "en")],
            periodicity: None,
            themes: vec![Iri::new("http://eurovoc.europa.eu/5860")],
            distributions: vec![DistributionSpec {
                id: "populationDatasetRDF".into(),
                titles: vec![],
                media_type: Iri::new(
                    "http://publications.europa.eu/resource/authority/file-type/RDF_TRIG",
                ),
                access_url: Iri::new("https://example.org/files/population.trig"),
            }],
        }
    }

    #[test]
    fn publisher_and_creator_share_one_blank_node() -> Result<()> {
        let vocab = Vocabulary::default();
        let mut g = Graph::new();
        let dataset = describe(&mut g, &vocab, &spec())?;
        let subject = Term::Iri(dataset);
        let publisher: Vec<_> = g.objects(&subject, DCT_PUBLISHER).cloned().collect();
        let creator: Vec<_> = g.objects(&subject, DCT_CREATOR).cloned().collect();
        assert_eq!(publisher.len(), 1);
        assert_eq!(publisher, creator);
        assert!(publisher[0].as_blank().is_some());
        Ok(())
    }

    #[test]
    fn dates_are_normalized() -> Result<()> {
        let vocab = Vocabulary::default();
        let mut g = Graph::new();
        let dataset = describe(&mut g, &vocab, &spec())?;
        let issued: Vec<_> = g.objects(&Term::Iri(dataset), DCT_ISSUED).collect();
        assert_eq!(
            issued,
            vec![&Term::Literal(Literal::typed("2023-05-08", Datatype::Date))]
        );
        Ok(())
    }
}
