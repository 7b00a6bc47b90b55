//! Row preparation ahead of observation emission.
//!
//! Raw statistical exports carry more rows and rawer codes than a cube
//! wants. A [`Preparation`] selects rows by exact field value, derives
//! fields through lookup chains, and optionally collapses rows into counts
//! per group.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{CubeError, Result};
use crate::lookup::Derivation;
use crate::row::{FieldValue, Row};

/// Keeps rows whose `field` has exactly the text `equals`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFilter {
    /// Field to test.
    pub field: String,
    /// Required value, compared as trimmed text.
    pub equals: String,
}

impl RowFilter {
    /// True when `row` passes.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        row.get(&self.field)
            .and_then(FieldValue::as_text)
            .is_some_and(|v| v.trim() == self.equals)
    }
}

/// Replaces rows with one row per distinct `group_by` tuple, carrying the
/// number of source rows in `count_into`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountAggregate {
    /// Grouping fields.
    pub group_by: Vec<String>,
    /// Field receiving the count.
    pub count_into: String,
}

impl CountAggregate {
    /// Groups `rows`. Output is sorted by group key.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::MissingField`] if a row lacks a grouping field.
    pub fn apply(&self, rows: &[Row]) -> Result<Vec<Row>> {
        let mut groups: BTreeMap<Vec<String>, i64> = BTreeMap::new();
        for (row_index, row) in rows.iter().enumerate() {
            let key = self
                .group_by
                .iter()
                .map(|field| {
                    row.get(field)
                        .and_then(FieldValue::as_text)
                        .ok_or_else(|| CubeError::MissingField {
                            row_index,
                            field: field.clone(),
                        })
                })
                .collect::<Result<Vec<_>>>()?;
            *groups.entry(key).or_default() += 1;
        }
        Ok(groups
            .into_iter()
            .map(|(key, count)| {
                let mut out: Row = self
                    .group_by
                    .iter()
                    .cloned()
                    .zip(key.into_iter().map(FieldValue::Text))
                    .collect();
                out.insert(self.count_into.clone(), FieldValue::Integer(count));
                out
            })
            .collect())
    }
}

/// Filter, derive, aggregate: in that order.
#[derive(Debug, Clone, Default)]
pub struct Preparation {
    /// All must match for a row to be kept.
    pub filters: Vec<RowFilter>,
    /// Applied in order, after filtering.
    pub derivations: Vec<Derivation>,
    /// Applied last.
    pub aggregate: Option<CountAggregate>,
}

impl Preparation {
    /// True when applying this preparation returns its input unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.filters.is_empty() && self.derivations.is_empty() && self.aggregate.is_none()
    }

    /// Prepares `rows`.
    ///
    /// # Errors
    ///
    /// Propagates the first derivation or aggregation failure.
    pub fn apply(&self, mut rows: Vec<Row>) -> Result<Vec<Row>> {
        let input = rows.len();
        rows.retain(|row| self.filters.iter().all(|f| f.matches(row)));
        for derivation in &self.derivations {
            derivation.apply(&mut rows)?;
        }
        if let Some(aggregate) = &self.aggregate {
            rows = aggregate.apply(&rows)?;
        }
        debug!(input, output = rows.len(), "prepared rows");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{LookupChain, LookupTable};
    use crate::row::row;

    fn demographics() -> Vec<Row> {
        vec![
            row([("vuk", FieldValue::from("DEM0004")), ("vuzemi_cis", FieldValue::Integer(101)), ("vuzemi_kod", FieldValue::Integer(3201))]),
            row([("vuk", FieldValue::from("DEM0001")), ("vuzemi_cis", FieldValue::Integer(101)), ("vuzemi_kod", FieldValue::Integer(3201))]),
            row([("vuk", FieldValue::from("DEM0004")), ("vuzemi_cis", FieldValue::Integer(100)), ("vuzemi_kod", FieldValue::Integer(3018))]),
        ]
    }

    #[test]
    fn filters_compare_as_text() {
        let prep = Preparation {
            filters: vec![
                RowFilter { field: "vuk".into(), equals: "DEM0004".into() },
                RowFilter { field: "vuzemi_cis".into(), equals: "101".into() },
            ],
            ..Preparation::default()
        };
        let rows = prep.apply(demographics()).unwrap_or_default();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["vuzemi_kod"], FieldValue::Integer(3201));
    }

    #[test]
    fn derivations_run_after_filters() {
        let prep = Preparation {
            filters: vec![RowFilter { field: "vuzemi_cis".into(), equals: "101".into() }],
            derivations: vec![Derivation {
                source: "vuzemi_kod".into(),
                target: "okresCode".into(),
                chain: LookupChain::new(vec![LookupTable::new("okresy", [("3201", "Benešov")])]),
            }],
            aggregate: None,
        };
        // 3018 would miss the table; it is filtered out first.
        let rows = prep.apply(demographics()).unwrap_or_default();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r["okresCode"] == FieldValue::from("Benešov")));
    }

    #[test]
    fn aggregate_counts_per_group_in_key_order() {
        let agg = CountAggregate {
            group_by: vec!["OkresCode".into(), "DruhZarizeni".into()],
            count_into: "Count".into(),
        };
        let rows = vec![
            row([("OkresCode", "CZ0201"), ("DruhZarizeni", "Lékárna")]),
            row([("OkresCode", "CZ0100"), ("DruhZarizeni", "Lékárna")]),
            row([("OkresCode", "CZ0201"), ("DruhZarizeni", "Lékárna")]),
        ];
        let out = agg.apply(&rows).unwrap_or_default();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["OkresCode"], FieldValue::from("CZ0100"));
        assert_eq!(out[1]["Count"], FieldValue::Integer(2));
    }

    #[test]
    fn aggregate_requires_group_fields() {
        let agg = CountAggregate {
            group_by: vec!["OkresCode".into()],
            count_into: "Count".into(),
        };
        assert_eq!(
            agg.apply(&[row([("KrajCode", "CZ010")])]),
            Err(CubeError::MissingField { row_index: 0, field: "OkresCode".into() })
        );
    }
}
