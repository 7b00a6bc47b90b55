//! Multi-stage code lookup.
//!
//! Source data often identifies a region only indirectly: a county code
//! maps to a region code, which maps to a canonical NUTS label. A
//! [`LookupChain`] applies its [`LookupTable`]s in order and fails with
//! [`CubeError::UnresolvedCode`] at the first stage that has no entry. A
//! missed code is never passed through unchanged.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{CubeError, Result};
use crate::row::{FieldValue, Row};

/// One named code → value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    name: String,
    entries: BTreeMap<String, String>,
}

impl LookupTable {
    /// Creates a table from `(code, value)` pairs.
    pub fn new<I, K, V>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Table name, used in error messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maps one code.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnresolvedCode`] if `code` has no entry.
    pub fn get(&self, code: &str) -> Result<&str> {
        self.entries
            .get(code.trim())
            .map(String::as_str)
            .ok_or_else(|| CubeError::UnresolvedCode {
                stage: self.name.clone(),
                code: code.to_owned(),
            })
    }
}

/// Tables applied in sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupChain {
    stages: Vec<LookupTable>,
}

impl LookupChain {
    /// Creates a chain.
    #[must_use]
    pub fn new(stages: Vec<LookupTable>) -> Self {
        Self { stages }
    }

    /// Applies every stage to `code`.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnresolvedCode`] naming the first stage that
    /// misses.
    pub fn resolve(&self, code: &str) -> Result<String> {
        let mut current = code.trim().to_owned();
        for stage in &self.stages {
            current = stage.get(&current)?.to_owned();
        }
        Ok(current)
    }
}

/// Writes `target = chain(source)` into every row.
#[derive(Debug, Clone)]
pub struct Derivation {
    /// Field holding the code to resolve.
    pub source: String,
    /// Field receiving the resolved value.
    pub target: String,
    /// How to resolve it.
    pub chain: LookupChain,
}

impl Derivation {
    /// Applies the derivation to all rows, in order.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::MissingField`] if a row lacks the source field,
    /// or [`CubeError::UnresolvedCode`] if a stage misses.
    pub fn apply(&self, rows: &mut [Row]) -> Result<()> {
        for (row_index, row) in rows.iter_mut().enumerate() {
            let code = row
                .get(&self.source)
                .and_then(FieldValue::as_text)
                .ok_or_else(|| CubeError::MissingField {
                    row_index,
                    field: self.source.clone(),
                })?;
            let resolved = self.chain.resolve(&code).inspect_err(|e| {
                warn!(row = row_index, field = %self.source, error = %e, "lookup failed");
            })?;
            row.insert(self.target.clone(), FieldValue::Text(resolved));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::row;

    fn chain() -> LookupChain {
        LookupChain::new(vec![
            LookupTable::new("okres_to_kraj", [("3201", "3018"), ("3202", "3026")]),
            LookupTable::new("kraj_to_nuts", [("3018", "CZ020")]),
        ])
    }

    #[test]
    fn resolves_through_every_stage() {
        assert_eq!(chain().resolve("3201").as_deref(), Ok("CZ020"));
    }

    #[test]
    fn miss_in_a_later_stage_names_that_stage() {
        assert_eq!(
            chain().resolve("3202"),
            Err(CubeError::UnresolvedCode {
                stage: "kraj_to_nuts".into(),
                code: "3026".into(),
            })
        );
    }

    #[test]
    fn unknown_code_is_never_passed_through() {
        assert!(chain().resolve("9999").is_err());
    }

    #[test]
    fn derivation_writes_target_field() {
        let d = Derivation {
            source: "vuzemi_kod".into(),
            target: "krajCode".into(),
            chain: chain(),
        };
        let mut rows = vec![row([("vuzemi_kod", FieldValue::Integer(3201))])];
        assert!(d.apply(&mut rows).is_ok());
        assert_eq!(rows[0].get("krajCode"), Some(&FieldValue::from("CZ020")));
    }

    #[test]
    fn derivation_reports_missing_source() {
        let d = Derivation {
            source: "vuzemi_kod".into(),
            target: "krajCode".into(),
            chain: chain(),
        };
        let mut rows = vec![row([("other", "x")])];
        assert_eq!(
            d.apply(&mut rows),
            Err(CubeError::MissingField {
                row_index: 0,
                field: "vuzemi_kod".into(),
            })
        );
    }
}
