//! Deterministic resource addressing.
//!
//! Categorical values become IRIs under their category vocabulary by
//! replacing spaces with underscores and percent-encoding everything that is
//! not an unreserved IRI character. Literal underscores are percent-encoded
//! first, so the mapping is a bijection and [`decode_label`] recovers the
//! original value exactly.
//!
//! ```
//! use datacube::address::{decode_label, encode_label};
//!
//! let id = encode_label("Hlavní město Praha")?;
//! assert_eq!(id, "Hlavn%C3%AD_m%C4%9Bsto_Praha");
//! assert_eq!(decode_label(&id)?, "Hlavní město Praha");
//! # Ok::<(), datacube::AddressError>(())
//! ```

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::AddressError;
use crate::term::Iri;
use crate::vocab::{Namespace, Vocabulary};

/// Everything except ASCII alphanumerics, `-`, `.`, `~` and space is encoded.
/// Space is left for the underscore substitution.
const LABEL: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'~')
    .remove(b' ');

/// Width of the zero-padded row index in observation names.
pub const OBSERVATION_INDEX_WIDTH: usize = 3;

/// Encodes a categorical value as an IRI-safe local name.
///
/// # Errors
///
/// Returns [`AddressError::EmptyValue`] for an empty or whitespace-only value.
pub fn encode_label(value: &str) -> Result<String, AddressError> {
    if value.trim().is_empty() {
        return Err(AddressError::EmptyValue);
    }
    Ok(utf8_percent_encode(value, LABEL).to_string().replace(' ', "_"))
}

/// Inverse of [`encode_label`].
///
/// # Errors
///
/// Returns [`AddressError::InvalidEncoding`] if the decoded bytes are not UTF-8.
pub fn decode_label(encoded: &str) -> Result<String, AddressError> {
    let spaced = encoded.replace('_', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| AddressError::InvalidEncoding(encoded.to_owned()))
}

/// Mints the IRI of a categorical value under `vocabulary`.
///
/// # Errors
///
/// Returns [`AddressError::EmptyValue`] for an empty value.
pub fn code_iri(vocabulary: &Namespace, value: &str) -> Result<Iri, AddressError> {
    Ok(vocabulary.term(&encode_label(value)?))
}

/// Recovers the display label from an IRI minted by [`code_iri`].
///
/// # Errors
///
/// Returns [`AddressError::ForeignIdentifier`] if `iri` is not under
/// `vocabulary`, or [`AddressError::InvalidEncoding`] if it does not decode.
pub fn label_of(vocabulary: &Namespace, iri: &Iri) -> Result<String, AddressError> {
    let tail = iri
        .as_str()
        .strip_prefix(vocabulary.base.as_str())
        .ok_or_else(|| AddressError::ForeignIdentifier {
            iri: iri.as_str().to_owned(),
            base: vocabulary.base.clone(),
        })?;
    decode_label(tail)
}

/// `observation-000`, `observation-001`, ...; indices of 1000 and above
/// widen the field instead of truncating.
#[must_use]
pub fn observation_name(row_index: usize) -> String {
    format!("observation-{row_index:0width$}", width = OBSERVATION_INDEX_WIDTH)
}

/// IRI of a dataset.
///
/// # Errors
///
/// Returns [`AddressError::EmptyValue`] for an empty dataset id.
pub fn dataset_iri(vocab: &Vocabulary, dataset_id: &str) -> Result<Iri, AddressError> {
    Ok(vocab.resources().term(&encode_label(dataset_id)?))
}

/// IRI of the structure definition of a dataset.
///
/// # Errors
///
/// Returns [`AddressError::EmptyValue`] for an empty dataset id.
pub fn structure_iri(vocab: &Vocabulary, dataset_id: &str) -> Result<Iri, AddressError> {
    Ok(vocab
        .resources()
        .term(&format!("{}/structure", encode_label(dataset_id)?)))
}

/// IRI of the observation at `row_index` of a dataset.
///
/// # Errors
///
/// Returns [`AddressError::EmptyValue`] for an empty dataset id.
pub fn observation_iri(
    vocab: &Vocabulary,
    dataset_id: &str,
    row_index: usize,
) -> Result<Iri, AddressError> {
    Ok(vocab.resources().term(&format!(
        "{}/{}",
        encode_label(dataset_id)?,
        observation_name(row_index)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(encode_label("Benešov").as_deref(), Ok("Bene%C5%A1ov"));
        assert_eq!(encode_label("Praha východ").as_deref(), Ok("Praha_v%C3%BDchod"));
    }

    #[test]
    fn literal_underscores_survive_round_trip() {
        let encoded = encode_label("a_b c").unwrap_or_default();
        assert_eq!(encoded, "a%5Fb_c");
        assert_eq!(decode_label(&encoded).as_deref(), Ok("a_b c"));
    }

    #[test]
    fn reserved_characters_are_encoded() {
        assert_eq!(encode_label("A/B#C").as_deref(), Ok("A%2FB%23C"));
    }

    #[test]
    fn empty_values_are_rejected() {
        assert_eq!(encode_label(""), Err(AddressError::EmptyValue));
        assert_eq!(encode_label("   "), Err(AddressError::EmptyValue));
    }

    #[test]
    fn observation_names_are_zero_padded() {
        assert_eq!(observation_name(0), "observation-000");
        assert_eq!(observation_name(7), "observation-007");
        assert_eq!(observation_name(999), "observation-999");
        assert_eq!(observation_name(1000), "observation-1000");
    }

    #[test]
    fn observation_iris_are_scoped_by_dataset() {
        let vocab = Vocabulary::default();
        let a = observation_iri(&vocab, "population", 1).ok();
        let b = observation_iri(&vocab, "care-providers", 1).ok();
        assert_ne!(a, b);
        assert_eq!(
            a.map(|i| i.as_str().to_owned()),
            Some("https://example.org/resources/population/observation-001".to_owned())
        );
    }

    #[test]
    fn label_of_rejects_foreign_iris() {
        let vocab = Vocabulary::default();
        let kraje = vocab.category("kraje").cloned().unwrap_or_else(|| Namespace::new("k", "urn:k/"));
        let iri = Iri::new("https://example.org/okresy/Bene%C5%A1ov");
        assert!(matches!(
            label_of(&kraje, &iri),
            Err(AddressError::ForeignIdentifier { .. })
        ));
    }
}
