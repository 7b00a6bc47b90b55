//! Built-in dataset plans.
//!
//! Each preset module exposes `plan()`, the same [`CubePlan`] a TOML
//! configuration resolves to. Presets expect rows whose codes are already
//! resolved to labels.

pub mod care_providers;
pub mod population;

use crate::assemble::CubePlan;
use crate::model::Label;
use crate::vocab::Vocabulary;

/// Preset names accepted by [`by_name`].
pub const NAMES: [&str; 2] = ["population", "care-providers"];

/// Looks up a preset by name.
#[must_use]
pub fn by_name(name: &str, vocab: &Vocabulary) -> Option<CubePlan> {
    match name {
        "population" => Some(population::plan(vocab)),
        "care-providers" => Some(care_providers::plan(vocab)),
        _ => None,
    }
}

/// A Czech/English label pair.
fn cs_en(cs: &str, en: &str) -> Vec<Label> {
    vec![Label::new(cs, "cs"), Label::new(en, "en")]
}
