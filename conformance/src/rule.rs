//! The integrity rule seam.

use datacube::{Graph, Vocabulary};

/// A well-formedness condition over a finished cube graph.
///
/// Rules are stateless; an engine evaluates them in the order it was given.
pub trait IntegrityRule: Send + Sync {
    /// Public identifier, e.g. `IC-duplicate-slice`.
    fn name(&self) -> &'static str;

    /// One-line statement of what the rule forbids.
    fn description(&self) -> &'static str;

    /// Every violation found, one rendered line per witness. Empty when the
    /// rule holds.
    fn witnesses(&self, graph: &Graph, vocab: &Vocabulary) -> Vec<String>;

    /// True iff at least one violation exists.
    fn is_violated(&self, graph: &Graph, vocab: &Vocabulary) -> bool {
        !self.witnesses(graph, vocab).is_empty()
    }
}
