//! The constraint engine: an ordered list of integrity rules evaluated
//! against a finished cube graph.

use datacube::{Graph, Vocabulary};
use tracing::{debug, info, warn};

use crate::error::ValidationError;
use crate::report::{ConformanceReport, RuleResult};
use crate::rule::IntegrityRule;
use crate::rules;

/// Witness lines kept per rule when the caller does not choose.
pub const DEFAULT_MAX_WITNESSES: usize = 10;

/// Evaluates integrity rules in the order they were given.
pub struct ConstraintEngine {
    rules: Vec<Box<dyn IntegrityRule>>,
}

impl ConstraintEngine {
    /// An engine over `rules`, evaluated in the given order.
    #[must_use]
    pub fn new(rules: Vec<Box<dyn IntegrityRule>>) -> Self {
        Self { rules }
    }

    /// An engine over the standard rule set.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(rules::standard())
    }

    /// Rule identifiers in evaluation order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name())
    }

    /// Evaluates rules in order and stops at the first violation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming the first violated rule.
    pub fn check(&self, graph: &Graph, vocab: &Vocabulary) -> Result<(), ValidationError> {
        for rule in &self.rules {
            if rule.is_violated(graph, vocab) {
                warn!(rule = rule.name(), "integrity rule violated");
                return Err(ValidationError {
                    rule: rule.name().to_owned(),
                });
            }
            debug!(rule = rule.name(), "integrity rule holds");
        }
        info!(rules = self.rules.len(), triples = graph.len(), "cube is well formed");
        Ok(())
    }

    /// Evaluates every rule and reports each violation with at most
    /// `max_witnesses` witness lines.
    #[must_use]
    pub fn audit(&self, graph: &Graph, vocab: &Vocabulary, max_witnesses: usize) -> ConformanceReport {
        let mut report = ConformanceReport::new();
        for rule in &self.rules {
            let witnesses = rule.witnesses(graph, vocab);
            if witnesses.is_empty() {
                report.push(RuleResult::pass(rule.name(), rule.description()));
            } else {
                warn!(rule = rule.name(), witnesses = witnesses.len(), "integrity rule violated");
                let message = format!("{} violation(s): {}", witnesses.len(), rule.description());
                report.push(RuleResult::fail_with_witnesses(
                    rule.name(),
                    message,
                    witnesses,
                    max_witnesses,
                ));
            }
        }
        info!(
            rules = self.rules.len(),
            violated = report.failure_count(),
            "audit complete"
        );
        report
    }
}

impl Default for ConstraintEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ConstraintEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rule_names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Always(&'static str);

    impl IntegrityRule for Always {
        fn name(&self) -> &'static str {
            self.0
        }

        fn description(&self) -> &'static str {
            "always violated"
        }

        fn witnesses(&self, _: &Graph, _: &Vocabulary) -> Vec<String> {
            vec!["a".into(), "b".into(), "c".into()]
        }
    }

    struct Never;

    impl IntegrityRule for Never {
        fn name(&self) -> &'static str {
            "IC-never"
        }

        fn description(&self) -> &'static str {
            "never violated"
        }

        fn witnesses(&self, _: &Graph, _: &Vocabulary) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn check_stops_at_the_first_violation() {
        let engine = ConstraintEngine::new(vec![
            Box::new(Never),
            Box::new(Always("IC-first")),
            Box::new(Always("IC-second")),
        ]);
        let result = engine.check(&Graph::new(), &Vocabulary::default());
        assert_eq!(
            result,
            Err(ValidationError {
                rule: "IC-first".into()
            })
        );
    }

    #[test]
    fn audit_reports_every_rule() {
        let engine = ConstraintEngine::new(vec![
            Box::new(Always("IC-first")),
            Box::new(Never),
            Box::new(Always("IC-second")),
        ]);
        let report = engine.audit(&Graph::new(), &Vocabulary::default(), 2);
        assert_eq!(report.results.len(), 3);
        assert_eq!(
            report.violated_rules().collect::<Vec<_>>(),
            ["IC-first", "IC-second"]
        );
        let first = report.result("IC-first").map(|r| (r.witnesses.len(), r.total));
        assert_eq!(first, Some((2, 3)));
    }

    #[test]
    fn empty_graph_is_well_formed() {
        let engine = ConstraintEngine::standard();
        assert_eq!(engine.check(&Graph::new(), &Vocabulary::default()), Ok(()));
        assert_eq!(engine.rule_names().count(), 8);
    }
}
