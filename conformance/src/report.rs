//! Audit report types: per-rule results, severity levels, and aggregation.

use std::fmt;

use serde::Serialize;

/// Severity level of a rule result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The rule holds.
    Pass,
    /// The rule is violated (blocks publication).
    Failure,
}

/// The outcome of evaluating one integrity rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleResult {
    /// Public identifier of the rule, e.g. `IC-duplicate-slice`.
    pub rule: String,
    /// Human-readable message describing the outcome.
    pub message: String,
    /// Severity of the result.
    pub severity: Severity,
    /// Witness lines, truncated to the audit limit.
    pub witnesses: Vec<String>,
    /// Number of witnesses found before truncation.
    pub total: usize,
}

impl RuleResult {
    /// Creates a passing result.
    pub fn pass(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
            severity: Severity::Pass,
            witnesses: Vec::new(),
            total: 0,
        }
    }

    /// Creates a failure result, keeping at most `limit` witness lines.
    pub fn fail_with_witnesses(
        rule: impl Into<String>,
        message: impl Into<String>,
        mut witnesses: Vec<String>,
        limit: usize,
    ) -> Self {
        let total = witnesses.len();
        witnesses.truncate(limit);
        Self {
            rule: rule.into(),
            message: message.into(),
            severity: Severity::Failure,
            witnesses,
            total,
        }
    }

    /// Returns true if this result represents a failure.
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }

    /// Witnesses dropped by truncation.
    pub fn omitted(&self) -> usize {
        self.total.saturating_sub(self.witnesses.len())
    }
}

/// Aggregated report from every rule of an audit, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConformanceReport {
    /// One result per evaluated rule.
    pub results: Vec<RuleResult>,
}

impl ConformanceReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result to this report.
    pub fn push(&mut self, result: RuleResult) {
        self.results.push(result);
    }

    /// Returns the count of violated rules.
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Returns true if every rule holds.
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }

    /// Names of the violated rules, in evaluation order.
    pub fn violated_rules(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|r| r.is_failure())
            .map(|r| r.rule.as_str())
    }

    /// Looks up the result for a rule by name.
    pub fn result(&self, rule: &str) -> Option<&RuleResult> {
        self.results.iter().find(|r| r.rule == rule)
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            let mark = match result.severity {
                Severity::Pass => "PASS",
                Severity::Failure => "FAIL",
            };
            writeln!(f, "[{mark}] {}: {}", result.rule, result.message)?;
            for witness in &result.witnesses {
                writeln!(f, "       {witness}")?;
            }
            if result.omitted() > 0 {
                writeln!(f, "       ... and {} more", result.omitted())?;
            }
        }
        write!(
            f,
            "{} rules, {} violated",
            self.results.len(),
            self.failure_count()
        )
    }
}
