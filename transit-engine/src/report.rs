//! Run reports.

use serde::Serialize;

/// Outcome of one rule's run.
#[derive(Debug, Clone, Serialize)]
pub struct RuleRun {
    /// Rule (definition) ID.
    pub rule: String,

    /// Entity handles loaded: query candidates plus distinct translations.
    pub entities: u64,

    /// Entities actually mutated.
    pub applied: u64,
}

/// A per-entity mutation failure collected under `FailurePolicy::Continue`.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyFailure {
    pub rule: String,
    pub entity_type: String,
    pub entity_id: String,
    pub langcode: String,
    pub reason: String,
}

/// Aggregated outcome of a transition run.
///
/// `entities` is the run's count contribution: the total number of entity
/// handles loaded across all rules, whether or not they were mutated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransitionReport {
    /// Total entity handles loaded.
    pub entities: u64,

    /// Total entities mutated.
    pub applied: u64,

    /// Per-rule breakdown, in execution order.
    pub rules: Vec<RuleRun>,

    /// Collected per-entity failures (empty under `FailurePolicy::FailFast`).
    pub failures: Vec<ApplyFailure>,
}

impl TransitionReport {
    /// Folds one rule's outcome into the report.
    pub(crate) fn record(&mut self, run: RuleRun) {
        self.entities += run.entities;
        self.applied += run.applied;
        self.rules.push(run);
    }

    /// True when no per-entity failure was recorded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_aggregates() {
        let mut report = TransitionReport::default();
        report.record(RuleRun {
            rule: "a".to_string(),
            entities: 3,
            applied: 2,
        });
        report.record(RuleRun {
            rule: "b".to_string(),
            entities: 1,
            applied: 0,
        });

        assert_eq!(report.entities, 4);
        assert_eq!(report.applied, 2);
        assert_eq!(report.rules.len(), 2);
        assert!(report.is_clean());
    }
}
