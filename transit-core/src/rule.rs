//! The transition rule contract.

use crate::definition::TransitionDefinition;
use crate::error::RuleError;
use transit_entity::{Entity, EntityQuery, EntityStore};

/// Outcome of [`TransitionRule::narrow_candidates`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Narrowing {
    /// No storage-level filter was attached; every loaded entity must still
    /// pass `should_apply`.
    None,
    /// A precise storage-level filter was attached.
    Applied,
}

/// One state-change policy for one entity type/bundle scope.
///
/// Instances are created freshly from their registered factory each time
/// rules are resolved, so any internal state is scoped to a single
/// execution batch.
pub trait TransitionRule {
    /// The definition this rule instance is bound to.
    fn definition(&self) -> &TransitionDefinition;

    /// The entity type this rule targets.
    fn entity_type(&self) -> &str {
        &self.definition().entity_type
    }

    /// Bundle restriction; empty means all bundles of the entity type.
    fn bundles(&self) -> &[String] {
        &self.definition().bundles
    }

    /// Optionally attaches a storage-level filter for bulk runs.
    ///
    /// The default attaches nothing. Return `Narrowing::Applied` only when
    /// the attached filter is precise, i.e. every entity it lets through
    /// would also pass `should_apply`.
    fn narrow_candidates(&self, _query: &mut EntityQuery) -> Narrowing {
        Narrowing::None
    }

    /// Per-entity predicate. Must be a pure function of entity state; it is
    /// evaluated once per (entity, language) within a run.
    fn should_apply(&self, entity: &Entity) -> bool;

    /// Applies the transition's mutation and persists it through the store.
    ///
    /// Called at most once per (entity, language) per run.
    fn apply(&self, entity: &mut Entity, store: &dyn EntityStore) -> Result<(), RuleError>;
}
