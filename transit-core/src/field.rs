//! A reusable field-value transition.

use crate::definition::TransitionDefinition;
use crate::error::RuleError;
use crate::rule::{Narrowing, TransitionRule};
use serde_json::Value;
use transit_entity::{Condition, Entity, EntityQuery, EntityStore, Operator};

/// Moves a top-level entity field from one value to another.
///
/// Covers the dominant rule shape: entities whose field `F` equals `from`
/// are switched to `to` (e.g. a moderation state from "draft" to
/// "published"). The rule narrows bulk queries with `F = from`, so only
/// matching candidates are loaded in the first place.
pub struct FieldSwitchRule {
    definition: TransitionDefinition,
    field: String,
    from: Value,
    to: Value,
}

impl FieldSwitchRule {
    pub fn new(
        definition: TransitionDefinition,
        field: impl Into<String>,
        from: Value,
        to: Value,
    ) -> Self {
        Self {
            definition,
            field: field.into(),
            from,
            to,
        }
    }

    fn matches_from(&self, entity: &Entity) -> bool {
        let condition = Condition {
            field: self.field.clone(),
            op: Operator::Eq,
            value: self.from.clone(),
        };
        condition.matches(&entity.field(&self.field))
    }
}

impl TransitionRule for FieldSwitchRule {
    fn definition(&self) -> &TransitionDefinition {
        &self.definition
    }

    fn narrow_candidates(&self, query: &mut EntityQuery) -> Narrowing {
        query.condition(&self.field, self.from.clone(), Operator::Eq);
        Narrowing::Applied
    }

    fn should_apply(&self, entity: &Entity) -> bool {
        self.matches_from(entity)
    }

    fn apply(&self, entity: &mut Entity, store: &dyn EntityStore) -> Result<(), RuleError> {
        entity.set_field(&self.field, self.to.clone());
        store.save(entity)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use transit_entity::MemoryStore;

    fn draft_to_published() -> FieldSwitchRule {
        FieldSwitchRule::new(
            TransitionDefinition::new("publish_drafts", "node").with_bundles(["article"]),
            "status",
            json!("draft"),
            json!("published"),
        )
    }

    #[test]
    fn test_narrowing_attaches_condition() {
        let rule = draft_to_published();
        let mut query = EntityQuery::new("node");

        assert_eq!(rule.narrow_candidates(&mut query), Narrowing::Applied);
        assert_eq!(query.conditions().len(), 1);
        assert_eq!(query.conditions()[0].field, "status");
        assert_eq!(query.conditions()[0].value, json!("draft"));
    }

    #[test]
    fn test_should_apply() {
        let rule = draft_to_published();

        let draft = Entity::new("node", "1", "article", "en", json!({"status": "draft"}));
        let published = Entity::new("node", "2", "article", "en", json!({"status": "published"}));

        assert!(rule.should_apply(&draft));
        assert!(!rule.should_apply(&published));
    }

    #[test]
    fn test_apply_persists() {
        let store = MemoryStore::new();
        store.insert(Entity::new("node", "1", "article", "en", json!({"status": "draft"})));

        let rule = draft_to_published();
        let mut entity = store.load("node", "1").unwrap();
        rule.apply(&mut entity, &store).unwrap();

        assert_eq!(entity.field("status"), json!("published"));
        let reloaded = store.load("node", "1").unwrap();
        assert_eq!(reloaded.field("status"), json!("published"));
    }

    #[test]
    fn test_metadata_comes_from_definition() {
        let rule = draft_to_published();
        assert_eq!(rule.entity_type(), "node");
        assert_eq!(rule.bundles(), ["article"]);
    }
}
