//! Language-aware entity model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A business entity in one language.
///
/// An entity is addressed by `(entity_type, id, langcode)`. Translations of
/// the same logical entity share the type and id and differ in langcode;
/// exactly one of them carries `default_langcode = true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Entity type ID (e.g. "node").
    pub entity_type: String,

    /// Entity ID, unique within a langcode.
    pub id: String,

    /// Bundle (sub-classification of the entity type).
    pub bundle: String,

    /// Language code of this variant.
    pub langcode: String,

    /// Whether this is the entity's original language.
    pub default_langcode: bool,

    /// Field values as a JSON object.
    pub fields: Value,
}

impl Entity {
    /// Creates an entity in its default language.
    pub fn new(
        entity_type: impl Into<String>,
        id: impl Into<String>,
        bundle: impl Into<String>,
        langcode: impl Into<String>,
        fields: Value,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
            bundle: bundle.into(),
            langcode: langcode.into(),
            default_langcode: true,
            fields,
        }
    }

    /// Creates a translation of this entity with its own field values.
    pub fn translation(&self, langcode: impl Into<String>, fields: Value) -> Self {
        Self {
            entity_type: self.entity_type.clone(),
            id: self.id.clone(),
            bundle: self.bundle.clone(),
            langcode: langcode.into(),
            default_langcode: false,
            fields,
        }
    }

    /// Looks up a field value by dotted path. Missing fields resolve to null.
    pub fn field(&self, path: &str) -> Value {
        let mut current = &self.fields;

        for part in path.split('.') {
            match current {
                Value::Object(map) => {
                    current = map.get(part).unwrap_or(&Value::Null);
                }
                _ => return Value::Null,
            }
        }

        current.clone()
    }

    /// Sets a top-level field value.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        if !self.fields.is_object() {
            self.fields = Value::Object(serde_json::Map::new());
        }
        if let Value::Object(map) = &mut self.fields {
            map.insert(name.into(), value);
        }
    }

    /// Returns true if this is the entity's original language variant.
    pub fn is_default_translation(&self) -> bool {
        self.default_langcode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_creation() {
        let entity = Entity::new("node", "1", "article", "en", json!({"status": "draft"}));
        assert_eq!(entity.entity_type, "node");
        assert_eq!(entity.id, "1");
        assert_eq!(entity.bundle, "article");
        assert!(entity.is_default_translation());
    }

    #[test]
    fn test_translation_shares_identity() {
        let entity = Entity::new("node", "1", "article", "en", json!({"status": "draft"}));
        let translated = entity.translation("de", json!({"status": "published"}));

        assert_eq!(translated.id, "1");
        assert_eq!(translated.bundle, "article");
        assert_eq!(translated.langcode, "de");
        assert!(!translated.is_default_translation());
        assert_eq!(translated.field("status"), json!("published"));
    }

    #[test]
    fn test_field_lookup() {
        let entity = Entity::new(
            "node",
            "1",
            "article",
            "en",
            json!({"status": "draft", "meta": {"weight": 3}}),
        );

        assert_eq!(entity.field("status"), json!("draft"));
        assert_eq!(entity.field("meta.weight"), json!(3));
        assert_eq!(entity.field("missing"), Value::Null);
        assert_eq!(entity.field("status.nested"), Value::Null);
    }

    #[test]
    fn test_set_field() {
        let mut entity = Entity::new("node", "1", "article", "en", json!({"status": "draft"}));
        entity.set_field("status", json!("published"));
        assert_eq!(entity.field("status"), json!("published"));
    }

    #[test]
    fn test_set_field_on_non_object() {
        let mut entity = Entity::new("node", "1", "article", "en", Value::Null);
        entity.set_field("status", json!("draft"));
        assert_eq!(entity.field("status"), json!("draft"));
    }
}
