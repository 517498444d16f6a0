//! Store and language contracts, plus the in-memory reference store.

use crate::entity::Entity;
use crate::error::StoreError;
use crate::query::EntityQuery;
use dashmap::DashMap;
use serde_json::Value;
use std::collections::BTreeMap;

/// The entity store collaborator contract.
///
/// Queries return default-language entity ids only; translations are reached
/// through `load_translation`. Implementations are free to back this with
/// any storage; `MemoryStore` is the in-process reference.
pub trait EntityStore: Send + Sync {
    /// Builds an empty query scoped to the given entity type.
    fn query(&self, entity_type: &str) -> EntityQuery {
        EntityQuery::new(entity_type)
    }

    /// Executes a query, returning matching default-language entity ids in a
    /// deterministic order.
    fn execute(&self, query: &EntityQuery) -> Result<Vec<String>, StoreError>;

    /// Loads default-language entities by id. Unknown ids are skipped.
    fn load_multiple(&self, entity_type: &str, ids: &[String])
        -> Result<Vec<Entity>, StoreError>;

    /// Loads the default-language entity by id.
    fn load(&self, entity_type: &str, id: &str) -> Result<Entity, StoreError>;

    /// Loads one language variant of an entity, if it exists.
    fn load_translation(
        &self,
        entity_type: &str,
        id: &str,
        langcode: &str,
    ) -> Result<Option<Entity>, StoreError>;

    /// Returns whether the entity has a variant in the given language.
    fn has_translation(
        &self,
        entity_type: &str,
        id: &str,
        langcode: &str,
    ) -> Result<bool, StoreError> {
        Ok(self.load_translation(entity_type, id, langcode)?.is_some())
    }

    /// Persists an entity variant, replacing any existing one with the same
    /// `(entity_type, id, langcode)`.
    fn save(&self, entity: &Entity) -> Result<(), StoreError>;
}

/// The translation-provider collaborator contract: the languages known to
/// the host, in a stable host-defined order.
pub trait LanguageProvider: Send + Sync {
    fn languages(&self) -> Vec<String>;
}

/// A fixed, ordered language list.
#[derive(Debug, Clone)]
pub struct FixedLanguages {
    langcodes: Vec<String>,
}

impl FixedLanguages {
    /// Creates a language list, deduplicating while preserving order.
    pub fn new<I, S>(langcodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = Vec::new();
        for code in langcodes {
            let code = code.into();
            if !seen.contains(&code) {
                seen.push(code);
            }
        }
        Self { langcodes: seen }
    }
}

impl LanguageProvider for FixedLanguages {
    fn languages(&self) -> Vec<String> {
        self.langcodes.clone()
    }
}

/// In-memory reference store.
///
/// Entities are held per `(entity_type, id)` with their language variants in
/// an inner map. Query results are sorted by id so runs are deterministic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entities: DashMap<(String, String), BTreeMap<String, Entity>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entity variant.
    pub fn insert(&self, entity: Entity) {
        let key = (entity.entity_type.clone(), entity.id.clone());
        self.entities
            .entry(key)
            .or_default()
            .insert(entity.langcode.clone(), entity);
    }

    /// Number of stored logical entities (translations not counted).
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn default_variant(variants: &BTreeMap<String, Entity>) -> Option<&Entity> {
        variants.values().find(|e| e.default_langcode)
    }

    /// Resolves a condition field against an entity. The addressable
    /// properties `id`, `bundle` and `langcode` take precedence over fields.
    fn entity_value(entity: &Entity, field: &str) -> Value {
        match field {
            "id" => Value::String(entity.id.clone()),
            "bundle" => Value::String(entity.bundle.clone()),
            "langcode" => Value::String(entity.langcode.clone()),
            path => entity.field(path),
        }
    }
}

impl EntityStore for MemoryStore {
    fn execute(&self, query: &EntityQuery) -> Result<Vec<String>, StoreError> {
        let mut ids = Vec::new();

        for entry in self.entities.iter() {
            let (entity_type, id) = entry.key();
            if entity_type != query.entity_type() {
                continue;
            }

            let Some(entity) = Self::default_variant(entry.value()) else {
                continue;
            };

            let matches = query
                .conditions()
                .iter()
                .all(|c| c.matches(&Self::entity_value(entity, &c.field)));

            if matches {
                ids.push(id.clone());
            }
        }

        ids.sort();
        Ok(ids)
    }

    fn load_multiple(
        &self,
        entity_type: &str,
        ids: &[String],
    ) -> Result<Vec<Entity>, StoreError> {
        let mut entities = Vec::with_capacity(ids.len());

        for id in ids {
            let key = (entity_type.to_string(), id.clone());
            if let Some(variants) = self.entities.get(&key) {
                if let Some(entity) = Self::default_variant(&variants) {
                    entities.push(entity.clone());
                }
            }
        }

        Ok(entities)
    }

    fn load(&self, entity_type: &str, id: &str) -> Result<Entity, StoreError> {
        let key = (entity_type.to_string(), id.to_string());
        self.entities
            .get(&key)
            .as_deref()
            .and_then(Self::default_variant)
            .cloned()
            .ok_or_else(|| StoreError::EntityNotFound {
                entity_type: entity_type.to_string(),
                id: id.to_string(),
                langcode: "default".to_string(),
            })
    }

    fn load_translation(
        &self,
        entity_type: &str,
        id: &str,
        langcode: &str,
    ) -> Result<Option<Entity>, StoreError> {
        let key = (entity_type.to_string(), id.to_string());
        Ok(self
            .entities
            .get(&key)
            .and_then(|variants| variants.get(langcode).cloned()))
    }

    fn save(&self, entity: &Entity) -> Result<(), StoreError> {
        self.insert(entity.clone());
        Ok(())
    }
}
