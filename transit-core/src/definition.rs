//! Transition definitions.
//!
//! A definition is the static metadata a rule is registered under. It can be
//! written in JSON/YAML by a host:
//!
//! ```json
//! {
//!   "id": "publish_scheduled",
//!   "entity_type": "node",
//!   "bundles": ["article", "page"],
//!   "tag": "publish",
//!   "priority": 5
//! }
//! ```
//!
//! `bundles` also accepts a single string or may be omitted entirely
//! (meaning "all bundles").

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Static metadata for one transition rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDefinition {
    /// Unique rule ID.
    pub id: String,

    /// Entity type the rule targets.
    pub entity_type: String,

    /// Bundle restriction. Empty means the rule applies to all bundles.
    #[serde(default, deserialize_with = "deserialize_bundles")]
    pub bundles: Vec<String>,

    /// Optional classification tag for bulk selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Evaluation priority; lower values run earlier.
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    1
}

fn deserialize_bundles<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct BundlesVisitor;

    impl<'de> Visitor<'de> for BundlesVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("null, a string, or an array of strings")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut bundles = Vec::new();
            while let Some(b) = seq.next_element::<String>()? {
                bundles.push(b);
            }
            Ok(bundles)
        }
    }

    deserializer.deserialize_any(BundlesVisitor)
}

impl TransitionDefinition {
    /// Creates a definition applying to all bundles of the entity type, with
    /// the default priority and no tag.
    pub fn new(id: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity_type: entity_type.into(),
            bundles: Vec::new(),
            tag: None,
            priority: default_priority(),
        }
    }

    pub fn with_bundles<I, S>(mut self, bundles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bundles = bundles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Checks the metadata a registry requires. An empty id or entity type
    /// is a configuration error.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.is_empty() {
            return Err(CoreError::InvalidDefinition {
                reason: "definition id must not be empty".to_string(),
            });
        }
        if self.entity_type.is_empty() {
            return Err(CoreError::InvalidDefinition {
                reason: format!("definition '{}' has no entity type", self.id),
            });
        }
        Ok(())
    }

    /// Whether entities of the given bundle fall under this definition.
    pub fn applies_to_bundle(&self, bundle: &str) -> bool {
        self.bundles.is_empty() || self.bundles.iter().any(|b| b == bundle)
    }

    /// Whether the definition targets the given entity type, optionally
    /// restricted to a bundle.
    pub fn applies_to(&self, entity_type: &str, bundle: Option<&str>) -> bool {
        if self.entity_type != entity_type {
            return false;
        }
        match bundle {
            None => true,
            Some(b) => self.applies_to_bundle(b),
        }
    }

    /// Whether the definition carries exactly this tag. Untagged definitions
    /// match no tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.as_deref() == Some(tag)
    }
}
