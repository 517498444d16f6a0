//! Rule registry: registration table, priority ordering, lazy instantiation.

use crate::definition::TransitionDefinition;
use crate::error::CoreError;
use crate::rule::TransitionRule;
use std::collections::HashSet;

/// Factory producing a rule instance bound to its definition.
pub type RuleFactory = Box<dyn Fn(&TransitionDefinition) -> Box<dyn TransitionRule> + Send + Sync>;

struct RuleRegistration {
    definition: TransitionDefinition,
    factory: RuleFactory,
}

/// Registry of transition rules.
///
/// Built once through [`RuleRegistryBuilder`]; immutable afterwards. Hosts
/// that cache data derived from the registry key it on
/// `(generation, fingerprint)` and rebuild the registry to invalidate.
pub struct RuleRegistry {
    /// Registrations in registration order (the tie-break for equal
    /// priorities).
    registrations: Vec<RuleRegistration>,

    /// Caller-supplied registry generation.
    generation: u64,

    /// Checksum over the serialized definitions.
    fingerprint: String,
}

impl RuleRegistry {
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::new()
    }

    /// All registered rules, instantiated, ascending by priority. Equal
    /// priorities keep registration order.
    pub fn get_all(&self) -> Vec<Box<dyn TransitionRule>> {
        self.instantiate(|_| true)
    }

    /// Rules whose definition carries exactly this tag.
    pub fn get_by_tag(&self, tag: &str) -> Vec<Box<dyn TransitionRule>> {
        self.instantiate(|d| d.has_tag(tag))
    }

    /// Rules applying to the given entity type, optionally restricted to a
    /// bundle. A definition with no bundle restriction matches any bundle.
    pub fn get_for(&self, entity_type: &str, bundle: Option<&str>) -> Vec<Box<dyn TransitionRule>> {
        self.instantiate(|d| d.applies_to(entity_type, bundle))
    }

    /// Filters and sorts definitions, then runs factories for the selected
    /// ones only.
    fn instantiate(
        &self,
        select: impl Fn(&TransitionDefinition) -> bool,
    ) -> Vec<Box<dyn TransitionRule>> {
        let mut selected: Vec<&RuleRegistration> = self
            .registrations
            .iter()
            .filter(|r| select(&r.definition))
            .collect();

        // Stable sort: equal priorities keep registration order.
        selected.sort_by_key(|r| r.definition.priority);

        selected
            .into_iter()
            .map(|r| (r.factory)(&r.definition))
            .collect()
    }

    /// Registered definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &TransitionDefinition> {
        self.registrations.iter().map(|r| &r.definition)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// The caller-supplied registry generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Checksum over the serialized, registration-ordered definitions.
    /// Changes whenever any definition changes.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Builder populating the registration table at process start.
#[derive(Default)]
pub struct RuleRegistryBuilder {
    registrations: Vec<RuleRegistration>,
    generation: u64,
}

impl RuleRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the registry generation used for host-side cache keys.
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Registers a rule: its definition plus the factory that instantiates
    /// it on demand.
    pub fn register<F>(mut self, definition: TransitionDefinition, factory: F) -> Self
    where
        F: Fn(&TransitionDefinition) -> Box<dyn TransitionRule> + Send + Sync + 'static,
    {
        self.registrations.push(RuleRegistration {
            definition,
            factory: Box::new(factory),
        });
        self
    }

    /// Validates all registrations and builds the registry.
    pub fn build(self) -> Result<RuleRegistry, CoreError> {
        let mut seen = HashSet::new();
        for registration in &self.registrations {
            registration.definition.validate()?;
            if !seen.insert(registration.definition.id.clone()) {
                return Err(CoreError::DuplicateRule {
                    id: registration.definition.id.clone(),
                });
            }
        }

        let definitions: Vec<&TransitionDefinition> =
            self.registrations.iter().map(|r| &r.definition).collect();
        let json = serde_json::to_vec(&definitions)?;
        let fingerprint = format!("{:08x}", crc32c::crc32c(&json));

        tracing::debug!(
            rules = self.registrations.len(),
            generation = self.generation,
            %fingerprint,
            "rule registry built"
        );

        Ok(RuleRegistry {
            registrations: self.registrations,
            generation: self.generation,
            fingerprint,
        })
    }
}
