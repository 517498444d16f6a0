//! Transition executor - selects rules, queries candidates, applies mutations.

use crate::config::{ExecutorConfig, FailurePolicy};
use crate::error::EngineError;
use crate::report::{ApplyFailure, RuleRun, TransitionReport};
use std::collections::BTreeMap;
use std::sync::Arc;
use transit_core::{Narrowing, RuleRegistry, TransitionRule};
use transit_entity::{Entity, EntityStore, LanguageProvider, Operator, StoreError};
use uuid::Uuid;

/// Candidates grouped by language, then by id within each language.
type LanguageEntitySet = BTreeMap<String, BTreeMap<String, Entity>>;

/// Orchestrates transition runs end to end.
///
/// Runs are synchronous and single-threaded: rules strictly in priority
/// order, and within a rule languages then entities strictly in loaded
/// order. The store is mutated in place by rule `apply` calls; concurrent
/// executors over the same rule set are not coordinated.
pub struct TransitionExecutor {
    registry: Arc<RuleRegistry>,
    store: Arc<dyn EntityStore>,
    languages: Arc<dyn LanguageProvider>,
    config: ExecutorConfig,
}

impl TransitionExecutor {
    /// Creates an executor with the default configuration.
    pub fn new(
        registry: Arc<RuleRegistry>,
        store: Arc<dyn EntityStore>,
        languages: Arc<dyn LanguageProvider>,
    ) -> Self {
        Self::with_config(registry, store, languages, ExecutorConfig::default())
    }

    pub fn with_config(
        registry: Arc<RuleRegistry>,
        store: Arc<dyn EntityStore>,
        languages: Arc<dyn LanguageProvider>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            registry,
            store,
            languages,
            config,
        }
    }

    /// Creates an executor configured from the environment (`TRANSIT_CONFIG`
    /// file, then env overrides).
    pub fn from_env(
        registry: Arc<RuleRegistry>,
        store: Arc<dyn EntityStore>,
        languages: Arc<dyn LanguageProvider>,
    ) -> Result<Self, EngineError> {
        let config = ExecutorConfig::load()?;
        Ok(Self::with_config(registry, store, languages, config))
    }

    /// Attempts transitions with every registered rule.
    pub fn transition_all(&self) -> Result<TransitionReport, EngineError> {
        self.run_rules("all", self.registry.get_all())
    }

    /// Attempts transitions with rules carrying the given tag.
    pub fn transition_of_type(&self, tag: &str) -> Result<TransitionReport, EngineError> {
        self.run_rules(tag, self.registry.get_by_tag(tag))
    }

    /// Attempts transitions with rules applying to the given entity type,
    /// optionally restricted to a bundle.
    pub fn transition_entities_of(
        &self,
        entity_type: &str,
        bundle: Option<&str>,
    ) -> Result<TransitionReport, EngineError> {
        self.run_rules(entity_type, self.registry.get_for(entity_type, bundle))
    }

    fn run_rules(
        &self,
        selection: &str,
        rules: Vec<Box<dyn TransitionRule>>,
    ) -> Result<TransitionReport, EngineError> {
        let run_id = Uuid::new_v4();
        tracing::info!(
            run_id = %run_id,
            selection,
            rules = rules.len(),
            "starting transition run"
        );

        let mut report = TransitionReport::default();
        for rule in &rules {
            let run = self.run_rule(rule.as_ref(), &mut report.failures)?;
            tracing::debug!(
                run_id = %run_id,
                rule = %run.rule,
                entities = run.entities,
                applied = run.applied,
                "rule run complete"
            );
            report.record(run);
        }

        tracing::info!(
            run_id = %run_id,
            entities = report.entities,
            applied = report.applied,
            failures = report.failures.len(),
            "transition run complete"
        );
        Ok(report)
    }

    /// Runs one rule: scoped query, bundle filter, rule narrowing, language
    /// expansion, then predicate + apply per entity handle.
    fn run_rule(
        &self,
        rule: &dyn TransitionRule,
        failures: &mut Vec<ApplyFailure>,
    ) -> Result<RuleRun, EngineError> {
        let rule_id = rule.definition().id.clone();
        let entity_type = rule.entity_type().to_string();

        let mut query = self.store.query(&entity_type);

        let bundles = rule.bundles();
        if !bundles.is_empty() {
            let bundle_values = bundles
                .iter()
                .map(|b| serde_json::Value::String(b.clone()))
                .collect();
            query.condition("bundle", serde_json::Value::Array(bundle_values), Operator::In);
        }

        let narrowing = rule.narrow_candidates(&mut query);

        let ids = self
            .store
            .execute(&query)
            .map_err(|source| EngineError::Query {
                rule: rule_id.clone(),
                source,
            })?;

        let entities =
            self.load_with_translations(&entity_type, &ids)
                .map_err(|source| EngineError::Load {
                    rule: rule_id.clone(),
                    source,
                })?;
        let loaded: u64 = entities.values().map(|by_id| by_id.len() as u64).sum();

        // The predicate remains the final line of defense per entity; it is
        // skipped only when the rule marked its filter precise AND the
        // configuration opts in.
        let skip_predicate = self.config.trust_narrowing && narrowing == Narrowing::Applied;

        let mut applied = 0u64;
        for (langcode, by_id) in &entities {
            for (id, entity) in by_id {
                if !skip_predicate && !rule.should_apply(entity) {
                    continue;
                }

                let mut entity = entity.clone();
                match rule.apply(&mut entity, self.store.as_ref()) {
                    Ok(()) => applied += 1,
                    Err(source) => match self.config.failure_policy {
                        FailurePolicy::FailFast => {
                            return Err(EngineError::Apply {
                                rule: rule_id,
                                entity_type,
                                entity_id: id.clone(),
                                langcode: langcode.clone(),
                                source,
                            });
                        }
                        FailurePolicy::Continue => {
                            tracing::warn!(
                                rule = %rule_id,
                                entity = %id,
                                langcode = %langcode,
                                error = %source,
                                "transition apply failed"
                            );
                            failures.push(ApplyFailure {
                                rule: rule_id.clone(),
                                entity_type: entity_type.clone(),
                                entity_id: id.clone(),
                                langcode: langcode.clone(),
                                reason: source.to_string(),
                            });
                        }
                    },
                }
            }
        }

        Ok(RuleRun {
            rule: rule_id,
            entities: loaded,
            applied,
        })
    }

    /// Loads candidate entities and expands them to their language variants.
    ///
    /// Queries return default-language entities only; the mutation target
    /// may be language-specific, so every translation is loaded and keyed by
    /// `(langcode, id)` for independent evaluation.
    fn load_with_translations(
        &self,
        entity_type: &str,
        ids: &[String],
    ) -> Result<LanguageEntitySet, StoreError> {
        let mut set = LanguageEntitySet::new();
        let entities = self.store.load_multiple(entity_type, ids)?;
        let languages = self.languages.languages();

        for entity in entities {
            for langcode in &languages {
                if *langcode == entity.langcode {
                    continue;
                }
                if let Some(translation) =
                    self.store.load_translation(entity_type, &entity.id, langcode)?
                {
                    set.entry(langcode.clone())
                        .or_default()
                        .insert(translation.id.clone(), translation);
                }
            }

            set.entry(entity.langcode.clone())
                .or_default()
                .insert(entity.id.clone(), entity);
        }

        Ok(set)
    }
}
