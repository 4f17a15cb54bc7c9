//! Factory pattern for registering classifier kinds by name.
//!
//! A configuration file names a classifier kind (e.g. `"command"`) plus a
//! kind-specific JSON blob; the registry turns that into a live classifier.
//!
//! ```ignore
//! let registry = ClassifierRegistry::with_defaults();
//! let classifier = registry.create("command", &json!({"program": "gibberish-guard"}))?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::{ClassifierError, TextClassifier};

/// Builds classifiers of one kind from JSON configuration.
pub trait ClassifierFactory: Send + Sync {
    /// Unique identifier for this classifier kind.
    fn kind(&self) -> &'static str;

    /// Create a classifier from kind-specific configuration.
    fn create(&self, config: &JsonValue) -> Result<Arc<dyn TextClassifier>, ClassifierError>;

    /// Validate configuration without creating a classifier.
    fn validate_config(&self, config: &JsonValue) -> Result<(), ClassifierError>;

    /// Human-readable description of this classifier kind.
    fn description(&self) -> &'static str {
        "Text classifier"
    }
}

/// Registry of available classifier factories, keyed by kind.
#[derive(Default)]
pub struct ClassifierRegistry {
    factories: BTreeMap<String, Arc<dyn ClassifierFactory>>,
}

impl ClassifierRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in classifier kinds registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(super::CommandClassifierFactory));
        registry
    }

    /// Register a factory. An existing factory of the same kind is replaced.
    pub fn register(&mut self, factory: Arc<dyn ClassifierFactory>) {
        self.factories.insert(factory.kind().to_string(), factory);
    }

    /// Create a classifier of `kind` from `config`.
    pub fn create(
        &self,
        kind: &str,
        config: &JsonValue,
    ) -> Result<Arc<dyn TextClassifier>, ClassifierError> {
        self.factory(kind)?.create(config)
    }

    /// Validate configuration for a classifier kind.
    pub fn validate(&self, kind: &str, config: &JsonValue) -> Result<(), ClassifierError> {
        self.factory(kind)?.validate_config(config)
    }

    /// List registered classifier kinds.
    pub fn available_kinds(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    /// Check if a classifier kind is registered.
    pub fn has_kind(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    fn factory(&self, kind: &str) -> Result<&Arc<dyn ClassifierFactory>, ClassifierError> {
        self.factories.get(kind).ok_or_else(|| {
            ClassifierError::Unavailable(format!(
                "Unknown classifier kind: '{}'. Available: {:?}",
                kind,
                self.available_kinds()
            ))
        })
    }
}

impl std::fmt::Debug for ClassifierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierRegistry")
            .field("kinds", &self.available_kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassificationOutcome, ClassifierSettings};

    struct FixedClassifier {
        name: String,
        passed: bool,
    }

    impl TextClassifier for FixedClassifier {
        fn classify(
            &self,
            _text: &str,
            _settings: &ClassifierSettings,
        ) -> Result<ClassificationOutcome, ClassifierError> {
            Ok(ClassificationOutcome {
                validation_passed: self.passed,
            })
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    struct FixedClassifierFactory;

    impl ClassifierFactory for FixedClassifierFactory {
        fn kind(&self) -> &'static str {
            "fixed"
        }

        fn create(&self, config: &JsonValue) -> Result<Arc<dyn TextClassifier>, ClassifierError> {
            self.validate_config(config)?;
            let name = config["name"].as_str().unwrap_or("fixed").to_string();
            let passed = config["passed"].as_bool().unwrap_or(true);
            Ok(Arc::new(FixedClassifier { name, passed }))
        }

        fn validate_config(&self, config: &JsonValue) -> Result<(), ClassifierError> {
            if !config["passed"].is_null() && !config["passed"].is_boolean() {
                return Err(ClassifierError::Unavailable(
                    "'passed' must be a boolean".to_string(),
                ));
            }
            Ok(())
        }
    }

    #[test]
    fn test_registry_register_and_create() {
        let mut registry = ClassifierRegistry::new();
        registry.register(Arc::new(FixedClassifierFactory));

        assert!(registry.has_kind("fixed"));
        assert!(!registry.has_kind("unknown"));

        let config = serde_json::json!({"name": "always-fails", "passed": false});
        let classifier = registry.create("fixed", &config).unwrap();
        assert_eq!(classifier.name(), "always-fails");

        let outcome = classifier
            .classify("anything", &ClassifierSettings::default())
            .unwrap();
        assert!(!outcome.validation_passed);
    }

    #[test]
    fn test_registry_unknown_kind() {
        let registry = ClassifierRegistry::new();
        let result = registry.create("unknown", &serde_json::json!({}));

        match result {
            Err(ClassifierError::Unavailable(msg)) => {
                assert!(msg.contains("Unknown classifier kind"));
            }
            _ => panic!("Expected Unavailable error"),
        }
    }

    #[test]
    fn test_registry_validate() {
        let mut registry = ClassifierRegistry::new();
        registry.register(Arc::new(FixedClassifierFactory));

        assert!(registry.validate("fixed", &serde_json::json!({})).is_ok());
        assert!(registry
            .validate("fixed", &serde_json::json!({"passed": "yes"}))
            .is_err());
        assert!(registry.validate("unknown", &serde_json::json!({})).is_err());
    }

    #[test]
    fn test_with_defaults_has_command() {
        let registry = ClassifierRegistry::with_defaults();
        assert_eq!(registry.available_kinds(), vec!["command"]);
    }
}
