//! Evaluator config parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_config_schema;
use crate::classifier::{
    ClassifierError, ClassifierRegistry, ClassifierSettings, OnFail, ValidationMethod,
};

/// Default gibberish score cutoff.
pub const DEFAULT_THRESHOLD: f64 = 0.75;

/// Errors that can occur when loading a config.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Config does not match schema: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("Unknown classifier kind: {0}")]
    UnknownClassifier(String),

    #[error("Classifier setup failed: {0}")]
    Classifier(#[from] ClassifierError),
}

/// Classifier section of a config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierSpec {
    /// Registered classifier kind (e.g. "command")
    pub kind: String,

    /// Kind-specific configuration
    #[serde(default = "empty_object")]
    pub config: JsonValue,
}

fn empty_object() -> JsonValue {
    JsonValue::Object(Default::default())
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// Configuration of a gibberish evaluator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GibberishConfig {
    /// Scoring granularity
    #[serde(default)]
    pub validation_method: ValidationMethod,

    /// Score above which text is gibberish
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Classifier to build from a registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<ClassifierSpec>,
}

impl Default for GibberishConfig {
    fn default() -> Self {
        Self {
            validation_method: ValidationMethod::default(),
            threshold: DEFAULT_THRESHOLD,
            classifier: None,
        }
    }
}

impl GibberishConfig {
    /// Build a config from its two tuning parameters.
    pub fn new(validation_method: ValidationMethod, threshold: f64) -> Result<Self, ConfigError> {
        let config = Self {
            validation_method,
            threshold,
            classifier: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Attach a classifier section.
    pub fn with_classifier(mut self, kind: impl Into<String>, config: JsonValue) -> Self {
        self.classifier = Some(ClassifierSpec {
            kind: kind.into(),
            config,
        });
        self
    }

    /// Parse a config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let value: JsonValue = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a config from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a config file, picking the format from its extension.
    ///
    /// `.json` is read as JSON; anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_yaml_file(path)
        }
    }

    fn from_value(value: JsonValue) -> Result<Self, ConfigError> {
        // A blank document means "all defaults".
        let value = if value.is_null() { empty_object() } else { value };

        validate_config_schema(&value).map_err(ConfigError::SchemaError)?;

        let config: GibberishConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic checks the schema cannot express for programmatic configs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }

    /// Check the classifier section against the kinds `registry` can build.
    ///
    /// A config without a classifier section passes.
    pub fn validate_classifier(&self, registry: &ClassifierRegistry) -> Result<(), ConfigError> {
        let Some(spec) = &self.classifier else {
            return Ok(());
        };

        if !registry.has_kind(&spec.kind) {
            return Err(ConfigError::UnknownClassifier(spec.kind.clone()));
        }

        registry.validate(&spec.kind, &spec.config)?;
        Ok(())
    }

    /// Settings handed to the classifier on every call.
    pub fn classifier_settings(&self) -> ClassifierSettings {
        ClassifierSettings {
            threshold: self.threshold,
            validation_method: self.validation_method,
            on_fail: OnFail::Noop,
        }
    }
}
