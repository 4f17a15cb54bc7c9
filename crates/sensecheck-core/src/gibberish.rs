//! Not-Gibberish evaluator.
//!
//! Passes when the response text is sensible, fails when the classifier
//! judges it gibberish. The judgment itself is delegated to a
//! [`TextClassifier`].

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use crate::classifier::{ClassifierRegistry, ClassifierSettings, TextClassifier};
use crate::config::{ConfigError, GibberishConfig};
use crate::evaluator::Evaluator;
use crate::request::{EvaluationRequest, RESPONSE_FIELD};
use crate::result::{EvalResult, EvalResultMetric, MetricType};
use crate::EvaluationError;

pub const REASON_SENSIBLE: &str = "Text is sensible";
pub const REASON_GIBBERISH: &str = "Text is gibberish";

const REQUIRED_ARGS: &[&str] = &[RESPONSE_FIELD];

/// Flags gibberish responses.
pub struct GibberishEvaluator {
    config: GibberishConfig,
    settings: ClassifierSettings,
    classifier: Arc<dyn TextClassifier>,
}

impl GibberishEvaluator {
    /// Create an evaluator over `classifier`.
    pub fn new(
        config: GibberishConfig,
        classifier: Arc<dyn TextClassifier>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let settings = config.classifier_settings();
        Ok(Self {
            config,
            settings,
            classifier,
        })
    }

    /// Sentence-level validation at threshold 0.75.
    pub fn with_defaults(classifier: Arc<dyn TextClassifier>) -> Self {
        let config = GibberishConfig::default();
        Self {
            settings: config.classifier_settings(),
            config,
            classifier,
        }
    }

    /// Build the classifier named in `config` from `registry`.
    pub fn from_registry(
        config: GibberishConfig,
        registry: &ClassifierRegistry,
    ) -> Result<Self, ConfigError> {
        config.validate_classifier(registry)?;
        let spec = config
            .classifier
            .as_ref()
            .ok_or_else(|| ConfigError::UnknownClassifier("<none configured>".to_string()))?;

        let classifier = registry.create(&spec.kind, &spec.config)?;
        Self::new(config, classifier)
    }

    pub fn config(&self) -> &GibberishConfig {
        &self.config
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }
}

impl std::fmt::Debug for GibberishEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GibberishEvaluator")
            .field("config", &self.config)
            .field("classifier", &self.classifier.name())
            .finish()
    }
}

impl Evaluator for GibberishEvaluator {
    fn name(&self) -> &str {
        "NotGibberishText"
    }

    fn display_name(&self) -> &str {
        "Not Gibberish Text"
    }

    fn metric_ids(&self) -> Vec<MetricType> {
        vec![MetricType::Passed]
    }

    fn required_args(&self) -> &[&'static str] {
        REQUIRED_ARGS
    }

    fn evaluate(&self, request: &EvaluationRequest) -> Result<EvalResult, EvaluationError> {
        self.validate_args(request)?;
        let text = request.response()?;

        let start = Instant::now();
        let outcome = self
            .classifier
            .classify(text, &self.settings)
            .map_err(|e| {
                error!(classifier = self.classifier.name(), "Error occurred during eval: {}", e);
                e
            })?;
        let runtime = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let passed = outcome.validation_passed;
        debug!(
            classifier = self.classifier.name(),
            passed,
            runtime_ms = runtime,
            "Gibberish evaluation complete"
        );

        Ok(EvalResult {
            name: self.name().to_string(),
            display_name: self.display_name().to_string(),
            data: request.clone(),
            failure: self.is_failure(passed),
            reason: (if passed { REASON_SENSIBLE } else { REASON_GIBBERISH }).to_string(),
            runtime,
            model: None,
            metrics: vec![EvalResultMetric::passed(passed)],
        })
    }
}
