//! # sensecheck-core
//!
//! Gibberish-text evaluation over a pluggable text classifier.
//!
//! The crate answers one question about a model response: is this text
//! sensible, or is it gibberish? The scoring model is not part of this
//! crate; it sits behind the [`TextClassifier`] trait and can be an
//! in-process implementation or an external program ([`CommandClassifier`]).
//!
//! ## Key Guarantees
//!
//! 1. **Fail-fast arguments**: a missing `response` is rejected before the
//!    classifier is called or any timing starts
//! 2. **`failure == !passed`** for every result
//! 3. **Sparse output**: absent fields never appear in serialized results
//! 4. **No recovery**: classifier errors are logged and returned unchanged
//!
//! ## Example
//!
//! ```rust,ignore
//! use sensecheck_core::{CommandClassifier, EvaluationRequest, Evaluator, GibberishEvaluator};
//!
//! let classifier = CommandClassifier::new("gibberish-guard", vec![]);
//! let evaluator = GibberishEvaluator::with_defaults(Arc::new(classifier));
//!
//! let request = EvaluationRequest::with_response("The quick brown fox jumps over the lazy dog.");
//! let result = evaluator.evaluate(&request)?;
//! assert_eq!(result.reason, "Text is sensible");
//! ```

pub mod classifier;
pub mod config;
pub mod evaluator;
pub mod gibberish;
pub mod request;
pub mod result;

pub use classifier::{
    ClassificationOutcome, ClassifierError, ClassifierFactory, ClassifierRegistry,
    ClassifierSettings, CommandClassifier, OnFail, TextClassifier, ValidationMethod,
};
pub use config::{ConfigError, GibberishConfig};
pub use evaluator::Evaluator;
pub use gibberish::{GibberishEvaluator, REASON_GIBBERISH, REASON_SENSIBLE};
pub use request::{validate_args, EvaluationRequest};
pub use result::{EvalResult, EvalResultMetric, MetricType};

use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid argument '{name}': expected {expected}")]
    InvalidArgument { name: String, expected: &'static str },

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}
