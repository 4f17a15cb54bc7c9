//! Text classifier abstractions for sensecheck.
//!
//! The gibberish model itself lives outside this crate. Evaluators only see
//! the [`TextClassifier`] capability: hand it a string plus settings, get
//! back whether the text passed validation.
//!
//! Implementations included here:
//! - [`CommandClassifier`]: runs an external classifier process over stdio.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

mod command;
mod factory;

pub use command::{CommandClassifier, CommandClassifierFactory};
pub use factory::{ClassifierFactory, ClassifierRegistry};

/// Errors from text classifiers.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    #[error("Classifier I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed classifier response: {0}")]
    Protocol(String),

    #[error("Classifier process exited with {status}: {stderr}")]
    Process { status: String, stderr: String },

    #[error("Classifier rejected input: {0}")]
    Rejected(String),
}

/// Granularity at which the classifier scores text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMethod {
    /// Score each sentence independently.
    #[default]
    Sentence,

    /// Score the whole text as one unit.
    Full,
}

impl ValidationMethod {
    /// Wire name of this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationMethod::Sentence => "sentence",
            ValidationMethod::Full => "full",
        }
    }
}

impl fmt::Display for ValidationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentence" => Ok(ValidationMethod::Sentence),
            "full" => Ok(ValidationMethod::Full),
            other => Err(format!(
                "unknown validation method '{}', expected 'sentence' or 'full'",
                other
            )),
        }
    }
}

/// What the classifier does when text fails validation.
///
/// Only `Noop` is supported: a failed validation is reported in the
/// outcome and never raised as an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OnFail {
    #[default]
    Noop,
}

/// Settings passed to the classifier with every call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClassifierSettings {
    /// Score above which text is flagged as gibberish (0.0 - 1.0)
    pub threshold: f64,

    /// Scoring granularity
    pub validation_method: ValidationMethod,

    /// Failure policy
    #[serde(default)]
    pub on_fail: OnFail,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            threshold: 0.75,
            validation_method: ValidationMethod::Sentence,
            on_fail: OnFail::Noop,
        }
    }
}

/// Result of classifying one piece of text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassificationOutcome {
    /// Whether the text satisfied the validator (i.e. is not gibberish)
    pub validation_passed: bool,
}

impl ClassificationOutcome {
    pub fn passed() -> Self {
        Self {
            validation_passed: true,
        }
    }

    pub fn failed() -> Self {
        Self {
            validation_passed: false,
        }
    }
}

/// A capability that judges whether text is gibberish.
///
/// Implementations must report a failed validation through
/// [`ClassificationOutcome`]; an `Err` means the classifier itself broke.
pub trait TextClassifier: Send + Sync {
    /// Classify `text` under the given settings.
    fn classify(
        &self,
        text: &str,
        settings: &ClassifierSettings,
    ) -> Result<ClassificationOutcome, ClassifierError>;

    /// Classifier name for logs.
    fn name(&self) -> &str;
}
