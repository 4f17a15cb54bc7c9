//! Evaluation requests and shared argument validation.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::EvaluationError;

/// Field holding the text under evaluation.
pub const RESPONSE_FIELD: &str = "response";

/// A key-value bundle handed to an evaluator.
///
/// The whole mapping is echoed back in the result's `data` field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct EvaluationRequest {
    fields: BTreeMap<String, JsonValue>,
}

impl EvaluationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request with only a `response` field.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::new().field(RESPONSE_FIELD, response.into())
    }

    /// Parse a request from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Add or replace a field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn fields(&self) -> &BTreeMap<String, JsonValue> {
        &self.fields
    }

    /// Fetch a required text field.
    pub fn text(&self, name: &str) -> Result<&str, EvaluationError> {
        match self.fields.get(name) {
            None => Err(EvaluationError::MissingArgument(name.to_string())),
            Some(JsonValue::String(s)) => Ok(s),
            Some(_) => Err(EvaluationError::InvalidArgument {
                name: name.to_string(),
                expected: "string",
            }),
        }
    }

    /// The `response` text.
    pub fn response(&self) -> Result<&str, EvaluationError> {
        self.text(RESPONSE_FIELD)
    }
}

impl From<BTreeMap<String, JsonValue>> for EvaluationRequest {
    fn from(fields: BTreeMap<String, JsonValue>) -> Self {
        Self { fields }
    }
}

/// Check that every required argument is present.
///
/// Reports the first missing name in declaration order.
pub fn validate_args(required: &[&str], request: &EvaluationRequest) -> Result<(), EvaluationError> {
    match required.iter().find(|name| !request.contains(name)) {
        Some(name) => Err(EvaluationError::MissingArgument(name.to_string())),
        None => Ok(()),
    }
}
