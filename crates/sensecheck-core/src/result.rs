//! Evaluation results and metrics.
//!
//! Serialization is sparse: optional fields that are `None` never appear as
//! keys in the output.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::request::EvaluationRequest;

/// Identifier of a reported metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    /// Boolean pass/fail outcome
    Passed,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Passed => "passed",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single metric value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalResultMetric {
    pub id: MetricType,
    pub value: bool,
}

impl EvalResultMetric {
    pub fn passed(value: bool) -> Self {
        Self {
            id: MetricType::Passed,
            value,
        }
    }
}

/// Outcome of one evaluator invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalResult {
    /// Evaluator identifier
    pub name: String,

    /// Human-readable evaluator name
    pub display_name: String,

    /// Echo of the request
    pub data: EvaluationRequest,

    /// True when the evaluated text did not pass
    pub failure: bool,

    /// Why the evaluator decided as it did
    pub reason: String,

    /// Wall-clock evaluation time in whole milliseconds
    pub runtime: u64,

    /// Model used for grading, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    pub metrics: Vec<EvalResultMetric>,
}

impl EvalResult {
    /// Value of a metric, if reported.
    pub fn metric(&self, id: MetricType) -> Option<bool> {
        self.metrics.iter().find(|m| m.id == id).map(|m| m.value)
    }

    /// Sparse JSON representation.
    pub fn to_json(&self) -> JsonValue {
        // Serializing plain data with string keys cannot fail.
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(model: Option<String>) -> EvalResult {
        EvalResult {
            name: "NotGibberishText".to_string(),
            display_name: "Not Gibberish Text".to_string(),
            data: EvaluationRequest::with_response("hello"),
            failure: false,
            reason: "Text is sensible".to_string(),
            runtime: 3,
            model,
            metrics: vec![EvalResultMetric::passed(true)],
        }
    }

    #[test]
    fn test_metric_type_serializes_as_passed() {
        let value = serde_json::to_value(EvalResultMetric::passed(false)).unwrap();
        assert_eq!(value, serde_json::json!({"id": "passed", "value": false}));
    }

    #[test]
    fn test_absent_model_is_omitted() {
        let json = sample(None).to_json();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("model"));
        let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["data", "display_name", "failure", "metrics", "name", "reason", "runtime"]
        );
    }

    #[test]
    fn test_present_model_is_kept() {
        let json = sample(Some("gpt-4o".to_string())).to_json();
        assert_eq!(json["model"], "gpt-4o");
    }

    #[test]
    fn test_data_echoes_request() {
        let json = sample(None).to_json();
        assert_eq!(json["data"], serde_json::json!({"response": "hello"}));
    }

    #[test]
    fn test_metric_lookup() {
        let result = sample(None);
        assert_eq!(result.metric(MetricType::Passed), Some(true));
    }

    #[test]
    fn test_deserialize_sparse() {
        let json = sample(None).to_json();
        let back: EvalResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.model, None);
    }
}
