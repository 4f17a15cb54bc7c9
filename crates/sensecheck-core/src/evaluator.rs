//! The evaluator contract shared by every evaluator a harness can run.

use crate::request::{validate_args, EvaluationRequest};
use crate::result::{EvalResult, MetricType};
use crate::EvaluationError;

/// An evaluator turns one request into one [`EvalResult`].
///
/// Evaluators are stateless per call and may be shared across threads.
pub trait Evaluator: Send + Sync {
    /// Stable identifier, e.g. "NotGibberishText".
    fn name(&self) -> &str;

    /// Human-readable name.
    fn display_name(&self) -> &str;

    /// Metrics this evaluator reports.
    fn metric_ids(&self) -> Vec<MetricType>;

    /// Request fields that must be present.
    fn required_args(&self) -> &[&'static str];

    /// Example requests for documentation and smoke tests.
    fn examples(&self) -> &[EvaluationRequest] {
        &[]
    }

    /// Map the evaluator's raw outcome to the result's failure flag.
    fn is_failure(&self, passed: bool) -> bool {
        !passed
    }

    /// Check required arguments before any work starts.
    fn validate_args(&self, request: &EvaluationRequest) -> Result<(), EvaluationError> {
        validate_args(self.required_args(), request)
    }

    /// Evaluate a single request.
    fn evaluate(&self, request: &EvaluationRequest) -> Result<EvalResult, EvaluationError>;

    /// Evaluate requests in order, stopping at the first error.
    fn evaluate_batch(
        &self,
        requests: &[EvaluationRequest],
    ) -> Result<Vec<EvalResult>, EvaluationError> {
        requests.iter().map(|r| self.evaluate(r)).collect()
    }
}
