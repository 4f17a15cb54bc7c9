//! Classifier backed by an external process.
//!
//! Protocol: one JSON object is written to the child's stdin,
//!
//! ```json
//! {"text": "...", "threshold": 0.75, "validation_method": "sentence", "on_fail": "noop"}
//! ```
//!
//! and the child must print `{"validation_passed": true|false}` on stdout and
//! exit with status 0. A child that refuses the input prints
//! `{"error": "..."}` instead, which surfaces as [`ClassifierError::Rejected`].
//!
//! The payload is written from a separate thread while the caller drains
//! stdout and stderr, so a child may produce output before it has read all
//! of its input.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use super::{
    ClassificationOutcome, ClassifierError, ClassifierFactory, ClassifierSettings, TextClassifier,
};

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Outcome(ClassificationOutcome),
    Rejected { error: String },
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
    #[serde(flatten)]
    settings: &'a ClassifierSettings,
}

/// Configuration for [`CommandClassifier`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandConfig {
    /// Program to execute
    pub program: String,

    /// Arguments passed to the program
    #[serde(default)]
    pub args: Vec<String>,
}

/// Runs an external classifier program once per call.
#[derive(Debug, Clone)]
pub struct CommandClassifier {
    config: CommandConfig,
    name: String,
}

impl CommandClassifier {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        let program = program.into();
        Self {
            name: format!("command:{}", program),
            config: CommandConfig { program, args },
        }
    }

    pub fn from_config(config: CommandConfig) -> Self {
        Self::new(config.program, config.args)
    }

    fn parse_stdout(stdout: &[u8]) -> Result<ClassificationOutcome, ClassifierError> {
        let text = String::from_utf8_lossy(stdout);
        let line = text
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .ok_or_else(|| ClassifierError::Protocol("empty output".to_string()))?;

        let response: ClassifyResponse = serde_json::from_str(line.trim())
            .map_err(|e| ClassifierError::Protocol(format!("{}: {}", e, line.trim())))?;

        match response {
            ClassifyResponse::Outcome(outcome) => Ok(outcome),
            ClassifyResponse::Rejected { error } => Err(ClassifierError::Rejected(error)),
        }
    }
}

impl TextClassifier for CommandClassifier {
    fn classify(
        &self,
        text: &str,
        settings: &ClassifierSettings,
    ) -> Result<ClassificationOutcome, ClassifierError> {
        let payload = serde_json::to_vec(&ClassifyRequest { text, settings })
            .map_err(|e| ClassifierError::Protocol(e.to_string()))?;

        debug!(program = %self.config.program, bytes = payload.len(), "Spawning classifier");

        let mut child = Command::new(&self.config.program)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || -> io::Result<()> {
                stdin.write_all(&payload)?;
                stdin.write_all(b"\n")
            })
        });

        let output = child.wait_with_output()?;

        let write_result = match writer {
            Some(handle) => handle.join().map_err(|_| {
                ClassifierError::Unavailable("classifier stdin writer panicked".to_string())
            })?,
            None => Ok(()),
        };

        if !output.status.success() {
            return Err(ClassifierError::Process {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // A child may answer without consuming all of its input.
        match write_result {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
            _ => {}
        }

        Self::parse_stdout(&output.stdout)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Registers [`CommandClassifier`] under the kind `"command"`.
pub struct CommandClassifierFactory;

impl ClassifierFactory for CommandClassifierFactory {
    fn kind(&self) -> &'static str {
        "command"
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn TextClassifier>, ClassifierError> {
        self.validate_config(config)?;
        let config: CommandConfig = serde_json::from_value(config.clone())
            .map_err(|e| ClassifierError::Unavailable(format!("invalid command config: {}", e)))?;
        Ok(Arc::new(CommandClassifier::from_config(config)))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ClassifierError> {
        match config.get("program").and_then(|p| p.as_str()) {
            Some(p) if !p.trim().is_empty() => {}
            _ => {
                return Err(ClassifierError::Unavailable(
                    "command classifier requires a non-empty 'program'".to_string(),
                ))
            }
        }

        if let Some(args) = config.get("args") {
            let all_strings = args
                .as_array()
                .map(|a| a.iter().all(|v| v.is_string()))
                .unwrap_or(false);
            if !all_strings {
                return Err(ClassifierError::Unavailable(
                    "'args' must be an array of strings".to_string(),
                ));
            }
        }

        Ok(())
    }

    fn description(&self) -> &'static str {
        "External classifier process speaking JSON over stdio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stdout_takes_last_line() {
        let out = b"loading model...\n{\"validation_passed\": false}\n\n";
        let outcome = CommandClassifier::parse_stdout(out).unwrap();
        assert!(!outcome.validation_passed);
    }

    #[test]
    fn test_parse_stdout_empty() {
        let result = CommandClassifier::parse_stdout(b"  \n");
        assert!(matches!(result, Err(ClassifierError::Protocol(_))));
    }

    #[test]
    fn test_request_payload_shape() {
        let settings = ClassifierSettings::default();
        let value = serde_json::to_value(ClassifyRequest {
            text: "hello",
            settings: &settings,
        })
        .unwrap();
        assert_eq!(value["text"], "hello");
        assert_eq!(value["threshold"], 0.75);
        assert_eq!(value["validation_method"], "sentence");
        assert_eq!(value["on_fail"], "noop");
    }

    #[test]
    fn test_factory_validate_config() {
        let factory = CommandClassifierFactory;
        assert!(factory
            .validate_config(&serde_json::json!({"program": "guard"}))
            .is_ok());
        assert!(factory
            .validate_config(&serde_json::json!({"program": "guard", "args": ["-q"]}))
            .is_ok());
        assert!(factory.validate_config(&serde_json::json!({})).is_err());
        assert!(factory
            .validate_config(&serde_json::json!({"program": "guard", "args": "-q"}))
            .is_err());
    }

    #[test]
    fn test_factory_create_names_classifier() {
        let classifier = CommandClassifierFactory
            .create(&serde_json::json!({"program": "guard"}))
            .unwrap();
        assert_eq!(classifier.name(), "command:guard");
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let classifier = CommandClassifier::new("sensecheck-no-such-program-xyz", vec![]);
        let result = classifier.classify("text", &ClassifierSettings::default());
        assert!(matches!(result, Err(ClassifierError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_classifier_round_trip() {
        let classifier = CommandClassifier::new(
            "sh",
            vec![
                "-c".to_string(),
                r#"cat > /dev/null; echo '{"validation_passed": true}'"#.to_string(),
            ],
        );
        let outcome = classifier
            .classify("The quick brown fox.", &ClassifierSettings::default())
            .unwrap();
        assert!(outcome.validation_passed);
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_classifier_nonzero_exit() {
        let classifier = CommandClassifier::new(
            "sh",
            vec![
                "-c".to_string(),
                "cat > /dev/null; echo 'model not found' >&2; exit 3".to_string(),
            ],
        );
        let result = classifier.classify("text", &ClassifierSettings::default());
        match result {
            Err(ClassifierError::Process { stderr, .. }) => {
                assert_eq!(stderr, "model not found");
            }
            other => panic!("Expected Process error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_stdout_rejection() {
        let out = b"{\"error\": \"text exceeds model context\"}\n";
        match CommandClassifier::parse_stdout(out) {
            Err(ClassifierError::Rejected(msg)) => assert_eq!(msg, "text exceeds model context"),
            other => panic!("Expected Rejected error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_stdout_unknown_shape() {
        let result = CommandClassifier::parse_stdout(b"{\"score\": 0.2}\n");
        assert!(matches!(result, Err(ClassifierError::Protocol(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_child_echoing_large_input_does_not_block() {
        // echoes the whole payload back before answering
        let classifier = CommandClassifier::new(
            "sh",
            vec![
                "-c".to_string(),
                r#"cat; echo '{"validation_passed": true}'"#.to_string(),
            ],
        );
        let text = "word ".repeat(100_000);
        let outcome = classifier
            .classify(&text, &ClassifierSettings::default())
            .unwrap();
        assert!(outcome.validation_passed);
    }

    #[cfg(unix)]
    #[test]
    fn test_child_exiting_before_reading_reports_process_error() {
        let classifier = CommandClassifier::new(
            "sh",
            vec![
                "-c".to_string(),
                "echo 'model not found' >&2; exit 3".to_string(),
            ],
        );
        let text = "x".repeat(1024 * 1024);
        match classifier.classify(&text, &ClassifierSettings::default()) {
            Err(ClassifierError::Process { stderr, .. }) => {
                assert_eq!(stderr, "model not found");
            }
            other => panic!("Expected Process error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_child_rejection_surfaces() {
        let classifier = CommandClassifier::new(
            "sh",
            vec![
                "-c".to_string(),
                r#"cat > /dev/null; echo '{"error": "unsupported language"}'"#.to_string(),
            ],
        );
        let result = classifier.classify("texte", &ClassifierSettings::default());
        assert!(matches!(result, Err(ClassifierError::Rejected(msg)) if msg == "unsupported language"));
    }
}
