//! `sensecheck` command line.
//!
//! Exit codes: 0 when the text is sensible (or the config is valid), 1 when
//! it is gibberish (or the config is invalid), 2 on any error.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sensecheck_core::{
    ClassifierRegistry, CommandClassifier, ConfigError, EvaluationRequest, Evaluator, GibberishConfig,
    GibberishEvaluator, ValidationMethod,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sensecheck", version, about = "Flag gibberish model responses")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate one request and print the result as JSON
    Evaluate(EvaluateArgs),

    /// Check a config file against the schema
    ValidateConfig {
        /// Config file (YAML, or JSON with a .json extension)
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Evaluator config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON request file containing a "response" field
    #[arg(short, long, conflicts_with = "response")]
    input: Option<PathBuf>,

    /// Response text to evaluate
    #[arg(short, long)]
    response: Option<String>,

    /// Classifier program (overrides the config's classifier section)
    #[arg(long)]
    classifier_cmd: Option<String>,

    /// Argument passed to the classifier program (repeatable)
    #[arg(long = "classifier-arg", allow_hyphen_values = true)]
    classifier_args: Vec<String>,

    /// Override the config's validation method
    #[arg(long)]
    validation_method: Option<ValidationMethod>,

    /// Override the config's threshold
    #[arg(long)]
    threshold: Option<f64>,

    /// Pretty-print the result
    #[arg(long)]
    pretty: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GibberishConfig> {
    match path {
        Some(path) => GibberishConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(GibberishConfig::default()),
    }
}

fn load_request(args: &EvaluateArgs) -> Result<EvaluationRequest> {
    if let Some(text) = &args.response {
        return Ok(EvaluationRequest::with_response(text.clone()));
    }

    let Some(path) = &args.input else {
        bail!("Provide either --input <file> or --response <text>");
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request {}", path.display()))?;
    EvaluationRequest::from_json(&raw)
        .with_context(|| format!("Request {} is not a JSON object", path.display()))
}

fn build_evaluator(args: &EvaluateArgs) -> Result<GibberishEvaluator> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(method) = args.validation_method {
        config.validation_method = method;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }

    let evaluator = match &args.classifier_cmd {
        Some(program) => {
            let classifier = CommandClassifier::new(program.clone(), args.classifier_args.clone());
            GibberishEvaluator::new(config, Arc::new(classifier))?
        }
        None if config.classifier.is_some() => {
            GibberishEvaluator::from_registry(config, &ClassifierRegistry::with_defaults())?
        }
        None => bail!("No classifier configured: pass --classifier-cmd or add a classifier section"),
    };

    debug!(?evaluator, "Evaluator ready");
    Ok(evaluator)
}

fn run_evaluate(args: EvaluateArgs) -> Result<bool> {
    let evaluator = build_evaluator(&args)?;
    let request = load_request(&args)?;

    let result = evaluator.evaluate(&request)?;
    info!(failure = result.failure, runtime_ms = result.runtime, "Evaluation finished");

    let json = result.to_json();
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    println!("{}", rendered);

    Ok(!result.failure)
}

fn run_validate_config(path: &Path) -> Result<bool> {
    match GibberishConfig::from_file(path) {
        Ok(config) => {
            if let Err(e) = config.validate_classifier(&ClassifierRegistry::with_defaults()) {
                eprintln!("{}: {}", path.display(), e);
                return Ok(false);
            }
            println!(
                "{}: ok (validation_method={}, threshold={})",
                path.display(),
                config.validation_method,
                config.threshold
            );
            Ok(true)
        }
        Err(ConfigError::IoError(e)) => {
            Err(e).with_context(|| format!("Failed to read config {}", path.display()))
        }
        Err(ConfigError::SchemaError(errors)) => {
            eprintln!("{}: does not match schema", path.display());
            for error in &errors {
                eprintln!("  - {}", error);
            }
            Ok(false)
        }
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            Ok(false)
        }
    }
}

/// Exit status for a command outcome: 0 pass, 1 gibberish or invalid, 2 error.
fn exit_status(outcome: &Result<bool>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Evaluate(args) => run_evaluate(args),
        Commands::ValidateConfig { path } => run_validate_config(&path),
    };

    if let Err(e) = &outcome {
        eprintln!("Error: {:#}", e);
    }
    ExitCode::from(exit_status(&outcome))
}
