//! insurance-risk: one-shot questionnaire prediction.
//!
//! Reads one questionnaire as JSON (from a file, or stdin when the path is `-`
//! or omitted), loads the per-bracket artifacts, and prints the prediction as
//! JSON on stdout. Logs go to stderr or a file, never stdout.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use insurance_risk::adapters::FsArtifactStore;
use insurance_risk::config::{LogSink, Settings};
use insurance_risk::{AgeBracket, FeatureVector, Questionnaire};

/// Predict the risk class for one insurance questionnaire
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Questionnaire JSON file ("-" or omitted reads stdin)
    questionnaire: Option<PathBuf>,

    /// Artifact directory (overrides RISK_ARTIFACTS_DIR)
    #[arg(short, long)]
    artifacts: Option<PathBuf>,

    /// Load artifacts without an integrity manifest
    #[arg(long)]
    allow_unsealed: bool,

    /// Include the scaled feature vector in the output
    #[arg(long)]
    show_features: bool,
}

#[derive(Serialize)]
struct Output {
    class: i64,
    bracket: AgeBracket,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<FeatureVector>,
}

fn init_logging(sink: &LogSink) -> Result<WorkerGuard> {
    let (writer, guard) = match sink {
        LogSink::File(path) => {
            if let Some(parent) = path.parent() {
                // Best-effort: opening the file below reports the real error.
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {path:?}"))?;
            tracing_appender::non_blocking(file)
        }
        LogSink::Stderr => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(matches!(sink, LogSink::Stderr)),
        )
        .init();

    Ok(guard)
}

fn read_questionnaire(path: Option<&PathBuf>) -> Result<Questionnaire> {
    let raw = match path {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read questionnaire {p:?}"))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read questionnaire from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("Questionnaire must be a JSON object of numbers and strings")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::from_env();
    if let Some(dir) = args.artifacts.clone() {
        settings.artifacts_dir = dir;
    }
    settings.allow_unsealed |= args.allow_unsealed;

    let _guard = init_logging(&settings.log_sink)?;
    tracing::info!("Starting insurance-risk...");

    let questionnaire = read_questionnaire(args.questionnaire.as_ref())?;

    let service = FsArtifactStore::new(&settings.artifacts_dir)
        .allow_unsealed(settings.allow_unsealed)
        .load()
        .with_context(|| format!("Failed to load artifacts from {:?}", settings.artifacts_dir))?
        .into_service();

    let prepared = service.preprocess(&questionnaire)?;
    let prediction = service.infer(&prepared)?;

    let output = Output {
        class: prediction.class,
        bracket: prediction.bracket,
        features: args.show_features.then_some(prepared.features),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
