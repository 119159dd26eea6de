use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use newscheck::config::{ARTIFACT_DIR_ENV, DEFAULT_MODEL_FILE, DEFAULT_VECTORIZER_FILE};
use newscheck::frontend::startup_failure_message;
use newscheck::{load_classifier, ArtifactConfig, NewsChecker, RuntimeConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the classifier and vectorizer artifacts
    #[arg(short, long, env = ARTIFACT_DIR_ENV)]
    artifact_dir: Option<PathBuf>,

    /// Classifier artifact (.onnx or linear .json), relative to the artifact directory
    #[arg(short, long, default_value = DEFAULT_MODEL_FILE)]
    model: PathBuf,

    /// Vectorizer artifact (.json), relative to the artifact directory
    #[arg(short, long, default_value = DEFAULT_VECTORIZER_FILE)]
    vectorizer: PathBuf,

    /// Expected SHA-256 of the classifier artifact
    #[arg(long)]
    model_sha256: Option<String>,

    /// Expected SHA-256 of the vectorizer artifact
    #[arg(long)]
    vectorizer_sha256: Option<String>,

    /// ONNX Runtime intra-op threads (0 lets the runtime decide)
    #[arg(long, default_value_t = 0)]
    intra_threads: usize,

    /// Check a single text and exit instead of starting the interactive screen
    #[arg(short, long)]
    text: Option<String>,
}

impl Args {
    fn artifact_config(&self) -> ArtifactConfig {
        let dir = self
            .artifact_dir
            .clone()
            .unwrap_or_else(ArtifactConfig::default_artifact_dir);
        ArtifactConfig::new(dir)
            .with_model_file(&self.model)
            .with_vectorizer_file(&self.vectorizer)
            .with_checksums(self.model_sha256.clone(), self.vectorizer_sha256.clone())
            .with_runtime(RuntimeConfig::default().with_intra_threads(self.intra_threads))
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();
    let config = args.artifact_config();

    info!("=== Starting Fake News Detector ===");
    info!("Artifact directory: {:?}", config.artifact_dir);

    let start_time = Instant::now();
    let classifier = match load_classifier(&config) {
        Ok(classifier) => classifier,
        Err(e) => {
            error!("Startup failed: {}", e);
            eprintln!("{}", startup_failure_message(&e));
            return Ok(ExitCode::FAILURE);
        }
    };
    let info = classifier.info();
    info!(
        "=== Classifier Loaded ({} backend, {} features, took {:.2?}) ===",
        info.backend,
        info.num_features,
        start_time.elapsed()
    );

    let checker = NewsChecker::new(classifier);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(text) = &args.text {
        let outcome = checker
            .submit(text, &mut out)
            .context("Failed to write result")?;
        out.flush()?;
        return Ok(ExitCode::from(outcome.exit_code()));
    }

    let stdin = io::stdin();
    let submissions = checker
        .run_interactive(stdin.lock(), &mut out)
        .context("Interactive session failed")?;
    info!("=== Session Complete ({} submissions) ===", submissions);

    Ok(ExitCode::SUCCESS)
}
