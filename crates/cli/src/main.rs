mod settings;

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use facematch_core::matching::match_faces_use_case::MatchFacesUseCase;
use facematch_core::matching::match_logger::LogMatchLogger;
use facematch_core::reports::infrastructure::json_reports::{parse_candidates, render_matches};
use facematch_core::shared::constants::{
    EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};
use facematch_core::shared::model_resolver;
use facematch_core::verification::domain::face_locator::FaceLocator;
use facematch_core::verification::domain::face_verifier::FaceVerifier;
use facematch_core::verification::infrastructure::command_verifier::CommandVerifier;
use facematch_core::verification::infrastructure::embedding_face_verifier::EmbeddingFaceVerifier;
use facematch_core::verification::infrastructure::full_image_locator::FullImageLocator;
use facematch_core::verification::infrastructure::onnx_arcface_embedder::OnnxArcFaceEmbedder;
use facematch_core::verification::infrastructure::onnx_yolo_locator::OnnxYoloFaceLocator;
use facematch_core::verification::infrastructure::unavailable_verifier::UnavailableVerifier;

use settings::{Detector, Settings};

/// Match a user photo against missing-person reports.
///
/// Prints the reports whose photo shows the same person as a JSON array.
#[derive(Parser)]
#[command(name = "face-matcher", version)]
struct Cli {
    /// Photo submitted by the user.
    probe: PathBuf,

    /// JSON array of reports with photo, fullName and approximateAge.
    /// Use `-` to read it from stdin or `@FILE` to read it from a file.
    reports: String,

    /// Max cosine distance between faces to count as a match (0.0-2.0).
    #[arg(long)]
    threshold: Option<f64>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long)]
    confidence: Option<f64>,

    /// Face detector: yolo or skip (use the whole photo).
    #[arg(long, value_enum)]
    detector: Option<Detector>,

    /// Directory searched for model files after the user cache.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// External verifier program, run as `<PROG> [ARGS...] <probe> <photo>`.
    #[arg(long)]
    verifier_command: Option<PathBuf>,

    /// Leading argument for the external verifier (repeatable).
    #[arg(long = "verifier-arg", allow_hyphen_values = true)]
    verifier_args: Vec<String>,

    /// Include the verification distance in each match.
    #[arg(long)]
    with_scores: bool,

    /// Settings file (JSON). Defaults to the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.probe.exists() {
        return Err(format!("User photo not found: {}", cli.probe.display()).into());
    }

    let settings = load_settings(&cli)?;
    validate(&settings)?;

    let json = read_reports(&cli.reports)?;
    let candidates = parse_candidates(&json)?;

    let matches = if candidates.is_empty() {
        Vec::new()
    } else {
        let verifier: Box<dyn FaceVerifier> = match build_verifier(&settings) {
            Ok(verifier) => verifier,
            Err(e) => {
                log::error!("Face verifier unavailable: {e}");
                Box::new(UnavailableVerifier::new(e.to_string()))
            }
        };
        let mut use_case = MatchFacesUseCase::new(verifier, Box::new(LogMatchLogger::new()))
            .with_scores(settings.with_scores);
        use_case.execute_entries(&cli.probe, &candidates)
    };

    println!("{}", render_matches(&matches)?);
    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };

    if let Some(threshold) = cli.threshold {
        settings.threshold = threshold;
    }
    if let Some(confidence) = cli.confidence {
        settings.confidence = confidence;
    }
    if let Some(detector) = cli.detector {
        settings.detector = detector;
    }
    if let Some(dir) = &cli.model_dir {
        settings.model_dir = Some(dir.clone());
    }
    // A command from the CLI never inherits leading args from the file.
    if let Some(program) = &cli.verifier_command {
        settings.verifier_command = Some(program.clone());
        settings.verifier_args = cli.verifier_args.clone();
    } else if !cli.verifier_args.is_empty() {
        settings.verifier_args = cli.verifier_args.clone();
    }
    if cli.with_scores {
        settings.with_scores = true;
    }
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    if !(settings.threshold > 0.0 && settings.threshold <= 2.0) {
        return Err(format!(
            "Threshold must be greater than 0.0 and at most 2.0, got {}",
            settings.threshold
        )
        .into());
    }
    if !(0.0..=1.0).contains(&settings.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            settings.confidence
        )
        .into());
    }
    if settings.verifier_command.is_none() && !settings.verifier_args.is_empty() {
        return Err("--verifier-arg requires --verifier-command".into());
    }
    Ok(())
}

fn read_reports(arg: &str) -> Result<String, Box<dyn std::error::Error>> {
    if arg == "-" {
        let mut json = String::new();
        std::io::stdin()
            .read_to_string(&mut json)
            .map_err(|e| format!("Failed to read reports from stdin: {e}"))?;
        return Ok(json);
    }
    if let Some(path) = arg.strip_prefix('@') {
        return fs::read_to_string(path)
            .map_err(|e| format!("Failed to read reports from {path}: {e}").into());
    }
    Ok(arg.to_string())
}

fn build_verifier(settings: &Settings) -> Result<Box<dyn FaceVerifier>, Box<dyn std::error::Error>> {
    if let Some(program) = &settings.verifier_command {
        log::info!("Using external verifier: {}", program.display());
        return Ok(Box::new(CommandVerifier::new(
            program.clone(),
            settings.verifier_args.clone(),
        )));
    }

    let locator: Box<dyn FaceLocator> = match settings.detector {
        Detector::Yolo => {
            let model_path = resolve_model(YOLO_MODEL_NAME, YOLO_MODEL_URL, settings)?;
            Box::new(OnnxYoloFaceLocator::new(&model_path, settings.confidence)?)
        }
        Detector::Skip => Box::new(FullImageLocator),
    };
    let model_path = resolve_model(EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL, settings)?;
    let embedder = OnnxArcFaceEmbedder::new(&model_path)?;

    Ok(Box::new(EmbeddingFaceVerifier::new(
        locator,
        Box::new(embedder),
        settings.threshold,
    )))
}

fn resolve_model(
    name: &str,
    url: &str,
    settings: &Settings,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {name}");
    let downloading = Arc::new(AtomicBool::new(false));
    let flag = downloading.clone();
    let progress = move |downloaded: u64, total: u64| {
        flag.store(true, Ordering::Relaxed);
        download_progress(downloaded, total);
    };

    let path = model_resolver::resolve(
        name,
        url,
        settings.model_dir.as_deref(),
        Some(Box::new(progress)),
    )?;
    if downloading.load(Ordering::Relaxed) {
        eprintln!();
    }
    Ok(path)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face model... {pct}%");
    } else {
        eprint!("\rDownloading face model... {downloaded} bytes");
    }
}
