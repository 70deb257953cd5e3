use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use facematch_core::shared::constants::{DEFAULT_DETECTION_CONFIDENCE, DEFAULT_MATCH_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Detector {
    /// Locate the face with the YOLO face model.
    Yolo,
    /// Use the whole photo as the face.
    Skip,
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistent defaults; every field can be overridden on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub threshold: f64,
    pub confidence: f64,
    pub detector: Detector,
    pub model_dir: Option<PathBuf>,
    pub verifier_command: Option<PathBuf>,
    pub verifier_args: Vec<String>,
    pub with_scores: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            confidence: DEFAULT_DETECTION_CONFIDENCE,
            detector: Detector::Yolo,
            model_dir: None,
            verifier_command: None,
            verifier_args: Vec::new(),
            with_scores: false,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceMatcher").join("settings.json"))
    }

    /// Load from the user config dir, falling back to defaults.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Load from an explicit file; unlike [`Settings::load`] this fails loudly.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
