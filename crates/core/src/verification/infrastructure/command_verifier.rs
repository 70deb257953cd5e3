//! Delegates verification to an external program.
//!
//! The program is run as `<program> [args...] <probe> <candidate>` and must
//! print a JSON object with a boolean `verified` field on stdout. Optional
//! numeric `distance` and `threshold` fields are passed through.
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::verification::domain::face_verifier::{FaceVerifier, Verification};

#[derive(Deserialize)]
struct VerifierResponse {
    verified: bool,
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    threshold: Option<f64>,
}

pub struct CommandVerifier {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandVerifier {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl FaceVerifier for CommandVerifier {
    fn verify(
        &mut self,
        probe: &Path,
        candidate: &Path,
    ) -> Result<Verification, Box<dyn std::error::Error>> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(probe)
            .arg(candidate)
            .output()
            .map_err(|e| format!("failed to run {}: {e}", self.program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )
            .into());
        }

        parse_response(&output.stdout)
    }
}

fn parse_response(stdout: &[u8]) -> Result<Verification, Box<dyn std::error::Error>> {
    let response: VerifierResponse = serde_json::from_slice(stdout)
        .map_err(|e| format!("unreadable verifier output: {e}"))?;
    Ok(Verification {
        verified: response.verified,
        distance: response.distance,
        threshold: response.threshold,
    })
}
