use std::path::Path;

use crate::verification::domain::face_verifier::{FaceVerifier, Verification};

/// Stand-in for a backend that failed to initialize.
///
/// Every comparison fails with the initialization error, so each report is
/// skipped with that message while the run itself carries on.
pub struct UnavailableVerifier {
    reason: String,
}

impl UnavailableVerifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl FaceVerifier for UnavailableVerifier {
    fn verify(
        &mut self,
        _probe: &Path,
        _candidate: &Path,
    ) -> Result<Verification, Box<dyn std::error::Error>> {
        Err(self.reason.clone().into())
    }
}
