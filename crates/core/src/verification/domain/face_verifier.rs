use std::path::Path;

/// Outcome of comparing two photos.
///
/// Only `verified` is required; backends that compute a score report it
/// alongside the threshold they applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Verification {
    pub verified: bool,
    pub distance: Option<f64>,
    pub threshold: Option<f64>,
}

impl Verification {
    pub fn verdict(verified: bool) -> Self {
        Self {
            verified,
            distance: None,
            threshold: None,
        }
    }

    /// Verdict from a distance: same person when `distance <= threshold`.
    pub fn from_distance(distance: f64, threshold: f64) -> Self {
        Self {
            verified: distance <= threshold,
            distance: Some(distance),
            threshold: Some(threshold),
        }
    }
}

/// Domain interface for deciding whether two photos show the same person.
///
/// Implementations may keep state between calls (e.g. a memoized probe
/// embedding), hence `&mut self`.
pub trait FaceVerifier: Send {
    fn verify(
        &mut self,
        probe: &Path,
        candidate: &Path,
    ) -> Result<Verification, Box<dyn std::error::Error>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_distance_below_threshold_verifies() {
        let v = Verification::from_distance(0.3, 0.68);
        assert!(v.verified);
        assert_eq!(v.distance, Some(0.3));
        assert_eq!(v.threshold, Some(0.68));
    }

    #[test]
    fn test_from_distance_at_threshold_verifies() {
        assert!(Verification::from_distance(0.68, 0.68).verified);
    }

    #[test]
    fn test_from_distance_above_threshold_rejects() {
        assert!(!Verification::from_distance(0.9, 0.68).verified);
    }

    #[test]
    fn test_verdict_has_no_score() {
        let v = Verification::verdict(true);
        assert!(v.verified);
        assert!(v.distance.is_none());
        assert!(v.threshold.is_none());
    }
}
