use std::path::Path;

use thiserror::Error;

use crate::matching::match_logger::MatchLogger;
use crate::reports::domain::candidate_record::{CandidateEntry, CandidateRecord, MatchResult};
use crate::verification::domain::face_verifier::FaceVerifier;

/// Why a report was left out of the results without a verdict.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum SkipReason {
    #[error("Invalid report at index {index}: {message}")]
    InvalidRecord { index: usize, message: String },
    #[error("Report photo not found: {photo}")]
    MissingPhoto { photo: String },
    #[error("Error processing photo {photo}: {message}")]
    VerificationFailed { photo: String, message: String },
}

/// Result of processing one report.
#[derive(Clone, Debug, PartialEq)]
pub enum CandidateOutcome {
    Matched(MatchResult),
    Rejected,
    Skipped(SkipReason),
}

/// Report matching: for each report in order, check → verify → collect.
///
/// Every fault is contained in the report that caused it; the run itself
/// cannot fail. The probe path is assumed to exist (checked by the caller).
pub struct MatchFacesUseCase {
    verifier: Box<dyn FaceVerifier>,
    logger: Box<dyn MatchLogger>,
    include_scores: bool,
}

impl MatchFacesUseCase {
    pub fn new(verifier: Box<dyn FaceVerifier>, logger: Box<dyn MatchLogger>) -> Self {
        Self {
            verifier,
            logger,
            include_scores: false,
        }
    }

    /// Copy the verifier's distance into each match.
    pub fn with_scores(mut self, include_scores: bool) -> Self {
        self.include_scores = include_scores;
        self
    }

    /// Match already-validated reports.
    pub fn execute(&mut self, probe: &Path, candidates: &[CandidateRecord]) -> Vec<MatchResult> {
        self.announce(probe, candidates.len());
        let mut matches = Vec::new();
        for record in candidates {
            if let CandidateOutcome::Matched(m) = self.evaluate(probe, record) {
                matches.push(m);
            }
        }
        self.logger.summary();
        matches
    }

    /// Match parsed report entries; entries that failed to parse are skipped.
    pub fn execute_entries(
        &mut self,
        probe: &Path,
        candidates: &[CandidateEntry],
    ) -> Vec<MatchResult> {
        self.announce(probe, candidates.len());
        let mut matches = Vec::new();
        for entry in candidates {
            let outcome = match entry {
                Ok(record) => self.evaluate(probe, record),
                Err(invalid) => self.skip(SkipReason::InvalidRecord {
                    index: invalid.index,
                    message: invalid.message.clone(),
                }),
            };
            if let CandidateOutcome::Matched(m) = outcome {
                matches.push(m);
            }
        }
        self.logger.summary();
        matches
    }

    fn announce(&mut self, probe: &Path, count: usize) {
        self.logger
            .info(&format!("Matching {} against {count} reports", probe.display()));
    }

    /// Process one report. Skips and verdicts are reported to the logger.
    pub fn evaluate(&mut self, probe: &Path, record: &CandidateRecord) -> CandidateOutcome {
        if !record.photo_path().exists() {
            return self.skip(SkipReason::MissingPhoto {
                photo: record.photo.clone(),
            });
        }

        let verification = match self.verifier.verify(probe, record.photo_path()) {
            Ok(v) => v,
            Err(e) => {
                return self.skip(SkipReason::VerificationFailed {
                    photo: record.photo.clone(),
                    message: e.to_string(),
                })
            }
        };
        self.logger.verified(record, &verification);

        if !verification.verified {
            return CandidateOutcome::Rejected;
        }
        let distance = if self.include_scores {
            verification.distance
        } else {
            None
        };
        CandidateOutcome::Matched(MatchResult::from_record(record).with_distance(distance))
    }

    fn skip(&mut self, reason: SkipReason) -> CandidateOutcome {
        self.logger.skipped(&reason);
        CandidateOutcome::Skipped(reason)
    }
}
