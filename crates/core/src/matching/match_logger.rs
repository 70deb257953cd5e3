use std::time::Instant;

use crate::matching::match_faces_use_case::SkipReason;
use crate::reports::domain::candidate_record::CandidateRecord;
use crate::verification::domain::face_verifier::Verification;

/// Observer for report-matching events.
///
/// Keeps the use case independent of where diagnostics end up (stderr via
/// `log`, a test recorder, nowhere).
pub trait MatchLogger: Send {
    /// A report was left out without a verdict.
    fn skipped(&mut self, reason: &SkipReason);

    /// A report was compared and got a verdict.
    fn verified(&mut self, record: &CandidateRecord, verification: &Verification);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullMatchLogger;

impl MatchLogger for NullMatchLogger {
    fn skipped(&mut self, _reason: &SkipReason) {}
    fn verified(&mut self, _record: &CandidateRecord, _verification: &Verification) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI-oriented logger: skip diagnostics at `warn`, verdicts at `debug`,
/// and a one-line tally at `info` when the run ends.
pub struct LogMatchLogger {
    matched: usize,
    rejected: usize,
    skipped: usize,
    start_time: Instant,
}

impl LogMatchLogger {
    pub fn new() -> Self {
        Self {
            matched: 0,
            rejected: 0,
            skipped: 0,
            start_time: Instant::now(),
        }
    }

    pub fn summary_string(&self) -> String {
        let checked = self.matched + self.rejected + self.skipped;
        format!(
            "Checked {checked} reports in {:.1}s: {} matched, {} rejected, {} skipped",
            self.start_time.elapsed().as_secs_f64(),
            self.matched,
            self.rejected,
            self.skipped
        )
    }
}

impl Default for LogMatchLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchLogger for LogMatchLogger {
    fn skipped(&mut self, reason: &SkipReason) {
        self.skipped += 1;
        log::warn!("{reason}");
    }

    fn verified(&mut self, record: &CandidateRecord, verification: &Verification) {
        if verification.verified {
            self.matched += 1;
        } else {
            self.rejected += 1;
        }
        log::debug!(
            "{} ({}): {}",
            record.full_name,
            record.photo,
            describe(verification)
        );
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        log::info!("{}", self.summary_string());
    }
}

fn describe(verification: &Verification) -> String {
    let mut line = format!("verified={}", verification.verified);
    if let Some(distance) = verification.distance {
        line.push_str(&format!(" distance={distance:.4}"));
    }
    if let Some(threshold) = verification.threshold {
        line.push_str(&format!(" threshold={threshold:.4}"));
    }
    line
}
