//! JSON wire format for report arrays and match arrays.

use serde_json::Value;
use thiserror::Error;

use crate::reports::domain::candidate_record::{
    CandidateEntry, CandidateRecord, InvalidRecord, MatchResult,
};

#[derive(Error, Debug)]
pub enum ReportsError {
    #[error("reports must be a JSON array: {0}")]
    NotAnArray(#[source] serde_json::Error),
    #[error("failed to serialize matches: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Parse a JSON array of reports.
///
/// Only the top level must be well formed. Each element is decoded on its
/// own so a report with a missing or mistyped field becomes an
/// [`InvalidRecord`] entry instead of failing the whole set.
pub fn parse_candidates(json: &str) -> Result<Vec<CandidateEntry>, ReportsError> {
    let elements: Vec<Value> = serde_json::from_str(json).map_err(ReportsError::NotAnArray)?;
    Ok(elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            serde_json::from_value::<CandidateRecord>(element).map_err(|e| InvalidRecord {
                index,
                message: e.to_string(),
            })
        })
        .collect())
}

/// Serialize matches as a single compact JSON array.
pub fn render_matches(matches: &[MatchResult]) -> Result<String, ReportsError> {
    serde_json::to_string(matches).map_err(ReportsError::Serialize)
}
