use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Number;
use thiserror::Error;

/// One police report to compare the probe photo against.
///
/// Field values are kept exactly as they arrived so matches can be echoed
/// back without normalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub full_name: String,
    pub approximate_age: Number,
    pub photo: String,
}

impl CandidateRecord {
    pub fn new(
        full_name: impl Into<String>,
        approximate_age: impl Into<Number>,
        photo: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            approximate_age: approximate_age.into(),
            photo: photo.into(),
        }
    }

    pub fn photo_path(&self) -> &Path {
        Path::new(&self.photo)
    }
}

/// A report element that did not have the required shape.
#[derive(Error, Clone, Debug, PartialEq)]
#[error("Invalid report at index {index}: {message}")]
pub struct InvalidRecord {
    pub index: usize,
    pub message: String,
}

/// An element of the parsed report array, in input order.
pub type CandidateEntry = Result<CandidateRecord, InvalidRecord>;

/// A report whose photo was verified as the probe's person.
///
/// `distance` is only populated when the caller asked for scores; it is
/// left out of the serialized form otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub full_name: String,
    pub approximate_age: Number,
    pub photo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl MatchResult {
    pub fn from_record(record: &CandidateRecord) -> Self {
        Self {
            full_name: record.full_name.clone(),
            approximate_age: record.approximate_age.clone(),
            photo: record.photo.clone(),
            distance: None,
        }
    }

    pub fn with_distance(mut self, distance: Option<f64>) -> Self {
        self.distance = distance;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_result_projects_record_verbatim() {
        let record = CandidateRecord::new("Alice", 30u64, "/tmp/a.jpg");
        let result = MatchResult::from_record(&record);
        assert_eq!(result.full_name, "Alice");
        assert_eq!(result.approximate_age, Number::from(30u64));
        assert_eq!(result.photo, "/tmp/a.jpg");
        assert_eq!(result.distance, None);
    }

    #[test]
    fn test_match_result_serializes_without_distance() {
        let record = CandidateRecord::new("Alice", 30u64, "/tmp/a.jpg");
        let json = serde_json::to_string(&MatchResult::from_record(&record)).unwrap();
        assert_eq!(
            json,
            r#"{"fullName":"Alice","approximateAge":30,"photo":"/tmp/a.jpg"}"#
        );
    }

    #[test]
    fn test_match_result_serializes_distance_when_present() {
        let record = CandidateRecord::new("Alice", 30u64, "/tmp/a.jpg");
        let result = MatchResult::from_record(&record).with_distance(Some(0.25));
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.ends_with(r#""distance":0.25}"#));
    }

    #[test]
    fn test_record_ignores_unknown_keys() {
        let record: CandidateRecord = serde_json::from_str(
            r#"{"photo":"/tmp/a.jpg","fullName":"Alice","approximateAge":30,"gender":"F"}"#,
        )
        .unwrap();
        assert_eq!(record, CandidateRecord::new("Alice", 30u64, "/tmp/a.jpg"));
    }

    #[test]
    fn test_photo_path() {
        let record = CandidateRecord::new("Bob", 40u64, "uploads/123.jpg");
        assert_eq!(record.photo_path(), Path::new("uploads/123.jpg"));
    }

    #[test]
    fn test_invalid_record_message() {
        let err = InvalidRecord {
            index: 2,
            message: "missing field `photo`".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid report at index 2: missing field `photo`"
        );
    }
}
