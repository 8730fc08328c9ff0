// models/src/snapshot.rs

use serde::{Deserialize, Serialize};

use crate::medical::{Assessment, Patient};

/// The complete persisted state: exactly two collections, insertion-ordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty() && self.assessments.is_empty()
    }

    pub fn patient(&self, patient_id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.patient_id == patient_id)
    }
}

/// Result of a delete: how many records were removed (0 or 1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub deleted: usize,
}

/// Soft success/failure report, for callers that surface failures as data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    pub fn ok() -> Self {
        Outcome { success: true, error: None }
    }

    pub fn failed(error: impl ToString) -> Self {
        Outcome {
            success: false,
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_tolerate_missing_collections() {
        let snapshot: Snapshot = serde_json::from_value(json!({"patients": []})).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn empty_snapshot_has_exactly_two_fields() {
        let value = serde_json::to_value(Snapshot::default()).unwrap();
        assert_eq!(value, json!({"patients": [], "assessments": []}));
    }

    #[test]
    fn outcome_omits_error_on_success() {
        assert_eq!(serde_json::to_value(Outcome::ok()).unwrap(), json!({"success": true}));
        assert_eq!(
            serde_json::to_value(Outcome::failed("disk full")).unwrap(),
            json!({"success": false, "error": "disk full"})
        );
    }
}
