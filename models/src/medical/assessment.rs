// models/src/medical/assessment.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{StoreError, ValidationError, ValidationResult};
use crate::serializers::{scores_or_json_string, string_or_number, string_or_number_non_option};

/// Lowest severity on the rating scale.
pub const MIN_SCORE: i64 = 0;
/// Highest severity on the rating scale.
pub const MAX_SCORE: i64 = 4;

/// Parameter name -> severity.
pub type DomainScores = BTreeMap<String, i64>;
/// Domain name -> parameter scores.
pub type Scores = BTreeMap<String, DomainScores>;

/// Checks names and the 0..=4 range of every rated parameter.
pub fn validate_scores(scores: &Scores) -> ValidationResult<()> {
    for (domain, parameters) in scores {
        if domain.trim().is_empty() {
            return Err(ValidationError::EmptyDomain);
        }
        for (parameter, value) in parameters {
            if parameter.trim().is_empty() {
                return Err(ValidationError::EmptyParameter(domain.clone()));
            }
            if !(MIN_SCORE..=MAX_SCORE).contains(value) {
                return Err(ValidationError::ScoreOutOfRange {
                    domain: domain.clone(),
                    parameter: parameter.clone(),
                    value: *value,
                    min: MIN_SCORE,
                    max: MAX_SCORE,
                });
            }
        }
    }
    Ok(())
}

/// A stored assessment. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AssessmentWire")]
pub struct Assessment {
    pub id: String,
    pub patient_id: String,
    pub date: DateTime<Utc>,
    pub scores: Scores,
}

impl Assessment {
    pub fn belongs_to(&self, patient_id: &str) -> bool {
        !self.patient_id.is_empty() && self.patient_id == patient_id
    }

    pub fn score(&self, domain: &str, parameter: &str) -> Option<i64> {
        self.scores.get(domain).and_then(|p| p.get(parameter)).copied()
    }
}

/// Caller input for a new assessment. Either spelling of the patient
/// reference is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    #[serde(rename = "patientId", default, deserialize_with = "string_or_number::deserialize", skip_serializing_if = "Option::is_none")]
    pub patient_id_alias: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::deserialize", skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, deserialize_with = "scores_or_json_string::deserialize")]
    pub scores: Scores,
}

impl AssessmentInput {
    pub fn new(patient_id: impl Into<String>, scores: Scores) -> Self {
        AssessmentInput {
            patient_id: Some(patient_id.into()),
            scores,
            ..Default::default()
        }
    }

    /// The normalized patient reference; `patientId` takes precedence.
    pub fn resolve_patient_id(&self) -> ValidationResult<String> {
        [&self.patient_id_alias, &self.patient_id]
            .into_iter()
            .flatten()
            .find(|id| !id.trim().is_empty())
            .cloned()
            .ok_or(ValidationError::MissingPatientReference)
    }
}

/// An assessment decorated with the referenced patient's name, as returned by
/// the recent-activity listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestAssessment {
    #[serde(flatten)]
    pub assessment: Assessment,
    #[serde(rename = "patientName")]
    pub patient_name: Option<String>,
}

/// On-disk shape, which older snapshots fill with both patient id spellings.
#[derive(Deserialize)]
struct AssessmentWire {
    #[serde(deserialize_with = "string_or_number_non_option::deserialize")]
    id: String,
    #[serde(rename = "patientId", default, deserialize_with = "string_or_number::deserialize")]
    patient_id_alias: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    patient_id: Option<String>,
    date: DateTime<Utc>,
    #[serde(default, deserialize_with = "scores_or_json_string::deserialize")]
    scores: Scores,
}

impl TryFrom<AssessmentWire> for Assessment {
    type Error = StoreError;

    fn try_from(wire: AssessmentWire) -> Result<Self, Self::Error> {
        if wire.id.trim().is_empty() {
            return Err(StoreError::InvalidData("stored assessment has an empty id".to_string()));
        }
        Ok(Assessment {
            id: wire.id,
            patient_id: wire.patient_id_alias.or(wire.patient_id).unwrap_or_default(),
            date: wire.date,
            scores: wire.scores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scores(entries: &[(&str, &str, i64)]) -> Scores {
        let mut scores = Scores::new();
        for (domain, parameter, value) in entries {
            scores
                .entry(domain.to_string())
                .or_default()
                .insert(parameter.to_string(), *value);
        }
        scores
    }

    #[test]
    fn should_accept_scale_bounds() {
        assert!(validate_scores(&scores(&[("Anxiety", "Worry", 0), ("Anxiety", "Panic", 4)])).is_ok());
        assert!(validate_scores(&Scores::new()).is_ok());
    }

    #[test]
    fn should_reject_out_of_range_and_blank_names() {
        let err = validate_scores(&scores(&[("Depression", "Guilt", 5)])).unwrap_err();
        assert!(matches!(err, ValidationError::ScoreOutOfRange { value: 5, .. }));
        assert!(validate_scores(&scores(&[("Insight", "Reality Testing", -1)])).is_err());
        assert_eq!(validate_scores(&scores(&[(" ", "Worry", 1)])), Err(ValidationError::EmptyDomain));
        assert_eq!(
            validate_scores(&scores(&[("Anxiety", "", 1)])),
            Err(ValidationError::EmptyParameter("Anxiety".to_string()))
        );
    }

    #[test]
    fn input_accepts_either_patient_reference() {
        let camel: AssessmentInput =
            serde_json::from_value(json!({"patientId": "P1", "scores": {"Anxiety": {"Worry": 2}}})).unwrap();
        assert_eq!(camel.resolve_patient_id(), Ok("P1".to_string()));
        assert_eq!(camel.scores["Anxiety"]["Worry"], 2);

        let snake: AssessmentInput = serde_json::from_value(json!({"patient_id": 9})).unwrap();
        assert_eq!(snake.resolve_patient_id(), Ok("9".to_string()));

        let padded = AssessmentInput::new(" P1", Scores::new());
        assert_eq!(padded.resolve_patient_id(), Ok(" P1".to_string()));

        let missing: AssessmentInput = serde_json::from_value(json!({"scores": {}})).unwrap();
        assert_eq!(missing.resolve_patient_id(), Err(ValidationError::MissingPatientReference));
    }

    #[test]
    fn should_load_record_with_both_aliases_and_encoded_scores() {
        let assessment: Assessment = serde_json::from_value(json!({
            "id": "1710000000000",
            "date": "2024-03-09T16:00:00.000Z",
            "patientId": "P1",
            "patient_id": "P1",
            "scores": "{\"Insight\":{\"Reality Testing\":3}}"
        }))
        .unwrap();
        assert_eq!(assessment.patient_id, "P1");
        assert_eq!(assessment.score("Insight", "Reality Testing"), Some(3));

        let written = serde_json::to_value(&assessment).unwrap();
        assert!(written.get("patientId").is_none());
        assert_eq!(written["patient_id"], "P1");
    }

    #[test]
    fn latest_assessment_flattens_with_patient_name() {
        let assessment: Assessment = serde_json::from_value(json!({
            "id": 1,
            "date": "2024-03-09T16:00:00Z",
            "patient_id": "P1",
            "scores": {}
        }))
        .unwrap();
        let latest = LatestAssessment { assessment, patient_name: None };
        let value = serde_json::to_value(&latest).unwrap();
        assert_eq!(value["id"], "1");
        assert!(value["patientName"].is_null());
    }
}
