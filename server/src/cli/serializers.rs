// server/src/cli/serializers.rs

// Response envelopes handed back across the front-end boundary. Failures are
// carried as data so the caller never has to deal with a raw store error.

use serde::Serialize;

use models::{Assessment, DeleteOutcome, Patient};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PatientResponse {
    pub fn saved(patient: Patient) -> Self {
        PatientResponse { success: true, patient: Some(patient), error: None }
    }

    pub fn failed(error: impl ToString) -> Self {
        PatientResponse { success: false, patient: None, error: Some(error.to_string()) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Assessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssessmentResponse {
    pub fn saved(assessment: Assessment) -> Self {
        AssessmentResponse { success: true, assessment: Some(assessment), error: None }
    }

    pub fn failed(error: impl ToString) -> Self {
        AssessmentResponse { success: false, assessment: None, error: Some(error.to_string()) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteResponse {
    pub deleted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<DeleteOutcome> for DeleteResponse {
    fn from(outcome: DeleteOutcome) -> Self {
        DeleteResponse { deleted: outcome.deleted, error: None }
    }
}

impl DeleteResponse {
    pub fn failed(error: impl ToString) -> Self {
        DeleteResponse { deleted: 0, error: Some(error.to_string()) }
    }
}
