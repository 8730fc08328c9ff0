// server/src/cli/handlers.rs

// Boundary handlers: one per front-end operation. Each one logs and converts
// store failures into the shape the front end expects (an envelope, `null`
// or an empty list) so a failing store never takes the caller down.

use log::{error, info};

use models::{Assessment, AssessmentInput, LatestAssessment, Outcome, Patient, PatientInput};
use synapss_lib::Database;

use crate::cli::serializers::{AssessmentResponse, DeleteResponse, PatientResponse};

pub async fn init_database(db: &Database) -> Outcome {
    match db.init_database().await {
        Ok(()) => {
            info!("Database initialized successfully");
            Outcome::ok()
        }
        Err(e) => {
            error!("Database initialization error: {}", e);
            Outcome::failed(e)
        }
    }
}

pub async fn save_patient(db: &Database, input: PatientInput) -> PatientResponse {
    match db.add_or_update_patient(input).await {
        Ok(patient) => PatientResponse::saved(patient),
        Err(e) => {
            error!("Error saving patient: {}", e);
            PatientResponse::failed(e)
        }
    }
}

pub async fn get_patient(db: &Database, patient_id: &str) -> Option<Patient> {
    db.get_patient(patient_id).await.unwrap_or_else(|e| {
        error!("Error fetching patient: {}", e);
        None
    })
}

pub async fn get_patients(db: &Database) -> Vec<Patient> {
    db.get_patients().await.unwrap_or_else(|e| {
        error!("Error listing patients: {}", e);
        Vec::new()
    })
}

pub async fn search_patients(db: &Database, term: &str) -> Vec<Patient> {
    db.search_patients(term).await.unwrap_or_else(|e| {
        error!("Error searching patients: {}", e);
        Vec::new()
    })
}

pub async fn save_assessment(db: &Database, input: AssessmentInput) -> AssessmentResponse {
    match db.add_assessment(input).await {
        Ok(assessment) => AssessmentResponse::saved(assessment),
        Err(e) => {
            error!("Error saving assessment: {}", e);
            AssessmentResponse::failed(e)
        }
    }
}

pub async fn get_assessment(db: &Database, id: &str) -> Option<Assessment> {
    db.get_assessment(id).await.unwrap_or_else(|e| {
        error!("Error fetching assessment: {}", e);
        None
    })
}

pub async fn get_assessments(db: &Database, patient_id: &str) -> Vec<Assessment> {
    db.get_assessments(patient_id).await.unwrap_or_else(|e| {
        error!("Error getting assessments: {}", e);
        Vec::new()
    })
}

pub async fn get_latest_assessments(db: &Database, limit: usize) -> Vec<LatestAssessment> {
    db.get_latest_assessments(limit).await.unwrap_or_else(|e| {
        error!("Error getting latest assessments: {}", e);
        Vec::new()
    })
}

pub async fn delete_assessment(db: &Database, id: &str) -> DeleteResponse {
    match db.delete_assessment(id).await {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            error!("Error deleting assessment: {}", e);
            DeleteResponse::failed(e)
        }
    }
}

pub async fn reset_database(db: &Database) -> Outcome {
    match db.reset_database().await {
        Ok(()) => Outcome::ok(),
        Err(e) => {
            error!("Error resetting database: {}", e);
            Outcome::failed(e)
        }
    }
}

pub async fn force_reset_database(db: &Database) -> Outcome {
    db.reset_database_force().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use synapss_lib::{InMemoryStorage, JsonFileStorage};

    fn corrupt_db(dir: &tempfile::TempDir) -> Database {
        let path = dir.path().join("database.json");
        std::fs::write(&path, "][").unwrap();
        Database::new(Arc::new(JsonFileStorage::new(path)))
    }

    #[tokio::test]
    async fn failures_degrade_to_empty_results() {
        let dir = tempfile::tempdir().unwrap();
        let db = corrupt_db(&dir);

        assert!(!init_database(&db).await.success);
        assert_eq!(get_patient(&db, "P1").await, None);
        assert!(search_patients(&db, "").await.is_empty());
        assert!(get_assessments(&db, "P1").await.is_empty());
        assert!(get_latest_assessments(&db, 5).await.is_empty());

        let saved = save_patient(&db, PatientInput::with_id("P1")).await;
        assert!(!saved.success);
        assert!(saved.error.is_some());

        let deleted = delete_assessment(&db, "1").await;
        assert_eq!(deleted.deleted, 0);
        assert!(deleted.error.is_some());

        assert!(!reset_database(&db).await.success);
    }

    #[tokio::test]
    async fn invalid_assessment_is_reported_not_raised() {
        let db = Database::new(Arc::new(InMemoryStorage::new()));
        let response = save_assessment(&db, AssessmentInput::default()).await;
        assert!(!response.success);
        assert!(response.error.unwrap().contains("patient reference"));
    }

    #[tokio::test]
    async fn successful_operations_return_envelopes() {
        let db = Database::new(Arc::new(InMemoryStorage::new()));
        let saved = save_patient(&db, PatientInput::with_id("P1").name("Jane")).await;
        assert!(saved.success);
        assert_eq!(saved.patient.unwrap().patient_id, "P1");

        let assessment = save_assessment(&db, AssessmentInput::new("P1", Default::default())).await;
        let id = assessment.assessment.unwrap().id;
        assert_eq!(get_assessment(&db, &id).await.map(|a| a.patient_id), Some("P1".to_string()));
        assert_eq!(delete_assessment(&db, &id).await, DeleteResponse { deleted: 1, error: None });
        assert!(force_reset_database(&db).await.success);
        assert!(get_patients(&db).await.is_empty());
    }
}
