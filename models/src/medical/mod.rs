// models/src/medical/mod.rs

pub mod assessment;
pub mod patient;

pub use assessment::{
    validate_scores, Assessment, AssessmentInput, DomainScores, LatestAssessment, Scores, MAX_SCORE, MIN_SCORE,
};
pub use patient::{Patient, PatientInput};
