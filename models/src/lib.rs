// models/src/lib.rs

pub mod errors;
pub mod identifiers;
pub mod medical;
pub mod serializers;
pub mod snapshot;

pub use errors::{StoreError, StoreResult, ValidationError, ValidationResult};
pub use identifiers::{fallback_patient_id, IdSequence};
pub use medical::{Assessment, AssessmentInput, LatestAssessment, Patient, PatientInput, Scores};
pub use snapshot::{DeleteOutcome, Outcome, Snapshot};
