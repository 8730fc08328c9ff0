// lib/src/database.rs

use std::cmp::Ordering;
use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::Mutex;

use models::errors::{StoreError, StoreResult};
use models::medical::validate_scores;
use models::{
    fallback_patient_id, Assessment, AssessmentInput, DeleteOutcome, IdSequence, LatestAssessment, Patient,
    PatientInput, Outcome, Snapshot,
};

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::storage_engine::{create_storage, SnapshotStorage};

#[derive(Debug, Default)]
struct StoreState {
    /// `None` until the first operation loads the persisted snapshot.
    snapshot: Option<Snapshot>,
    ids: IdSequence,
}

/// The patient/assessment document store.
///
/// Both collections live in memory; every mutation rewrites the full
/// snapshot through the configured `SnapshotStorage`. One lock covers the
/// whole load, mutate, persist sequence, so operations never interleave.
/// A mutation whose write fails leaves the in-memory state untouched.
pub struct Database {
    storage: Arc<dyn SnapshotStorage>,
    clock: Arc<dyn Clock>,
    state: Mutex<StoreState>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("engine", &self.storage.engine_type())
            .field("location", &self.storage.location())
            .finish()
    }
}

impl Database {
    pub fn new(storage: Arc<dyn SnapshotStorage>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: Arc<dyn SnapshotStorage>, clock: Arc<dyn Clock>) -> Self {
        Database {
            storage,
            clock,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Builds a store over the engine selected by `config`. Nothing is read
    /// until the first operation.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(create_storage(config))
    }

    pub fn storage(&self) -> &Arc<dyn SnapshotStorage> {
        &self.storage
    }

    async fn loaded<'a>(&self, state: &'a mut StoreState) -> StoreResult<&'a mut Snapshot> {
        if state.snapshot.is_none() {
            let snapshot = match self.storage.load().await? {
                Some(snapshot) => {
                    debug!(
                        "Loaded {} patients and {} assessments from {}",
                        snapshot.patients.len(),
                        snapshot.assessments.len(),
                        self.storage.location()
                    );
                    snapshot
                }
                None => {
                    let empty = Snapshot::default();
                    self.storage.persist(&empty).await?;
                    info!("Initialized empty store at {}", self.storage.location());
                    empty
                }
            };
            let mut ids = IdSequence::new();
            for assessment in &snapshot.assessments {
                ids.observe(&assessment.id);
            }
            state.ids = ids;
            state.snapshot = Some(snapshot);
        }
        state
            .snapshot
            .as_mut()
            .ok_or_else(|| StoreError::InternalError("store state missing after load".to_string()))
    }

    /// Persists `next` and only then makes it the live state.
    async fn commit(&self, state: &mut StoreState, next: Snapshot) -> StoreResult<()> {
        self.storage.persist(&next).await?;
        state.snapshot = Some(next);
        Ok(())
    }

    /// Loads (or creates) the snapshot eagerly.
    pub async fn init_database(&self) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        self.loaded(&mut state).await?;
        info!("Local DB path: {}", self.storage.location());
        Ok(())
    }

    pub async fn get_patients(&self) -> StoreResult<Vec<Patient>> {
        let mut state = self.state.lock().await;
        Ok(self.loaded(&mut state).await?.patients.clone())
    }

    pub async fn get_patient(&self, patient_id: &str) -> StoreResult<Option<Patient>> {
        let mut state = self.state.lock().await;
        Ok(self.loaded(&mut state).await?.patient(patient_id).cloned())
    }

    /// Inserts a patient, or merges `input` into the record that already has
    /// the resolved `patient_id` (keeping its position and `created_at`).
    pub async fn add_or_update_patient(&self, input: PatientInput) -> StoreResult<Patient> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        let mut next = self.loaded(&mut state).await?.clone();

        let patient_id = input.resolve_id().unwrap_or_else(|| fallback_patient_id(now));
        let stored = match next.patients.iter().position(|p| p.patient_id == patient_id) {
            Some(index) => {
                next.patients[index].merge(input, now);
                debug!("Updated patient {}", patient_id);
                next.patients[index].clone()
            }
            None => {
                let patient = Patient::from_input(patient_id.clone(), input, now);
                next.patients.push(patient.clone());
                debug!("Added patient {}", patient_id);
                patient
            }
        };

        self.commit(&mut state, next).await?;
        Ok(stored)
    }

    /// Case-insensitive substring search over name and id, in insertion
    /// order. A blank term returns every patient.
    pub async fn search_patients(&self, term: &str) -> StoreResult<Vec<Patient>> {
        let needle = term.trim().to_lowercase();
        let mut state = self.state.lock().await;
        let snapshot = self.loaded(&mut state).await?;
        Ok(snapshot
            .patients
            .iter()
            .filter(|p| p.matches(&needle))
            .cloned()
            .collect())
    }

    /// Appends a new assessment with a fresh id and the current date. The
    /// referenced patient does not have to exist.
    pub async fn add_assessment(&self, input: AssessmentInput) -> StoreResult<Assessment> {
        let patient_id = input.resolve_patient_id()?;
        validate_scores(&input.scores)?;

        let mut state = self.state.lock().await;
        let now = self.clock.now();
        let mut next = self.loaded(&mut state).await?.clone();

        let assessment = Assessment {
            id: state.ids.next(now)?,
            patient_id,
            date: now,
            scores: input.scores,
        };
        next.assessments.push(assessment.clone());

        self.commit(&mut state, next).await?;
        debug!("Added assessment {} for patient {}", assessment.id, assessment.patient_id);
        Ok(assessment)
    }

    pub async fn get_assessment(&self, id: &str) -> StoreResult<Option<Assessment>> {
        let mut state = self.state.lock().await;
        let snapshot = self.loaded(&mut state).await?;
        Ok(snapshot.assessments.iter().find(|a| a.id == id).cloned())
    }

    /// A patient's assessments, newest first.
    pub async fn get_assessments(&self, patient_id: &str) -> StoreResult<Vec<Assessment>> {
        let mut state = self.state.lock().await;
        let snapshot = self.loaded(&mut state).await?;
        let mut list: Vec<Assessment> = snapshot
            .assessments
            .iter()
            .filter(|a| a.belongs_to(patient_id))
            .cloned()
            .collect();
        list.sort_by(newest_first);
        Ok(list)
    }

    /// The `limit` most recent assessments across all patients, each with the
    /// referenced patient's name when that patient exists.
    pub async fn get_latest_assessments(&self, limit: usize) -> StoreResult<Vec<LatestAssessment>> {
        let mut state = self.state.lock().await;
        let snapshot = self.loaded(&mut state).await?;
        let mut all: Vec<&Assessment> = snapshot.assessments.iter().collect();
        all.sort_by(|a, b| newest_first(a, b));
        Ok(all
            .into_iter()
            .take(limit)
            .map(|assessment| LatestAssessment {
                patient_name: snapshot
                    .patient(&assessment.patient_id)
                    .and_then(|p| p.name.clone()),
                assessment: assessment.clone(),
            })
            .collect())
    }

    /// Removes the assessment with `id`. Deleting an unknown id is a no-op
    /// and does not touch storage.
    pub async fn delete_assessment(&self, id: &str) -> StoreResult<DeleteOutcome> {
        let mut state = self.state.lock().await;
        let mut next = self.loaded(&mut state).await?.clone();
        let before = next.assessments.len();
        next.assessments.retain(|a| a.id != id);
        let deleted = before - next.assessments.len();
        if deleted > 0 {
            self.commit(&mut state, next).await?;
            debug!("Deleted assessment {}", id);
        }
        Ok(DeleteOutcome { deleted })
    }

    /// Empties both collections and persists the result.
    pub async fn reset_database(&self) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        self.loaded(&mut state).await?;
        self.commit(&mut state, Snapshot::default()).await?;
        state.ids.reset();
        info!("Database reset");
        Ok(())
    }

    /// Truncates both collections in place (the snapshot file is rewritten,
    /// never deleted). Does not require the old snapshot to be readable, and
    /// reports failure instead of returning an error.
    pub async fn reset_database_force(&self) -> Outcome {
        let mut state = self.state.lock().await;
        match self.commit(&mut state, Snapshot::default()).await {
            Ok(()) => {
                state.ids.reset();
                info!("Database truncated successfully (no file deletion).");
                Outcome::ok()
            }
            Err(e) => {
                error!("Error truncating database: {}", e);
                Outcome::failed(e)
            }
        }
    }
}

/// Descending by date; equal dates fall back to the later-issued id.
fn newest_first(a: &Assessment, b: &Assessment) -> Ordering {
    b.date.cmp(&a.date).then_with(|| compare_ids(&b.id, &a.id))
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}
