// models/src/identifiers.rs

use chrono::{DateTime, Utc};

use crate::errors::{StoreError, StoreResult};

/// Fallback patient identifier used when a caller supplies none: the
/// creation instant in epoch milliseconds.
pub fn fallback_patient_id(now: DateTime<Utc>) -> String {
    now.timestamp_millis().to_string()
}

/// Issues assessment identifiers derived from epoch-millisecond timestamps.
///
/// Two assessments created within the same millisecond (or after the wall
/// clock stepped backwards) would collide on a raw timestamp, so the sequence
/// remembers the highest id it has seen and never issues a value at or below
/// it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSequence {
    last_issued: Option<i64>,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an identifier that already exists in storage. Identifiers that
    /// are not numeric (hand-edited snapshots) are ignored.
    pub fn observe(&mut self, id: &str) {
        if let Ok(value) = id.trim().parse::<i64>() {
            self.last_issued = Some(self.last_issued.map_or(value, |last| last.max(value)));
        }
    }

    /// Returns the next identifier for an assessment created at `now`. Fails
    /// once the highest observed id leaves no room above it.
    pub fn next(&mut self, now: DateTime<Utc>) -> StoreResult<String> {
        let candidate = now.timestamp_millis();
        let value = match self.last_issued {
            Some(last) if candidate <= last => last.checked_add(1).ok_or_else(|| {
                StoreError::InvalidData(format!("no assessment id left above {}", last))
            })?,
            _ => candidate,
        };
        self.last_issued = Some(value);
        Ok(value.to_string())
    }

    pub fn reset(&mut self) {
        self.last_issued = None;
    }

    pub fn last_issued(&self) -> Option<i64> {
        self.last_issued
    }
}
