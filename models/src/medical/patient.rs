// models/src/medical/patient.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::StoreError;
use crate::serializers::string_or_number;

/// Keys that never reach a stored patient through the `extra` map.
const RESERVED_KEYS: [&str; 5] = ["id", "patientId", "patient_id", "created_at", "updated_at"];

/// A stored patient record. `patient_id` is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PatientWire")]
pub struct Patient {
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Caller-supplied attributes outside the known schema, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Patient {
    /// Builds a fresh record for `patient_id` from caller input.
    pub fn from_input(patient_id: String, input: PatientInput, now: DateTime<Utc>) -> Self {
        let PatientInput { name, age, gender, notes, extra, .. } = input;
        Patient {
            patient_id,
            name,
            age,
            gender,
            notes,
            created_at: now,
            updated_at: None,
            extra: sanitize_extra(extra),
        }
    }

    /// Overlays the fields present in `input`; an explicit `null` counts as
    /// absent. `created_at` is left alone.
    pub fn merge(&mut self, input: PatientInput, now: DateTime<Utc>) {
        let PatientInput { name, age, gender, notes, extra, .. } = input;
        if name.is_some() {
            self.name = name;
        }
        if age.is_some() {
            self.age = age;
        }
        if gender.is_some() {
            self.gender = gender;
        }
        if notes.is_some() {
            self.notes = notes;
        }
        self.extra.extend(sanitize_extra(extra));
        self.updated_at = Some(now);
    }

    /// Case-insensitive substring match on name or id. `needle` must already
    /// be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        let name_hit = self
            .name
            .as_deref()
            .map(|name| name.to_lowercase().contains(needle))
            .unwrap_or(false);
        name_hit || self.patient_id.to_lowercase().contains(needle)
    }
}

fn sanitize_extra(mut extra: Map<String, Value>) -> Map<String, Value> {
    for key in RESERVED_KEYS {
        extra.remove(key);
    }
    extra
}

/// Caller input for an add-or-update. Any of the three id spellings is
/// accepted; the first present one wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    #[serde(default, deserialize_with = "string_or_number::deserialize", skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(rename = "patientId", default, deserialize_with = "string_or_number::deserialize", skip_serializing_if = "Option::is_none")]
    pub patient_id_alias: Option<String>,
    #[serde(rename = "id", default, deserialize_with = "string_or_number::deserialize", skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::deserialize", skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PatientInput {
    pub fn with_id(patient_id: impl Into<String>) -> Self {
        PatientInput {
            patient_id: Some(patient_id.into()),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The explicit identifier, if any, stored exactly as given. Blank values
    /// count as absent.
    pub fn resolve_id(&self) -> Option<String> {
        [&self.patient_id, &self.patient_id_alias, &self.legacy_id]
            .into_iter()
            .flatten()
            .find(|id| !id.trim().is_empty())
            .cloned()
    }
}

/// On-disk shape of a patient, tolerant of legacy id fields.
#[derive(Deserialize)]
struct PatientWire {
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    patient_id: Option<String>,
    #[serde(rename = "patientId", default, deserialize_with = "string_or_number::deserialize")]
    patient_id_alias: Option<String>,
    #[serde(rename = "id", default, deserialize_with = "string_or_number::deserialize")]
    legacy_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    age: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<PatientWire> for Patient {
    type Error = StoreError;

    fn try_from(wire: PatientWire) -> Result<Self, Self::Error> {
        let patient_id = wire
            .patient_id
            .or(wire.patient_id_alias)
            .or(wire.legacy_id)
            .ok_or_else(|| StoreError::InvalidData("stored patient has no patient_id".to_string()))?;
        Ok(Patient {
            patient_id,
            name: wire.name,
            age: wire.age,
            gender: wire.gender,
            notes: wire.notes,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            extra: sanitize_extra(wire.extra),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn should_resolve_first_present_id() {
        let input: PatientInput = serde_json::from_value(json!({"patientId": 42, "id": "old"})).unwrap();
        assert_eq!(input.resolve_id(), Some("42".to_string()));

        let input: PatientInput = serde_json::from_value(json!({"patient_id": "P1", "patientId": "P2"})).unwrap();
        assert_eq!(input.resolve_id(), Some("P1".to_string()));

        let input: PatientInput = serde_json::from_value(json!({"patient_id": "  ", "id": 7})).unwrap();
        assert_eq!(input.resolve_id(), Some("7".to_string()));

        assert_eq!(PatientInput::default().resolve_id(), None);
    }

    #[test]
    fn should_keep_padding_of_non_blank_id() {
        let input: PatientInput = serde_json::from_value(json!({"patient_id": "P1 ", "patientId": "P2"})).unwrap();
        assert_eq!(input.resolve_id(), Some("P1 ".to_string()));
    }

    #[test]
    fn should_keep_unknown_fields_but_drop_legacy_ids() {
        let input: PatientInput =
            serde_json::from_value(json!({"id": "X", "name": "Jane", "ward": "B2", "created_at": "bogus"})).unwrap();
        let patient = Patient::from_input("X".to_string(), input, at(10));
        let value = serde_json::to_value(&patient).unwrap();
        assert_eq!(value["patient_id"], "X");
        assert_eq!(value["ward"], "B2");
        assert!(value.get("id").is_none());
        assert!(value.get("updated_at").is_none());
        assert_eq!(patient.created_at, at(10));
    }

    #[test]
    fn merge_overlays_present_fields_only() {
        let mut patient = Patient::from_input(
            "P1".to_string(),
            PatientInput::with_id("P1").name("Jane"),
            at(10),
        );
        patient.gender = Some("F".to_string());

        let update: PatientInput = serde_json::from_value(json!({"patient_id": "P1", "age": 34})).unwrap();
        patient.merge(update, at(20));

        assert_eq!(patient.name.as_deref(), Some("Jane"));
        assert_eq!(patient.gender.as_deref(), Some("F"));
        assert_eq!(patient.age.as_deref(), Some("34"));
        assert_eq!(patient.created_at, at(10));
        assert_eq!(patient.updated_at, Some(at(20)));
    }

    #[test]
    fn merge_treats_null_as_absent() {
        let mut patient = Patient::from_input(
            "P1".to_string(),
            PatientInput::with_id("P1").name("Jane"),
            at(10),
        );
        let update: PatientInput =
            serde_json::from_value(json!({"patient_id": "P1", "name": null, "notes": "seen"})).unwrap();
        patient.merge(update, at(20));

        assert_eq!(patient.name.as_deref(), Some("Jane"));
        assert_eq!(patient.notes.as_deref(), Some("seen"));
    }

    #[test]
    fn should_load_legacy_record() {
        let patient: Patient = serde_json::from_value(json!({
            "patientId": 12,
            "name": "Ann",
            "created_at": "2024-03-01T10:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(patient.patient_id, "12");
        assert!(patient.extra.is_empty());
    }

    #[test]
    fn matches_name_or_id_ignoring_case() {
        let patient = Patient::from_input("AB-77".to_string(), PatientInput::default().name("Jane Doe"), at(0));
        assert!(patient.matches("jane"));
        assert!(patient.matches("ab-7"));
        assert!(patient.matches(""));
        assert!(!patient.matches("smith"));
    }
}
