//! Client-side narrowing of a fetched collection.
//!
//! The backend returns whole collections; the index screens search and
//! filter them locally.

use serde_json::Value;

use crate::types::{ResourceId, ResourceKind};

/// Doctor specialisations offered as quick filters.
pub const SPECIALISATIONS: [&str; 5] = [
    "podiatrist",
    "dermatologist",
    "pediatrician",
    "psychiatrist",
    "general practitioner",
];

/// Fields matched by a free-text search, per collection.
pub fn search_fields(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Doctors => &["first_name", "last_name", "email", "specialisation"],
        ResourceKind::Patients => &["first_name", "last_name", "email", "phone"],
        ResourceKind::Appointments => &["id", "patient_id", "doctor_id", "appointment_date"],
        ResourceKind::Diagnoses => &["id", "patient_id", "condition", "diagnosis_date"],
        ResourceKind::Prescriptions => &["id", "patient_id", "doctor_id", "medication", "dosage"],
    }
}

/// Search term and specialisation filter for an index screen.
///
/// Both parts are case-insensitive. An empty filter keeps every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    term: String,
    specialisation: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep records where any searchable field contains `term`.
    pub fn search(mut self, term: impl AsRef<str>) -> Self {
        self.term = term.as_ref().trim().to_lowercase();
        self
    }

    /// Keep doctors whose specialisation equals `specialisation`.
    pub fn specialisation(mut self, specialisation: impl AsRef<str>) -> Self {
        let wanted = specialisation.as_ref().trim().to_lowercase();
        self.specialisation = (!wanted.is_empty() && wanted != "all").then_some(wanted);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.term.is_empty() && self.specialisation.is_none()
    }

    pub fn matches(&self, kind: ResourceKind, record: &Value) -> bool {
        if let Some(wanted) = &self.specialisation {
            if specialisation_of(record).as_deref() != Some(wanted.as_str()) {
                return false;
            }
        }

        if self.term.is_empty() {
            return true;
        }

        search_fields(kind).iter().any(|field| {
            let value = match *field {
                "specialisation" => specialisation_of(record),
                name => record.get(name).and_then(text_of),
            };
            value.is_some_and(|v| v.contains(&self.term))
        })
    }

    /// Records of `kind` that pass the filter, in their original order.
    pub fn apply(&self, kind: ResourceKind, records: Vec<Value>) -> Vec<Value> {
        records
            .into_iter()
            .filter(|record| self.matches(kind, record))
            .collect()
    }
}

/// Drop the record with `id` from a collection, as after a delete.
pub fn without(records: Vec<Value>, id: ResourceId) -> Vec<Value> {
    records
        .into_iter()
        .filter(|record| record.get("id").and_then(Value::as_u64) != Some(id.get()))
        .collect()
}

// The backend has spelled this both ways.
fn specialisation_of(record: &Value) -> Option<String> {
    record
        .get("specialisation")
        .or_else(|| record.get("specialization"))
        .and_then(text_of)
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_lowercase()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
