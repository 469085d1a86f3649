//! Resource kinds and ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// The entity collections exposed by the clinic backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Doctors,
    Patients,
    Appointments,
    Diagnoses,
    Prescriptions,
}

impl ResourceKind {
    /// Every resource kind, in navigation order.
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Doctors,
        ResourceKind::Patients,
        ResourceKind::Appointments,
        ResourceKind::Diagnoses,
        ResourceKind::Prescriptions,
    ];

    /// Path segment of the collection, e.g. `doctors`.
    pub fn segment(self) -> &'static str {
        match self {
            ResourceKind::Doctors => "doctors",
            ResourceKind::Patients => "patients",
            ResourceKind::Appointments => "appointments",
            ResourceKind::Diagnoses => "diagnoses",
            ResourceKind::Prescriptions => "prescriptions",
        }
    }

    /// Singular display name, e.g. `Doctor`.
    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Doctors => "Doctor",
            ResourceKind::Patients => "Patient",
            ResourceKind::Appointments => "Appointment",
            ResourceKind::Diagnoses => "Diagnosis",
            ResourceKind::Prescriptions => "Prescription",
        }
    }

    /// Collection path, e.g. `/doctors`.
    pub fn collection_path(self) -> String {
        format!("/{}", self.segment())
    }

    /// Item path, e.g. `/doctors/3`.
    pub fn item_path(self, id: ResourceId) -> String {
        format!("/{}/{}", self.segment(), id)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|kind| {
                kind.segment() == lowered || kind.singular().to_ascii_lowercase() == lowered
            })
            .ok_or_else(|| {
                InvalidInputError::ResourceKind {
                    value: s.to_string(),
                }
                .into()
            })
    }
}

/// A positive integer identifying a record within its collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(u64);

impl ResourceId {
    /// Create an id, rejecting zero.
    pub fn new(id: u64) -> Result<Self, Error> {
        if id == 0 {
            return Err(InvalidInputError::ResourceId {
                value: id.to_string(),
                reason: "must be a positive integer".to_string(),
            }
            .into());
        }
        Ok(Self(id))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<u64>()
            .map_err(|e| InvalidInputError::ResourceId {
                value: s.to_string(),
                reason: e.to_string(),
            })?;
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = u64::deserialize(deserializer)?;
        ResourceId::new(id).map_err(serde::de::Error::custom)
    }
}
