//! Records collected during a session and the envelope sent on completion.

use serde::{Deserialize, Serialize};

use crate::core::ident::SessionId;

use super::error::ValidationError;

/// Gender choices offered on the intro page.
pub const GENDER_OPTIONS: [&str; 3] = ["male", "female", "other"];

/// Age brackets offered on the intro page.
pub const AGE_OPTIONS: [&str; 6] = ["10s", "20s", "30s", "40s", "50s", "60+"];

/// Discrete rating scale, lowest to highest.
pub const SCORE_SCALE: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub gender: String,
    pub age: String,
}

impl Participant {
    pub fn new(gender: impl Into<String>, age: impl Into<String>) -> Self {
        Self {
            gender: gender.into(),
            age: age.into(),
        }
    }

    /// Presence check only; values are not matched against the option lists.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.gender.trim().is_empty() || self.age.trim().is_empty() {
            return Err(ValidationError::MissingDemographics);
        }
        Ok(())
    }
}

/// One confirmed rating. Participant fields are flattened into the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub timestamp: String,
    #[serde(rename = "userID")]
    pub session_id: SessionId,
    #[serde(flatten)]
    pub participant: Participant,
    #[serde(rename = "imageID")]
    pub image_id: String,
    pub score: u8,
}

/// Envelope serialized into the `data` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub participant: Participant,
    #[serde(rename = "userID")]
    pub session_id: SessionId,
    pub responses: Vec<ResponseRecord>,
}

impl SubmissionPayload {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
