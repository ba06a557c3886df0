use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted note, serialized exactly as it is stored and returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub note_id: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Note {
    /// Create a note with a fresh id, stamped with the current UTC time.
    ///
    /// `created_at` and `updated_at` share one timestamp.
    pub fn new(content: String) -> Self {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        Self {
            note_id: Uuid::new_v4().to_string(),
            content,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }
}

/// Request body for note creation
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateNoteRequest {
    pub content: Option<String>,
}

/// Response type for successful create operations
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteResponse {
    pub note_id: String,
    pub message: String,
}
