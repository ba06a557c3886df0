use serde::{Deserialize, Serialize};

use crate::response::{build_response, Envelope};

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Every way an invocation can fail.
///
/// Client-facing messages are fixed strings. Variants carrying an
/// `anyhow::Error` log it when converted and never echo it back.
#[derive(Debug)]
pub enum ApiError {
    /// Request body is not valid JSON
    InvalidJson,
    /// `content` missing, empty or not a string
    ContentRequired,
    /// `noteId` path parameter missing or empty
    NoteIdRequired,
    /// No note stored under this id
    NoteNotFound(String),
    /// GET on a path that is not `/notes/{noteId}`
    RouteNotFound,
    /// Anything other than POST /notes or GET
    MethodNotAllowed { method: String, path: String },
    /// Store adapter failed to initialize
    Configuration,
    /// Store write failed
    CreateFailed(anyhow::Error),
    /// Store read failed
    ReadFailed { note_id: String, source: anyhow::Error },
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidJson | ApiError::ContentRequired | ApiError::NoteIdRequired => 400,
            ApiError::NoteNotFound(_) | ApiError::RouteNotFound => 404,
            ApiError::MethodNotAllowed { .. } => 405,
            ApiError::Configuration
            | ApiError::CreateFailed(_)
            | ApiError::ReadFailed { .. } => 500,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::InvalidJson => "invalid JSON body".to_string(),
            ApiError::ContentRequired => "content is required".to_string(),
            ApiError::NoteIdRequired => "noteId is required".to_string(),
            ApiError::NoteNotFound(_) => "note not found".to_string(),
            ApiError::RouteNotFound => "resource not found or noteId missing".to_string(),
            ApiError::MethodNotAllowed { method, path } => {
                format!("method {} not supported for path {}", method, path)
            }
            ApiError::Configuration => "server configuration error".to_string(),
            ApiError::CreateFailed(_) => "internal error creating note".to_string(),
            ApiError::ReadFailed { .. } => "internal error retrieving note".to_string(),
        }
    }

    pub fn into_envelope(self) -> Envelope {
        match &self {
            ApiError::CreateFailed(err) => {
                tracing::error!("Failed to write note to store: {:#}", err);
            }
            ApiError::ReadFailed { note_id, source } => {
                tracing::error!("Failed to read note {} from store: {:#}", note_id, source);
            }
            ApiError::Configuration => {
                tracing::error!("Note store is not initialized, check configuration");
            }
            _ => {}
        }

        build_response(
            self.status_code(),
            &ErrorResponse {
                error: self.message(),
            },
        )
    }
}
