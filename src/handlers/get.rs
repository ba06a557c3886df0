use crate::error::ApiError;
use crate::response::{build_response, Envelope};
use crate::store::NoteStore;

/// GET /notes/{noteId} - retrieve a stored note
pub async fn get_note(store: &NoteStore, note_id: &str) -> Result<Envelope, ApiError> {
    if note_id.is_empty() {
        tracing::warn!("Get request without noteId");
        return Err(ApiError::NoteIdRequired);
    }

    match store.get_by_key(note_id).await {
        Ok(Some(note)) => {
            tracing::info!("Retrieved note with id: {}", note_id);
            Ok(build_response(200, &note))
        }
        Ok(None) => {
            tracing::warn!("Note not found with id: {}", note_id);
            Err(ApiError::NoteNotFound(note_id.to_string()))
        }
        Err(source) => Err(ApiError::ReadFailed {
            note_id: note_id.to_string(),
            source,
        }),
    }
}
