use crate::error::ApiError;
use crate::models::{CreateNoteRequest, CreateNoteResponse, Note};
use crate::response::{build_response, Envelope};
use crate::store::NoteStore;

/// Parse the raw create body.
///
/// An absent or empty body reads as `{}`. Syntax errors are invalid JSON;
/// well-formed JSON of the wrong shape (not an object, non-string content)
/// is reported as missing content.
pub fn parse_create_request(body: Option<&str>) -> Result<CreateNoteRequest, ApiError> {
    let raw = match body {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(CreateNoteRequest::default()),
    };

    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
        tracing::warn!("Invalid JSON request body: {}", e);
        ApiError::InvalidJson
    })?;

    if !value.is_object() {
        tracing::warn!("Create request body is not a JSON object");
        return Err(ApiError::ContentRequired);
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::warn!("Create request has unexpected shape: {}", e);
        ApiError::ContentRequired
    })
}

/// POST /notes - validate, stamp and persist a new note
pub async fn create_note(store: &NoteStore, body: Option<&str>) -> Result<Envelope, ApiError> {
    let request = parse_create_request(body)?;

    let content = match request.content {
        Some(content) if !content.is_empty() => content,
        _ => {
            tracing::warn!("Attempt to create a note without content");
            return Err(ApiError::ContentRequired);
        }
    };

    let note = Note::new(content);
    store.put(&note).await.map_err(ApiError::CreateFailed)?;

    tracing::info!("Note created with id: {}", note.note_id);
    Ok(build_response(
        201,
        &CreateNoteResponse {
            note_id: note.note_id,
            message: "note created".to_string(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn memory_store() -> (MemoryStore, NoteStore) {
        let memory = MemoryStore::new();
        (memory.clone(), NoteStore::Memory(memory))
    }

    #[test]
    fn test_parse_absent_and_empty_body() {
        assert!(parse_create_request(None).unwrap().content.is_none());
        assert!(parse_create_request(Some("")).unwrap().content.is_none());
    }

    #[test]
    fn test_parse_malformed_json() {
        for body in ["{invalid json}", "{\"content\":", "   "] {
            assert!(
                matches!(parse_create_request(Some(body)), Err(ApiError::InvalidJson)),
                "body {:?} should be invalid JSON",
                body
            );
        }
    }

    #[test]
    fn test_parse_wrong_shape() {
        for body in ["[]", "[\"hi\"]", "null", "42", r#"{"content": 7}"#] {
            assert!(
                matches!(parse_create_request(Some(body)), Err(ApiError::ContentRequired)),
                "body {:?} should be missing content",
                body
            );
        }
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let request = parse_create_request(Some(r#"{"content":"hi","tags":["a"]}"#)).unwrap();
        assert_eq!(request.content.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_create_note_success() {
        let (memory, store) = memory_store();

        let envelope = create_note(&store, Some(r#"{"content":"buy milk"}"#))
            .await
            .unwrap();

        assert_eq!(envelope.status_code, 201);
        let response: CreateNoteResponse = serde_json::from_str(&envelope.body).unwrap();
        assert_eq!(response.message, "note created");

        let stored = memory.get_by_key(&response.note_id).await.unwrap().unwrap();
        assert_eq!(stored.content, "buy milk");
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[tokio::test]
    async fn test_create_note_requires_content() {
        let (memory, store) = memory_store();

        for body in [None, Some("{}"), Some(r#"{"content":""}"#), Some(r#"{"content":null}"#)] {
            let result = create_note(&store, body).await;
            assert!(matches!(result, Err(ApiError::ContentRequired)), "body {:?}", body);
        }

        assert_eq!(memory.len().await, 0);
    }

    #[tokio::test]
    async fn test_create_note_invalid_json_skips_store() {
        let (memory, store) = memory_store();

        let result = create_note(&store, Some("{not json")).await;

        assert!(matches!(result, Err(ApiError::InvalidJson)));
        assert_eq!(memory.len().await, 0);
    }

    #[tokio::test]
    async fn test_create_note_store_failure() {
        let store = NoteStore::Failing("permission denied on table notes".to_string());

        let result = create_note(&store, Some(r#"{"content":"buy milk"}"#)).await;

        let envelope = match result {
            Err(err @ ApiError::CreateFailed(_)) => err.into_envelope(),
            other => panic!("expected a create failure, got {:?}", other),
        };
        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.body, r#"{"error":"internal error creating note"}"#);
    }
}
