//! HTTP trigger: turns axum requests into invocations for the router.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::{Method, Uri},
};
use std::collections::HashMap;

use crate::error::ErrorResponse;
use crate::models::{CreateNoteRequest, CreateNoteResponse, Note};
use crate::response::Envelope;
use crate::router::{dispatch, Invocation, NOTE_ID_PARAM};
use crate::routes;
use crate::state::AppState;

/// Buffered request body; aliased so utoipa does not infer it as a documented body
type RawBody = Result<Bytes, BytesRejection>;

/// Build the router's view of a request.
///
/// Extractor rejections are folded into the invocation instead of answered
/// here, so the router still applies the store check and response headers.
/// A body that cannot be buffered or is not UTF-8 is marked unreadable.
fn invocation(
    method: &Method,
    uri: &Uri,
    path_parameters: Option<HashMap<String, String>>,
    body: Result<Bytes, BytesRejection>,
) -> Invocation {
    let (body, unreadable_body) = match body.map(|bytes| String::from_utf8(bytes.to_vec())) {
        Ok(Ok(text)) => ((!text.is_empty()).then_some(text), false),
        Ok(Err(e)) => {
            tracing::warn!("Request body is not valid UTF-8: {}", e);
            (None, true)
        }
        Err(rejection) => {
            tracing::warn!("Failed to read request body: {}", rejection);
            (None, true)
        }
    };

    Invocation {
        http_method: method.as_str().to_string(),
        path: uri.path().to_string(),
        path_parameters,
        body,
        unreadable_body,
    }
}

/// /notes handler - POST creates a note, other methods are rejected
#[utoipa::path(
    post,
    path = routes::NOTES,
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = CreateNoteResponse),
        (status = 400, description = "Invalid JSON or missing content", body = ErrorResponse),
        (status = 405, description = "Method not supported", body = ErrorResponse),
        (status = 500, description = "Store error or server misconfiguration", body = ErrorResponse)
    ),
    tag = "notes"
)]
pub async fn notes_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> Envelope {
    dispatch(&state.notes, &invocation(&method, &uri, None, body)).await
}

/// /notes/{noteId} handler - GET retrieves a note, other methods are rejected
#[utoipa::path(
    get,
    path = routes::NOTE_ITEM,
    params(
        ("noteId" = String, Path, description = "Identifier returned when the note was created")
    ),
    responses(
        (status = 200, description = "Note found", body = Note),
        (status = 400, description = "Missing noteId", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 405, description = "Method not supported", body = ErrorResponse),
        (status = 500, description = "Store error or server misconfiguration", body = ErrorResponse)
    ),
    tag = "notes"
)]
pub async fn note_item_handler(
    State(state): State<AppState>,
    note_id: Result<Path<String>, PathRejection>,
    method: Method,
    uri: Uri,
    body: RawBody,
) -> Envelope {
    // An undecodable id leaves no parameter, which the router treats as a shape mismatch
    let params = match note_id {
        Ok(Path(note_id)) => Some(HashMap::from([(NOTE_ID_PARAM.to_string(), note_id)])),
        Err(rejection) => {
            tracing::warn!("Unusable noteId in {}: {}", uri.path(), rejection);
            None
        }
    };
    dispatch(&state.notes, &invocation(&method, &uri, params, body)).await
}

/// Every other path still goes through the router so it answers 404/405/500
pub async fn fallback_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> Envelope {
    dispatch(&state.notes, &invocation(&method, &uri, None, body)).await
}
