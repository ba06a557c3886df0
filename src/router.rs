use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ApiError;
use crate::handlers::{create_note, get_note};
use crate::response::Envelope;
use crate::routes;
use crate::store::NoteStoreAdapter;

pub const NOTE_ID_PARAM: &str = "noteId";

/// One request as delivered by the trigger
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    pub http_method: String,
    pub path: String,
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    /// Set by the trigger when the body could not be read as text (not UTF-8, or over the size limit)
    #[serde(skip)]
    pub unreadable_body: bool,
}

impl Invocation {
    fn note_id_param(&self) -> Option<&str> {
        self.path_parameters
            .as_ref()?
            .get(NOTE_ID_PARAM)
            .map(String::as_str)
    }
}

/// Route a single invocation to its handler and produce the response envelope
pub async fn dispatch(notes: &NoteStoreAdapter, invocation: &Invocation) -> Envelope {
    tracing::info!(
        method = %invocation.http_method,
        path = %invocation.path,
        "Invocation received"
    );

    let Some(store) = notes.store() else {
        return ApiError::Configuration.into_envelope();
    };

    let result = match invocation.http_method.as_str() {
        "POST" if invocation.path == routes::NOTES => {
            if invocation.unreadable_body {
                Err(ApiError::InvalidJson)
            } else {
                create_note(store, invocation.body.as_deref()).await
            }
        }
        "GET" => match invocation.note_id_param() {
            Some(note_id) if invocation.path == routes::note_path(note_id) => {
                get_note(store, note_id).await
            }
            _ => {
                tracing::warn!("Unsupported GET path or missing noteId: {}", invocation.path);
                Err(ApiError::RouteNotFound)
            }
        },
        method => {
            tracing::warn!("Method {} not supported for path {}", method, invocation.path);
            Err(ApiError::MethodNotAllowed {
                method: method.to_string(),
                path: invocation.path.clone(),
            })
        }
    };

    result.unwrap_or_else(ApiError::into_envelope)
}
