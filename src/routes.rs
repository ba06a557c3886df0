// Route path constants - single source of truth for all API paths

pub const HEALTH: &str = "/health";
pub const NOTES: &str = "/notes";
pub const NOTE_ITEM: &str = "/notes/{noteId}";

pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Concrete path of a single note
pub fn note_path(note_id: &str) -> String {
    format!("{}/{}", NOTES, note_id)
}
