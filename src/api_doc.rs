use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{CreateNoteRequest, CreateNoteResponse, Note};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "notes-fn API",
        version = "1.0.0",
        description = "Create and read notes backed by a key-value store"
    ),
    paths(
        handlers::health::health_handler,
        handlers::http::notes_handler,
        handlers::http::note_item_handler
    ),
    components(
        schemas(
            Note,
            CreateNoteRequest,
            CreateNoteResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "notes", description = "Note operations")
    )
)]
pub struct ApiDoc;
