use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{fallback_handler, health_handler, note_item_handler, notes_handler};
use crate::routes;
use crate::state::AppState;

/// Assemble the HTTP application
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTH, get(health_handler))
        .route(routes::NOTES, any(notes_handler))
        .route(routes::NOTE_ITEM, any(note_item_handler))
        .fallback(fallback_handler)
        .with_state(state)
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
