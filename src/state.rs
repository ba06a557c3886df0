use crate::store::NoteStoreAdapter;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub notes: NoteStoreAdapter,
}
