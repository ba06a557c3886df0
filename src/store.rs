use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::{is_valid_table_name, Config, StoreBackend};
use crate::models::Note;
use crate::spanner::SpannerClient;

/// Process-local note table, used for local runs and tests
#[derive(Clone, Default)]
pub struct MemoryStore {
    notes: Arc<RwLock<HashMap<String, Note>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, note: &Note) -> Result<()> {
        self.notes
            .write()
            .await
            .insert(note.note_id.clone(), note.clone());
        Ok(())
    }

    pub async fn get_by_key(&self, note_id: &str) -> Result<Option<Note>> {
        Ok(self.notes.read().await.get(note_id).cloned())
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }
}

/// A usable handle onto the backing key-value store
#[derive(Clone)]
pub enum NoteStore {
    Spanner(SpannerClient),
    Memory(MemoryStore),
    /// Backend whose every call fails with the given cause
    #[cfg(test)]
    Failing(String),
}

impl NoteStore {
    /// Write the full note, overwriting any note with the same id
    pub async fn put(&self, note: &Note) -> Result<()> {
        match self {
            NoteStore::Spanner(client) => client.put(note).await,
            NoteStore::Memory(store) => store.put(note).await,
            #[cfg(test)]
            NoteStore::Failing(cause) => Err(anyhow::anyhow!("{}", cause)),
        }
    }

    /// Fetch a note by exact id; `Ok(None)` when absent
    pub async fn get_by_key(&self, note_id: &str) -> Result<Option<Note>> {
        match self {
            NoteStore::Spanner(client) => client.get_by_key(note_id).await,
            NoteStore::Memory(store) => store.get_by_key(note_id).await,
            #[cfg(test)]
            NoteStore::Failing(cause) => Err(anyhow::anyhow!("{}", cause)),
        }
    }

    pub async fn health_check(&self) -> Result<()> {
        match self {
            NoteStore::Spanner(client) => client.health_check().await,
            NoteStore::Memory(_) => Ok(()),
            #[cfg(test)]
            NoteStore::Failing(cause) => Err(anyhow::anyhow!("{}", cause)),
        }
    }
}

/// Note store adapter, built once per process.
///
/// Holds no handle when initialization failed; callers must check
/// [`NoteStoreAdapter::store`] on every invocation.
#[derive(Clone)]
pub struct NoteStoreAdapter {
    store: Option<NoteStore>,
}

impl NoteStoreAdapter {
    /// Resolve the notes table and construct the backend client.
    ///
    /// Never fails: any problem is logged and yields an unavailable adapter.
    pub async fn init(config: &Config) -> Self {
        match connect(config).await {
            Ok(store) => {
                tracing::info!("Note store ready ({:?} backend)", config.store_backend);
                Self::available(store)
            }
            Err(e) => {
                tracing::error!("Note store initialization failed: {:#}", e);
                Self::unavailable()
            }
        }
    }

    pub fn available(store: NoteStore) -> Self {
        Self { store: Some(store) }
    }

    pub fn unavailable() -> Self {
        Self { store: None }
    }

    pub fn store(&self) -> Option<&NoteStore> {
        self.store.as_ref()
    }
}

async fn connect(config: &Config) -> Result<NoteStore> {
    let table = config
        .notes_table_name
        .as_deref()
        .context("NOTES_TABLE_NAME environment variable is not set")?;

    if !is_valid_table_name(table) {
        anyhow::bail!("NOTES_TABLE_NAME '{}' is not a valid table identifier", table);
    }

    match config.store_backend {
        StoreBackend::Spanner => Ok(NoteStore::Spanner(
            SpannerClient::from_config(config, table).await?,
        )),
        StoreBackend::Memory => Ok(NoteStore::Memory(MemoryStore::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config(table: Option<&str>) -> Config {
        Config {
            notes_table_name: table.map(str::to_string),
            store_backend: StoreBackend::Memory,
            spanner_emulator_host: None,
            spanner_project: None,
            spanner_instance: None,
            spanner_database: None,
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
        }
    }

    #[tokio::test]
    async fn test_init_memory_backend() {
        let adapter = NoteStoreAdapter::init(&memory_config(Some("notes"))).await;
        assert!(matches!(adapter.store(), Some(NoteStore::Memory(_))));
    }

    #[tokio::test]
    async fn test_init_without_table_name_is_unavailable() {
        let adapter = NoteStoreAdapter::init(&memory_config(None)).await;
        assert!(adapter.store().is_none());
    }

    #[tokio::test]
    async fn test_init_with_invalid_table_name_is_unavailable() {
        let adapter = NoteStoreAdapter::init(&memory_config(Some("notes; --"))).await;
        assert!(adapter.store().is_none());
    }

    #[tokio::test]
    async fn test_init_spanner_without_coordinates_is_unavailable() {
        let mut config = memory_config(Some("notes"));
        config.store_backend = StoreBackend::Spanner;

        let adapter = NoteStoreAdapter::init(&config).await;
        assert!(adapter.store().is_none());
    }

    #[tokio::test]
    async fn test_memory_put_and_get() {
        let store = NoteStore::Memory(MemoryStore::new());
        let note = Note::new("buy milk".to_string());

        store.put(&note).await.unwrap();

        let read = store.get_by_key(&note.note_id).await.unwrap();
        assert_eq!(read, Some(note));
        assert_eq!(store.get_by_key("does-not-exist").await.unwrap(), None);
        assert!(store.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_backend_reports_cause() {
        let store = NoteStore::Failing("connection reset".to_string());
        let note = Note::new("x".to_string());

        assert_eq!(store.put(&note).await.unwrap_err().to_string(), "connection reset");
        assert_eq!(store.get_by_key("abc").await.unwrap_err().to_string(), "connection reset");
        assert!(store.health_check().await.is_err());
    }

    #[tokio::test]
    async fn test_memory_put_overwrites() {
        let memory = MemoryStore::new();
        let mut note = Note::new("first".to_string());
        memory.put(&note).await.unwrap();

        note.content = "second".to_string();
        memory.put(&note).await.unwrap();

        assert_eq!(memory.len().await, 1);
        let read = memory.get_by_key(&note.note_id).await.unwrap().unwrap();
        assert_eq!(read.content, "second");
    }

    #[tokio::test]
    async fn test_adapter_clones_share_one_store() {
        let memory = MemoryStore::new();
        let adapter = NoteStoreAdapter::available(NoteStore::Memory(memory.clone()));
        let cloned = adapter.clone();

        let note = Note::new("shared".to_string());
        cloned.store().unwrap().put(&note).await.unwrap();

        assert_eq!(memory.len().await, 1);
        assert!(adapter.store().unwrap().get_by_key(&note.note_id).await.unwrap().is_some());
    }
}
