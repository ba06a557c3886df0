use anyhow::{Context, Result};
use gcloud_gax::grpc::{Code, Status};
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::mutation::insert_or_update;
use gcloud_spanner::statement::Statement;
use std::sync::Arc;

use crate::config::Config;
use crate::models::Note;

const COLUMNS: [&str; 4] = ["note_id", "content", "created_at", "updated_at"];

/// Shareable Spanner client bound to the notes table
#[derive(Clone)]
pub struct SpannerClient {
    inner: Arc<Client>,
    table: Arc<str>,
}

impl SpannerClient {
    /// Create a new Spanner client for `table` from configuration
    ///
    /// The gcloud-spanner library automatically detects the
    /// SPANNER_EMULATOR_HOST environment variable and connects to
    /// the emulator when set, or production Spanner otherwise.
    ///
    /// Missing instance, database or notes table are created first.
    pub async fn from_config(config: &Config, table: &str) -> Result<Self> {
        let database_path = config
            .spanner_database_path()
            .context("SPANNER_PROJECT, SPANNER_INSTANCE and SPANNER_DATABASE are required")?;

        auto_provision(config, table).await?;

        match &config.spanner_emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        // ClientConfig::default() automatically uses SPANNER_EMULATOR_HOST if set
        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {} (table {})",
            database_path,
            table
        );

        Ok(Self {
            inner: Arc::new(client),
            table: Arc::from(table),
        })
    }

    /// Insert or overwrite the note keyed by its `note_id`
    ///
    /// # Errors
    /// Returns an error if the Spanner mutation fails
    pub async fn put(&self, note: &Note) -> Result<()> {
        let mutation = insert_or_update(
            &self.table,
            &COLUMNS,
            &[&note.note_id, &note.content, &note.created_at, &note.updated_at],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to write note to Spanner")?;

        tracing::debug!("Upserted note with id: {}", note.note_id);
        Ok(())
    }

    /// Read a note by exact key
    ///
    /// # Returns
    /// * `Ok(Some(note))` - Note found
    /// * `Ok(None)` - No note with this id
    /// * `Err(_)` - Spanner operation failed
    pub async fn get_by_key(&self, note_id: &str) -> Result<Option<Note>> {
        let mut statement = Statement::new(format!(
            "SELECT note_id, content, created_at, updated_at FROM {} WHERE note_id = @note_id",
            self.table
        ));
        statement.add_param("note_id", &note_id.to_string());

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query note from Spanner")?;

        let row = result_set
            .next()
            .await
            .context("Failed to read note row from Spanner")?;

        if let Some(row) = row {
            let note = Note {
                note_id: row.column_by_name("note_id")?,
                content: row.column_by_name("content")?,
                created_at: row.column_by_name("created_at")?,
                updated_at: row.column_by_name("updated_at")?,
            };

            tracing::debug!("Read note with id: {}", note_id);
            Ok(Some(note))
        } else {
            tracing::debug!("Note not found with id: {}", note_id);
            Ok(None)
        }
    }

    /// Run `SELECT 1` to verify the database is reachable
    pub async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        let row = result_set
            .next()
            .await
            .context("Failed to read health check row")?;

        if row.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

/// DDL for the notes table.
///
/// Timestamps are kept as the exact strings handed back to callers.
fn notes_table_ddl(table: &str) -> String {
    format!(
        r#"
CREATE TABLE {} (
    note_id STRING(36) NOT NULL,
    content STRING(MAX) NOT NULL,
    created_at STRING(64) NOT NULL,
    updated_at STRING(64) NOT NULL,
) PRIMARY KEY (note_id)
"#,
        table
    )
    .trim()
    .to_string()
}

fn ddl_declares_table(statements: &[String], table: &str) -> bool {
    let plain = format!("CREATE TABLE {} ", table);
    let quoted = format!("CREATE TABLE `{}` ", table);
    statements
        .iter()
        .any(|stmt| stmt.starts_with(&plain) || stmt.starts_with(&quoted))
}

/// Provision Spanner instance, database and notes table if missing
async fn auto_provision(config: &Config, table: &str) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let (Some(project), Some(instance), Some(database)) = (
        config.spanner_project.as_deref(),
        config.spanner_instance.as_deref(),
        config.spanner_database.as_deref(),
    ) else {
        anyhow::bail!("Spanner coordinates are incomplete");
    };

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", project);
    let instance_path = format!("{}/instances/{}", project_path, instance);
    let database_path = format!("{}/databases/{}", instance_path, database);

    let instance_lookup = admin_client
        .instance()
        .get_instance(GetInstanceRequest { name: instance_path.clone(), field_mask: None }, None)
        .await;
    if !exists(instance_lookup, &instance_path)? {
        create_instance(&admin_client, config, instance, &project_path, &instance_path).await?;
    }

    let database_lookup = admin_client
        .database()
        .get_database(GetDatabaseRequest { name: database_path.clone() }, None)
        .await;
    if !exists(database_lookup, &database_path)? {
        create_database(&admin_client, database, &instance_path).await?;
    }

    ensure_table_exists(&admin_client, &database_path, table).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// Map an admin `get_*` result to whether the resource is there
fn exists<T>(result: Result<T, Status>, path: &str) -> Result<bool> {
    match result {
        Ok(_) => {
            tracing::info!("Found {}", path);
            Ok(true)
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Missing {}, creating it", path);
            Ok(false)
        }
        Err(status) => Err(anyhow::anyhow!("Failed to look up {}: {}", path, status.message())),
    }
}

async fn create_instance(
    admin_client: &AdminClient,
    config: &Config,
    instance_id: &str,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let instance_config = match config.spanner_emulator_host {
        Some(_) => "emulator-config",
        None => "regional-us-central1",
    };

    let request = CreateInstanceRequest {
        parent: project_path.to_string(),
        instance_id: instance_id.to_string(),
        instance: Some(Instance {
            name: instance_path.to_string(),
            config: format!("{}/instanceConfigs/{}", project_path, instance_config),
            display_name: format!("notes {}", instance_id),
            node_count: 1,
            ..Default::default()
        }),
    };

    admin_client
        .instance()
        .create_instance(request, None)
        .await
        .context("Failed to start instance creation")?
        .wait(None)
        .await
        .context("Failed to create instance")?;

    tracing::info!("Created {}", instance_path);
    Ok(())
}

async fn create_database(
    admin_client: &AdminClient,
    database_id: &str,
    instance_path: &str,
) -> Result<()> {
    let request = CreateDatabaseRequest {
        parent: instance_path.to_string(),
        create_statement: format!("CREATE DATABASE `{}`", database_id),
        extra_statements: vec![],
        encryption_config: None,
        database_dialect: 1, // Google Standard SQL
        proto_descriptors: vec![],
    };

    admin_client
        .database()
        .create_database(request, None)
        .await
        .context("Failed to start database creation")?
        .wait(None)
        .await
        .context("Failed to create database")?;

    tracing::info!("Created {}/databases/{}", instance_path, database_id);
    Ok(())
}

async fn ensure_table_exists(
    admin_client: &AdminClient,
    database_path: &str,
    table: &str,
) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    if ddl_declares_table(&ddl_response.into_inner().statements, table) {
        tracing::info!("Table '{}' already exists", table);
        return Ok(());
    }

    tracing::info!("Table '{}' not found, creating...", table);

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![notes_table_ddl(table)],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?;

    operation
        .wait(None)
        .await
        .context("Failed to create table")?;

    tracing::info!("Table '{}' created successfully", table);
    Ok(())
}
