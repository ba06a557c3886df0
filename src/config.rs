use std::env;
use anyhow::{Context, Result, bail};

/// Which backend the note store adapter talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Spanner,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub notes_table_name: Option<String>,
    pub store_backend: StoreBackend,
    pub spanner_emulator_host: Option<String>,
    pub spanner_project: Option<String>,
    pub spanner_instance: Option<String>,
    pub spanner_database: Option<String>,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Store settings are optional here: a missing table name or Spanner
    /// coordinate leaves the store adapter unavailable instead of aborting
    /// startup. Only settings the server itself cannot run without fail.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let notes_table_name = non_empty("NOTES_TABLE_NAME");

        let store_backend = match non_empty("NOTES_STORE").as_deref() {
            None | Some("spanner") => StoreBackend::Spanner,
            Some("memory") => StoreBackend::Memory,
            Some(other) => bail!("NOTES_STORE must be 'spanner' or 'memory', got '{}'", other),
        };

        let spanner_emulator_host = non_empty("SPANNER_EMULATOR_HOST");
        let spanner_project = non_empty("SPANNER_PROJECT");
        let spanner_instance = non_empty("SPANNER_INSTANCE");
        let spanner_database = non_empty("SPANNER_DATABASE");

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            notes_table_name,
            store_backend,
            spanner_emulator_host,
            spanner_project,
            spanner_instance,
            spanner_database,
            service_port,
            service_host,
        })
    }

    /// Full Spanner database path, if every coordinate is configured
    pub fn spanner_database_path(&self) -> Option<String> {
        match (&self.spanner_project, &self.spanner_instance, &self.spanner_database) {
            (Some(project), Some(instance), Some(database)) => Some(format!(
                "projects/{}/instances/{}/databases/{}",
                project, instance, database
            )),
            _ => None,
        }
    }

    pub fn log_startup(&self) {
        let unset = "(not set)";
        tracing::info!("Configuration loaded:");
        tracing::info!("  Notes table: {}", self.notes_table_name.as_deref().unwrap_or(unset));
        tracing::info!("  Store backend: {:?}", self.store_backend);
        if self.store_backend == StoreBackend::Spanner {
            tracing::info!("  Spanner emulator: {}",
                self.spanner_emulator_host.as_deref().unwrap_or("disabled (using production)"));
            tracing::info!("  Spanner project: {}", self.spanner_project.as_deref().unwrap_or(unset));
            tracing::info!("  Spanner instance: {}", self.spanner_instance.as_deref().unwrap_or(unset));
            tracing::info!("  Spanner database: {}", self.spanner_database.as_deref().unwrap_or(unset));
        }
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

/// Table names end up inside SQL text, so only plain identifiers are accepted
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
