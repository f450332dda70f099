//! Load/save boundary for column preferences.

use std::path::{Path, PathBuf};

use log::debug;
use tokio::task;

use crate::{
    db::Database,
    error::{ConsoleError, Result},
    models::ColumnPreferences,
};

/// Column preferences stored in a local SQLite file.
///
/// Each call opens its own connection on the blocking pool, so the store is
/// cheap to clone and never blocks the runtime.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    db_path: PathBuf,
}

impl PreferenceStore {
    /// Opens the store at `path`, or at the XDG data location when `None`.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::XdgDirectory` if no default location exists,
    /// `ConsoleError::FileSystem` if the parent directory cannot be created
    /// and `ConsoleError::Database` if the schema cannot be initialized.
    pub async fn open(path: Option<PathBuf>) -> Result<Self> {
        let db_path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ConsoleError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let store = Self { db_path };
        store.with_database(|_| Ok(())).await?;
        debug!("Column preferences at {}", store.db_path.display());
        Ok(store)
    }

    /// `$XDG_DATA_HOME/opsdesk/preferences.db`
    pub fn default_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("opsdesk")
            .place_data_file("preferences.db")
            .map_err(|e| ConsoleError::XdgDirectory(e.to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub async fn load(&self) -> Result<ColumnPreferences> {
        self.with_database(|db| db.load_column_preferences()).await
    }

    pub async fn save(&self, preferences: &ColumnPreferences) -> Result<()> {
        let preferences = preferences.clone();
        self.with_database(move |db| db.save_column_preferences(&preferences))
            .await
    }

    async fn with_database<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            operation(&mut db)
        })
        .await
        .map_err(|e| ConsoleError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
