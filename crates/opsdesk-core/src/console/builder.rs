//! Builder for creating and configuring console instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use jiff::Zoned;
use log::info;

use super::ReconciliationConsole;
use crate::{
    error::{ConsoleError, Result},
    models::ConsoleFilter,
    preferences::PreferenceStore,
    source::{HttpReservationSource, HttpSourceConfig, InMemoryReservationSource, ReservationSource},
};

/// A configured console together with the store its columns came from.
pub struct ConsoleSession {
    pub console: ReconciliationConsole,
    pub preferences: PreferenceStore,
}

/// Builder for [`ReconciliationConsole`].
///
/// Exactly one reservation source is used, in this order of precedence: an
/// explicit source, a JSON fixture file, the REST API at `api_url`.
#[derive(Default)]
pub struct ConsoleBuilder {
    api_url: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
    fixture: Option<PathBuf>,
    source: Option<Arc<dyn ReservationSource>>,
    preferences_path: Option<PathBuf>,
    filter: Option<ConsoleFilter>,
}

impl ConsoleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Bearer token for the REST API.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Serves reservations from a JSON file instead of the API.
    pub fn with_fixture<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.fixture = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_source(mut self, source: Arc<dyn ReservationSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets a custom preference file path.
    ///
    /// If not specified, uses `$XDG_DATA_HOME/opsdesk/preferences.db`.
    pub fn with_preferences_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.preferences_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Initial filter; defaults to today's reservations.
    pub fn with_filter(mut self, filter: ConsoleFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Builds the console. Reservations are not loaded until
    /// [`ReconciliationConsole::refresh`] is called.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Configuration` if no source is configured,
    /// `ConsoleError::FileSystem` or `ConsoleError::Serialization` for an
    /// unreadable fixture, and the preference store's errors.
    pub async fn build(self) -> Result<ConsoleSession> {
        let source = self.resolve_source()?;
        let preferences = PreferenceStore::open(self.preferences_path).await?;
        let columns = preferences.load().await?;
        let filter = self
            .filter
            .unwrap_or_else(|| ConsoleFilter::for_date(Zoned::now().date()));

        Ok(ConsoleSession {
            console: ReconciliationConsole::new(source, columns, filter),
            preferences,
        })
    }

    fn resolve_source(&self) -> Result<Arc<dyn ReservationSource>> {
        if let Some(source) = &self.source {
            return Ok(source.clone());
        }
        if let Some(fixture) = &self.fixture {
            info!("Serving reservations from {}", fixture.display());
            return Ok(Arc::new(InMemoryReservationSource::from_json_file(fixture)?));
        }
        match &self.api_url {
            Some(url) => {
                let mut config = HttpSourceConfig::new(url.clone());
                config.token = self.token.clone();
                if let Some(timeout) = self.timeout {
                    config.timeout = timeout;
                }
                info!("Using reservation API at {url}");
                Ok(Arc::new(HttpReservationSource::new(config)?))
            }
            None => Err(ConsoleError::Configuration {
                message: "No reservation source: set an API URL or a fixture file".to_string(),
            }),
        }
    }
}
