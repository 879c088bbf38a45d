use metrics_exporter_prometheus::PrometheusHandle;
use registrar::config::{AppConfig, DatabaseConfig};
use registrar::error::AppError;
use registrar::registrations::RegistrationStore;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Apply a `--database-url` override on top of the environment configuration.
pub(crate) fn database_config(
    config: &AppConfig,
    override_url: Option<String>,
) -> Result<DatabaseConfig, AppError> {
    match override_url {
        Some(url) => Ok(DatabaseConfig::new(url, config.database.max_connections)?),
        None => Ok(config.database.clone()),
    }
}

/// Open the backend named by the URL scheme and make sure the registrations table exists.
pub(crate) async fn open_store(config: &DatabaseConfig) -> Result<RegistrationStore, AppError> {
    let store = RegistrationStore::connect(config).await?;
    store.ensure_schema().await?;
    let existing = store.count().await?;
    info!(backend = ?store.backend(), existing, "registration store ready");
    Ok(store)
}
