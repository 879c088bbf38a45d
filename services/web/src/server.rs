use crate::cli::{ServeArgs, StoreArgs};
use crate::infra::{database_config, open_store, AppState};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use registrar::config::AppConfig;
use registrar::error::AppError;
use registrar::registrations::RegistrationService;
use registrar::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    config.database = database_config(&config, args.store.database_url.take())?;

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(open_store(&config.database).await?);
    let registration_service = Arc::new(RegistrationService::new(store));

    let app = with_operational_routes(registration_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "registration service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) async fn init_db(mut args: StoreArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    config.database = database_config(&config, args.database_url.take())?;

    telemetry::init(&config.telemetry)?;

    let store = open_store(&config.database).await?;
    store.close().await;
    Ok(())
}
