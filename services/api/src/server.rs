use crate::cli::ServeArgs;
use crate::infra::{
    AppState, ConfiguredGeolocation, InMemorySessionRepository, LogNavigator, LogNotificationSink,
};
use crate::routes::with_checklist_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use kyc_checklist::config::AppConfig;
use kyc_checklist::error::AppError;
use kyc_checklist::telemetry;
use kyc_checklist::workflows::kyc::{ChecklistService, RedirectPolicy};
use std::sync::atomic::Ordering;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemorySessionRepository::default());
    let notifications = Arc::new(LogNotificationSink);
    let geolocation = Arc::new(ConfiguredGeolocation::from_config(&config.geolocation));
    let navigator = Arc::new(LogNavigator);
    let checklist_service = Arc::new(ChecklistService::new(
        repository,
        notifications,
        geolocation,
        navigator,
        RedirectPolicy::from_config(&config.checklist),
    ));

    let app = with_checklist_routes(checklist_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "kyc checklist service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
