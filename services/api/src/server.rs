use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use karir_core::config::{AppConfig, AppEnvironment};
use karir_core::error::AppError;
use karir_core::telemetry;
use karir_core::workflows::posting::JobBoardService;

use crate::cli::ServeArgs;
use crate::demo::seed_demo_company;
use crate::infra::{
    AppState, InMemoryCompanyRepository, InMemoryListingRepository, InMemoryNotificationQueue,
    InMemoryReportRepository,
};
use crate::routes::with_board_routes;

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(JobBoardService::new(
        Arc::new(InMemoryCompanyRepository::default()),
        Arc::new(InMemoryListingRepository::default()),
        Arc::new(InMemoryReportRepository::default()),
        Arc::new(InMemoryNotificationQueue::default()),
        config.posting.clone(),
    ));

    if config.environment == AppEnvironment::Development {
        seed_demo_company(&service)?;
        info!("seeded demo company for development");
    }

    let app = with_board_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "karirconnect posting service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
