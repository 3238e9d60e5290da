use crate::cli::ServeArgs;
use crate::infra::{seed_demo_store, AppState};
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use startup_os::config::AppConfig;
use startup_os::error::AppError;
use startup_os::router::AppServices;
use startup_os::service::ServiceError;
use startup_os::store::MemoryDocumentStore;
use startup_os::telemetry;
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
    if args.seed_demo {
        config.seed_demo = true;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(MemoryDocumentStore::new());
    if config.seed_demo {
        let founder = seed_demo_store(&*store, Utc::now()).map_err(ServiceError::from)?;
        info!(%founder, "seeded demo workspace");
    }

    let services = AppServices::new(store, config.directory);
    let app = with_platform_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        candidate_limit = config.directory.candidate_limit,
        "startup dashboard api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
