use crate::cli::ServeArgs;
use crate::infra::{default_prediction_service, AppState};
use crate::routes::with_prediction_routes;
use axum::{middleware, Extension};
use axum_prometheus::PrometheusMetricLayer;
use pipeline_score::config::AppConfig;
use pipeline_score::error::{panic_response, AppError};
use pipeline_score::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = default_prediction_service();

    let app = with_prediction_routes(service, config.server.admin_routes)
        .layer(Extension(app_state))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(prometheus_layer)
        .layer(middleware::from_fn(telemetry::log_request));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        debug = config.debug,
        admin_routes = config.server.admin_routes,
        %addr,
        "pipeline scoring api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
