use crate::cli::ServeArgs;
use crate::infra::{build_fanout, AppState};
use crate::routes::app_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use platewise::config::AppConfig;
use platewise::error::AppError;
use platewise::site::auth::AdminAuth;
use platewise::site::careers::SqliteCareersStore;
use platewise::site::db;
use platewise::site::leads::{LeadIntakeService, SqliteLeadRepository};
use platewise::site::throttle::{FixedWindowLimiter, RateLimiter};
use platewise::telemetry;
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

    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await?;

    let store = Arc::new(SqliteCareersStore::new(pool.clone()));
    let repository = Arc::new(SqliteLeadRepository::new(pool));
    let notifier = Arc::new(build_fanout(&config.notifications));
    let intake = Arc::new(LeadIntakeService::new(repository, notifier));

    let auth = AdminAuth::new(config.auth.admin_token.clone());
    let limiter: Arc<dyn RateLimiter> =
        Arc::new(FixedWindowLimiter::from_config(&config.throttle));

    let app = app_router(store, intake, auth, limiter)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "platewise backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
