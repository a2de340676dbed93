use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use platewise::site::auth::AdminAuth;
use platewise::site::careers::{careers_router, CareersStore};
use platewise::site::leads::{leads_router, LeadIntakeService, LeadNotifier, LeadRepository};
use platewise::site::throttle::RateLimiter;

/// Compose the careers and leads surfaces with the operational probes.
pub(crate) fn app_router<S, R, N>(
    store: Arc<S>,
    intake: Arc<LeadIntakeService<R, N>>,
    auth: AdminAuth,
    limiter: Arc<dyn RateLimiter>,
) -> axum::Router
where
    S: CareersStore + 'static,
    R: LeadRepository + 'static,
    N: LeadNotifier + 'static,
{
    careers_router(store, auth.clone())
        .merge(leads_router(intake, auth, limiter))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
