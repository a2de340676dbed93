use std::sync::Arc;

use axum::extract::State;
use axum::http::header::REFERER;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::error;

use super::domain::LeadSubmission;
use super::notify::LeadNotifier;
use super::repository::LeadRepository;
use super::service::{LeadIntakeError, LeadIntakeService};
use crate::site::auth::{require_bearer, AdminAuth};
use crate::site::throttle::{throttle, RateLimiter};

const RECENT_LEADS_LIMIT: i64 = 100;

/// Router builder for the lead capture surface. Submission is public
/// but throttled per client; the lead listing sits behind the bearer
/// gate.
pub fn leads_router<R, N>(
    service: Arc<LeadIntakeService<R, N>>,
    auth: AdminAuth,
    limiter: Arc<dyn RateLimiter>,
) -> Router
where
    R: LeadRepository + 'static,
    N: LeadNotifier + 'static,
{
    let admin = Router::new()
        .route("/api/admin/leads", get(list_leads_handler::<R, N>))
        .layer(middleware::from_fn_with_state(auth, require_bearer));

    Router::new()
        .route(
            "/api/leads",
            post(submit_lead_handler::<R, N>)
                .layer(middleware::from_fn_with_state(limiter, throttle)),
        )
        .merge(admin)
        .with_state(service)
}

pub(crate) async fn submit_lead_handler<R, N>(
    State(service): State<Arc<LeadIntakeService<R, N>>>,
    headers: HeaderMap,
    Json(submission): Json<LeadSubmission>,
) -> Response
where
    R: LeadRepository + 'static,
    N: LeadNotifier + 'static,
{
    let source_page = source_page(&headers);

    match service.submit(submission, source_page).await {
        Ok(receipt) => {
            let payload = json!({ "success": true, "data": receipt });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(LeadIntakeError::Validation(error)) => {
            let payload = json!({
                "success": false,
                "error": "Validation failed",
                "details": error.faults,
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(LeadIntakeError::Repository(err)) => {
            error!(error = %err, "lead insert failed");
            let payload = json!({ "success": false, "error": "Failed to save lead" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_leads_handler<R, N>(
    State(service): State<Arc<LeadIntakeService<R, N>>>,
) -> Response
where
    R: LeadRepository + 'static,
    N: LeadNotifier + 'static,
{
    match service.recent(RECENT_LEADS_LIMIT).await {
        Ok(leads) => {
            let payload = json!({ "success": true, "data": leads });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "lead listing failed");
            let payload = json!({ "success": false, "error": "Failed to fetch leads" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn source_page(headers: &HeaderMap) -> String {
    headers
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|referer| !referer.is_empty())
        .unwrap_or("direct")
        .to_string()
}
