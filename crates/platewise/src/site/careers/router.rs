use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::error;

use super::domain::{ApplicationSubmission, NewApplication, NewVacancy, VacancyStatus};
use super::stats;
use super::store::CareersStore;
use crate::site::auth::{require_bearer, AdminAuth};
use crate::site::patterns;

/// Router builder for the careers surface. The stats dashboard and
/// vacancy management sit behind the bearer gate; listings and
/// applications stay public.
pub fn careers_router<S>(store: Arc<S>, auth: AdminAuth) -> Router
where
    S: CareersStore + 'static,
{
    let admin = Router::new()
        .route("/api/careers/stats", get(stats_handler::<S>))
        .route("/api/admin/vacancies", post(create_vacancy_handler::<S>))
        .layer(middleware::from_fn_with_state(auth, require_bearer));

    Router::new()
        .route("/api/careers/vacancies", get(list_vacancies_handler::<S>))
        .route(
            "/api/careers/applications",
            post(submit_application_handler::<S>),
        )
        .merge(admin)
        .with_state(store)
}

pub(crate) async fn stats_handler<S>(State(store): State<Arc<S>>) -> Response
where
    S: CareersStore + 'static,
{
    match stats::collect(store.as_ref()).await {
        Ok(snapshot) => {
            let payload = json!({ "success": true, "stats": snapshot });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "careers stats snapshot failed");
            let payload = json!({ "success": false, "error": "Failed to fetch stats" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_vacancies_handler<S>(State(store): State<Arc<S>>) -> Response
where
    S: CareersStore + 'static,
{
    match store.active_vacancies().await {
        Ok(vacancies) => {
            let payload = json!({ "success": true, "data": vacancies });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "vacancy listing failed");
            let payload = json!({ "success": false, "error": "Failed to fetch vacancies" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn create_vacancy_handler<S>(
    State(store): State<Arc<S>>,
    Json(vacancy): Json<NewVacancy>,
) -> Response
where
    S: CareersStore + 'static,
{
    let vacancy = NewVacancy {
        title: vacancy.title.trim().to_string(),
        department: vacancy.department.trim().to_string(),
        location: vacancy.location.trim().to_string(),
        ..vacancy
    };

    let mut details = Vec::new();
    if vacancy.title.is_empty() {
        details.push(json!({ "field": "title", "message": "Title is required" }));
    }
    if vacancy.department.is_empty() {
        details.push(json!({ "field": "department", "message": "Department is required" }));
    }
    if vacancy.location.is_empty() {
        details.push(json!({ "field": "location", "message": "Location is required" }));
    }
    if !details.is_empty() {
        let payload = json!({
            "success": false,
            "error": "Validation failed",
            "details": details,
        });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    }

    match store.create_vacancy(vacancy).await {
        Ok(record) => {
            let payload = json!({ "success": true, "data": record });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "vacancy create failed");
            let payload = json!({ "success": false, "error": "Failed to create vacancy" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn submit_application_handler<S>(
    State(store): State<Arc<S>>,
    Json(submission): Json<ApplicationSubmission>,
) -> Response
where
    S: CareersStore + 'static,
{
    let name = submission.name.trim().to_string();
    let email = submission.email.trim().to_string();

    let mut details = Vec::new();
    if name.is_empty() {
        details.push(json!({ "field": "name", "message": "Name is required" }));
    }
    if !patterns::email().is_match(&email) {
        details.push(json!({ "field": "email", "message": "A valid email is required" }));
    }
    if !details.is_empty() {
        let payload = json!({
            "success": false,
            "error": "Validation failed",
            "details": details,
        });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    }

    let vacancy = match store.vacancy_by_id(submission.vacancy_id).await {
        Ok(Some(vacancy)) => vacancy,
        Ok(None) => {
            let payload = json!({ "success": false, "error": "Vacancy not found" });
            return (StatusCode::NOT_FOUND, Json(payload)).into_response();
        }
        Err(err) => {
            error!(error = %err, "vacancy lookup failed");
            let payload = json!({ "success": false, "error": "Failed to save application" });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
        }
    };

    if vacancy.status != VacancyStatus::Active {
        let payload = json!({
            "success": false,
            "error": "Vacancy is no longer accepting applications",
        });
        return (StatusCode::CONFLICT, Json(payload)).into_response();
    }

    let application = NewApplication {
        vacancy_id: vacancy.id,
        candidate_name: name,
        candidate_email: email,
    };

    match store.create_application(application).await {
        Ok(record) => {
            let payload = json!({ "success": true, "data": { "id": record.id } });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "application insert failed");
            let payload = json!({ "success": false, "error": "Failed to save application" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
