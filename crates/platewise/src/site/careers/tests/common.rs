use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{Duration, NaiveDateTime};
use serde_json::Value;

use crate::site::auth::AdminAuth;
use crate::site::careers::careers_router;
use crate::site::careers::domain::{
    ApplicationRecord, ApplicationStatus, EmploymentType, NewApplication, NewVacancy,
    VacancyRecord, VacancyStatus,
};
use crate::site::careers::store::{ActivityWindow, CareersStore, VacancyDimension};
use crate::site::db::StoreError;

pub(super) const TEST_TOKEN: &str = "platewise-admin-token";

/// One of the ten counter reads behind the stats snapshot, in the
/// order the snapshot issues them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StatsStep {
    VacancyTotal,
    VacanciesByDepartment,
    VacanciesByLocation,
    VacanciesByType,
    VacanciesByStatus,
    ApplicationTotal,
    ApplicationsToday,
    ApplicationsThisWeek,
    ApplicationsThisMonth,
    ApplicationsByStatus,
}

impl StatsStep {
    pub(super) const ALL: [StatsStep; 10] = [
        StatsStep::VacancyTotal,
        StatsStep::VacanciesByDepartment,
        StatsStep::VacanciesByLocation,
        StatsStep::VacanciesByType,
        StatsStep::VacanciesByStatus,
        StatsStep::ApplicationTotal,
        StatsStep::ApplicationsToday,
        StatsStep::ApplicationsThisWeek,
        StatsStep::ApplicationsThisMonth,
        StatsStep::ApplicationsByStatus,
    ];
}

pub(super) fn clock() -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2026, 3, 10)
        .expect("valid date")
        .and_hms_opt(12, 0, 0)
        .expect("valid time")
}

/// In-memory store with a fixed clock, a call log for the stats
/// counters, and an injectable per-step failure.
pub(super) struct MemoryCareersStore {
    now: NaiveDateTime,
    next_id: AtomicI64,
    vacancies: Mutex<Vec<VacancyRecord>>,
    applications: Mutex<Vec<ApplicationRecord>>,
    fail_on: Mutex<Option<StatsStep>>,
    calls: Mutex<Vec<StatsStep>>,
}

impl MemoryCareersStore {
    pub(super) fn new() -> Self {
        Self {
            now: clock(),
            next_id: AtomicI64::new(1),
            vacancies: Mutex::new(Vec::new()),
            applications: Mutex::new(Vec::new()),
            fail_on: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn fail_at(&self, step: StatsStep) {
        *self.fail_on.lock().expect("failure mutex poisoned") = Some(step);
    }

    pub(super) fn calls(&self) -> Vec<StatsStep> {
        self.calls.lock().expect("call log mutex poisoned").clone()
    }

    pub(super) fn push_vacancy(
        &self,
        department: &str,
        location: &str,
        kind: EmploymentType,
        status: VacancyStatus,
    ) -> VacancyRecord {
        let record = VacancyRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            title: format!("{department} opening"),
            department: department.to_string(),
            location: location.to_string(),
            employment_type: kind,
            status,
            created_at: self.now,
        };
        self.vacancies
            .lock()
            .expect("vacancy mutex poisoned")
            .push(record.clone());
        record
    }

    pub(super) fn push_application(
        &self,
        status: ApplicationStatus,
        created_at: NaiveDateTime,
    ) -> ApplicationRecord {
        let record = ApplicationRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            vacancy_id: 1,
            candidate_name: "Alex Reyes".to_string(),
            candidate_email: "alex@example.com".to_string(),
            status,
            created_at,
        };
        self.applications
            .lock()
            .expect("application mutex poisoned")
            .push(record.clone());
        record
    }

    fn observe(&self, step: StatsStep) -> Result<(), StoreError> {
        self.calls
            .lock()
            .expect("call log mutex poisoned")
            .push(step);
        if *self.fail_on.lock().expect("failure mutex poisoned") == Some(step) {
            return Err(StoreError::Unavailable("stats query failed".to_string()));
        }
        Ok(())
    }

    fn group(values: impl Iterator<Item = String>) -> Vec<(String, i64)> {
        let mut counts: Vec<(String, i64)> = Vec::new();
        for value in values {
            match counts.iter_mut().find(|(label, _)| *label == value) {
                Some((_, count)) => *count += 1,
                None => counts.push((value, 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}

#[async_trait]
impl CareersStore for MemoryCareersStore {
    async fn create_vacancy(&self, vacancy: NewVacancy) -> Result<VacancyRecord, StoreError> {
        let record = VacancyRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            title: vacancy.title,
            department: vacancy.department,
            location: vacancy.location,
            employment_type: vacancy.employment_type,
            status: vacancy.status,
            created_at: self.now,
        };
        self.vacancies
            .lock()
            .expect("vacancy mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    async fn active_vacancies(&self) -> Result<Vec<VacancyRecord>, StoreError> {
        let mut rows: Vec<VacancyRecord> = self
            .vacancies
            .lock()
            .expect("vacancy mutex poisoned")
            .iter()
            .filter(|vacancy| vacancy.status == VacancyStatus::Active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn vacancy_by_id(&self, id: i64) -> Result<Option<VacancyRecord>, StoreError> {
        Ok(self
            .vacancies
            .lock()
            .expect("vacancy mutex poisoned")
            .iter()
            .find(|vacancy| vacancy.id == id)
            .cloned())
    }

    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<ApplicationRecord, StoreError> {
        let record = ApplicationRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            vacancy_id: application.vacancy_id,
            candidate_name: application.candidate_name,
            candidate_email: application.candidate_email,
            status: ApplicationStatus::New,
            created_at: self.now,
        };
        self.applications
            .lock()
            .expect("application mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    async fn vacancy_total(&self) -> Result<i64, StoreError> {
        self.observe(StatsStep::VacancyTotal)?;
        Ok(self.vacancies.lock().expect("vacancy mutex poisoned").len() as i64)
    }

    async fn vacancies_by(
        &self,
        dimension: VacancyDimension,
    ) -> Result<Vec<(String, i64)>, StoreError> {
        self.observe(match dimension {
            VacancyDimension::Department => StatsStep::VacanciesByDepartment,
            VacancyDimension::Location => StatsStep::VacanciesByLocation,
            VacancyDimension::EmploymentType => StatsStep::VacanciesByType,
            VacancyDimension::Status => StatsStep::VacanciesByStatus,
        })?;

        let vacancies = self.vacancies.lock().expect("vacancy mutex poisoned");
        Ok(Self::group(vacancies.iter().map(|vacancy| match dimension {
            VacancyDimension::Department => vacancy.department.clone(),
            VacancyDimension::Location => vacancy.location.clone(),
            VacancyDimension::EmploymentType => vacancy.employment_type.as_str().to_string(),
            VacancyDimension::Status => vacancy.status.as_str().to_string(),
        })))
    }

    async fn application_total(&self) -> Result<i64, StoreError> {
        self.observe(StatsStep::ApplicationTotal)?;
        Ok(self
            .applications
            .lock()
            .expect("application mutex poisoned")
            .len() as i64)
    }

    async fn applications_in(&self, window: ActivityWindow) -> Result<i64, StoreError> {
        self.observe(match window {
            ActivityWindow::Today => StatsStep::ApplicationsToday,
            ActivityWindow::PastWeek => StatsStep::ApplicationsThisWeek,
            ActivityWindow::PastMonth => StatsStep::ApplicationsThisMonth,
        })?;

        let applications = self.applications.lock().expect("application mutex poisoned");
        let total = applications
            .iter()
            .filter(|application| match window {
                ActivityWindow::Today => application.created_at.date() == self.now.date(),
                ActivityWindow::PastWeek => application.created_at >= self.now - Duration::days(7),
                ActivityWindow::PastMonth => {
                    application.created_at >= self.now - Duration::days(30)
                }
            })
            .count();
        Ok(total as i64)
    }

    async fn applications_by_status(&self) -> Result<Vec<(String, i64)>, StoreError> {
        self.observe(StatsStep::ApplicationsByStatus)?;
        let applications = self.applications.lock().expect("application mutex poisoned");
        Ok(Self::group(
            applications
                .iter()
                .map(|application| application.status.as_str().to_string()),
        ))
    }
}

/// Store pre-loaded with a small but unevenly distributed data set.
pub(super) fn seeded_store() -> MemoryCareersStore {
    let store = MemoryCareersStore::new();

    store.push_vacancy(
        "Kitchen",
        "Des Moines, IA",
        EmploymentType::FullTime,
        VacancyStatus::Active,
    );
    store.push_vacancy(
        "Kitchen",
        "Cedar Rapids, IA",
        EmploymentType::PartTime,
        VacancyStatus::Active,
    );
    store.push_vacancy(
        "Front of House",
        "Des Moines, IA",
        EmploymentType::FullTime,
        VacancyStatus::Inactive,
    );

    store.push_application(ApplicationStatus::New, clock() - Duration::hours(1));
    store.push_application(ApplicationStatus::New, clock() - Duration::days(2));
    store.push_application(ApplicationStatus::Reviewed, clock() - Duration::days(10));

    store
}

pub(super) fn admin_auth() -> AdminAuth {
    AdminAuth::new(Some(TEST_TOKEN.to_string()))
}

pub(super) fn careers_router_with(store: Arc<MemoryCareersStore>) -> axum::Router {
    careers_router(store, admin_auth())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
