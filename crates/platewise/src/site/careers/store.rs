use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use super::domain::{
    ApplicationRecord, ApplicationStatus, EmploymentType, NewApplication, NewVacancy,
    VacancyRecord, VacancyStatus,
};
use crate::site::db::StoreError;

/// Grouping axes the stats snapshot slices vacancies by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VacancyDimension {
    Department,
    Location,
    EmploymentType,
    Status,
}

impl VacancyDimension {
    pub const fn column(self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Location => "location",
            Self::EmploymentType => "employment_type",
            Self::Status => "status",
        }
    }
}

/// Trailing activity windows for application counts. The windows
/// overlap: a row created an hour ago counts toward all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityWindow {
    Today,
    PastWeek,
    PastMonth,
}

impl ActivityWindow {
    const fn predicate(self) -> &'static str {
        match self {
            Self::Today => "date(created_at) = date('now')",
            Self::PastWeek => "created_at >= datetime('now', '-7 days')",
            Self::PastMonth => "created_at >= datetime('now', '-30 days')",
        }
    }
}

/// Storage abstraction so the stats snapshot and routers can be
/// exercised against in-memory fakes.
#[async_trait]
pub trait CareersStore: Send + Sync {
    async fn create_vacancy(&self, vacancy: NewVacancy) -> Result<VacancyRecord, StoreError>;
    async fn active_vacancies(&self) -> Result<Vec<VacancyRecord>, StoreError>;
    async fn vacancy_by_id(&self, id: i64) -> Result<Option<VacancyRecord>, StoreError>;
    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<ApplicationRecord, StoreError>;
    async fn vacancy_total(&self) -> Result<i64, StoreError>;
    async fn vacancies_by(
        &self,
        dimension: VacancyDimension,
    ) -> Result<Vec<(String, i64)>, StoreError>;
    async fn application_total(&self) -> Result<i64, StoreError>;
    async fn applications_in(&self, window: ActivityWindow) -> Result<i64, StoreError>;
    async fn applications_by_status(&self) -> Result<Vec<(String, i64)>, StoreError>;
}

/// SQLite-backed store used by the running service.
pub struct SqliteCareersStore {
    pool: SqlitePool,
}

impl SqliteCareersStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CareersStore for SqliteCareersStore {
    async fn create_vacancy(&self, vacancy: NewVacancy) -> Result<VacancyRecord, StoreError> {
        let row = sqlx::query(
            "INSERT INTO job_vacancies (title, department, location, employment_type, status) \
             VALUES (?, ?, ?, ?, ?) RETURNING id, created_at",
        )
        .bind(&vacancy.title)
        .bind(&vacancy.department)
        .bind(&vacancy.location)
        .bind(vacancy.employment_type.as_str())
        .bind(vacancy.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(VacancyRecord {
            id: row.get("id"),
            title: vacancy.title,
            department: vacancy.department,
            location: vacancy.location,
            employment_type: vacancy.employment_type,
            status: vacancy.status,
            created_at: row.get("created_at"),
        })
    }

    async fn active_vacancies(&self) -> Result<Vec<VacancyRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, title, department, location, employment_type, status, created_at \
             FROM job_vacancies WHERE status = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(VacancyStatus::Active.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(vacancy_from_row).collect()
    }

    async fn vacancy_by_id(&self, id: i64) -> Result<Option<VacancyRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT id, title, department, location, employment_type, status, created_at \
             FROM job_vacancies WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(vacancy_from_row).transpose()
    }

    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<ApplicationRecord, StoreError> {
        let row = sqlx::query(
            "INSERT INTO job_applications (vacancy_id, candidate_name, candidate_email) \
             VALUES (?, ?, ?) RETURNING id, status, created_at",
        )
        .bind(application.vacancy_id)
        .bind(&application.candidate_name)
        .bind(&application.candidate_email)
        .fetch_one(&self.pool)
        .await?;

        let status = decode_column("status", row.get("status"), ApplicationStatus::parse)?;

        Ok(ApplicationRecord {
            id: row.get("id"),
            vacancy_id: application.vacancy_id,
            candidate_name: application.candidate_name,
            candidate_email: application.candidate_email,
            status,
            created_at: row.get("created_at"),
        })
    }

    async fn vacancy_total(&self) -> Result<i64, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_vacancies")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn vacancies_by(
        &self,
        dimension: VacancyDimension,
    ) -> Result<Vec<(String, i64)>, StoreError> {
        let sql = format!(
            "SELECT {column} AS label, COUNT(*) AS total FROM job_vacancies \
             GROUP BY {column} ORDER BY total DESC, label ASC",
            column = dimension.column()
        );

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(|row| (row.get("label"), row.get("total")))
            .collect())
    }

    async fn application_total(&self) -> Result<i64, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_applications")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn applications_in(&self, window: ActivityWindow) -> Result<i64, StoreError> {
        let sql = format!(
            "SELECT COUNT(*) FROM job_applications WHERE {}",
            window.predicate()
        );

        let total: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn applications_by_status(&self) -> Result<Vec<(String, i64)>, StoreError> {
        let rows = sqlx::query(
            "SELECT status AS label, COUNT(*) AS total FROM job_applications \
             GROUP BY status ORDER BY total DESC, label ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get("label"), row.get("total")))
            .collect())
    }
}

fn vacancy_from_row(row: &SqliteRow) -> Result<VacancyRecord, StoreError> {
    let employment_type = decode_column(
        "employment_type",
        row.get("employment_type"),
        EmploymentType::parse,
    )?;
    let status = decode_column("status", row.get("status"), VacancyStatus::parse)?;

    Ok(VacancyRecord {
        id: row.get("id"),
        title: row.get("title"),
        department: row.get("department"),
        location: row.get("location"),
        employment_type,
        status,
        created_at: row.get("created_at"),
    })
}

fn decode_column<T>(
    column: &'static str,
    raw: String,
    parse: fn(&str) -> Option<T>,
) -> Result<T, StoreError> {
    match parse(&raw) {
        Some(value) => Ok(value),
        None => Err(StoreError::Decode { column, value: raw }),
    }
}
