use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use super::domain::{FormType, LeadRecord, NewLead};

/// Storage abstraction so the intake service can be exercised in
/// isolation.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn insert(&self, lead: NewLead) -> Result<LeadRecord, RepositoryError>;
    async fn recent(&self, limit: i64) -> Result<Vec<LeadRecord>, RepositoryError>;
}

/// Error enumeration for lead storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("lead query failed: {0}")]
    Query(#[from] sqlx::Error),
    #[error("column {column} held unexpected value '{value}'")]
    Decode {
        column: &'static str,
        value: String,
    },
    #[error("lead store unavailable: {0}")]
    Unavailable(String),
}

/// SQLite-backed repository used by the running service.
pub struct SqliteLeadRepository {
    pool: SqlitePool,
}

impl SqliteLeadRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadRepository for SqliteLeadRepository {
    async fn insert(&self, lead: NewLead) -> Result<LeadRecord, RepositoryError> {
        let row = sqlx::query(
            "INSERT INTO leads (name, email, company, phone, form_type, message, source_page) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id, created_at",
        )
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.company)
        .bind(&lead.phone)
        .bind(lead.form_type.as_str())
        .bind(&lead.message)
        .bind(&lead.source_page)
        .fetch_one(&self.pool)
        .await?;

        Ok(LeadRecord {
            id: row.get("id"),
            name: lead.name,
            email: lead.email,
            company: lead.company,
            phone: lead.phone,
            form_type: lead.form_type,
            message: lead.message,
            source_page: lead.source_page,
            created_at: row.get("created_at"),
        })
    }

    async fn recent(&self, limit: i64) -> Result<Vec<LeadRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, email, company, phone, form_type, message, source_page, created_at \
             FROM leads ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut leads = Vec::with_capacity(rows.len());
        for row in rows {
            let raw: String = row.get("form_type");
            let form_type = match FormType::parse(&raw) {
                Some(kind) => kind,
                None => {
                    return Err(RepositoryError::Decode {
                        column: "form_type",
                        value: raw,
                    })
                }
            };

            leads.push(LeadRecord {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
                company: row.get("company"),
                phone: row.get("phone"),
                form_type,
                message: row.get("message"),
                source_page: row.get("source_page"),
                created_at: row.get("created_at"),
            });
        }

        Ok(leads)
    }
}
