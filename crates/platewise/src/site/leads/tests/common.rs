use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDateTime;
use serde_json::Value;

use crate::site::auth::AdminAuth;
use crate::site::leads::domain::{FormType, LeadRecord, LeadSubmission, NewLead};
use crate::site::leads::notify::{LeadNotifier, NotificationError};
use crate::site::leads::repository::{LeadRepository, RepositoryError};
use crate::site::leads::router::leads_router;
use crate::site::leads::service::LeadIntakeService;
use crate::site::throttle::{FixedWindowLimiter, RateLimiter};

pub(super) const TEST_TOKEN: &str = "platewise-admin-token";

pub(super) fn clock() -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2026, 3, 10)
        .expect("valid date")
        .and_hms_opt(12, 0, 0)
        .expect("valid time")
}

/// Repository fake counting inserts so tests can prove validation
/// short-circuits before any write.
#[derive(Default)]
pub(super) struct RecordingRepository {
    fail: bool,
    next_id: AtomicI64,
    insert_calls: AtomicUsize,
    records: Mutex<Vec<LeadRecord>>,
}

impl RecordingRepository {
    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(super) fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub(super) fn records(&self) -> Vec<LeadRecord> {
        self.records.lock().expect("record mutex poisoned").clone()
    }
}

#[async_trait]
impl LeadRepository for RecordingRepository {
    async fn insert(&self, lead: NewLead) -> Result<LeadRecord, RepositoryError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RepositoryError::Unavailable("lead store offline".to_string()));
        }

        let record = LeadRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: lead.name,
            email: lead.email,
            company: lead.company,
            phone: lead.phone,
            form_type: lead.form_type,
            message: lead.message,
            source_page: lead.source_page,
            created_at: clock(),
        };
        self.records
            .lock()
            .expect("record mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<LeadRecord>, RepositoryError> {
        let mut rows = self.records();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

/// Notifier fake logging which leads it saw, optionally failing every
/// delivery.
#[derive(Default)]
pub(super) struct RecordingNotifier {
    fail: bool,
    notified: Mutex<Vec<i64>>,
}

impl RecordingNotifier {
    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(super) fn notified(&self) -> Vec<i64> {
        self.notified.lock().expect("notify mutex poisoned").clone()
    }
}

#[async_trait]
impl LeadNotifier for RecordingNotifier {
    async fn lead_captured(&self, lead: &LeadRecord) -> Result<(), NotificationError> {
        self.notified
            .lock()
            .expect("notify mutex poisoned")
            .push(lead.id);
        if self.fail {
            return Err(NotificationError::Webhook("webhook offline".to_string()));
        }
        Ok(())
    }
}

pub(super) fn submission() -> LeadSubmission {
    LeadSubmission {
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        company: Some("Acme Bistro".to_string()),
        phone: Some("+1 515 555 0134".to_string()),
        form_type: FormType::Demo,
        message: Some("We would like a walkthrough.".to_string()),
    }
}

pub(super) fn build_service(
    repository: Arc<RecordingRepository>,
    notifier: Arc<RecordingNotifier>,
) -> Arc<LeadIntakeService<RecordingRepository, RecordingNotifier>> {
    Arc::new(LeadIntakeService::new(repository, notifier))
}

pub(super) fn admin_auth() -> AdminAuth {
    AdminAuth::new(Some(TEST_TOKEN.to_string()))
}

pub(super) fn open_limiter() -> Arc<dyn RateLimiter> {
    Arc::new(FixedWindowLimiter::new(u32::MAX, Duration::from_secs(60)))
}

pub(super) fn leads_router_with(
    repository: Arc<RecordingRepository>,
    notifier: Arc<RecordingNotifier>,
    limiter: Arc<dyn RateLimiter>,
) -> axum::Router {
    leads_router(build_service(repository, notifier), admin_auth(), limiter)
}

/// Poll until the detached notification task lands or time runs out.
pub(super) async fn wait_for(condition: impl Fn() -> bool) {
    for _ in 0..50 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met before timeout");
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
