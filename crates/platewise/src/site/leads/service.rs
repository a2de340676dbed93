use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{LeadReceipt, LeadRecord, LeadSubmission};
use super::notify::LeadNotifier;
use super::repository::{LeadRepository, RepositoryError};
use super::validate::{LeadValidator, ValidationError};

/// Service composing the validator, repository, and notification fanout.
pub struct LeadIntakeService<R, N> {
    validator: LeadValidator,
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R, N> LeadIntakeService<R, N>
where
    R: LeadRepository + 'static,
    N: LeadNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            validator: LeadValidator::default(),
            repository,
            notifier,
        }
    }

    /// Validate and store a submission, returning the stored lead's id.
    ///
    /// Notifications run on a detached task after the insert commits;
    /// their failures never surface here.
    pub async fn submit(
        &self,
        submission: LeadSubmission,
        source_page: String,
    ) -> Result<LeadReceipt, LeadIntakeError> {
        let new_lead = self.validator.check(submission, source_page)?;
        let record = self.repository.insert(new_lead).await?;

        info!(
            lead_id = record.id,
            form_type = record.form_type.as_str(),
            "lead captured"
        );

        let receipt = LeadReceipt { id: record.id };
        self.dispatch_notifications(record);

        Ok(receipt)
    }

    /// Most recently captured leads, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<LeadRecord>, LeadIntakeError> {
        Ok(self.repository.recent(limit).await?)
    }

    fn dispatch_notifications(&self, record: LeadRecord) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(error) = notifier.lead_captured(&record).await {
                warn!(lead_id = record.id, %error, "lead notification failed");
            }
        });
    }
}

/// Error raised by the lead intake service.
#[derive(Debug, thiserror::Error)]
pub enum LeadIntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
