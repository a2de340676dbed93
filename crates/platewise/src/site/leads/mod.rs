//! Lead capture: field validation, persistence, and best-effort
//! outbound notification.

pub mod domain;
pub mod notify;
pub mod repository;
pub mod router;
pub mod service;
pub mod validate;

#[cfg(test)]
mod tests;

pub use domain::{FormType, LeadReceipt, LeadRecord, LeadSubmission, NewLead};
pub use notify::{
    ChatWebhookNotifier, LeadNotifier, NotificationError, NotificationFanout, SmtpLeadNotifier,
};
pub use repository::{LeadRepository, RepositoryError, SqliteLeadRepository};
pub use router::leads_router;
pub use service::{LeadIntakeError, LeadIntakeService};
pub use validate::{FieldFault, LeadValidator, ValidationError};
