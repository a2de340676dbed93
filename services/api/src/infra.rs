use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use platewise::config::NotificationConfig;
use platewise::site::leads::{ChatWebhookNotifier, NotificationFanout, SmtpLeadNotifier};

/// Process-wide handles exposed to the probe endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire up whichever outbound lead channels the environment configures.
pub(crate) fn build_fanout(config: &NotificationConfig) -> NotificationFanout {
    let email = config.smtp.clone().map(SmtpLeadNotifier::new);
    let webhook = config.webhook_url.clone().map(ChatWebhookNotifier::new);
    NotificationFanout::new(email, webhook)
}
