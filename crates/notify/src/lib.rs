use chrono::Utc;
use model::report::RunReport;
use serde_json::json;
use tracing::{debug, info, warn};

/// Where run notifications go. Absent configuration disables delivery
/// instead of failing the run.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub webhook_url: String,
    pub auth_token: Option<String>,
}

/// Best-effort delivery of failure alerts and success reports. Every send is
/// a single attempt; a delivery failure is logged and never escalated to the
/// caller.
pub struct Notifier {
    client: reqwest::Client,
    config: Option<NotifyConfig>,
}

impl Notifier {
    pub fn new(config: Option<NotifyConfig>) -> Self {
        if config.is_none() {
            warn!("Notification webhook not configured; alerts and reports are disabled");
        }
        Notifier {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Reports a fatal run failure with the operation that triggered it.
    pub async fn alert_failure(&self, operation: &str, error: &str) {
        self.send(json!({
            "event": "failure",
            "operation": operation,
            "error": error,
            "at": Utc::now(),
        }))
        .await;
    }

    /// Ships the aggregated run report after a successful run.
    pub async fn report_success(&self, report: &RunReport) {
        self.send(json!({
            "event": "success",
            "report": report,
        }))
        .await;
    }

    async fn send(&self, payload: serde_json::Value) {
        let Some(config) = &self.config else {
            debug!("Notification skipped: no webhook configured");
            return;
        };

        let mut request = self.client.post(&config.webhook_url).json(&payload);
        if let Some(token) = &config.auth_token {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                info!("Notification delivered");
            }
            Ok(response) => {
                warn!("Notification rejected with status {}", response.status());
            }
            Err(error) => {
                warn!(%error, "Failed to deliver notification");
            }
        }
    }
}
