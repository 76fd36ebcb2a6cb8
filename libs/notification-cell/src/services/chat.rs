use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use shared_config::AppConfig;

use crate::models::ReportNotice;

/// Posts report summaries to the team Slack channel via incoming webhook.
pub struct ChatService {
    client: Client,
    webhook_url: String,
    configured: bool,
}

impl ChatService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            webhook_url: config.slack_webhook_url.clone(),
            configured: config.is_slack_configured(),
        }
    }

    pub async fn send_report_notification(&self, notice: &ReportNotice) -> bool {
        let message = format_report_notification(notice);

        if !self.configured {
            debug!("Slack webhook not configured, skipping report notification");
            return false;
        }

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&json!({ "text": message }))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!("Slack webhook rejected notification: {}", resp.status());
                false
            }
            Err(e) => {
                warn!("Failed to send Slack notification: {}", e);
                false
            }
        }
    }
}

/// Render the Slack-markdown message for a doctor report.
pub fn format_report_notification(notice: &ReportNotice) -> String {
    let period = notice.period.as_deref().unwrap_or("Last 7 days");

    let mut message = format!("*Doctor Report for Dr. {}*\n", notice.doctor_name);
    message.push_str(&format!("*Period:* {}\n\n", period));

    message.push_str("*Appointment Summary:*\n");
    message.push_str(&format!("• Total: {}\n", notice.total));
    message.push_str(&format!("• Completed: {}\n", notice.completed));
    message.push_str(&format!("• Scheduled: {}\n", notice.scheduled));
    message.push_str(&format!("• Cancelled: {}\n\n", notice.cancelled));

    if !notice.top_conditions.is_empty() {
        message.push_str("*Top Conditions:*\n");
        for (condition, count) in notice.top_conditions.iter().take(3) {
            message.push_str(&format!("• {}: {}\n", title_case(condition), count));
        }
        message.push('\n');
    }

    message.push_str("*Summary:*\n");
    message.push_str(&notice.summary);

    message
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
