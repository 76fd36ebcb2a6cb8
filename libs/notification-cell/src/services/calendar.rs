use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;

/// Client for the external calendar API. Event creation is best effort:
/// every failure path collapses to `None` so booking never fails because
/// the calendar is down.
pub struct CalendarService {
    client: Client,
    api_url: String,
    api_token: String,
    configured: bool,
}

impl CalendarService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.calendar_api_url.clone(),
            api_token: config.calendar_api_token.clone(),
            configured: config.is_calendar_configured(),
        }
    }

    /// Create a calendar event for a booked appointment, returning the
    /// event id when the API accepted it.
    pub async fn create_event(
        &self,
        calendar_id: Option<&str>,
        summary: &str,
        description: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Option<String> {
        if !self.configured {
            debug!("Calendar API not configured, skipping event creation");
            return None;
        }

        let body = json!({
            "calendar_id": calendar_id,
            "summary": summary,
            "description": description,
            "start": start_time.to_rfc3339(),
            "end": end_time.to_rfc3339(),
        });

        let response = self
            .client
            .post(format!("{}/events", self.api_url))
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&body)
            .send()
            .await;

        let response = match response {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Calendar event creation failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Calendar API rejected event: {}", response.status());
            return None;
        }

        match response.json::<Value>().await {
            Ok(payload) => {
                let event_id = payload
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                if event_id.is_none() {
                    warn!("Calendar API response carried no event id");
                }
                event_id
            }
            Err(e) => {
                warn!("Failed to decode calendar API response: {}", e);
                None
            }
        }
    }
}
