use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notification_cell::models::ReportNotice;
use notification_cell::services::calendar::CalendarService;
use notification_cell::services::chat::ChatService;
use shared_config::{AppConfig, DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES};

fn config_with(calendar_url: &str, slack_url: &str) -> AppConfig {
    AppConfig {
        supabase_url: "http://localhost:54321".to_string(),
        supabase_anon_key: "test-anon-key".to_string(),
        jwt_secret: "test-secret".to_string(),
        access_token_expire_minutes: DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
        slack_webhook_url: slack_url.to_string(),
        mail_api_url: String::new(),
        mail_api_key: String::new(),
        mail_sender: String::new(),
        calendar_api_url: calendar_url.to_string(),
        calendar_api_token: if calendar_url.is_empty() {
            String::new()
        } else {
            "calendar-token".to_string()
        },
    }
}

fn empty_report(doctor_name: &str) -> ReportNotice {
    ReportNotice {
        doctor_name: doctor_name.to_string(),
        total: 0,
        completed: 0,
        scheduled: 0,
        cancelled: 0,
        period: None,
        top_conditions: vec![],
        summary: "No appointments.".to_string(),
    }
}

#[tokio::test]
async fn test_create_event_returns_id_from_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "evt_123" })))
        .mount(&mock_server)
        .await;

    let service = CalendarService::new(&config_with(&mock_server.uri(), ""));
    let event_id = service
        .create_event(
            Some("cal-1"),
            "Appointment",
            "Checkup",
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap(),
        )
        .await;

    assert_eq!(event_id.as_deref(), Some("evt_123"));
}

#[tokio::test]
async fn test_create_event_swallows_api_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let service = CalendarService::new(&config_with(&mock_server.uri(), ""));
    let event_id = service
        .create_event(
            None,
            "Appointment",
            "",
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap(),
        )
        .await;

    assert!(event_id.is_none());
}

#[tokio::test]
async fn test_create_event_skipped_when_unconfigured() {
    let service = CalendarService::new(&config_with("", ""));
    let event_id = service
        .create_event(
            None,
            "Appointment",
            "",
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap(),
        )
        .await;

    assert!(event_id.is_none());
}

#[tokio::test]
async fn test_slack_notification_posts_text_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({})))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let service = ChatService::new(&config_with("", &mock_server.uri()));
    assert!(service.send_report_notification(&empty_report("Stone")).await);
}

#[tokio::test]
async fn test_slack_notification_reports_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let service = ChatService::new(&config_with("", &mock_server.uri()));
    assert!(!service.send_report_notification(&empty_report("Stone")).await);
}
