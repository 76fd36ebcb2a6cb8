use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::models::{CreateAvailabilityRequest, DoctorError};
use doctor_cell::services::availability::AvailabilityService;
use shared_database::SupabaseClient;
use shared_utils::test_utils::{MockRows, TestConfig};

fn service_for(base_url: &str) -> AvailabilityService {
    let config = TestConfig::with_base_url(base_url).to_app_config();
    AvailabilityService::new(Arc::new(SupabaseClient::new(&config)))
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[tokio::test]
async fn test_create_availability_rejects_inverted_window() {
    // Validation fails before any store call is made
    let service = service_for("http://127.0.0.1:9");

    let result = service
        .create_availability(
            1,
            CreateAvailabilityRequest {
                day_of_week: 0,
                start_time: time(17, 0),
                end_time: time(9, 0),
                is_available: None,
            },
        )
        .await;

    assert_matches!(result, Err(DoctorError::InvalidSchedule(_)));
}

#[tokio::test]
async fn test_create_availability_rejects_day_out_of_range() {
    let service = service_for("http://127.0.0.1:9");

    let result = service
        .create_availability(
            1,
            CreateAvailabilityRequest {
                day_of_week: 7,
                start_time: time(9, 0),
                end_time: time(17, 0),
                is_available: None,
            },
        )
        .await;

    assert_matches!(result, Err(DoctorError::InvalidSchedule(_)));
}

#[tokio::test]
async fn test_create_availability_rejects_overlapping_window() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/availabilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockRows::availability(10, 1, 2, "09:00:00", "12:00:00")
        ])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server.uri());
    let result = service
        .create_availability(
            1,
            CreateAvailabilityRequest {
                day_of_week: 2,
                start_time: time(11, 0),
                end_time: time(14, 0),
                is_available: None,
            },
        )
        .await;

    assert_matches!(result, Err(DoctorError::InvalidSchedule(_)));
}

#[tokio::test]
async fn test_create_availability_allows_adjacent_window() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/availabilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockRows::availability(10, 1, 2, "09:00:00", "12:00:00")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/availabilities"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockRows::availability(11, 1, 2, "12:00:00", "17:00:00")
        ])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server.uri());
    let created = service
        .create_availability(
            1,
            CreateAvailabilityRequest {
                day_of_week: 2,
                start_time: time(12, 0),
                end_time: time(17, 0),
                is_available: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(created.id, 11);
    assert_eq!(created.start_time, time(12, 0));
}

#[tokio::test]
async fn test_free_slots_for_date_excludes_booked_windows() {
    let mock_server = MockServer::start().await;
    // 2026-03-02 is a Monday, day_of_week 0
    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/availabilities"))
        .and(query_param("day_of_week", "eq.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockRows::availability(10, 7, 0, "09:00:00", "11:00:00")
        ])))
        .mount(&mock_server)
        .await;

    let booked_start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();
    let booked_end = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockRows::appointment(1, 7, 3, booked_start, booked_end, "scheduled")
        ])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server.uri());
    let slots = service.free_slots_for_date(7, date).await.unwrap();

    let starts: Vec<_> = slots.iter().map(|s| s.start_time).collect();
    assert_eq!(
        starts,
        vec![
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 2, 10, 30, 0).unwrap(),
        ]
    );
}

#[tokio::test]
async fn test_free_slots_for_date_empty_when_no_schedule() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/availabilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server.uri());
    let date = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
    let slots = service.free_slots_for_date(7, date).await.unwrap();

    assert!(slots.is_empty());
}
