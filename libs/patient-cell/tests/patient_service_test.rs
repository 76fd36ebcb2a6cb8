use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::models::{CreatePatientRequest, PatientError};
use patient_cell::services::patient::PatientService;
use shared_database::SupabaseClient;
use shared_utils::test_utils::{MockRows, TestConfig};

fn service_for(base_url: &str) -> PatientService {
    let config = TestConfig::with_base_url(base_url).to_app_config();
    PatientService::new(Arc::new(SupabaseClient::new(&config)))
}

#[tokio::test]
async fn test_create_patient_rejects_duplicate_email() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 5 }])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server.uri());
    let result = service
        .create_patient(CreatePatientRequest {
            email: "taken@example.com".to_string(),
            password: "secret".to_string(),
            full_name: "Taken User".to_string(),
            date_of_birth: None,
            medical_history: None,
        })
        .await;

    assert_matches!(result, Err(PatientError::EmailTaken));
}

#[tokio::test]
async fn test_create_patient_inserts_user_then_profile() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockRows::user(42, "new@example.com", "patient", "hashed")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockRows::patient(7, 42)
        ])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server.uri());
    let patient = service
        .create_patient(CreatePatientRequest {
            email: "new@example.com".to_string(),
            password: "secret".to_string(),
            full_name: "New Patient".to_string(),
            date_of_birth: None,
            medical_history: None,
        })
        .await
        .unwrap();

    assert_eq!(patient.id, 7);
    assert_eq!(patient.user_id, 42);
}

#[tokio::test]
async fn test_get_patient_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", "eq.99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server.uri());
    let result = service.get_patient(99).await;

    assert_matches!(result, Err(PatientError::NotFound));
}
