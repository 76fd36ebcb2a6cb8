use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::models::AuthError;
use auth_cell::services::auth::AuthService;
use auth_cell::services::password::PasswordService;
use shared_database::SupabaseClient;
use shared_models::auth::TokenKind;
use shared_utils::jwt::validate_token;
use shared_utils::test_utils::{MockRows, TestConfig};

fn service_for(base_url: &str) -> (AuthService, String) {
    let test_config = TestConfig::with_base_url(base_url);
    let config = test_config.to_app_config();
    let db = Arc::new(SupabaseClient::new(&config));
    (AuthService::new(&config, db), test_config.jwt_secret)
}

fn user_row(id: i64, email: &str, password: &str, is_active: bool) -> serde_json::Value {
    let hash = PasswordService::hash_password(password).unwrap();
    let mut row = MockRows::user(id, email, "patient", &hash);
    row["is_active"] = json!(is_active);
    row
}

#[tokio::test]
async fn test_login_returns_token_pair() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([user_row(1, "jane@example.com", "secret", true)])),
        )
        .mount(&mock_server)
        .await;

    let (service, secret) = service_for(&mock_server.uri());
    let response = service.login("jane@example.com", "secret").await.unwrap();

    assert_eq!(response.token_type, "bearer");
    assert_eq!(response.user.id, 1);

    let identity = validate_token(&response.access_token, &secret, TokenKind::Access).unwrap();
    assert_eq!(identity.id, 1);

    let identity = validate_token(&response.refresh_token, &secret, TokenKind::Refresh).unwrap();
    assert_eq!(identity.id, 1);
}

#[tokio::test]
async fn test_login_unknown_email_fails_uniformly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let (service, _) = service_for(&mock_server.uri());
    let result = service.login("nobody@example.com", "secret").await;

    assert_matches!(result, Err(AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_wrong_password_fails_uniformly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([user_row(1, "jane@example.com", "secret", true)])),
        )
        .mount(&mock_server)
        .await;

    let (service, _) = service_for(&mock_server.uri());
    let result = service.login("jane@example.com", "wrong").await;

    assert_matches!(result, Err(AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_inactive_user_fails_uniformly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([user_row(1, "jane@example.com", "secret", false)])),
        )
        .mount(&mock_server)
        .await;

    let (service, _) = service_for(&mock_server.uri());
    let result = service.login("jane@example.com", "secret").await;

    assert_matches!(result, Err(AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", "eq.1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([user_row(1, "jane@example.com", "secret", true)])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.jane@example.com"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([user_row(1, "jane@example.com", "secret", true)])),
        )
        .mount(&mock_server)
        .await;

    let (service, secret) = service_for(&mock_server.uri());
    let login = service.login("jane@example.com", "secret").await.unwrap();

    let refreshed = service.refresh(&login.refresh_token).await.unwrap();
    assert_eq!(refreshed.token_type, "bearer");

    let identity = validate_token(&refreshed.access_token, &secret, TokenKind::Access).unwrap();
    assert_eq!(identity.id, 1);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([user_row(1, "jane@example.com", "secret", true)])),
        )
        .mount(&mock_server)
        .await;

    let (service, _) = service_for(&mock_server.uri());
    let login = service.login("jane@example.com", "secret").await.unwrap();

    // An access token is not a refresh token
    let result = service.refresh(&login.access_token).await;
    assert_matches!(result, Err(AuthError::InvalidToken(_)));
}

#[tokio::test]
async fn test_refresh_rejects_garbage() {
    let (service, _) = service_for("http://127.0.0.1:9");
    let result = service.refresh("not-a-token").await;
    assert_matches!(result, Err(AuthError::InvalidToken(_)));
}
